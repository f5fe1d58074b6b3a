//! CSV export of a user's tasks
//!
//! `;`-separated with a UTF-8 byte-order marker so common spreadsheet tools
//! pick up the encoding and split columns correctly.

use crate::db::Task;

/// UTF-8 BOM
const BOM: [u8; 3] = [0xEF, 0xBB, 0xBF];

const HEADER: [&str; 5] = ["ID", "Текст", "Категория", "Пользователь", "Дата создания"];

/// Serialize tasks to CSV bytes, one row per task after the header
pub fn tasks_to_csv(tasks: &[Task]) -> Vec<u8> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(b';')
        .from_writer(Vec::new());

    // Writes to a Vec cannot fail
    writer.write_record(HEADER).unwrap();
    for task in tasks {
        writer
            .write_record([
                task.id.to_string(),
                task.text.clone(),
                task.category.to_string(),
                task.owner.to_string(),
                task.created_at.clone(),
            ])
            .unwrap();
    }

    let mut bytes = BOM.to_vec();
    bytes.extend(writer.into_inner().unwrap());
    bytes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Category;

    fn task(id: i64, text: &str, owner: i64, category: Category) -> Task {
        Task {
            id,
            text: text.to_string(),
            owner,
            category,
            created_at: "2024-06-01 12:00:00".to_string(),
        }
    }

    #[test]
    fn test_export_starts_with_bom() {
        let bytes = tasks_to_csv(&[]);
        assert_eq!(&bytes[..3], &BOM);
    }

    #[test]
    fn test_export_header_and_rows() {
        let tasks = vec![
            task(1, "Write spec", 100, Category::Backend),
            task(2, "Draw mockups", 100, Category::Frontend),
        ];
        let bytes = tasks_to_csv(&tasks);
        let text = std::str::from_utf8(&bytes[3..]).unwrap();

        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "ID;Текст;Категория;Пользователь;Дата создания");
        assert_eq!(lines[1], "1;Write spec;Backend;100;2024-06-01 12:00:00");
        assert_eq!(lines[2], "2;Draw mockups;Frontend;100;2024-06-01 12:00:00");
    }

    #[test]
    fn test_fields_containing_the_delimiter_are_quoted() {
        let tasks = vec![task(1, "fix a; then b", 5, Category::Business)];
        let bytes = tasks_to_csv(&tasks);
        let text = std::str::from_utf8(&bytes[3..]).unwrap();
        assert!(text.contains("\"fix a; then b\""));
    }
}
