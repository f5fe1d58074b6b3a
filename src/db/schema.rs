//! Database schema and types

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// SQL schema for initialization
pub const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS tasks (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    text TEXT NOT NULL,
    user INTEGER NOT NULL,
    category TEXT NOT NULL DEFAULT 'Business',
    created_at TEXT NOT NULL
);
"#;

/// Task category
///
/// A fixed set of labels classifying a task's subject area. Stored as its
/// wire name in the `category` column.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
pub enum Category {
    DataBase,
    Frontend,
    Backend,
    #[default]
    Business,
}

impl Category {
    /// All categories, in keyboard display order
    pub const ALL: [Category; 4] = [
        Category::DataBase,
        Category::Frontend,
        Category::Backend,
        Category::Business,
    ];

    /// Icon shown next to the category in listings and keyboards
    pub fn icon(self) -> &'static str {
        match self {
            Category::DataBase => "💾",
            Category::Frontend => "🎨",
            Category::Backend => "⚙️",
            Category::Business => "💼",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Category::DataBase => "DataBase",
            Category::Frontend => "Frontend",
            Category::Backend => "Backend",
            Category::Business => "Business",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string is not one of the four category names
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownCategory(pub String);

impl fmt::Display for UnknownCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown category: {}", self.0)
    }
}

impl std::error::Error for UnknownCategory {}

impl FromStr for Category {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "DataBase" => Ok(Category::DataBase),
            "Frontend" => Ok(Category::Frontend),
            "Backend" => Ok(Category::Backend),
            "Business" => Ok(Category::Business),
            other => Err(UnknownCategory(other.to_string())),
        }
    }
}

/// Task record
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Task {
    pub id: i64,
    pub text: String,
    /// Telegram user id of the creator; only this user may delete the task
    pub owner: i64,
    pub category: Category,
    /// Creation timestamp as a sortable `%Y-%m-%d %H:%M:%S` string
    pub created_at: String,
}

/// Parse a stored category, falling back to the default for rows written
/// before the category column existed (or by other writers).
pub fn parse_category(s: &str) -> Category {
    s.parse().unwrap_or_default()
}
