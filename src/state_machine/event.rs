//! Events that trigger state transitions

use crate::db::Category;
use std::str::FromStr;

/// A recognized slash command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Start,
    Add,
    Delete,
    List,
    ListCategory,
    ListCsv,
}

impl Command {
    /// Parse a command out of a message text, if it is one of ours.
    ///
    /// `/add@botname` forms are accepted the way the transport delivers
    /// them in group chats. Unknown `/whatever` is not a command here; it
    /// falls through to plain-text dispatch so an active flow can consume
    /// it, matching the dispatcher precedence of command filters over
    /// state handlers.
    pub fn parse(text: &str) -> Option<Command> {
        let first = text.trim().split_whitespace().next()?;
        let name = first.strip_prefix('/')?;
        let name = name.split('@').next().unwrap_or(name);
        match name {
            "start" => Some(Command::Start),
            "add" => Some(Command::Add),
            "delete" => Some(Command::Delete),
            "list" => Some(Command::List),
            "list_category" => Some(Command::ListCategory),
            "list_csv" => Some(Command::ListCsv),
            _ => None,
        }
    }
}

/// Which keyboard a category button press came from
///
/// The two keyboards share a layout; the payload prefix keeps "category for
/// a new task" and "category for filtering" apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonTarget {
    /// `category_<Name>` — choose the category for the task being added
    NewTask,
    /// `filter_category_<Name>` — choose the category to filter listings by
    Filter,
}

/// Events that trigger state transitions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// A recognized slash command
    Command(Command),
    /// A plain text message (including unrecognized `/commands`)
    Text(String),
    /// A category button press from one of the two inline keyboards
    CategoryButton {
        target: ButtonTarget,
        category: Category,
    },
}

impl Event {
    /// Classify an incoming message text
    pub fn from_message_text(text: &str) -> Event {
        match Command::parse(text) {
            Some(cmd) => Event::Command(cmd),
            None => Event::Text(text.to_string()),
        }
    }

    /// Parse a callback payload (`category_<Name>` / `filter_category_<Name>`)
    ///
    /// Returns `None` for payloads outside the two tagged families, which
    /// the router ignores.
    pub fn from_callback_data(data: &str) -> Option<Event> {
        let (target, name) = if let Some(name) = data.strip_prefix("filter_category_") {
            (ButtonTarget::Filter, name)
        } else if let Some(name) = data.strip_prefix("category_") {
            (ButtonTarget::NewTask, name)
        } else {
            return None;
        };

        let category = Category::from_str(name).ok()?;
        Some(Event::CategoryButton { target, category })
    }
}
