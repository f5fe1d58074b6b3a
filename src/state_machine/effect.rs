//! Effects produced by state transitions

use crate::db::Category;
use crate::state_machine::event::ButtonTarget;

/// Effects to be executed after a state transition
///
/// The transition function is pure; everything that touches the store or the
/// transport is described here and executed by the router.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Send a plain text reply
    Reply(String),

    /// Send a prompt together with the matching category keyboard
    PromptCategory { text: String, target: ButtonTarget },

    /// Insert a task and confirm it to the user
    CreateTask { text: String, category: Category },

    /// Attempt a deletion and report the outcome
    DeleteTask { id: i64 },

    /// Render the team task list, optionally filtered by category
    ListTasks { category: Option<Category> },

    /// Export the requester's own tasks as a CSV attachment
    ExportCsv,
}
