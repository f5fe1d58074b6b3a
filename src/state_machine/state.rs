//! Conversation state types

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Per-user conversation state
///
/// Tracks which multi-step command is in progress for a user. Partially
/// collected input travels inside the variant that needs it, so a phase can
/// never be observed without its pending data.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ChatState {
    /// No flow in progress
    #[default]
    Idle,

    /// `/add` received, waiting for the task text
    AwaitingTaskText,

    /// Task text collected, waiting for a category button press
    AwaitingCategory { task_text: String },

    /// `/list_category` received, waiting for a filter button press
    AwaitingCategoryFilter,

    /// `/delete` received, waiting for the task id
    AwaitingDeleteId,
}

impl ChatState {
    /// Whether a multi-step flow is in progress
    pub fn in_flow(&self) -> bool {
        !matches!(self, ChatState::Idle)
    }
}

/// In-memory keyed state store: user id → conversation state
///
/// Entries are created on first use and bounded by the active user count.
/// State is intentionally not persisted across restarts; tasks themselves
/// are durable.
#[derive(Clone, Default)]
pub struct StateStore {
    states: Arc<Mutex<HashMap<i64, ChatState>>>,
}

impl StateStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state for a user, `Idle` if never seen
    pub fn get(&self, user_id: i64) -> ChatState {
        self.states
            .lock()
            .unwrap()
            .get(&user_id)
            .cloned()
            .unwrap_or_default()
    }

    /// Replace a user's state
    pub fn set(&self, user_id: i64, state: ChatState) {
        if state == ChatState::Idle {
            // Idle is the default; drop the entry instead of keeping it
            self.states.lock().unwrap().remove(&user_id);
        } else {
            self.states.lock().unwrap().insert(user_id, state);
        }
    }
}
