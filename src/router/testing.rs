//! Mock implementations for router tests
//!
//! These mocks enable scenario testing without real network I/O.

use super::traits::{ChatTransport, NameResolver};
use crate::telegram::{CallbackQuery, Chat, InlineKeyboardMarkup, Message, Update, User};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

/// A recorded outgoing transport action
#[derive(Debug, Clone, PartialEq)]
pub enum Outgoing {
    Message {
        chat_id: i64,
        text: String,
        with_keyboard: bool,
    },
    Edit {
        chat_id: i64,
        message_id: i64,
        text: String,
    },
    Document {
        chat_id: i64,
        filename: String,
        bytes: Vec<u8>,
        caption: String,
    },
    CallbackAck(String),
}

/// Mock transport that records everything sent through it
pub struct MockTransport {
    outgoing: Mutex<Vec<Outgoing>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self {
            outgoing: Mutex::new(Vec::new()),
        }
    }

    pub fn outgoing(&self) -> Vec<Outgoing> {
        self.outgoing.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatTransport for MockTransport {
    async fn send_message(
        &self,
        chat_id: i64,
        text: &str,
        keyboard: Option<InlineKeyboardMarkup>,
    ) -> Result<(), String> {
        self.outgoing.lock().unwrap().push(Outgoing::Message {
            chat_id,
            text: text.to_string(),
            with_keyboard: keyboard.is_some(),
        });
        Ok(())
    }

    async fn edit_message_text(
        &self,
        chat_id: i64,
        message_id: i64,
        text: &str,
    ) -> Result<(), String> {
        self.outgoing.lock().unwrap().push(Outgoing::Edit {
            chat_id,
            message_id,
            text: text.to_string(),
        });
        Ok(())
    }

    async fn send_document(
        &self,
        chat_id: i64,
        filename: &str,
        bytes: Vec<u8>,
        caption: &str,
    ) -> Result<(), String> {
        self.outgoing.lock().unwrap().push(Outgoing::Document {
            chat_id,
            filename: filename.to_string(),
            bytes,
            caption: caption.to_string(),
        });
        Ok(())
    }

    async fn answer_callback(&self, callback_query_id: &str) -> Result<(), String> {
        self.outgoing
            .lock()
            .unwrap()
            .push(Outgoing::CallbackAck(callback_query_id.to_string()));
        Ok(())
    }
}

/// Mock resolver with a fixed name table; unknown users fail resolution
pub struct MockResolver {
    names: HashMap<i64, String>,
}

impl MockResolver {
    pub fn new<const N: usize>(names: [(i64, &str); N]) -> Self {
        Self {
            names: names
                .into_iter()
                .map(|(id, name)| (id, name.to_string()))
                .collect(),
        }
    }
}

#[async_trait]
impl NameResolver for MockResolver {
    async fn resolve_display_name(&self, user_id: i64) -> Result<String, String> {
        self.names
            .get(&user_id)
            .cloned()
            .ok_or_else(|| format!("unknown user {user_id}"))
    }
}

/// Build an incoming text-message update for a private chat
pub fn message_update(user_id: i64, text: &str) -> Update {
    Update {
        update_id: 0,
        message: Some(Message {
            message_id: 1,
            from: Some(User {
                id: user_id,
                first_name: "test".to_string(),
                last_name: None,
                username: None,
            }),
            chat: Chat {
                id: user_id,
                first_name: None,
                last_name: None,
                username: None,
            },
            text: Some(text.to_string()),
        }),
        callback_query: None,
    }
}

/// Build an incoming callback-query update against a keyboard message
pub fn callback_update(user_id: i64, message_id: i64, data: &str) -> Update {
    Update {
        update_id: 0,
        message: None,
        callback_query: Some(CallbackQuery {
            id: format!("cb-{user_id}-{message_id}"),
            from: User {
                id: user_id,
                first_name: "test".to_string(),
                last_name: None,
                username: None,
            },
            message: Some(Message {
                message_id,
                from: None,
                chat: Chat {
                    id: user_id,
                    first_name: None,
                    last_name: None,
                    username: None,
                },
                text: None,
            }),
            data: Some(data.to_string()),
        }),
    }
}
