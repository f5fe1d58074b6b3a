//! Trait abstractions for router I/O
//!
//! These traits enable testing the router with mock implementations.

use crate::telegram::{InlineKeyboardMarkup, TelegramClient};
use async_trait::async_trait;

/// Outgoing message surface of the chat transport
#[async_trait]
pub trait ChatTransport: Send + Sync {
    /// Send a text message, optionally with an inline keyboard
    async fn send_message(
        &self,
        chat_id: i64,
        text: &str,
        keyboard: Option<InlineKeyboardMarkup>,
    ) -> Result<(), String>;

    /// Replace the text of an existing message (used for keyboard messages)
    async fn edit_message_text(
        &self,
        chat_id: i64,
        message_id: i64,
        text: &str,
    ) -> Result<(), String>;

    /// Deliver an in-memory file as a named attachment
    async fn send_document(
        &self,
        chat_id: i64,
        filename: &str,
        bytes: Vec<u8>,
        caption: &str,
    ) -> Result<(), String>;

    /// Acknowledge a callback query
    async fn answer_callback(&self, callback_query_id: &str) -> Result<(), String>;
}

/// Best-effort resolution of a human-readable display name for a user
///
/// Failures are expected (the user may never have talked to the bot); the
/// router applies a numeric fallback and never surfaces the error.
#[async_trait]
pub trait NameResolver: Send + Sync {
    async fn resolve_display_name(&self, user_id: i64) -> Result<String, String>;
}

// ============================================================================
// Production Adapters
// ============================================================================

#[async_trait]
impl ChatTransport for TelegramClient {
    async fn send_message(
        &self,
        chat_id: i64,
        text: &str,
        keyboard: Option<InlineKeyboardMarkup>,
    ) -> Result<(), String> {
        TelegramClient::send_message(self, chat_id, text, keyboard.as_ref())
            .await
            .map(|_| ())
            .map_err(|e| e.to_string())
    }

    async fn edit_message_text(
        &self,
        chat_id: i64,
        message_id: i64,
        text: &str,
    ) -> Result<(), String> {
        TelegramClient::edit_message_text(self, chat_id, message_id, text)
            .await
            .map(|_| ())
            .map_err(|e| e.to_string())
    }

    async fn send_document(
        &self,
        chat_id: i64,
        filename: &str,
        bytes: Vec<u8>,
        caption: &str,
    ) -> Result<(), String> {
        TelegramClient::send_document(self, chat_id, filename, bytes, caption)
            .await
            .map(|_| ())
            .map_err(|e| e.to_string())
    }

    async fn answer_callback(&self, callback_query_id: &str) -> Result<(), String> {
        TelegramClient::answer_callback_query(self, callback_query_id)
            .await
            .map(|_| ())
            .map_err(|e| e.to_string())
    }
}

#[async_trait]
impl NameResolver for TelegramClient {
    async fn resolve_display_name(&self, user_id: i64) -> Result<String, String> {
        let chat = self.get_chat(user_id).await.map_err(|e| e.to_string())?;
        chat.display_name()
            .ok_or_else(|| "chat exposes no name".to_string())
    }
}
