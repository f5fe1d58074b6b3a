//! Telegram Bot API client
//!
//! A thin long-polling client over reqwest covering the handful of methods
//! the bot needs. Every call is a single attempt; transient failures are
//! the caller's concern.

pub mod types;

pub use types::*;

use reqwest::Client;
use serde::de::DeserializeOwned;
use serde_json::json;
use std::time::Duration;
use thiserror::Error;

/// Long-poll timeout for `getUpdates`, seconds
const POLL_TIMEOUT_SECS: u64 = 30;

#[derive(Error, Debug)]
pub enum TelegramError {
    #[error("Network error: {0}")]
    Network(String),
    #[error("Telegram API error: {0}")]
    Api(String),
    #[error("Failed to parse response: {0}")]
    Parse(String),
}

pub type TelegramResult<T> = Result<T, TelegramError>;

/// Bot API client
#[derive(Clone)]
pub struct TelegramClient {
    client: Client,
    base_url: String,
}

impl TelegramClient {
    pub fn new(token: &str) -> Self {
        // Client timeout must outlive the long-poll window
        let client = Client::builder()
            .timeout(Duration::from_secs(POLL_TIMEOUT_SECS + 30))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            base_url: format!("https://api.telegram.org/bot{token}"),
        }
    }

    /// Call a Bot API method with a JSON body and unwrap the envelope
    async fn call<T: DeserializeOwned>(
        &self,
        method: &str,
        body: &serde_json::Value,
    ) -> TelegramResult<T> {
        let response = self
            .client
            .post(format!("{}/{}", self.base_url, method))
            .json(body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    TelegramError::Network(format!("Request timeout: {e}"))
                } else if e.is_connect() {
                    TelegramError::Network(format!("Connection failed: {e}"))
                } else {
                    TelegramError::Network(format!("Request failed: {e}"))
                }
            })?;

        let body = response
            .text()
            .await
            .map_err(|e| TelegramError::Network(format!("Failed to read response: {e}")))?;

        let envelope: ApiResponse<T> = serde_json::from_str(&body)
            .map_err(|e| TelegramError::Parse(format!("{e} - body: {body}")))?;

        if !envelope.ok {
            return Err(TelegramError::Api(
                envelope
                    .description
                    .unwrap_or_else(|| "no description".to_string()),
            ));
        }

        envelope
            .result
            .ok_or_else(|| TelegramError::Parse("ok response without result".to_string()))
    }

    /// Fetch the next batch of updates via long polling
    pub async fn get_updates(&self, offset: i64) -> TelegramResult<Vec<Update>> {
        self.call(
            "getUpdates",
            &json!({
                "offset": offset,
                "timeout": POLL_TIMEOUT_SECS,
                "allowed_updates": ["message", "callback_query"],
            }),
        )
        .await
    }

    /// Send a text message, optionally with an inline keyboard
    pub async fn send_message(
        &self,
        chat_id: i64,
        text: &str,
        reply_markup: Option<&InlineKeyboardMarkup>,
    ) -> TelegramResult<Message> {
        let mut body = json!({
            "chat_id": chat_id,
            "text": text,
        });
        if let Some(markup) = reply_markup {
            body["reply_markup"] = serde_json::to_value(markup)
                .map_err(|e| TelegramError::Parse(e.to_string()))?;
        }
        self.call("sendMessage", &body).await
    }

    /// Replace the text (and keyboard) of an existing message
    pub async fn edit_message_text(
        &self,
        chat_id: i64,
        message_id: i64,
        text: &str,
    ) -> TelegramResult<Message> {
        self.call(
            "editMessageText",
            &json!({
                "chat_id": chat_id,
                "message_id": message_id,
                "text": text,
            }),
        )
        .await
    }

    /// Acknowledge a callback query so the client stops the spinner
    pub async fn answer_callback_query(&self, callback_query_id: &str) -> TelegramResult<bool> {
        self.call(
            "answerCallbackQuery",
            &json!({ "callback_query_id": callback_query_id }),
        )
        .await
    }

    /// Send an in-memory file as a document attachment
    pub async fn send_document(
        &self,
        chat_id: i64,
        filename: &str,
        bytes: Vec<u8>,
        caption: &str,
    ) -> TelegramResult<Message> {
        let part = reqwest::multipart::Part::bytes(bytes).file_name(filename.to_string());
        let form = reqwest::multipart::Form::new()
            .text("chat_id", chat_id.to_string())
            .text("caption", caption.to_string())
            .part("document", part);

        let response = self
            .client
            .post(format!("{}/sendDocument", self.base_url))
            .multipart(form)
            .send()
            .await
            .map_err(|e| TelegramError::Network(format!("Request failed: {e}")))?;

        let body = response
            .text()
            .await
            .map_err(|e| TelegramError::Network(format!("Failed to read response: {e}")))?;

        let envelope: ApiResponse<Message> = serde_json::from_str(&body)
            .map_err(|e| TelegramError::Parse(format!("{e} - body: {body}")))?;

        if !envelope.ok {
            return Err(TelegramError::Api(
                envelope
                    .description
                    .unwrap_or_else(|| "no description".to_string()),
            ));
        }
        envelope
            .result
            .ok_or_else(|| TelegramError::Parse("ok response without result".to_string()))
    }

    /// Look up a chat, used to resolve display names for task owners
    pub async fn get_chat(&self, chat_id: i64) -> TelegramResult<Chat> {
        self.call("getChat", &json!({ "chat_id": chat_id })).await
    }
}
