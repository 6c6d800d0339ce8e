//! Telegram Bot API client
//!
//! Minimal client for the two methods the panel uses to reach its admins:
//! `sendMessage` and `sendDocument`.

use std::time::Duration;

use reqwest::multipart::{Form, Part};
use serde::Deserialize;

/// Default public Bot API endpoint
pub const DEFAULT_API_URL: &str = "https://api.telegram.org";

/// Telegram client configuration
#[derive(Clone)]
pub struct TelegramConfig {
    /// Bot API base URL (without trailing slash)
    pub api_url: String,
    /// Bot token issued by @BotFather
    pub bot_token: String,
    /// Per-request timeout
    pub timeout: Duration,
}

impl std::fmt::Debug for TelegramConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelegramConfig")
            .field("api_url", &self.api_url)
            .field("bot_token", &"<redacted>")
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl TelegramConfig {
    pub fn new(bot_token: impl Into<String>) -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            bot_token: bot_token.into(),
            timeout: Duration::from_secs(30),
        }
    }
}

/// Error talking to the Bot API
#[derive(Debug, thiserror::Error)]
pub enum TelegramError {
    /// Transport failure; the URL (which embeds the bot token) is stripped
    #[error("Telegram request failed: {0}")]
    Http(#[source] reqwest::Error),

    #[error("Telegram API error {code}: {description}")]
    Api { code: i64, description: String },
}

/// Common envelope of every Bot API response
#[derive(Debug, Deserialize)]
struct ApiResponse {
    ok: bool,
    #[serde(default)]
    error_code: Option<i64>,
    #[serde(default)]
    description: Option<String>,
}

/// Bot API client
#[derive(Debug, Clone)]
pub struct TelegramClient {
    http: reqwest::Client,
    config: TelegramConfig,
}

impl TelegramClient {
    pub fn new(config: TelegramConfig) -> Result<Self, TelegramError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(http_error)?;
        Ok(Self { http, config })
    }

    /// POST sendMessage
    pub async fn send_message(&self, chat_id: i64, text: &str) -> Result<(), TelegramError> {
        let response = self
            .http
            .post(self.method_url("sendMessage"))
            .json(&serde_json::json!({ "chat_id": chat_id, "text": text }))
            .send()
            .await
            .map_err(http_error)?;

        let status = response.status().as_u16();
        let body: ApiResponse = response.json().await.map_err(http_error)?;
        check_api_response(status, body)
    }

    /// POST sendDocument (multipart upload)
    pub async fn send_document(
        &self,
        chat_id: i64,
        file_name: &str,
        bytes: Vec<u8>,
        caption: Option<&str>,
    ) -> Result<(), TelegramError> {
        let mut form = Form::new().text("chat_id", chat_id.to_string()).part(
            "document",
            Part::bytes(bytes).file_name(file_name.to_string()),
        );
        if let Some(caption) = caption {
            form = form.text("caption", caption.to_string());
        }

        let response = self
            .http
            .post(self.method_url("sendDocument"))
            .multipart(form)
            .send()
            .await
            .map_err(http_error)?;

        let status = response.status().as_u16();
        let body: ApiResponse = response.json().await.map_err(http_error)?;
        check_api_response(status, body)?;

        tracing::debug!(chat_id, file_name, "Telegram document sent");
        Ok(())
    }

    fn method_url(&self, method: &str) -> String {
        format!(
            "{}/bot{}/{}",
            self.config.api_url.trim_end_matches('/'),
            self.config.bot_token,
            method
        )
    }
}

fn http_error(err: reqwest::Error) -> TelegramError {
    TelegramError::Http(err.without_url())
}

fn check_api_response(status: u16, body: ApiResponse) -> Result<(), TelegramError> {
    if body.ok {
        return Ok(());
    }
    Err(TelegramError::Api {
        code: body.error_code.unwrap_or(i64::from(status)),
        description: body
            .description
            .unwrap_or_else(|| "no description".to_string()),
    })
}
