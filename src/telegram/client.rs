use reqwest::Client;
use serde::Deserialize;
use serde_json::json;

use crate::config::TelegramConfig;
use crate::error::TelegramError;
use crate::logging::{LogContext, MetricsLogger, PerformanceMonitor};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseMode {
    Markdown,
}

impl ParseMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ParseMode::Markdown => "Markdown",
        }
    }
}

#[derive(Debug, Deserialize)]
struct ApiResponse {
    ok: bool,
    #[serde(default)]
    description: Option<String>,
}

/// Minimal Bot API client that posts to one fixed chat
#[derive(Clone)]
pub struct TelegramClient {
    http_client: Client,
    api_url: String,
    bot_token: String,
    chat_id: String,
}

impl TelegramClient {
    pub fn new(config: &TelegramConfig) -> Self {
        LogContext::new("telegram_client", "initialization")
            .with_metadata("chat_id", json!(config.chat_id))
            .info("Initializing Telegram client");

        Self {
            http_client: Client::new(),
            api_url: config.api_url.trim_end_matches('/').to_string(),
            bot_token: config.bot_token.clone(),
            chat_id: config.chat_id.clone(),
        }
    }

    pub fn chat_id(&self) -> &str {
        &self.chat_id
    }

    fn send_message_url(&self) -> String {
        format!("{}/bot{}/sendMessage", self.api_url, self.bot_token)
    }

    /// Send a message with link previews disabled
    pub async fn send_message(&self, text: &str, parse_mode: Option<ParseMode>) -> Result<(), TelegramError> {
        let monitor = PerformanceMonitor::new("telegram_send_message")
            .with_metadata("parse_mode", json!(parse_mode.map(|m| m.as_str())));

        let result = self.send_message_inner(text, parse_mode).await;
        let duration = monitor.finish_with_result(&result);
        MetricsLogger::log_api_call("sendMessage", duration, result.is_ok());

        result
    }

    async fn send_message_inner(&self, text: &str, parse_mode: Option<ParseMode>) -> Result<(), TelegramError> {
        let mut params = vec![
            ("chat_id", self.chat_id.as_str()),
            ("text", text),
            ("disable_web_page_preview", "true"),
        ];
        if let Some(mode) = parse_mode {
            params.push(("parse_mode", mode.as_str()));
        }

        let response = self
            .http_client
            .post(self.send_message_url())
            .form(&params)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        let parsed: Option<ApiResponse> = serde_json::from_str(&body).ok();

        match parsed {
            Some(api) if status.is_success() && api.ok => Ok(()),
            Some(api) => Err(TelegramError::Api {
                status: status.as_u16(),
                description: api.description.unwrap_or_else(|| "unknown error".to_string()),
            }),
            None if status.is_success() => Ok(()),
            None => Err(TelegramError::Api {
                status: status.as_u16(),
                description: body,
            }),
        }
    }
}
