//! Bot API HTTP client.

use crate::error::{TelegramError, TelegramResult};
use crate::types::{ApiResponse, Update};
use hlwatch_core::SubscriberId;
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;
use tracing::debug;

/// Telegram Bot API base URL.
pub const DEFAULT_API_URL: &str = "https://api.telegram.org";

/// Timeout for sendMessage calls.
const SEND_TIMEOUT: Duration = Duration::from_secs(10);

/// Long-poll duration requested from getUpdates, in seconds.
const POLL_SECS: u64 = 30;

/// Client timeout for getUpdates; must outlast the server-side poll.
const POLL_TIMEOUT: Duration = Duration::from_secs(35);

#[derive(Debug, Serialize)]
struct SendMessageRequest<'a> {
    chat_id: i64,
    text: &'a str,
    parse_mode: &'static str,
    disable_web_page_preview: bool,
}

/// Telegram Bot API client.
pub struct BotClient {
    client: Client,
    poll_client: Client,
    base_url: String,
}

impl BotClient {
    /// Create a client for a bot token.
    ///
    /// `api_url` is the API base (override for tests); the token is
    /// embedded in the request path per the Bot API convention.
    pub fn new(api_url: impl Into<String>, token: &str) -> TelegramResult<Self> {
        if token.is_empty() {
            return Err(TelegramError::Api("Bot token is empty".to_string()));
        }
        let client = Client::builder()
            .timeout(SEND_TIMEOUT)
            .build()
            .map_err(|e| TelegramError::HttpClient(format!("Failed to create HTTP client: {e}")))?;
        let poll_client = Client::builder()
            .timeout(POLL_TIMEOUT)
            .build()
            .map_err(|e| TelegramError::HttpClient(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            poll_client,
            base_url: format!("{}/bot{token}", api_url.into()),
        })
    }

    /// Deliver a Markdown-formatted message to a chat.
    ///
    /// Returns the API's `ok` flag; transport and API failures surface
    /// as errors for the caller to log.
    pub async fn send_message(&self, chat: SubscriberId, text: &str) -> TelegramResult<bool> {
        let request = SendMessageRequest {
            chat_id: chat.0,
            text,
            parse_mode: "Markdown",
            disable_web_page_preview: true,
        };

        let response = self
            .client
            .post(format!("{}/sendMessage", self.base_url))
            .json(&request)
            .send()
            .await
            .map_err(|e| TelegramError::HttpClient(format!("sendMessage failed: {e}")))?;

        let body: ApiResponse<serde_json::Value> = response
            .json()
            .await
            .map_err(|e| TelegramError::Parse(format!("Invalid sendMessage response: {e}")))?;

        debug!(chat = %chat, ok = body.ok, len = text.len(), "Sent message");
        Ok(body.ok)
    }

    /// Long-poll for inbound updates past `offset`.
    pub async fn get_updates(&self, offset: Option<i64>) -> TelegramResult<Vec<Update>> {
        let mut query: Vec<(&str, i64)> = vec![("timeout", POLL_SECS as i64)];
        if let Some(offset) = offset {
            query.push(("offset", offset));
        }

        let response = self
            .poll_client
            .get(format!("{}/getUpdates", self.base_url))
            .query(&query)
            .send()
            .await
            .map_err(|e| TelegramError::HttpClient(format!("getUpdates failed: {e}")))?;

        let body: ApiResponse<Vec<Update>> = response
            .json()
            .await
            .map_err(|e| TelegramError::Parse(format!("Invalid getUpdates response: {e}")))?;

        if !body.ok {
            return Err(TelegramError::Api(
                body.description
                    .unwrap_or_else(|| "getUpdates returned ok=false".to_string()),
            ));
        }

        Ok(body.result.unwrap_or_default())
    }
}
