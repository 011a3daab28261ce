//! Telegram transport error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TelegramError {
    #[error("HTTP client error: {0}")]
    HttpClient(String),

    #[error("Telegram API error: {0}")]
    Api(String),

    #[error("Failed to parse response: {0}")]
    Parse(String),
}

pub type TelegramResult<T> = Result<T, TelegramError>;
