//! Application error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Core error: {0}")]
    Core(#[from] hlwatch_core::CoreError),

    #[error("Feed error: {0}")]
    Feed(#[from] hlwatch_feed::FeedError),

    #[error("Registry error: {0}")]
    Registry(#[from] hlwatch_registry::RegistryError),

    #[error("Telegram error: {0}")]
    Telegram(#[from] hlwatch_telegram::TelegramError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type AppResult<T> = Result<T, AppError>;
