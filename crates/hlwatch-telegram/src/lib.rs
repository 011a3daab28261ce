//! Telegram Bot API transport.
//!
//! Two operations only: deliver a formatted Markdown message to a chat,
//! and long-poll for inbound updates. Delivery failures are reported to
//! the caller as values and are non-fatal everywhere they occur.

pub mod client;
pub mod error;
pub mod types;

pub use client::{BotClient, DEFAULT_API_URL};
pub use error::{TelegramError, TelegramResult};
pub use types::{Chat, Message, Update};
