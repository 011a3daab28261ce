//! Hyperliquid position watch bot.
//!
//! Main application that wires the components together:
//! - Telegram command handling (watch management, status queries)
//! - Periodic position polling and change detection
//! - Notification fan-out to subscribers
//! - Scheduled position digests

pub mod app;
pub mod commands;
pub mod config;
pub mod error;
pub mod format;
pub mod gateway;
pub mod logging;
pub mod monitor;

pub use app::Application;
pub use config::AppConfig;
pub use error::{AppError, AppResult};
pub use gateway::{MessageSink, PositionSource};
pub use monitor::MonitorLoop;
