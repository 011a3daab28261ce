//! Core domain types for the Hyperliquid position watch bot.
//!
//! This crate provides the fundamental types shared by every other crate:
//! - `Address`: validated, case-sensitive account identifier
//! - `SubscriberId`: notification recipient (Telegram chat)
//! - `Position`, `PositionSide`: one open perpetual exposure
//! - `Snapshot`: the full set of open positions for an address

pub mod address;
pub mod error;
pub mod position;

pub use address::{Address, SubscriberId};
pub use error::{CoreError, Result};
pub use position::{Position, PositionSide, Snapshot};
