//! Upstream market-data access for the position watch bot.
//!
//! Fetches `clearinghouseState` for a user address from the exchange
//! `/info` endpoint and converts it into a domain `Snapshot`: zero-size
//! entries are excluded, missing or unparseable numeric fields default
//! to zero, and leverage is accepted in both its nested-object and
//! bare-scalar encodings.

pub mod client;
pub mod error;
pub mod wire;

pub use client::{InfoClient, DEFAULT_INFO_URL};
pub use error::{FeedError, FeedResult};
pub use wire::ClearinghouseState;
