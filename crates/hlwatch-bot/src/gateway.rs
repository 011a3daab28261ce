//! Seams to the external collaborators.
//!
//! The monitor loop and command router talk to the upstream data source
//! and the chat transport through these traits, so both can run against
//! in-memory fakes in tests.

use async_trait::async_trait;
use hlwatch_core::{Address, Snapshot, SubscriberId};
use hlwatch_feed::{FeedResult, InfoClient};
use hlwatch_telegram::{BotClient, TelegramResult};

/// Fetches the current open positions for an address.
#[async_trait]
pub trait PositionSource: Send + Sync {
    async fn fetch_positions(&self, address: &Address) -> FeedResult<Snapshot>;
}

#[async_trait]
impl PositionSource for InfoClient {
    async fn fetch_positions(&self, address: &Address) -> FeedResult<Snapshot> {
        InfoClient::fetch_positions(self, address).await
    }
}

/// Delivers a formatted message to a subscriber.
#[async_trait]
pub trait MessageSink: Send + Sync {
    async fn send(&self, chat: SubscriberId, text: &str) -> TelegramResult<bool>;
}

#[async_trait]
impl MessageSink for BotClient {
    async fn send(&self, chat: SubscriberId, text: &str) -> TelegramResult<bool> {
        self.send_message(chat, text).await
    }
}
