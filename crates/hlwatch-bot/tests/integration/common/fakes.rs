//! In-memory stand-ins for the exchange feed and the chat transport.

use async_trait::async_trait;
use hlwatch_bot::{MessageSink, PositionSource};
use hlwatch_core::{Address, Snapshot, SubscriberId};
use hlwatch_feed::{FeedError, FeedResult};
use hlwatch_telegram::TelegramResult;
use parking_lot::Mutex;
use std::collections::VecDeque;

/// Replays a scripted list of fetch results, one per call; further
/// calls fail.
pub struct ScriptedFeed {
    responses: Mutex<VecDeque<FeedResult<Snapshot>>>,
}

impl ScriptedFeed {
    pub fn new(responses: Vec<FeedResult<Snapshot>>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
        }
    }
}

#[async_trait]
impl PositionSource for ScriptedFeed {
    async fn fetch_positions(&self, _address: &Address) -> FeedResult<Snapshot> {
        self.responses
            .lock()
            .pop_front()
            .unwrap_or_else(|| Err(FeedError::HttpClient("script exhausted".to_string())))
    }
}

/// Records every outbound message.
#[derive(Default)]
pub struct RecordingBot {
    messages: Mutex<Vec<(SubscriberId, String)>>,
}

impl RecordingBot {
    pub fn messages(&self) -> Vec<(SubscriberId, String)> {
        self.messages.lock().clone()
    }

    pub fn messages_for(&self, subscriber: SubscriberId) -> Vec<String> {
        self.messages
            .lock()
            .iter()
            .filter(|(s, _)| *s == subscriber)
            .map(|(_, m)| m.clone())
            .collect()
    }
}

#[async_trait]
impl MessageSink for RecordingBot {
    async fn send(&self, chat: SubscriberId, text: &str) -> TelegramResult<bool> {
        self.messages.lock().push((chat, text.to_string()));
        Ok(true)
    }
}
