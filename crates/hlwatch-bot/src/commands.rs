//! Inbound command handling.
//!
//! Translates text commands into registry mutations and immediate
//! status queries. Reply delivery failures are logged and swallowed;
//! a user who cannot be reached must not wedge command processing.

use crate::format;
use crate::gateway::{MessageSink, PositionSource};
use hlwatch_core::{Address, Snapshot, SubscriberId};
use hlwatch_registry::{SubscriptionRegistry, WatchOutcome};
use std::sync::Arc;
use tracing::{info, warn};

/// A parsed inbound command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command<'a> {
    Help,
    Add(&'a str),
    Remove(&'a str),
    List,
    Status,
    MissingArgument(&'static str),
    Unknown,
}

impl<'a> Command<'a> {
    /// Parse a command line: first token selects the command, the rest
    /// is the argument.
    pub fn parse(text: &'a str) -> Self {
        let mut parts = text.trim().splitn(2, char::is_whitespace);
        let head = parts.next().unwrap_or_default().to_lowercase();
        let arg = parts.next().map(str::trim).filter(|s| !s.is_empty());

        match head.as_str() {
            "/start" | "/help" => Self::Help,
            "/add" => arg.map(Self::Add).unwrap_or(Self::MissingArgument("add")),
            "/remove" => arg
                .map(Self::Remove)
                .unwrap_or(Self::MissingArgument("remove")),
            "/list" => Self::List,
            "/status" => Self::Status,
            _ => Self::Unknown,
        }
    }
}

/// Routes commands from subscribers to the registry.
pub struct CommandRouter {
    registry: Arc<SubscriptionRegistry>,
    source: Arc<dyn PositionSource>,
    sink: Arc<dyn MessageSink>,
}

impl CommandRouter {
    pub fn new(
        registry: Arc<SubscriptionRegistry>,
        source: Arc<dyn PositionSource>,
        sink: Arc<dyn MessageSink>,
    ) -> Self {
        Self {
            registry,
            source,
            sink,
        }
    }

    /// Handle one command line from a subscriber.
    pub async fn handle(&self, subscriber: SubscriberId, text: &str) {
        info!(subscriber = %subscriber, command = %text, "Handling command");
        match Command::parse(text) {
            Command::Help => self.reply(subscriber, &format::help_text()).await,
            Command::Add(raw) => self.handle_add(subscriber, raw).await,
            Command::Remove(raw) => self.handle_remove(subscriber, raw).await,
            Command::List => self.handle_list(subscriber).await,
            Command::Status => self.handle_status(subscriber).await,
            Command::MissingArgument(cmd) => self.reply(subscriber, &format::usage(cmd)).await,
            Command::Unknown => self.reply(subscriber, &format::unknown_command()).await,
        }
    }

    async fn handle_add(&self, subscriber: SubscriberId, raw: &str) {
        let address = match Address::parse(raw) {
            Ok(address) => address,
            Err(_) => {
                self.reply(subscriber, &format::invalid_address()).await;
                return;
            }
        };

        match self.registry.add_watch(subscriber, address.clone()) {
            WatchOutcome::AlreadyWatching => {
                self.reply(subscriber, &format::already_watching(&address))
                    .await;
            }
            WatchOutcome::Added { needs_seed } => {
                if needs_seed {
                    // A transient upstream outage must not block the
                    // user; seed an empty snapshot instead.
                    let seed = match self.source.fetch_positions(&address).await {
                        Ok(snapshot) => snapshot,
                        Err(e) => {
                            warn!(address = %address.short(), error = %e, "Initial fetch failed");
                            Snapshot::new()
                        }
                    };
                    self.registry.seed_snapshot(&address, seed);
                }

                self.reply(subscriber, &format::now_monitoring(&address))
                    .await;

                if let Some(snapshot) = self.registry.snapshot(&address) {
                    if !snapshot.is_empty() {
                        self.reply(subscriber, &format::current_positions(&snapshot))
                            .await;
                    }
                }
            }
        }
    }

    async fn handle_remove(&self, subscriber: SubscriberId, raw: &str) {
        let Ok(address) = Address::parse(raw) else {
            self.reply(subscriber, &format::not_watching(raw)).await;
            return;
        };
        match self.registry.remove_watch(subscriber, &address) {
            Ok(()) => {
                self.reply(subscriber, &format::stopped_monitoring(&address))
                    .await
            }
            Err(_) => {
                self.reply(subscriber, &format::not_watching(address.as_str()))
                    .await
            }
        }
    }

    async fn handle_list(&self, subscriber: SubscriberId) {
        let watches = self.registry.list_watches(subscriber);
        if watches.is_empty() {
            self.reply(subscriber, &format::empty_watch_list()).await;
            return;
        }
        let entries: Vec<(Address, usize)> = watches
            .into_iter()
            .map(|address| {
                let open = self
                    .registry
                    .snapshot(&address)
                    .map(|s| s.len())
                    .unwrap_or(0);
                (address, open)
            })
            .collect();
        self.reply(subscriber, &format::watch_list(&entries)).await;
    }

    /// Immediate snapshot summary for every watched address, from the
    /// cache (no upstream round-trip).
    async fn handle_status(&self, subscriber: SubscriberId) {
        let watches = self.registry.list_watches(subscriber);
        if watches.is_empty() {
            self.reply(subscriber, &format::empty_watch_list()).await;
            return;
        }
        for address in watches {
            let snapshot = self.registry.snapshot(&address).unwrap_or_default();
            self.reply(subscriber, &format::status_block(&address, &snapshot))
                .await;
        }
    }

    async fn reply(&self, subscriber: SubscriberId, text: &str) {
        match self.sink.send(subscriber, text).await {
            Ok(true) => {}
            Ok(false) => warn!(subscriber = %subscriber, "Reply rejected by transport"),
            Err(e) => warn!(subscriber = %subscriber, error = %e, "Reply delivery failed"),
        }
    }
}
