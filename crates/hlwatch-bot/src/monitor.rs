//! The polling monitor loop.
//!
//! On each tick: enumerate the watched addresses, fetch each one's
//! current positions, diff against the stored snapshot, fan the
//! resulting events out to subscribers, evaluate the summary schedule,
//! then advance the stored snapshot. Failures are contained at the
//! granularity they occur: a failed fetch skips one address for one
//! cycle, a failed delivery skips one message.

use crate::config::AppConfig;
use crate::error::AppResult;
use crate::format;
use crate::gateway::{MessageSink, PositionSource};
use chrono::Utc;
use hlwatch_core::Address;
use hlwatch_diff::diff;
use hlwatch_feed::FeedResult;
use hlwatch_registry::SubscriptionRegistry;
use hlwatch_schedule::SummaryScheduler;
use rust_decimal::Decimal;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tracing::{debug, error, info, warn};

/// Periodic position poller and notification dispatcher.
pub struct MonitorLoop {
    registry: Arc<SubscriptionRegistry>,
    source: Arc<dyn PositionSource>,
    sink: Arc<dyn MessageSink>,
    scheduler: SummaryScheduler,
    resize_threshold: Decimal,
    poll_interval: Duration,
    address_pause: Duration,
    cycle_cooldown: Duration,
}

impl MonitorLoop {
    pub fn new(
        config: &AppConfig,
        registry: Arc<SubscriptionRegistry>,
        source: Arc<dyn PositionSource>,
        sink: Arc<dyn MessageSink>,
    ) -> Self {
        Self {
            registry,
            source,
            sink,
            scheduler: SummaryScheduler::new(config.summary.clone()),
            resize_threshold: config.resize_threshold(),
            poll_interval: config.poll_interval(),
            address_pause: config.address_pause(),
            cycle_cooldown: config.cycle_cooldown(),
        }
    }

    /// Run until shutdown is signalled.
    ///
    /// A failed cycle takes the cool-down pause and resumes polling; it
    /// never terminates the loop. Shutdown is observed between cycles,
    /// so an in-flight dispatch always completes.
    pub async fn run(self, mut shutdown: watch::Receiver<bool>) {
        info!(
            poll_interval_secs = self.poll_interval.as_secs(),
            "Monitor loop started"
        );
        let mut interval = tokio::time::interval(self.poll_interval);
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = interval.tick() => {
                    if let Err(e) = self.run_cycle().await {
                        error!(error = %e, "Cycle abandoned, cooling down");
                        tokio::select! {
                            _ = tokio::time::sleep(self.cycle_cooldown) => {}
                            _ = shutdown.changed() => {
                                info!("Monitor loop stopped");
                                return;
                            }
                        }
                    }
                }
                _ = shutdown.changed() => {
                    info!("Monitor loop stopped");
                    return;
                }
            }
        }
    }

    /// One polling cycle over every watched address.
    ///
    /// A single unreachable address is skipped and stays that address's
    /// problem; when every fetch in the cycle fails the upstream itself
    /// is down, and the cycle is reported as failed so the caller takes
    /// the cool-down pause.
    pub async fn run_cycle(&self) -> AppResult<()> {
        let addresses = self.registry.distinct_addresses();
        debug!(addresses = addresses.len(), "Starting poll cycle");

        let mut fetched = 0usize;
        let mut last_error = None;
        for (i, address) in addresses.iter().enumerate() {
            match self.process_address(address).await {
                Ok(()) => fetched += 1,
                Err(e) => last_error = Some(e),
            }
            // Smooth the outbound call rate between addresses.
            if i + 1 < addresses.len() && !self.address_pause.is_zero() {
                tokio::time::sleep(self.address_pause).await;
            }
        }

        match last_error {
            Some(e) if fetched == 0 => Err(e.into()),
            _ => Ok(()),
        }
    }

    /// Poll one address: diff, fan out, summaries, snapshot update.
    ///
    /// Returns the fetch error when the address could not be polled;
    /// everything past the fetch is failure-isolated internally.
    async fn process_address(&self, address: &Address) -> FeedResult<()> {
        let fresh = match self.source.fetch_positions(address).await {
            Ok(snapshot) => snapshot,
            Err(e) => {
                // Previous snapshot stays authoritative for next cycle.
                warn!(address = %address.short(), error = %e, "Fetch failed, skipping");
                return Err(e);
            }
        };

        let stored = self.registry.snapshot(address).unwrap_or_default();
        let events = diff(&stored, &fresh, self.resize_threshold);
        let subscribers = self.registry.subscribers_of(address);

        if !events.is_empty() {
            info!(
                address = %address.short(),
                events = events.len(),
                subscribers = subscribers.len(),
                "Position changes detected"
            );
        }

        for event in &events {
            let text = format::event_message(address, event);
            for subscriber in &subscribers {
                match self.sink.send(*subscriber, &text).await {
                    Ok(true) => {}
                    Ok(false) => {
                        warn!(subscriber = %subscriber, "Alert rejected by transport")
                    }
                    Err(e) => {
                        warn!(subscriber = %subscriber, error = %e, "Alert delivery failed")
                    }
                }
            }
        }

        let now = Utc::now();
        for subscriber in &subscribers {
            let last = self.registry.last_summary_sent(*subscriber, address);
            if self.scheduler.is_due(now, last) {
                let digest = format::summary_digest(address, &fresh);
                if let Err(e) = self.sink.send(*subscriber, &digest).await {
                    warn!(subscriber = %subscriber, error = %e, "Digest delivery failed");
                }
                // Recorded regardless of delivery outcome: digests are
                // at-most-once per window.
                self.registry.mark_summary_sent(*subscriber, address, now);
            }
        }

        // Advanced only after dispatch, and even when delivery partially
        // failed: each transition is processed at most once.
        self.registry.update_snapshot(address, fresh);
        Ok(())
    }
}
