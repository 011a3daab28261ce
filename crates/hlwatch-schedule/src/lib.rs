//! Periodic summary scheduling.
//!
//! Decides whether a digest is due for a (subscriber, address) pair at
//! evaluation time, given the timestamp of the last digest actually
//! sent. Two cadence policies are supported; the configuration picks
//! one, and both guard against re-firing inside the same activation
//! window and self-heal after arbitrary downtime.

use chrono::{DateTime, Duration, Timelike, Utc};
use serde::{Deserialize, Serialize};

/// Cadence policy for periodic position digests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "policy", rename_all = "lowercase")]
pub enum SummaryPolicy {
    /// One digest per calendar day, anchored to a specific hour.
    Daily {
        /// Hour of day (0-23) at which the digest fires.
        hour: u32,
    },
    /// Digests at a set of hour slots, guarded by a minimum elapsed
    /// interval instead of a date comparison.
    Slots {
        /// Hours of day (0-23) at which digests may fire.
        hours: Vec<u32>,
        /// Minimum time between digests, in hours.
        min_interval_hours: i64,
    },
}

impl Default for SummaryPolicy {
    /// Twice daily at 00:00 and 12:00.
    fn default() -> Self {
        Self::Slots {
            hours: vec![0, 12],
            min_interval_hours: 12,
        }
    }
}

/// Evaluates a cadence policy against send timestamps.
#[derive(Debug, Clone)]
pub struct SummaryScheduler {
    policy: SummaryPolicy,
}

impl SummaryScheduler {
    pub fn new(policy: SummaryPolicy) -> Self {
        Self { policy }
    }

    /// Whether a digest is due at `now`, given when one was last sent.
    ///
    /// A pair that has never been sent a digest (`last_sent == None`)
    /// is treated as last sent 24 hours ago, so it is eligible on the
    /// first check that lands in an activation window. A long-stale
    /// `last_sent` fires exactly once, not once per missed slot: the
    /// caller records the send, which moves the pair out of the window
    /// until the next slot.
    pub fn is_due(&self, now: DateTime<Utc>, last_sent: Option<DateTime<Utc>>) -> bool {
        let last = last_sent.unwrap_or(now - Duration::hours(24));

        match &self.policy {
            SummaryPolicy::Daily { hour } => {
                now.hour() == *hour && now.date_naive() != last.date_naive()
            }
            SummaryPolicy::Slots {
                hours,
                min_interval_hours,
            } => {
                hours.contains(&now.hour())
                    && now - last >= Duration::hours(*min_interval_hours)
            }
        }
    }
}
