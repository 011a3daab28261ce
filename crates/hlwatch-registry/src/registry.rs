//! The registry implementation.

use crate::error::{RegistryError, RegistryResult};
use chrono::{DateTime, Utc};
use hlwatch_core::{Address, Snapshot, SubscriberId};
use parking_lot::Mutex;
use std::collections::{BTreeSet, HashMap};

/// Result of an add-watch request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchOutcome {
    /// The pair was inserted. `needs_seed` is true when the address has
    /// never been observed, in which case the caller performs the
    /// initial fetch and calls `seed_snapshot`.
    Added { needs_seed: bool },
    /// The pair already existed; no state change.
    AlreadyWatching,
}

#[derive(Debug, Default)]
struct RegistryInner {
    /// Subscriber -> addresses, in insertion order.
    subscriptions: HashMap<SubscriberId, Vec<Address>>,
    /// Last-known snapshot per address, shared by all its subscribers.
    snapshots: HashMap<Address, Snapshot>,
    /// Last summary send per (subscriber, address) pair.
    summary_sent: HashMap<(SubscriberId, Address), DateTime<Utc>>,
}

/// Shared registry of watches, snapshots and summary timestamps.
///
/// One coarse mutex guards the whole state; every operation takes and
/// releases it internally, so callers never hold a lock across await
/// points.
#[derive(Debug, Default)]
pub struct SubscriptionRegistry {
    inner: Mutex<RegistryInner>,
}

impl SubscriptionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a subscriber's interest in an address.
    ///
    /// Address validation happens at `Address::parse`, before this is
    /// reachable. Re-adding an existing pair is a no-op reported as
    /// `AlreadyWatching`.
    pub fn add_watch(&self, subscriber: SubscriberId, address: Address) -> WatchOutcome {
        let mut inner = self.inner.lock();
        let watches = inner.subscriptions.entry(subscriber).or_default();
        if watches.contains(&address) {
            return WatchOutcome::AlreadyWatching;
        }
        watches.push(address.clone());
        let needs_seed = !inner.snapshots.contains_key(&address);
        WatchOutcome::Added { needs_seed }
    }

    /// Drop a subscriber's interest in an address, pruning the
    /// subscriber entry when its last watch is removed.
    ///
    /// The address's cached snapshot is deliberately left in place even
    /// when the last subscriber leaves; staleness there is acceptable
    /// and eviction would race a concurrent poll.
    pub fn remove_watch(&self, subscriber: SubscriberId, address: &Address) -> RegistryResult<()> {
        let mut inner = self.inner.lock();
        let Some(watches) = inner.subscriptions.get_mut(&subscriber) else {
            return Err(RegistryError::NotWatching(address.to_string()));
        };
        let Some(idx) = watches.iter().position(|a| a == address) else {
            return Err(RegistryError::NotWatching(address.to_string()));
        };
        watches.remove(idx);
        if watches.is_empty() {
            inner.subscriptions.remove(&subscriber);
        }
        inner
            .summary_sent
            .remove(&(subscriber, address.clone()));
        Ok(())
    }

    /// Addresses watched by a subscriber, in insertion order.
    pub fn list_watches(&self, subscriber: SubscriberId) -> Vec<Address> {
        self.inner
            .lock()
            .subscriptions
            .get(&subscriber)
            .cloned()
            .unwrap_or_default()
    }

    /// The poll set: every address watched by at least one subscriber.
    pub fn distinct_addresses(&self) -> Vec<Address> {
        let inner = self.inner.lock();
        let set: BTreeSet<Address> = inner
            .subscriptions
            .values()
            .flat_map(|addrs| addrs.iter().cloned())
            .collect();
        set.into_iter().collect()
    }

    /// The fan-out set: every subscriber watching an address.
    pub fn subscribers_of(&self, address: &Address) -> Vec<SubscriberId> {
        let inner = self.inner.lock();
        let mut subscribers: Vec<SubscriberId> = inner
            .subscriptions
            .iter()
            .filter(|(_, addrs)| addrs.contains(address))
            .map(|(id, _)| *id)
            .collect();
        subscribers.sort();
        subscribers
    }

    /// Cached snapshot for an address, if it has ever been observed.
    pub fn snapshot(&self, address: &Address) -> Option<Snapshot> {
        self.inner.lock().snapshots.get(address).cloned()
    }

    /// Store the initial snapshot for a newly watched address, unless a
    /// concurrent poll already stored one.
    pub fn seed_snapshot(&self, address: &Address, snapshot: Snapshot) {
        self.inner
            .lock()
            .snapshots
            .entry(address.clone())
            .or_insert(snapshot);
    }

    /// Replace the cached snapshot after a successful poll.
    pub fn update_snapshot(&self, address: &Address, snapshot: Snapshot) {
        self.inner
            .lock()
            .snapshots
            .insert(address.clone(), snapshot);
    }

    /// When a summary was last dispatched to this pair, if ever.
    pub fn last_summary_sent(
        &self,
        subscriber: SubscriberId,
        address: &Address,
    ) -> Option<DateTime<Utc>> {
        self.inner
            .lock()
            .summary_sent
            .get(&(subscriber, address.clone()))
            .copied()
    }

    /// Record that a summary was dispatched to this pair.
    pub fn mark_summary_sent(
        &self,
        subscriber: SubscriberId,
        address: &Address,
        at: DateTime<Utc>,
    ) {
        self.inner
            .lock()
            .summary_sent
            .insert((subscriber, address.clone()), at);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hlwatch_core::Position;
    use rust_decimal_macros::dec;
    use std::sync::Arc;

    fn addr(n: u8) -> Address {
        Address::parse(&format!("0x{:040x}", n)).unwrap()
    }

    fn btc_snapshot() -> Snapshot {
        [Position {
            instrument: "BTC".to_string(),
            size: dec!(2),
            entry_price: dec!(50000),
            unrealized_pnl: dec!(100),
            leverage: dec!(5),
            liquidation_price: dec!(45000),
            margin_used: dec!(2000),
        }]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_add_then_duplicate() {
        let registry = SubscriptionRegistry::new();
        let a = SubscriberId(1);
        assert_eq!(
            registry.add_watch(a, addr(1)),
            WatchOutcome::Added { needs_seed: true }
        );
        assert_eq!(registry.add_watch(a, addr(1)), WatchOutcome::AlreadyWatching);
    }

    #[test]
    fn test_second_subscriber_needs_no_seed() {
        let registry = SubscriptionRegistry::new();
        registry.add_watch(SubscriberId(1), addr(1));
        registry.seed_snapshot(&addr(1), Snapshot::new());
        assert_eq!(
            registry.add_watch(SubscriberId(2), addr(1)),
            WatchOutcome::Added { needs_seed: false }
        );
    }

    #[test]
    fn test_remove_not_watching() {
        let registry = SubscriptionRegistry::new();
        assert!(matches!(
            registry.remove_watch(SubscriberId(1), &addr(1)),
            Err(RegistryError::NotWatching(_))
        ));
    }

    #[test]
    fn test_remove_prunes_empty_subscriber() {
        let registry = SubscriptionRegistry::new();
        let a = SubscriberId(1);
        registry.add_watch(a, addr(1));
        registry.remove_watch(a, &addr(1)).unwrap();
        assert!(registry.list_watches(a).is_empty());
        assert!(registry.distinct_addresses().is_empty());
    }

    #[test]
    fn test_registry_isolation_across_subscribers() {
        let registry = SubscriptionRegistry::new();
        let (a, b) = (SubscriberId(1), SubscriberId(2));
        registry.add_watch(a, addr(1));
        registry.seed_snapshot(&addr(1), btc_snapshot());
        registry.add_watch(b, addr(1));

        registry.remove_watch(a, &addr(1)).unwrap();

        // addr(1) is still watched by B and its snapshot is intact.
        assert_eq!(registry.distinct_addresses(), vec![addr(1)]);
        assert_eq!(registry.subscribers_of(&addr(1)), vec![b]);
        assert_eq!(registry.snapshot(&addr(1)).unwrap().len(), 1);
    }

    #[test]
    fn test_list_watches_insertion_order() {
        let registry = SubscriptionRegistry::new();
        let a = SubscriberId(1);
        registry.add_watch(a, addr(3));
        registry.add_watch(a, addr(1));
        registry.add_watch(a, addr(2));
        assert_eq!(registry.list_watches(a), vec![addr(3), addr(1), addr(2)]);
    }

    #[test]
    fn test_distinct_addresses_dedupes() {
        let registry = SubscriptionRegistry::new();
        registry.add_watch(SubscriberId(1), addr(1));
        registry.add_watch(SubscriberId(2), addr(1));
        registry.add_watch(SubscriberId(2), addr(2));
        assert_eq!(registry.distinct_addresses(), vec![addr(1), addr(2)]);
    }

    #[test]
    fn test_seed_does_not_clobber_existing() {
        let registry = SubscriptionRegistry::new();
        registry.update_snapshot(&addr(1), btc_snapshot());
        registry.seed_snapshot(&addr(1), Snapshot::new());
        assert_eq!(registry.snapshot(&addr(1)).unwrap().len(), 1);
    }

    #[test]
    fn test_summary_timestamps_per_pair() {
        let registry = SubscriptionRegistry::new();
        let (a, b) = (SubscriberId(1), SubscriberId(2));
        let now = Utc::now();
        registry.mark_summary_sent(a, &addr(1), now);
        assert_eq!(registry.last_summary_sent(a, &addr(1)), Some(now));
        assert_eq!(registry.last_summary_sent(b, &addr(1)), None);
    }

    #[test]
    fn test_concurrent_mutation_smoke() {
        let registry = Arc::new(SubscriptionRegistry::new());
        let mut handles = Vec::new();
        for t in 0..8i64 {
            let registry = registry.clone();
            handles.push(std::thread::spawn(move || {
                let sub = SubscriberId(t);
                for n in 0..50u8 {
                    registry.add_watch(sub, addr(n % 4));
                    registry.update_snapshot(&addr(n % 4), Snapshot::new());
                    let _ = registry.distinct_addresses();
                    let _ = registry.subscribers_of(&addr(n % 4));
                }
            }));
        }
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(registry.distinct_addresses().len(), 4);
    }
}
