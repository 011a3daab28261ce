//! End-to-end flow tests: commands into the registry, then poll cycles
//! through the diff engine out to subscribers.

mod integration;
use integration::common::fakes::{RecordingBot, ScriptedFeed};

use hlwatch_bot::commands::CommandRouter;
use hlwatch_bot::{AppConfig, MonitorLoop};
use hlwatch_core::{Position, Snapshot, SubscriberId};
use hlwatch_registry::SubscriptionRegistry;
use hlwatch_schedule::SummaryPolicy;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::sync::Arc;

const ADDRESS: &str = "0x1234567890abcdef1234567890abcdef12345678";

fn btc(size: Decimal, pnl: Decimal) -> Position {
    Position {
        instrument: "BTC".to_string(),
        size,
        entry_price: dec!(50000),
        unrealized_pnl: pnl,
        leverage: dec!(5),
        liquidation_price: dec!(45000),
        margin_used: dec!(2000),
    }
}

fn snapshot(positions: Vec<Position>) -> Snapshot {
    positions.into_iter().collect()
}

fn test_config() -> AppConfig {
    AppConfig {
        address_pause_ms: 0,
        summary: SummaryPolicy::Slots {
            hours: vec![],
            min_interval_hours: 12,
        },
        ..AppConfig::default()
    }
}

/// A subscriber adds an address, the position grows past the resize
/// threshold, then disappears in profit. One alert per transition.
#[tokio::test]
async fn test_resize_then_close_flow() {
    let registry = Arc::new(SubscriptionRegistry::new());
    let bot = Arc::new(RecordingBot::default());
    let feed = Arc::new(ScriptedFeed::new(vec![
        // Seed fetch performed by /add.
        Ok(snapshot(vec![btc(dec!(2), dec!(100))])),
        // Cycle 1: 2 -> 2.3 is a 15% increase.
        Ok(snapshot(vec![btc(dec!(2.3), dec!(150))])),
        // Cycle 2: position gone, in profit.
        Ok(Snapshot::new()),
    ]));

    let subscriber = SubscriberId(1001);
    let router = CommandRouter::new(registry.clone(), feed.clone(), bot.clone());
    router.handle(subscriber, &format!("/add {ADDRESS}")).await;

    // Confirmation plus the current-positions overview for the
    // non-empty seed snapshot.
    let replies = bot.messages_for(subscriber);
    assert_eq!(replies.len(), 2);
    assert!(replies[0].contains("Now Monitoring"));

    let monitor = MonitorLoop::new(&test_config(), registry.clone(), feed, bot.clone());

    // The seed snapshot suppresses alerts for pre-existing positions,
    // so the first cycle reports only the resize.
    monitor.run_cycle().await.unwrap();
    let replies = bot.messages_for(subscriber);
    assert_eq!(replies.len(), 3);
    assert!(replies[2].contains("POSITION INCREASED"));
    assert!(replies[2].contains("15.0%"));

    monitor.run_cycle().await.unwrap();
    let replies = bot.messages_for(subscriber);
    assert_eq!(replies.len(), 4);
    assert!(replies[3].contains("POSITION CLOSED - PROFIT"));
    assert!(replies[3].contains("150"));
}

/// /remove stops alert delivery for that subscriber.
#[tokio::test]
async fn test_remove_stops_alerts() {
    let registry = Arc::new(SubscriptionRegistry::new());
    let bot = Arc::new(RecordingBot::default());
    let feed = Arc::new(ScriptedFeed::new(vec![
        Ok(Snapshot::new()),
        Ok(snapshot(vec![btc(dec!(1), dec!(0))])),
    ]));

    let subscriber = SubscriberId(7);
    let router = CommandRouter::new(registry.clone(), feed.clone(), bot.clone());
    router.handle(subscriber, &format!("/add {ADDRESS}")).await;
    router
        .handle(subscriber, &format!("/remove {ADDRESS}"))
        .await;

    let monitor = MonitorLoop::new(&test_config(), registry, feed, bot.clone());
    monitor.run_cycle().await.unwrap();

    let replies = bot.messages_for(subscriber);
    // Only the /add and /remove confirmations, no alert.
    assert_eq!(replies.len(), 2);
    assert!(replies[1].contains("Stopped monitoring"));
}

/// Malformed addresses are rejected before touching the registry.
#[tokio::test]
async fn test_invalid_address_rejected() {
    let registry = Arc::new(SubscriptionRegistry::new());
    let bot = Arc::new(RecordingBot::default());
    let feed = Arc::new(ScriptedFeed::new(vec![]));

    let subscriber = SubscriberId(42);
    let router = CommandRouter::new(registry.clone(), feed, bot.clone());
    router.handle(subscriber, "/add 0xdeadbeef").await;

    let replies = bot.messages_for(subscriber);
    assert_eq!(replies.len(), 1);
    assert!(replies[0].contains("Invalid address"));
    assert!(registry.distinct_addresses().is_empty());
}
