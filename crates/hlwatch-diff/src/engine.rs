//! The diff computation.

use crate::event::{CloseOutcome, PositionEvent, ResizeDirection};
use hlwatch_core::Snapshot;
use rust_decimal::Decimal;

/// Default resize alert threshold: 10% magnitude change.
pub const DEFAULT_RESIZE_THRESHOLD: Decimal = Decimal::from_parts(1, 0, 0, false, 1);

/// Compute the notification events between two snapshots.
///
/// Events are emitted in a fixed order for determinism: all opens, then
/// all closes, then all resizes, each in instrument order.
///
/// A resize fires only when the size magnitude changed by strictly more
/// than `threshold` (a fraction, e.g. 0.10) relative to the old
/// magnitude. Direction flips therefore show up as resizes, not as a
/// close plus an open. PnL-only moves never produce an event.
pub fn diff(old: &Snapshot, new: &Snapshot, threshold: Decimal) -> Vec<PositionEvent> {
    let mut events = Vec::new();

    for (instrument, pos) in new.iter() {
        if !old.contains(instrument) {
            events.push(PositionEvent::Opened {
                instrument: instrument.clone(),
                side: pos.side(),
                leverage: pos.leverage,
                size: pos.size,
                entry_price: pos.entry_price,
                notional: pos.notional(),
                liquidation_price: pos.liquidation_price,
            });
        }
    }

    for (instrument, old_pos) in old.iter() {
        if !new.contains(instrument) {
            events.push(PositionEvent::Closed {
                instrument: instrument.clone(),
                side: old_pos.side(),
                leverage: old_pos.leverage,
                size: old_pos.size,
                entry_price: old_pos.entry_price,
                final_pnl: old_pos.unrealized_pnl,
                outcome: CloseOutcome::from_pnl(old_pos.unrealized_pnl),
            });
        }
    }

    for (instrument, new_pos) in new.iter() {
        let Some(old_pos) = old.get(instrument) else {
            continue;
        };
        let old_size = old_pos.abs_size();
        let new_size = new_pos.abs_size();

        // Snapshots never contain zero-size positions, but skip the
        // comparison rather than divide by zero if one slips through.
        if old_size.is_zero() {
            continue;
        }

        let change = (new_size - old_size).abs() / old_size;
        if change > threshold {
            let direction = if new_size > old_size {
                ResizeDirection::Increased
            } else {
                ResizeDirection::Decreased
            };
            events.push(PositionEvent::Resized {
                instrument: instrument.clone(),
                side: new_pos.side(),
                leverage: new_pos.leverage,
                direction,
                old_size,
                new_size,
                change_pct: change * Decimal::ONE_HUNDRED,
                unrealized_pnl: new_pos.unrealized_pnl,
            });
        }
    }

    events
}

#[cfg(test)]
mod tests {
    use super::*;
    use hlwatch_core::Position;
    use rust_decimal_macros::dec;

    fn position(instrument: &str, size: Decimal) -> Position {
        Position {
            instrument: instrument.to_string(),
            size,
            entry_price: dec!(50000),
            unrealized_pnl: dec!(100),
            leverage: dec!(5),
            liquidation_price: dec!(45000),
            margin_used: dec!(2000),
        }
    }

    fn snapshot(positions: Vec<Position>) -> Snapshot {
        positions.into_iter().collect()
    }

    #[test]
    fn test_default_threshold_is_ten_percent() {
        assert_eq!(DEFAULT_RESIZE_THRESHOLD, dec!(0.1));
    }

    #[test]
    fn test_self_diff_is_empty() {
        let snap = snapshot(vec![position("BTC", dec!(2)), position("ETH", dec!(-1))]);
        assert!(diff(&snap, &snap, DEFAULT_RESIZE_THRESHOLD).is_empty());
    }

    #[test]
    fn test_empty_to_empty() {
        let empty = Snapshot::new();
        assert!(diff(&empty, &empty, DEFAULT_RESIZE_THRESHOLD).is_empty());
    }

    #[test]
    fn test_superset_yields_opened_only() {
        let old = snapshot(vec![position("BTC", dec!(2))]);
        let new = snapshot(vec![
            position("BTC", dec!(2)),
            position("ETH", dec!(-1)),
            position("SOL", dec!(10)),
        ]);

        let events = diff(&old, &new, DEFAULT_RESIZE_THRESHOLD);
        assert_eq!(events.len(), 2);
        assert!(events
            .iter()
            .all(|e| matches!(e, PositionEvent::Opened { .. })));
        // Instrument-ordered.
        assert_eq!(events[0].instrument(), "ETH");
        assert_eq!(events[1].instrument(), "SOL");
    }

    #[test]
    fn test_opened_carries_notional_and_liq() {
        let old = Snapshot::new();
        let new = snapshot(vec![position("BTC", dec!(-2))]);

        let events = diff(&old, &new, DEFAULT_RESIZE_THRESHOLD);
        match &events[0] {
            PositionEvent::Opened {
                side,
                notional,
                liquidation_price,
                ..
            } => {
                assert_eq!(*side, hlwatch_core::PositionSide::Short);
                assert_eq!(*notional, dec!(100000));
                assert_eq!(*liquidation_price, dec!(45000));
            }
            other => panic!("expected Opened, got {other:?}"),
        }
    }

    #[test]
    fn test_closed_classified_loss() {
        let mut pos = position("BTC", dec!(2));
        pos.unrealized_pnl = dec!(-5);
        let old = snapshot(vec![pos]);

        let events = diff(&old, &Snapshot::new(), DEFAULT_RESIZE_THRESHOLD);
        match &events[0] {
            PositionEvent::Closed {
                final_pnl, outcome, ..
            } => {
                assert_eq!(*final_pnl, dec!(-5));
                assert_eq!(*outcome, CloseOutcome::Loss);
            }
            other => panic!("expected Closed, got {other:?}"),
        }
    }

    #[test]
    fn test_zero_pnl_close_is_profit() {
        let mut pos = position("BTC", dec!(2));
        pos.unrealized_pnl = Decimal::ZERO;
        let old = snapshot(vec![pos]);

        let events = diff(&old, &Snapshot::new(), DEFAULT_RESIZE_THRESHOLD);
        match &events[0] {
            PositionEvent::Closed { outcome, .. } => assert_eq!(*outcome, CloseOutcome::Profit),
            other => panic!("expected Closed, got {other:?}"),
        }
    }

    #[test]
    fn test_resize_threshold_boundary_exact_no_event() {
        // Exactly 10% is not strictly greater than the threshold.
        let old = snapshot(vec![position("BTC", dec!(10))]);
        let new = snapshot(vec![position("BTC", dec!(11.0))]);
        assert!(diff(&old, &new, DEFAULT_RESIZE_THRESHOLD).is_empty());
    }

    #[test]
    fn test_resize_just_over_threshold_fires() {
        let old = snapshot(vec![position("BTC", dec!(10))]);
        let new = snapshot(vec![position("BTC", dec!(11.01))]);

        let events = diff(&old, &new, DEFAULT_RESIZE_THRESHOLD);
        assert_eq!(events.len(), 1);
        match &events[0] {
            PositionEvent::Resized {
                direction,
                old_size,
                new_size,
                change_pct,
                ..
            } => {
                assert_eq!(*direction, ResizeDirection::Increased);
                assert_eq!(*old_size, dec!(10));
                assert_eq!(*new_size, dec!(11.01));
                assert_eq!(*change_pct, dec!(10.1));
            }
            other => panic!("expected Resized, got {other:?}"),
        }
    }

    #[test]
    fn test_resize_decrease() {
        let old = snapshot(vec![position("BTC", dec!(10))]);
        let new = snapshot(vec![position("BTC", dec!(5))]);

        let events = diff(&old, &new, DEFAULT_RESIZE_THRESHOLD);
        match &events[0] {
            PositionEvent::Resized { direction, .. } => {
                assert_eq!(*direction, ResizeDirection::Decreased)
            }
            other => panic!("expected Resized, got {other:?}"),
        }
    }

    #[test]
    fn test_direction_flip_same_magnitude_no_event() {
        // |size| unchanged, so a long->short flip is below threshold.
        let old = snapshot(vec![position("BTC", dec!(10))]);
        let new = snapshot(vec![position("BTC", dec!(-10))]);
        assert!(diff(&old, &new, DEFAULT_RESIZE_THRESHOLD).is_empty());
    }

    #[test]
    fn test_direction_flip_with_growth_is_resize() {
        let old = snapshot(vec![position("BTC", dec!(10))]);
        let new = snapshot(vec![position("BTC", dec!(-15))]);

        let events = diff(&old, &new, DEFAULT_RESIZE_THRESHOLD);
        assert_eq!(events.len(), 1);
        assert!(matches!(
            events[0],
            PositionEvent::Resized {
                direction: ResizeDirection::Increased,
                ..
            }
        ));
    }

    #[test]
    fn test_pnl_only_move_no_event() {
        let old = snapshot(vec![position("BTC", dec!(2))]);
        let mut moved = position("BTC", dec!(2));
        moved.unrealized_pnl = dec!(900);
        let new = snapshot(vec![moved]);
        assert!(diff(&old, &new, DEFAULT_RESIZE_THRESHOLD).is_empty());
    }

    #[test]
    fn test_event_ordering_opened_closed_resized() {
        let old = snapshot(vec![position("BTC", dec!(2)), position("ETH", dec!(1))]);
        let new = snapshot(vec![position("BTC", dec!(4)), position("SOL", dec!(3))]);

        let events = diff(&old, &new, DEFAULT_RESIZE_THRESHOLD);
        assert_eq!(events.len(), 3);
        assert!(matches!(events[0], PositionEvent::Opened { .. }));
        assert!(matches!(events[1], PositionEvent::Closed { .. }));
        assert!(matches!(events[2], PositionEvent::Resized { .. }));
    }

    #[test]
    fn test_custom_threshold() {
        let old = snapshot(vec![position("BTC", dec!(10))]);
        let new = snapshot(vec![position("BTC", dec!(10.6))]);

        // 6% change: silent at 10%, fires at 5%.
        assert!(diff(&old, &new, dec!(0.10)).is_empty());
        assert_eq!(diff(&old, &new, dec!(0.05)).len(), 1);
    }
}
