//! Notification event types produced by the diff engine.

use hlwatch_core::PositionSide;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Whether a closed position ended in profit or loss.
///
/// Zero PnL counts as profit (boundary inclusive on the non-negative
/// side).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CloseOutcome {
    Profit,
    Loss,
}

impl CloseOutcome {
    /// Classify a final PnL value.
    pub fn from_pnl(pnl: Decimal) -> Self {
        if pnl >= Decimal::ZERO {
            Self::Profit
        } else {
            Self::Loss
        }
    }
}

/// Direction of a material size change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResizeDirection {
    Increased,
    Decreased,
}

/// A semantically meaningful change between two snapshots of the same
/// address.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PositionEvent {
    /// Instrument present in the new snapshot but not the old one.
    Opened {
        instrument: String,
        side: PositionSide,
        leverage: Decimal,
        size: Decimal,
        entry_price: Decimal,
        /// |size| * entry price.
        notional: Decimal,
        /// Zero means not applicable.
        liquidation_price: Decimal,
    },
    /// Instrument present in the old snapshot but not the new one.
    Closed {
        instrument: String,
        side: PositionSide,
        leverage: Decimal,
        size: Decimal,
        entry_price: Decimal,
        final_pnl: Decimal,
        outcome: CloseOutcome,
    },
    /// Instrument present in both, with a magnitude change beyond the
    /// resize threshold.
    Resized {
        instrument: String,
        side: PositionSide,
        leverage: Decimal,
        direction: ResizeDirection,
        /// Old size magnitude.
        old_size: Decimal,
        /// New size magnitude.
        new_size: Decimal,
        /// Magnitude change as a percentage of the old size.
        change_pct: Decimal,
        /// PnL of the position at detection time.
        unrealized_pnl: Decimal,
    },
}

impl PositionEvent {
    /// Instrument this event refers to.
    pub fn instrument(&self) -> &str {
        match self {
            Self::Opened { instrument, .. }
            | Self::Closed { instrument, .. }
            | Self::Resized { instrument, .. } => instrument,
        }
    }
}
