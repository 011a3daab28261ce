//! Open position and snapshot types.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::btree_map;
use std::collections::BTreeMap;
use std::fmt;

/// Direction of an open exposure, derived from the size sign.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PositionSide {
    Long,
    Short,
}

impl PositionSide {
    /// Derive the side from a signed size.
    pub fn from_size(size: Decimal) -> Self {
        if size > Decimal::ZERO {
            Self::Long
        } else {
            Self::Short
        }
    }
}

impl fmt::Display for PositionSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Long => write!(f, "LONG"),
            Self::Short => write!(f, "SHORT"),
        }
    }
}

/// One open exposure for a single instrument under one address.
///
/// A `Position` with zero size never appears in a `Snapshot`; ingestion
/// filters those out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Position {
    /// Instrument identifier (coin symbol, e.g. "BTC").
    pub instrument: String,
    /// Signed size. Positive = long, negative = short.
    pub size: Decimal,
    /// Entry price.
    pub entry_price: Decimal,
    /// Unrealized PnL (any sign).
    pub unrealized_pnl: Decimal,
    /// Leverage multiplier, displayed as "Nx".
    pub leverage: Decimal,
    /// Liquidation price. Zero means not applicable.
    pub liquidation_price: Decimal,
    /// Margin allocated to this position.
    pub margin_used: Decimal,
}

impl Position {
    /// Direction of the exposure.
    pub fn side(&self) -> PositionSide {
        PositionSide::from_size(self.size)
    }

    /// Magnitude of the size, ignoring direction.
    pub fn abs_size(&self) -> Decimal {
        self.size.abs()
    }

    /// Notional value: |size| * entry price.
    pub fn notional(&self) -> Decimal {
        self.abs_size() * self.entry_price
    }

    /// Whether a liquidation price applies to this position.
    pub fn has_liquidation_price(&self) -> bool {
        self.liquidation_price > Decimal::ZERO
    }
}

/// Complete set of open positions for one address at one point in time.
///
/// Keyed uniquely by instrument. Backed by an ordered map so that
/// iteration (and therefore diff output) is deterministic.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    positions: BTreeMap<String, Position>,
}

impl Snapshot {
    /// Create an empty snapshot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a position, keyed by its instrument.
    ///
    /// Zero-size positions are silently dropped to uphold the snapshot
    /// invariant.
    pub fn insert(&mut self, position: Position) {
        if position.size.is_zero() {
            return;
        }
        self.positions.insert(position.instrument.clone(), position);
    }

    /// Look up a position by instrument.
    pub fn get(&self, instrument: &str) -> Option<&Position> {
        self.positions.get(instrument)
    }

    /// Whether an instrument is present.
    pub fn contains(&self, instrument: &str) -> bool {
        self.positions.contains_key(instrument)
    }

    /// Number of open positions.
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// Whether the snapshot holds no positions.
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Iterate positions in instrument order.
    pub fn iter(&self) -> btree_map::Iter<'_, String, Position> {
        self.positions.iter()
    }

    /// Sum of unrealized PnL across all open positions.
    pub fn total_unrealized_pnl(&self) -> Decimal {
        self.positions.values().map(|p| p.unrealized_pnl).sum()
    }
}

impl FromIterator<Position> for Snapshot {
    fn from_iter<I: IntoIterator<Item = Position>>(iter: I) -> Self {
        let mut snapshot = Self::new();
        for position in iter {
            snapshot.insert(position);
        }
        snapshot
    }
}
