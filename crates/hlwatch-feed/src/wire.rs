//! Wire types for the exchange `/info` endpoint.
//!
//! Endpoint: POST /info with `{"type": "clearinghouseState", "user": "<address>"}`.
//! All numeric fields arrive as decimal strings; anything missing or
//! unparseable is treated as zero.

use hlwatch_core::{Position, Snapshot};
use rust_decimal::Decimal;
use serde::Deserialize;

/// clearinghouseState response.
#[derive(Debug, Clone, Deserialize)]
pub struct ClearinghouseState {
    /// Open positions.
    #[serde(rename = "assetPositions", default)]
    pub asset_positions: Vec<AssetPositionEntry>,
}

/// One entry of `assetPositions`.
#[derive(Debug, Clone, Deserialize)]
pub struct AssetPositionEntry {
    pub position: AssetPositionData,
}

/// Position data within an entry.
#[derive(Debug, Clone, Deserialize)]
pub struct AssetPositionData {
    /// Coin identifier (e.g. "BTC").
    #[serde(default)]
    pub coin: Option<String>,
    /// Signed size: positive = long, negative = short.
    #[serde(default)]
    pub szi: Option<String>,
    /// Entry price.
    #[serde(rename = "entryPx", default)]
    pub entry_px: Option<String>,
    /// Unrealized PnL.
    #[serde(rename = "unrealizedPnl", default)]
    pub unrealized_pnl: Option<String>,
    /// Liquidation price. Absent or zero means not applicable.
    #[serde(rename = "liquidationPx", default)]
    pub liquidation_px: Option<String>,
    /// Margin used by this position.
    #[serde(rename = "marginUsed", default)]
    pub margin_used: Option<String>,
    /// Leverage, nested or scalar depending on margin mode.
    #[serde(default)]
    pub leverage: Option<RawLeverage>,
}

/// Leverage arrives either as `{"type": "cross", "value": 20}` or as a
/// bare scalar.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawLeverage {
    Nested(LeverageInfo),
    Scalar(serde_json::Value),
}

/// Nested leverage object.
#[derive(Debug, Clone, Deserialize)]
pub struct LeverageInfo {
    #[serde(rename = "type", default)]
    pub leverage_type: Option<String>,
    #[serde(default)]
    pub value: Option<serde_json::Value>,
}

impl RawLeverage {
    /// Extract the true multiplier value. Defaults to 1 when absent or
    /// unparseable.
    pub fn multiplier(&self) -> Decimal {
        let value = match self {
            Self::Nested(info) => info.value.as_ref(),
            Self::Scalar(value) => Some(value),
        };
        value.map(decimal_from_value).unwrap_or(Decimal::ONE)
    }
}

fn decimal_from_value(value: &serde_json::Value) -> Decimal {
    match value {
        serde_json::Value::Number(n) => n
            .to_string()
            .parse()
            .unwrap_or(Decimal::ONE),
        serde_json::Value::String(s) => s.parse().unwrap_or(Decimal::ONE),
        _ => Decimal::ONE,
    }
}

/// Parse an optional decimal string, defaulting to zero.
fn parse_or_zero(field: &Option<String>) -> Decimal {
    field
        .as_deref()
        .and_then(|s| s.parse().ok())
        .unwrap_or(Decimal::ZERO)
}

impl ClearinghouseState {
    /// Convert the response into a domain snapshot.
    ///
    /// Entries without a coin, with a zero size, or with an
    /// unparseable size are excluded.
    pub fn into_snapshot(self) -> Snapshot {
        let mut snapshot = Snapshot::new();
        for entry in self.asset_positions {
            let pos = entry.position;
            let Some(coin) = pos.coin.filter(|c| !c.is_empty()) else {
                continue;
            };
            let size = parse_or_zero(&pos.szi);
            if size.is_zero() {
                continue;
            }
            let leverage = pos
                .leverage
                .as_ref()
                .map(RawLeverage::multiplier)
                .unwrap_or(Decimal::ONE);

            snapshot.insert(Position {
                instrument: coin,
                size,
                entry_price: parse_or_zero(&pos.entry_px),
                unrealized_pnl: parse_or_zero(&pos.unrealized_pnl),
                leverage,
                liquidation_price: parse_or_zero(&pos.liquidation_px),
                margin_used: parse_or_zero(&pos.margin_used),
            });
        }
        snapshot
    }
}
