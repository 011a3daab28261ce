//! Account address and subscriber identifiers.

use crate::error::{CoreError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Required address length: "0x" plus 40 hex digits.
const ADDRESS_LEN: usize = 42;

/// A tracked trading account address.
///
/// Validated at construction: exactly 42 characters, "0x" prefix,
/// ascii-hex body. Comparison is exact string equality; the address is
/// stored as given (no case normalization).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Address(String);

impl Address {
    /// Parse and validate an address string.
    pub fn parse(raw: &str) -> Result<Self> {
        let raw = raw.trim();
        if raw.len() != ADDRESS_LEN {
            return Err(CoreError::InvalidAddress(format!(
                "expected {ADDRESS_LEN} characters, got {}",
                raw.len()
            )));
        }
        if !raw.starts_with("0x") {
            return Err(CoreError::InvalidAddress(
                "must start with 0x".to_string(),
            ));
        }
        if !raw[2..].chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(CoreError::InvalidAddress(
                "non-hex character after 0x prefix".to_string(),
            ));
        }
        Ok(Self(raw.to_string()))
    }

    /// The full address string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Shortened display form: first 6 and last 4 characters.
    pub fn short(&self) -> String {
        format!("{}...{}", &self.0[..6], &self.0[self.0.len() - 4..])
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A notification recipient (one per Telegram chat).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubscriberId(pub i64);

impl fmt::Display for SubscriberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
