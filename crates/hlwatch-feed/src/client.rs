//! HTTP client for the exchange info endpoint.

use crate::error::{FeedError, FeedResult};
use crate::wire::ClearinghouseState;
use hlwatch_core::{Address, Snapshot};
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;
use tracing::debug;

/// Hyperliquid mainnet info endpoint.
pub const DEFAULT_INFO_URL: &str = "https://api.hyperliquid.xyz/info";

/// Default timeout for API requests.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Request body for the info endpoint.
#[derive(Debug, Serialize)]
struct InfoRequest {
    #[serde(rename = "type")]
    request_type: &'static str,
    user: String,
}

/// Client for fetching user position state.
pub struct InfoClient {
    client: Client,
    info_url: String,
}

impl InfoClient {
    /// Create a new info client.
    ///
    /// # Arguments
    /// * `info_url` - URL of the info endpoint (e.g. `DEFAULT_INFO_URL`)
    pub fn new(info_url: impl Into<String>) -> FeedResult<Self> {
        let client = Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .build()
            .map_err(|e| FeedError::HttpClient(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            info_url: info_url.into(),
        })
    }

    /// Fetch all open positions for an address.
    ///
    /// Returns the parsed snapshot; zero-size entries are already
    /// filtered out by ingestion.
    pub async fn fetch_positions(&self, address: &Address) -> FeedResult<Snapshot> {
        debug!(user = %address.short(), "Fetching clearinghouseState");

        let request = InfoRequest {
            request_type: "clearinghouseState",
            user: address.to_string(),
        };

        let response = self
            .client
            .post(&self.info_url)
            .json(&request)
            .send()
            .await
            .map_err(|e| FeedError::HttpClient(format!("HTTP request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(FeedError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let state: ClearinghouseState = response
            .json()
            .await
            .map_err(|e| FeedError::Parse(format!("Invalid clearinghouseState: {e}")))?;

        let snapshot = state.into_snapshot();
        debug!(
            user = %address.short(),
            positions = snapshot.len(),
            "Fetched clearinghouseState"
        );
        Ok(snapshot)
    }
}
