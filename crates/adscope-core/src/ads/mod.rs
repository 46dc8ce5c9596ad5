//! Google Ads reporting API access
//!
//! # Architecture
//!
//! - `ReportingBackend` trait: the one call the reporting tools need,
//!   a streaming GAQL search for a customer
//! - `GoogleAdsClient`: REST implementation (OAuth2 refresh-token grant +
//!   `googleAds:searchStream`)
//! - `MockBackend`: in-memory canned batches for tests
//! - `ClientHandle`: process-wide, lazily constructed backend shared by all
//!   tool calls
//!
//! # Configuration
//!
//! Environment variables (read once, when the handle is first used):
//! - `GOOGLE_ADS_DEVELOPER_TOKEN`: developer token (required)
//! - `GOOGLE_ADS_CLIENT_ID`: OAuth2 client ID (required)
//! - `GOOGLE_ADS_CLIENT_SECRET`: OAuth2 client secret (required)
//! - `GOOGLE_ADS_REFRESH_TOKEN`: OAuth2 refresh token (required)
//! - `GOOGLE_ADS_LOGIN_CUSTOMER_ID`: manager account to act through (optional)
//! - `GOOGLE_ADS_API_VERSION`: API version path segment (default: v21)
//! - `GOOGLE_ADS_ENDPOINT`: API base URL (default: https://googleads.googleapis.com)
//! - `GOOGLE_ADS_TOKEN_URL`: OAuth2 token URL (default: https://oauth2.googleapis.com/token)

mod client;
mod config;
mod handle;
mod mock;

pub use client::GoogleAdsClient;
pub use config::AdsConfig;
pub use handle::ClientHandle;
pub use mock::{MockBackend, RecordedQuery};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::accounts::CustomerId;
use crate::error::Result;

/// One chunk of rows from a `searchStream` response
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchStreamBatch {
    #[serde(default)]
    pub results: Vec<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field_mask: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
}

impl SearchStreamBatch {
    pub fn new(results: Vec<serde_json::Value>) -> Self {
        Self {
            results,
            ..Default::default()
        }
    }
}

/// Interface to the reporting API
///
/// Implementations must be Send + Sync so one instance can be shared by
/// every tool call in the process.
#[async_trait]
pub trait ReportingBackend: Send + Sync {
    /// Run a GAQL query for the customer and return every batch, fully
    /// materialised
    async fn search_stream(
        &self,
        customer_id: &CustomerId,
        query: &str,
    ) -> Result<Vec<SearchStreamBatch>>;
}
