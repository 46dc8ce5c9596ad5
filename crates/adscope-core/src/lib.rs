//! adscope Core Library
//!
//! Shared functionality for the adscope Google Ads reporting tools:
//! - Account resolution (display names or loosely formatted IDs)
//! - Google Ads REST client with OAuth2 refresh and a process-wide handle
//! - GAQL templates for the fixed-shape reports
//! - Row flattening into serializable records
//! - The three reporting operations shared by the MCP server and the CLI

pub mod accounts;
pub mod ads;
pub mod error;
pub mod gaql;
pub mod money;
pub mod records;
pub mod tools;

/// Test utilities including a mock Google Ads server
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use accounts::{AccountEntry, AccountResolver, CustomerId};
pub use ads::{
    AdsConfig, ClientHandle, GoogleAdsClient, MockBackend, RecordedQuery, ReportingBackend,
    SearchStreamBatch,
};
pub use error::{Error, Result};
pub use money::format_money;
pub use records::{CampaignMetrics, CampaignRecord, SearchTermMetrics, SearchTermRecord};
pub use tools::{ListCampaignsParams, RunGaqlParams, SearchTermsParams};
