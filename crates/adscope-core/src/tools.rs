//! Reporting tool implementations
//!
//! These are the three operations exposed over MCP (and by the CLI):
//! 1. `list_campaigns` - enabled campaigns with headline metrics
//! 2. `get_search_terms` - search terms that triggered ads, by spend
//! 3. `run_gaql` - any GAQL query, rows returned generically
//!
//! Every operation resolves the account first, so an unknown account fails
//! before the API client is even constructed. Any failure is wrapped in
//! [`Error::Operation`] with the operation's message prefix.

use chrono::Utc;
use serde::Deserialize;
use tracing::debug;

use crate::accounts::AccountResolver;
use crate::ads::ClientHandle;
use crate::error::{Error, Result};
use crate::gaql;
use crate::records::{self, CampaignRecord, SearchTermRecord};

pub const LIST_CAMPAIGNS_ERROR: &str = "Error listing campaigns";
pub const SEARCH_TERMS_ERROR: &str = "Error fetching search terms";
pub const RUN_GAQL_ERROR: &str = "Error running GAQL query";

const DEFAULT_CAMPAIGN_LIMIT: u32 = 20;
const DEFAULT_SEARCH_TERM_DAYS: u32 = 30;

fn default_campaign_limit() -> u32 {
    DEFAULT_CAMPAIGN_LIMIT
}

fn default_search_term_days() -> u32 {
    DEFAULT_SEARCH_TERM_DAYS
}

// =============================================================================
// list_campaigns
// =============================================================================

#[derive(Debug, Clone, Deserialize, schemars::JsonSchema)]
pub struct ListCampaignsParams {
    /// Account name (as listed in accounts.json) or numeric customer ID
    #[schemars(
        description = "Account name (e.g. 'Agro Baggio') OR the numeric Google Ads customer ID"
    )]
    pub customer_id: String,

    /// Maximum number of campaigns (default 20)
    #[serde(default = "default_campaign_limit")]
    #[schemars(description = "Maximum number of campaigns to return (default: 20)")]
    pub limit: u32,
}

impl ListCampaignsParams {
    pub fn new(customer_id: impl Into<String>) -> Self {
        Self {
            customer_id: customer_id.into(),
            limit: DEFAULT_CAMPAIGN_LIMIT,
        }
    }
}

pub async fn list_campaigns(
    resolver: &AccountResolver,
    client: &ClientHandle,
    params: ListCampaignsParams,
) -> Result<Vec<CampaignRecord>> {
    list_campaigns_inner(resolver, client, params)
        .await
        .map_err(|e| Error::operation(LIST_CAMPAIGNS_ERROR, e))
}

async fn list_campaigns_inner(
    resolver: &AccountResolver,
    client: &ClientHandle,
    params: ListCampaignsParams,
) -> Result<Vec<CampaignRecord>> {
    let customer_id = resolver.resolve(&params.customer_id)?;
    if params.limit == 0 {
        return Err(Error::InvalidParameter(
            "limit must be at least 1".to_string(),
        ));
    }
    let backend = client.get().await?;

    let query = gaql::list_campaigns_query(params.limit);
    let batches = backend.search_stream(&customer_id, &query).await?;

    let mut campaigns = Vec::new();
    for batch in &batches {
        for row in &batch.results {
            campaigns.push(records::campaign_record(row)?);
        }
    }
    campaigns.truncate(params.limit as usize);

    debug!("Listed {} campaign(s) for {}", campaigns.len(), customer_id);
    Ok(campaigns)
}

// =============================================================================
// get_search_terms
// =============================================================================

#[derive(Debug, Clone, Deserialize, schemars::JsonSchema)]
pub struct SearchTermsParams {
    /// Account name (as listed in accounts.json) or numeric customer ID
    #[schemars(
        description = "Account name (e.g. 'Agro Baggio') OR the numeric Google Ads customer ID"
    )]
    pub customer_id: String,

    /// Number of days to analyze (default 30)
    #[serde(default = "default_search_term_days")]
    #[schemars(description = "Number of days to analyze (default: last 30 days)")]
    pub days: u32,
}

impl SearchTermsParams {
    pub fn new(customer_id: impl Into<String>) -> Self {
        Self {
            customer_id: customer_id.into(),
            days: DEFAULT_SEARCH_TERM_DAYS,
        }
    }
}

pub async fn get_search_terms(
    resolver: &AccountResolver,
    client: &ClientHandle,
    params: SearchTermsParams,
) -> Result<Vec<SearchTermRecord>> {
    get_search_terms_inner(resolver, client, params)
        .await
        .map_err(|e| Error::operation(SEARCH_TERMS_ERROR, e))
}

async fn get_search_terms_inner(
    resolver: &AccountResolver,
    client: &ClientHandle,
    params: SearchTermsParams,
) -> Result<Vec<SearchTermRecord>> {
    let customer_id = resolver.resolve(&params.customer_id)?;
    if params.days == 0 {
        return Err(Error::InvalidParameter(
            "days must be at least 1".to_string(),
        ));
    }
    let (from, to) = gaql::last_days_window(Utc::now().date_naive(), params.days)?;
    let backend = client.get().await?;

    let query = gaql::search_terms_query(from, to);
    let batches = backend.search_stream(&customer_id, &query).await?;

    let mut terms = Vec::new();
    for batch in &batches {
        for row in &batch.results {
            terms.push(records::search_term_record(row)?);
        }
    }

    debug!(
        "Fetched {} search term(s) for {} ({} to {})",
        terms.len(),
        customer_id,
        from,
        to
    );
    Ok(terms)
}

// =============================================================================
// run_gaql
// =============================================================================

#[derive(Debug, Clone, Deserialize, schemars::JsonSchema)]
pub struct RunGaqlParams {
    /// Account name or numeric customer ID
    #[schemars(description = "Account name or numeric Google Ads customer ID")]
    pub customer_id: String,

    /// GAQL query, submitted verbatim
    #[schemars(
        description = "GAQL query string (e.g. \"SELECT campaign.name FROM campaign LIMIT 5\")"
    )]
    pub query: String,
}

/// Run a caller-supplied GAQL query.
///
/// The query is not validated or rewritten. Rows that cannot be converted are
/// returned as `{"_raw": ...}` instead of failing the whole call.
pub async fn run_gaql(
    resolver: &AccountResolver,
    client: &ClientHandle,
    params: RunGaqlParams,
) -> Result<Vec<serde_json::Value>> {
    run_gaql_inner(resolver, client, params)
        .await
        .map_err(|e| Error::operation(RUN_GAQL_ERROR, e))
}

async fn run_gaql_inner(
    resolver: &AccountResolver,
    client: &ClientHandle,
    params: RunGaqlParams,
) -> Result<Vec<serde_json::Value>> {
    let customer_id = resolver.resolve(&params.customer_id)?;
    let backend = client.get().await?;

    let batches = backend.search_stream(&customer_id, &params.query).await?;
    Ok(batches
        .iter()
        .flat_map(|batch| batch.results.iter())
        .map(records::raw_record)
        .collect())
}
