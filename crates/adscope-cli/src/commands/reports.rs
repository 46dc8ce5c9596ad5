//! One-shot reporting commands
//!
//! Each command runs the same operation the MCP tool does and prints the
//! JSON result.

use adscope_core::{
    tools, AccountResolver, ClientHandle, ListCampaignsParams, RunGaqlParams, SearchTermsParams,
};
use anyhow::Result;

use super::print_json;

pub async fn cmd_campaigns(
    resolver: &AccountResolver,
    client: &ClientHandle,
    account: &str,
    limit: u32,
) -> Result<()> {
    let params = ListCampaignsParams {
        customer_id: account.to_string(),
        limit,
    };
    let campaigns = tools::list_campaigns(resolver, client, params).await?;
    print_json(&campaigns)
}

pub async fn cmd_search_terms(
    resolver: &AccountResolver,
    client: &ClientHandle,
    account: &str,
    days: u32,
) -> Result<()> {
    let params = SearchTermsParams {
        customer_id: account.to_string(),
        days,
    };
    let terms = tools::get_search_terms(resolver, client, params).await?;
    print_json(&terms)
}

pub async fn cmd_query(
    resolver: &AccountResolver,
    client: &ClientHandle,
    account: &str,
    query: &str,
) -> Result<()> {
    let params = RunGaqlParams {
        customer_id: account.to_string(),
        query: query.to_string(),
    };
    let rows = tools::run_gaql(resolver, client, params).await?;
    print_json(&rows)
}
