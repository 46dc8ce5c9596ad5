//! MCP (Model Context Protocol) Server for adscope
//!
//! Exposes Google Ads reporting to LLMs via MCP tools.
//! All tools are read-only - they only run reporting queries.
//!
//! # Transports
//!
//! - stdio (default): for desktop MCP clients that spawn the server
//! - Streamable HTTP: `/mcp` on a local port
//!
//! # Example
//!
//! ```bash
//! # stdio
//! adscope serve
//!
//! # HTTP
//! adscope serve --http --port 3001
//! ```
//!
//! # Available Tools
//!
//! - `google_ads_list_campaigns` - Enabled campaigns with impressions, clicks, cost, CTR, CPC
//! - `google_ads_get_search_terms` - Search terms that triggered ads over the last N days
//! - `google_ads_run_gaql` - Any GAQL query, rows returned as JSON

mod tools;


use std::sync::Arc;

use rmcp::{
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::{
        CallToolResult, Content, Implementation, ProtocolVersion, ServerCapabilities, ServerInfo,
    },
    tool, tool_handler, tool_router, ErrorData as McpError, ServerHandler, ServiceExt,
};
use serde::Serialize;
use tracing::{info, warn};

use adscope_core::{AccountResolver, ClientHandle};

pub use tools::*;

/// adscope MCP Server state
#[derive(Clone)]
pub struct AdscopeMcpServer {
    /// Account name/ID resolution (mapping file re-read per call)
    resolver: AccountResolver,
    /// Google Ads client, shared by every session in the process
    client: Arc<ClientHandle>,
    /// Tool router for MCP operations
    tool_router: ToolRouter<Self>,
}

impl AdscopeMcpServer {
    /// Create a new MCP server with the given resolver and client handle
    pub fn new(resolver: AccountResolver, client: Arc<ClientHandle>) -> Self {
        Self {
            resolver,
            client,
            tool_router: Self::tool_router(),
        }
    }
}

/// Render tool output as pretty JSON text content
fn json_result<T: Serialize>(value: &T) -> Result<CallToolResult, McpError> {
    let text = serde_json::to_string_pretty(value)
        .map_err(|e| McpError::internal_error(e.to_string(), None))?;
    Ok(CallToolResult::success(vec![Content::text(text)]))
}

fn tool_error(tool: &str, error: adscope_core::Error) -> McpError {
    warn!("Tool {} failed: {}", tool, error);
    McpError::internal_error(error.to_string(), None)
}

#[tool_handler]
impl ServerHandler for AdscopeMcpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2025_03_26,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "Google Ads".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                title: Some("adscope Google Ads reporting".to_string()),
                website_url: None,
                icons: None,
            },
            instructions: Some(
                "Query Google Ads accounts. Accounts can be named as listed in accounts.json \
                 or by numeric customer ID (with or without dashes). Use the campaign and \
                 search term tools for common reports, and the GAQL tool for anything else."
                    .to_string(),
            ),
        }
    }
}

#[tool_router]
impl AdscopeMcpServer {
    /// List enabled campaigns with their headline metrics
    #[tool(
        description = "List active campaigns and their main metrics (impressions, clicks, cost, CTR, CPC). Returns structured JSON. customer_id accepts an account name (e.g. 'Agro Baggio') or the numeric Google Ads customer ID."
    )]
    async fn google_ads_list_campaigns(
        &self,
        Parameters(params): Parameters<ListCampaignsParams>,
    ) -> Result<CallToolResult, McpError> {
        match tools::list_campaigns(&self.resolver, &self.client, params).await {
            Ok(result) => json_result(&result),
            Err(e) => Err(tool_error("google_ads_list_campaigns", e)),
        }
    }

    /// List the search terms that triggered ads
    #[tool(
        description = "List the real search terms that triggered your ads over the last N days (default 30), most expensive first, up to 50. Returns structured JSON."
    )]
    async fn google_ads_get_search_terms(
        &self,
        Parameters(params): Parameters<SearchTermsParams>,
    ) -> Result<CallToolResult, McpError> {
        match tools::get_search_terms(&self.resolver, &self.client, params).await {
            Ok(result) => json_result(&result),
            Err(e) => Err(tool_error("google_ads_get_search_terms", e)),
        }
    }

    /// Run an arbitrary GAQL query
    #[tool(
        description = "Run a raw GAQL (Google Ads Query Language) query. Allows fetching any metric or resource available in the Google Ads API. Example: SELECT campaign.name FROM campaign LIMIT 5"
    )]
    async fn google_ads_run_gaql(
        &self,
        Parameters(params): Parameters<RunGaqlParams>,
    ) -> Result<CallToolResult, McpError> {
        match tools::run_gaql(&self.resolver, &self.client, params).await {
            Ok(result) => json_result(&result),
            Err(e) => Err(tool_error("google_ads_run_gaql", e)),
        }
    }
}

/// Serve MCP over stdin/stdout until the client disconnects
pub async fn serve_stdio(
    resolver: AccountResolver,
    client: Arc<ClientHandle>,
) -> anyhow::Result<()> {
    info!(
        "Starting MCP server on stdio (accounts: {})",
        resolver.mapping_path().display()
    );

    let service = AdscopeMcpServer::new(resolver, client)
        .serve(rmcp::transport::stdio())
        .await?;
    service.waiting().await?;

    info!("MCP client disconnected");
    Ok(())
}

/// Start the MCP server on the given port
pub async fn start_mcp_server(
    resolver: AccountResolver,
    client: Arc<ClientHandle>,
    host: &str,
    port: u16,
) -> anyhow::Result<()> {
    use rmcp::transport::streamable_http_server::session::local::LocalSessionManager;
    use rmcp::transport::streamable_http_server::StreamableHttpService;

    info!("Starting MCP server at http://{}:{}/mcp", host, port);

    let service = StreamableHttpService::new(
        move || Ok(AdscopeMcpServer::new(resolver.clone(), client.clone())),
        LocalSessionManager::default().into(),
        Default::default(),
    );

    let router = axum::Router::new().nest_service("/mcp", service);
    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!("MCP server ready at http://{}/mcp", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(async {
            // Wait for shutdown signal
            tokio::signal::ctrl_c().await.ok();
        })
        .await?;

    Ok(())
}
