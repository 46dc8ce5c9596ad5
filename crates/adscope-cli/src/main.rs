//! adscope CLI - Google Ads reporting over MCP
//!
//! Usage:
//!   adscope serve                          Start the MCP server on stdio
//!   adscope serve --http --port 3001       Start the MCP server over HTTP
//!   adscope accounts                       List named accounts
//!   adscope campaigns "Agro Baggio"        List enabled campaigns
//!   adscope search-terms 123-456-7890      List search terms (last 30 days)
//!   adscope query ACCOUNT "SELECT ..."     Run a raw GAQL query

mod cli;
mod commands;


use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use adscope_core::ClientHandle;
use cli::*;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    // Logs go to stderr so the stdio MCP transport keeps stdout to itself
    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr)
                .compact(),
        )
        .init();

    let resolver = commands::account_resolver(cli.accounts.as_deref());

    match cli.command {
        Commands::Serve { http, host, port } => {
            commands::cmd_serve(resolver, http, &host, port).await
        }
        Commands::Accounts => commands::cmd_accounts(&resolver),
        Commands::Resolve { account } => commands::cmd_resolve(&resolver, &account),
        Commands::Campaigns { account, limit } => {
            let client = ClientHandle::from_env();
            commands::cmd_campaigns(&resolver, &client, &account, limit).await
        }
        Commands::SearchTerms { account, days } => {
            let client = ClientHandle::from_env();
            commands::cmd_search_terms(&resolver, &client, &account, days).await
        }
        Commands::Query { account, query } => {
            let client = ClientHandle::from_env();
            commands::cmd_query(&resolver, &client, &account, &query).await
        }
    }
}
