//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI arguments.
//! The actual command implementations are in the `commands` module.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// adscope - Google Ads reporting for LLMs and the terminal
#[derive(Parser)]
#[command(name = "adscope")]
#[command(about = "Google Ads reporting tools over MCP", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Account mapping file (JSON object: account name -> customer ID)
    ///
    /// Defaults to accounts.json next to the adscope executable.
    #[arg(long, global = true, env = "ADSCOPE_ACCOUNTS_FILE")]
    pub accounts: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the MCP server (stdio by default)
    ///
    /// Google Ads credentials are read from GOOGLE_ADS_DEVELOPER_TOKEN,
    /// GOOGLE_ADS_CLIENT_ID, GOOGLE_ADS_CLIENT_SECRET and GOOGLE_ADS_REFRESH_TOKEN
    /// on the first tool call.
    Serve {
        /// Serve Streamable HTTP on --host/--port instead of stdio
        #[arg(long)]
        http: bool,

        /// Host to bind to (with --http)
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Port to listen on (with --http)
        #[arg(short, long, default_value = "3001")]
        port: u16,
    },

    /// List the named accounts in the mapping file
    Accounts,

    /// Resolve an account name or ID to its customer ID
    Resolve {
        /// Account name or customer ID (any formatting)
        account: String,
    },

    /// List enabled campaigns with their main metrics
    Campaigns {
        /// Account name or customer ID
        account: String,

        /// Maximum number of campaigns
        #[arg(short, long, default_value = "20")]
        limit: u32,
    },

    /// List search terms that triggered ads
    SearchTerms {
        /// Account name or customer ID
        account: String,

        /// Number of days to analyze
        #[arg(short, long, default_value = "30")]
        days: u32,
    },

    /// Run a raw GAQL query
    Query {
        /// Account name or customer ID
        account: String,

        /// GAQL query (e.g. "SELECT campaign.name FROM campaign LIMIT 5")
        query: String,
    },
}
