//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `accounts` - Account mapping commands (list, resolve)
//! - `reports` - One-shot runs of the reporting tools (campaigns, search terms, GAQL)
//! - `serve` - MCP server command

pub mod accounts;
pub mod reports;
pub mod serve;

use std::path::Path;

use adscope_core::accounts::default_mapping_path;
use adscope_core::AccountResolver;
use anyhow::Result;
use serde::Serialize;

// Re-export command functions for main.rs
pub use accounts::*;
pub use reports::*;
pub use serve::*;

/// Resolver for the --accounts path (or ADSCOPE_ACCOUNTS_FILE), else accounts.json
/// beside the executable
pub fn account_resolver(accounts: Option<&Path>) -> AccountResolver {
    match accounts {
        Some(path) => AccountResolver::new(path),
        None => AccountResolver::new(default_mapping_path()),
    }
}

/// Print a value as pretty JSON on stdout
pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
