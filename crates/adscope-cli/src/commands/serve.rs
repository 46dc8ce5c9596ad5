//! Server command implementation

use std::sync::Arc;

use adscope_core::{AccountResolver, ClientHandle};
use anyhow::Result;

const CREDENTIAL_VARS: [&str; 4] = [
    "GOOGLE_ADS_DEVELOPER_TOKEN",
    "GOOGLE_ADS_CLIENT_ID",
    "GOOGLE_ADS_CLIENT_SECRET",
    "GOOGLE_ADS_REFRESH_TOKEN",
];

/// Credential variables that are unset or blank
pub fn missing_credentials() -> Vec<&'static str> {
    CREDENTIAL_VARS
        .iter()
        .copied()
        .filter(|key| {
            std::env::var(key)
                .map(|v| v.trim().is_empty())
                .unwrap_or(true)
        })
        .collect()
}

pub async fn cmd_serve(
    resolver: AccountResolver,
    http: bool,
    host: &str,
    port: u16,
) -> Result<()> {
    // stdout belongs to the MCP stdio transport; the banner goes to stderr
    eprintln!("🚀 Starting adscope MCP server...");
    eprintln!("   Accounts: {}", resolver.mapping_path().display());
    if http {
        eprintln!("   Listening: http://{}:{}/mcp", host, port);
    } else {
        eprintln!("   Transport: stdio");
    }

    let missing = missing_credentials();
    if !missing.is_empty() {
        eprintln!();
        eprintln!("   ⚠️  Missing credentials: {}", missing.join(", "));
        eprintln!("      Tool calls will fail until the server is restarted with them set");
    }
    if http {
        eprintln!();
        eprintln!("   Press Ctrl+C to stop");
    }

    let client = Arc::new(ClientHandle::from_env());

    if http {
        adscope_server::start_mcp_server(resolver, client, host, port).await
    } else {
        adscope_server::serve_stdio(resolver, client).await
    }
}
