//! adscope Server
//!
//! MCP server exposing the Google Ads reporting tools from `adscope-core`
//! over stdio or Streamable HTTP.

pub mod mcp;

pub use mcp::{serve_stdio, start_mcp_server, AdscopeMcpServer};
