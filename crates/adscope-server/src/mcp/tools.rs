//! MCP Tool implementations for adscope
//!
//! Re-exports from adscope_core::tools for MCP server use.
//! The actual implementations live in adscope-core so they can be shared
//! with the CLI.

// Re-export all tool types and functions from adscope-core
pub use adscope_core::tools::{
    // Functions
    get_search_terms,
    list_campaigns,
    run_gaql,
    // Params types
    ListCampaignsParams,
    RunGaqlParams,
    SearchTermsParams,
};

// Result types
pub use adscope_core::records::{CampaignRecord, SearchTermRecord};
