//! GAQL query templates for the fixed-shape reporting tools

use chrono::{Duration, NaiveDate};

use crate::error::{Error, Result};

/// Search term results are capped regardless of the requested window
pub const SEARCH_TERMS_LIMIT: u32 = 50;

/// Enabled campaigns, most expensive first
pub fn list_campaigns_query(limit: u32) -> String {
    format!(
        "SELECT \
           campaign.id, \
           campaign.name, \
           campaign.status, \
           metrics.impressions, \
           metrics.clicks, \
           metrics.cost_micros, \
           metrics.ctr, \
           metrics.average_cpc \
         FROM campaign \
         WHERE campaign.status = 'ENABLED' \
         ORDER BY metrics.cost_micros DESC \
         LIMIT {}",
        limit
    )
}

/// Date range covering the last `days` full days, ending yesterday.
///
/// Matches the semantics of GAQL's `LAST_N_DAYS` presets but works for any
/// `days`. Fails when the start of the window falls before the earliest
/// representable date.
pub fn last_days_window(today: NaiveDate, days: u32) -> Result<(NaiveDate, NaiveDate)> {
    let too_large = || Error::InvalidParameter("days is too large".to_string());
    let to = today
        .checked_sub_signed(Duration::days(1))
        .ok_or_else(too_large)?;
    let from = today
        .checked_sub_signed(Duration::days(i64::from(days)))
        .ok_or_else(too_large)?;
    Ok((from, to))
}

/// Search terms with spend in the date range, most expensive first
pub fn search_terms_query(from: NaiveDate, to: NaiveDate) -> String {
    format!(
        "SELECT \
           search_term_view.search_term, \
           metrics.clicks, \
           metrics.cost_micros, \
           metrics.conversions, \
           metrics.ctr, \
           campaign.name, \
           ad_group.name \
         FROM search_term_view \
         WHERE segments.date BETWEEN '{}' AND '{}' \
         AND metrics.cost_micros > 0 \
         ORDER BY metrics.cost_micros DESC \
         LIMIT {}",
        from.format("%Y-%m-%d"),
        to.format("%Y-%m-%d"),
        SEARCH_TERMS_LIMIT
    )
}
