//! Flattening of Google Ads result rows into tool records
//!
//! Rows arrive in the REST API's JSON encoding: camelCase field names, int64
//! values as strings, and zero-valued fields omitted. Fixed-shape records
//! restore protobuf defaults for anything missing; raw records keep whatever
//! the API sent, renamed to the proto (snake_case) field names.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use tracing::warn;

use crate::error::Result;
use crate::money::format_money;

/// Field holding the string rendering of a row that could not be converted
pub const RAW_FALLBACK_FIELD: &str = "_raw";

/// Enum name protobuf uses for an unset enum value
const UNSPECIFIED: &str = "UNSPECIFIED";

// =============================================================================
// Output records
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CampaignRecord {
    pub id: i64,
    pub name: String,
    pub status: String,
    pub metrics: CampaignMetrics,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CampaignMetrics {
    pub impressions: i64,
    pub clicks: i64,
    pub cost_micros: i64,
    pub cost_formatted: String,
    pub ctr: f64,
    pub average_cpc_micros: f64,
    pub average_cpc_formatted: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchTermRecord {
    pub search_term: String,
    pub campaign: String,
    pub ad_group: String,
    pub metrics: SearchTermMetrics,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchTermMetrics {
    pub clicks: i64,
    pub cost_micros: i64,
    pub cost_formatted: String,
    pub conversions: f64,
    pub ctr: f64,
}

// =============================================================================
// Row shapes (REST JSON encoding)
// =============================================================================

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct CampaignRow {
    campaign: CampaignFields,
    metrics: MetricFields,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct SearchTermRow {
    search_term_view: SearchTermViewFields,
    campaign: CampaignFields,
    ad_group: AdGroupFields,
    metrics: MetricFields,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct CampaignFields {
    #[serde(deserialize_with = "int64")]
    id: i64,
    name: String,
    status: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct AdGroupFields {
    name: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct SearchTermViewFields {
    search_term: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct MetricFields {
    #[serde(deserialize_with = "int64")]
    impressions: i64,
    #[serde(deserialize_with = "int64")]
    clicks: i64,
    #[serde(deserialize_with = "int64")]
    cost_micros: i64,
    ctr: f64,
    average_cpc: f64,
    conversions: f64,
}

/// int64 fields are JSON strings in the REST encoding; accept numbers too
fn int64<'de, D>(deserializer: D) -> std::result::Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Int64 {
        Number(i64),
        Text(String),
    }

    match Int64::deserialize(deserializer)? {
        Int64::Number(n) => Ok(n),
        Int64::Text(s) => s.parse().map_err(serde::de::Error::custom),
    }
}

// =============================================================================
// Conversions
// =============================================================================

/// Map a `campaign` row into a [`CampaignRecord`]
pub fn campaign_record(row: &Value) -> Result<CampaignRecord> {
    let row = CampaignRow::deserialize(row)?;
    let metrics = row.metrics;
    Ok(CampaignRecord {
        id: row.campaign.id,
        name: row.campaign.name,
        status: row
            .campaign
            .status
            .unwrap_or_else(|| UNSPECIFIED.to_string()),
        metrics: CampaignMetrics {
            impressions: metrics.impressions,
            clicks: metrics.clicks,
            cost_micros: metrics.cost_micros,
            cost_formatted: format_money(Some(metrics.cost_micros as f64)),
            ctr: metrics.ctr,
            average_cpc_micros: metrics.average_cpc,
            average_cpc_formatted: format_money(Some(metrics.average_cpc)),
        },
    })
}

/// Map a `search_term_view` row into a [`SearchTermRecord`]
pub fn search_term_record(row: &Value) -> Result<SearchTermRecord> {
    let row = SearchTermRow::deserialize(row)?;
    let metrics = row.metrics;
    Ok(SearchTermRecord {
        search_term: row.search_term_view.search_term,
        campaign: row.campaign.name,
        ad_group: row.ad_group.name,
        metrics: SearchTermMetrics {
            clicks: metrics.clicks,
            cost_micros: metrics.cost_micros,
            cost_formatted: format_money(Some(metrics.cost_micros as f64)),
            conversions: metrics.conversions,
            ctr: metrics.ctr,
        },
    })
}

/// Convert an arbitrary row into a JSON object with proto field names.
///
/// Never fails: a row that is not a JSON object becomes
/// `{"_raw": "<row as text>"}`.
pub fn raw_record(row: &Value) -> Value {
    match proto_fields(row) {
        Some(fields) => Value::Object(fields),
        None => {
            warn!("GAQL row could not be converted, returning raw text");
            let mut fallback = Map::new();
            fallback.insert(RAW_FALLBACK_FIELD.to_string(), Value::String(row.to_string()));
            Value::Object(fallback)
        }
    }
}

fn proto_fields(row: &Value) -> Option<Map<String, Value>> {
    match row {
        Value::Object(fields) => Some(rename_fields(fields)),
        _ => None,
    }
}

fn rename_fields(fields: &Map<String, Value>) -> Map<String, Value> {
    fields
        .iter()
        .map(|(key, value)| (snake_case(key), rename_nested(value)))
        .collect()
}

fn rename_nested(value: &Value) -> Value {
    match value {
        Value::Object(fields) => Value::Object(rename_fields(fields)),
        Value::Array(items) => Value::Array(items.iter().map(rename_nested).collect()),
        other => other.clone(),
    }
}

/// `costMicros` -> `cost_micros`
fn snake_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    for c in name.chars() {
        if c.is_ascii_uppercase() {
            if !out.is_empty() {
                out.push('_');
            }
            out.push(c.to_ascii_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}
