//! Google Ads REST client
//!
//! Talks to two endpoints:
//! - the OAuth2 token endpoint, exchanging the refresh token for a short-lived
//!   access token (cached until shortly before it expires)
//! - `customers/{id}/googleAds:searchStream`, which returns every result batch
//!   as one JSON array

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::debug;

use crate::accounts::CustomerId;
use crate::error::{Error, Result};

use super::{AdsConfig, ReportingBackend, SearchStreamBatch};

/// Refresh the access token this long before Google says it expires
const TOKEN_EXPIRY_MARGIN_SECS: i64 = 60;

/// Google Ads API client authenticated with an OAuth2 refresh token
pub struct GoogleAdsClient {
    http_client: Client,
    config: AdsConfig,
    token: Mutex<Option<AccessToken>>,
}

#[derive(Debug, Clone)]
struct AccessToken {
    value: String,
    expires_at: DateTime<Utc>,
}

impl AccessToken {
    fn is_fresh(&self, now: DateTime<Utc>) -> bool {
        now + Duration::seconds(TOKEN_EXPIRY_MARGIN_SECS) < self.expires_at
    }
}

/// Refresh-token grant request
#[derive(Debug, Serialize)]
struct TokenRequest<'a> {
    grant_type: &'static str,
    client_id: &'a str,
    client_secret: &'a str,
    refresh_token: &'a str,
}

/// Token endpoint response
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default = "default_expires_in")]
    expires_in: i64,
}

fn default_expires_in() -> i64 {
    3600
}

/// Token endpoint error body
#[derive(Debug, Deserialize)]
struct TokenErrorResponse {
    error: String,
    #[serde(default)]
    error_description: Option<String>,
}

#[derive(Debug, Serialize)]
struct SearchStreamRequest<'a> {
    query: &'a str,
}

/// Google API error envelope (`{"error": {...}}`)
#[derive(Debug, Deserialize)]
struct ApiErrorEnvelope {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    #[serde(default)]
    message: String,
    #[serde(default)]
    details: Vec<serde_json::Value>,
}

/// searchStream reports errors either as an envelope or as an array of them
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ApiErrorPayload {
    Single(ApiErrorEnvelope),
    Stream(Vec<ApiErrorEnvelope>),
}

impl GoogleAdsClient {
    /// Create a client; no network traffic happens until the first query
    pub fn new(config: AdsConfig) -> Self {
        Self {
            http_client: Client::new(),
            config,
            token: Mutex::new(None),
        }
    }

    /// Create a client from `GOOGLE_ADS_*` environment variables
    pub fn from_env() -> Result<Self> {
        Ok(Self::new(AdsConfig::from_env()?))
    }

    pub fn config(&self) -> &AdsConfig {
        &self.config
    }

    /// Return a cached access token or fetch a new one
    async fn access_token(&self) -> Result<String> {
        let mut cached = self.token.lock().await;
        let now = Utc::now();
        if let Some(token) = cached.as_ref().filter(|t| t.is_fresh(now)) {
            return Ok(token.value.clone());
        }

        debug!("Requesting Google Ads access token from {}", self.config.token_url);
        let request = TokenRequest {
            grant_type: "refresh_token",
            client_id: &self.config.client_id,
            client_secret: &self.config.client_secret,
            refresh_token: &self.config.refresh_token,
        };

        let response = self
            .http_client
            .post(&self.config.token_url)
            .form(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = match serde_json::from_str::<TokenErrorResponse>(&body) {
                Ok(e) => match e.error_description {
                    Some(description) => format!("{}: {}", e.error, description),
                    None => e.error,
                },
                Err(_) => body,
            };
            return Err(Error::Api {
                status: status.as_u16(),
                message: format!("OAuth token refresh failed: {}", message),
            });
        }

        let token: TokenResponse = response.json().await?;
        let access = AccessToken {
            value: token.access_token,
            expires_at: now + Duration::seconds(token.expires_in),
        };
        let value = access.value.clone();
        *cached = Some(access);
        Ok(value)
    }

    fn search_stream_url(&self, customer_id: &CustomerId) -> String {
        format!(
            "{}/{}/customers/{}/googleAds:searchStream",
            self.config.endpoint, self.config.api_version, customer_id
        )
    }
}

#[async_trait]
impl ReportingBackend for GoogleAdsClient {
    async fn search_stream(
        &self,
        customer_id: &CustomerId,
        query: &str,
    ) -> Result<Vec<SearchStreamBatch>> {
        let token = self.access_token().await?;
        debug!("searchStream for customer {}: {}", customer_id, query.trim());

        let mut request = self
            .http_client
            .post(self.search_stream_url(customer_id))
            .bearer_auth(token)
            .header("developer-token", &self.config.developer_token)
            .json(&SearchStreamRequest { query });
        if let Some(login_customer_id) = &self.config.login_customer_id {
            request = request.header("login-customer-id", login_customer_id);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Api {
                status: status.as_u16(),
                message: api_error_message(&body),
            });
        }

        let batches: Vec<SearchStreamBatch> = response.json().await?;
        debug!(
            "searchStream returned {} batch(es), {} row(s)",
            batches.len(),
            batches.iter().map(|b| b.results.len()).sum::<usize>()
        );
        Ok(batches)
    }
}

/// Extract a readable message from a Google API error body
fn api_error_message(body: &str) -> String {
    let envelope = match serde_json::from_str::<ApiErrorPayload>(body) {
        Ok(ApiErrorPayload::Single(envelope)) => Some(envelope),
        Ok(ApiErrorPayload::Stream(envelopes)) => envelopes.into_iter().next(),
        Err(_) => None,
    };

    match envelope {
        Some(envelope) => {
            // Google Ads puts the specific failure in details[].errors[].message
            let detail = envelope
                .error
                .details
                .iter()
                .filter_map(|d| d.get("errors")?.as_array()?.first()?.get("message")?.as_str())
                .next();
            match detail {
                Some(detail) if !envelope.error.message.is_empty() => {
                    format!("{} ({})", envelope.error.message, detail)
                }
                Some(detail) => detail.to_string(),
                None => envelope.error.message,
            }
        }
        None if body.trim().is_empty() => "empty response body".to_string(),
        None => body.trim().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_message_single_envelope() {
        let body = r#"{"error": {"code": 401, "message": "Request had invalid authentication credentials.", "status": "UNAUTHENTICATED"}}"#;
        assert_eq!(
            api_error_message(body),
            "Request had invalid authentication credentials."
        );
    }

    #[test]
    fn test_api_error_message_stream_with_details() {
        let body = r#"[{"error": {
            "code": 400,
            "message": "Request contains an invalid argument.",
            "details": [{
                "@type": "type.googleapis.com/google.ads.googleads.v21.errors.GoogleAdsFailure",
                "errors": [{"message": "Unrecognized field in the query: 'campaign.nme'."}]
            }]
        }}]"#;
        assert_eq!(
            api_error_message(body),
            "Request contains an invalid argument. (Unrecognized field in the query: 'campaign.nme'.)"
        );
    }

    #[test]
    fn test_api_error_message_plain_text() {
        assert_eq!(api_error_message("Bad Gateway\n"), "Bad Gateway");
        assert_eq!(api_error_message(""), "empty response body");
    }

    #[test]
    fn test_token_freshness_margin() {
        let now = Utc::now();
        let fresh = AccessToken {
            value: "a".into(),
            expires_at: now + Duration::seconds(600),
        };
        let stale = AccessToken {
            value: "b".into(),
            expires_at: now + Duration::seconds(30),
        };
        assert!(fresh.is_fresh(now));
        assert!(!stale.is_fresh(now));
    }

    fn customer(id: &str) -> CustomerId {
        crate::accounts::AccountResolver::new("/nonexistent/accounts.json")
            .resolve(id)
            .unwrap()
    }

    #[tokio::test]
    async fn test_search_stream_against_mock_server() {
        use crate::test_utils::MockGoogleAdsServer;
        use serde_json::json;

        let server = MockGoogleAdsServer::start().await;
        server.set_batches(vec![
            SearchStreamBatch::new(vec![json!({"campaign": {"id": "1"}})]),
            SearchStreamBatch::new(vec![json!({"campaign": {"id": "2"}})]),
        ]);

        let mut config = server.config();
        config.login_customer_id = Some("999".to_string());
        let client = GoogleAdsClient::new(config);

        let batches = client
            .search_stream(&customer("123-456-7890"), "SELECT campaign.id FROM campaign")
            .await
            .unwrap();
        assert_eq!(batches.len(), 2);
        assert_eq!(batches[1].results[0]["campaign"]["id"], "2");

        let searches = server.searches();
        assert_eq!(searches.len(), 1);
        assert_eq!(searches[0].api_version, "v21");
        assert_eq!(searches[0].customer_id, "1234567890");
        assert_eq!(searches[0].query, "SELECT campaign.id FROM campaign");
        assert_eq!(searches[0].developer_token.as_deref(), Some("mock-dev-token"));
        assert_eq!(searches[0].login_customer_id.as_deref(), Some("999"));
    }

    #[tokio::test]
    async fn test_access_token_is_cached() {
        use crate::test_utils::MockGoogleAdsServer;

        let server = MockGoogleAdsServer::start().await;
        let client = GoogleAdsClient::new(server.config());

        for _ in 0..3 {
            client
                .search_stream(&customer("1"), "SELECT customer.id FROM customer")
                .await
                .unwrap();
        }

        assert_eq!(server.token_requests(), 1);
        assert_eq!(server.searches().len(), 3);
    }

    #[tokio::test]
    async fn test_rejected_refresh_token() {
        use crate::test_utils::{MockGoogleAdsServer, REJECTED_REFRESH_TOKEN};

        let server = MockGoogleAdsServer::start().await;
        let mut config = server.config();
        config.refresh_token = REJECTED_REFRESH_TOKEN.to_string();
        let client = GoogleAdsClient::new(config);

        let err = client
            .search_stream(&customer("1"), "SELECT customer.id FROM customer")
            .await
            .unwrap_err();
        match err {
            Error::Api { status, message } => {
                assert_eq!(status, 400);
                assert!(message.contains("invalid_grant"));
            }
            other => panic!("unexpected error: {}", other),
        }
        assert!(server.searches().is_empty());
    }

    #[tokio::test]
    async fn test_api_error_is_reported() {
        use crate::test_utils::MockGoogleAdsServer;
        use axum::http::StatusCode;
        use serde_json::json;

        let server = MockGoogleAdsServer::start().await;
        server.fail_with(
            StatusCode::BAD_REQUEST,
            json!([{"error": {"code": 400, "message": "Request contains an invalid argument."}}]),
        );
        let client = GoogleAdsClient::new(server.config());

        let err = client
            .search_stream(&customer("1"), "SELEC campaign.id")
            .await
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Google Ads API error (400): Request contains an invalid argument."
        );
    }

    #[test]
    fn test_search_stream_url() {
        let config = AdsConfig::new("d", "c", "s", "r").with_base_url("http://127.0.0.1:9/");
        let client = GoogleAdsClient::new(config);
        assert_eq!(
            client.search_stream_url(&customer("123-456")),
            "http://127.0.0.1:9/v21/customers/123456/googleAds:searchStream"
        );
    }
}
