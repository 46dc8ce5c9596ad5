//! Test utilities for adscope-core
//!
//! This module provides a mock Google Ads server (OAuth2 token endpoint plus
//! `googleAds:searchStream`) for integration tests of the REST client.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
    Form, Json, Router,
};
use serde_json::{json, Value};
use tokio::sync::oneshot;

use crate::ads::{AdsConfig, SearchStreamBatch};

/// Access token handed out by the mock token endpoint
pub const MOCK_ACCESS_TOKEN: &str = "mock-access-token";

/// Refresh token the mock token endpoint rejects
pub const REJECTED_REFRESH_TOKEN: &str = "revoked";

/// A searchStream request as seen by the mock server
#[derive(Debug, Clone)]
pub struct SearchRequest {
    pub api_version: String,
    pub customer_id: String,
    pub query: String,
    pub developer_token: Option<String>,
    pub login_customer_id: Option<String>,
}

#[derive(Default)]
struct MockState {
    batches: Mutex<Vec<SearchStreamBatch>>,
    failure: Mutex<Option<(StatusCode, Value)>>,
    searches: Mutex<Vec<SearchRequest>>,
    token_requests: AtomicUsize,
}

/// Mock Google Ads server for testing
pub struct MockGoogleAdsServer {
    addr: SocketAddr,
    state: Arc<MockState>,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl MockGoogleAdsServer {
    /// Start the mock server on an available port
    pub async fn start() -> Self {
        let state = Arc::new(MockState::default());
        let app = Router::new()
            .route("/token", post(handle_token))
            .route("/*path", post(handle_api))
            .with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let (shutdown_tx, shutdown_rx) = oneshot::channel();

        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    shutdown_rx.await.ok();
                })
                .await
                .unwrap();
        });

        Self {
            addr,
            state,
            shutdown_tx: Some(shutdown_tx),
        }
    }

    /// Get the base URL for this mock server
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Client config pointing at this server with valid mock credentials
    pub fn config(&self) -> AdsConfig {
        AdsConfig::new("mock-dev-token", "mock-client", "mock-secret", "mock-refresh")
            .with_base_url(&self.url())
    }

    /// Batches returned by every subsequent searchStream call
    pub fn set_batches(&self, batches: Vec<SearchStreamBatch>) {
        *self.state.batches.lock().unwrap() = batches;
    }

    /// Make every subsequent searchStream call fail with this status and body
    pub fn fail_with(&self, status: StatusCode, body: Value) {
        *self.state.failure.lock().unwrap() = Some((status, body));
    }

    /// searchStream requests received so far
    pub fn searches(&self) -> Vec<SearchRequest> {
        self.state.searches.lock().unwrap().clone()
    }

    /// Number of token refreshes received so far
    pub fn token_requests(&self) -> usize {
        self.state.token_requests.load(Ordering::SeqCst)
    }

    /// Stop the mock server
    pub fn stop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

impl Drop for MockGoogleAdsServer {
    fn drop(&mut self) {
        self.stop();
    }
}

/// OAuth2 token endpoint (refresh-token grant only)
async fn handle_token(
    State(state): State<Arc<MockState>>,
    Form(form): Form<HashMap<String, String>>,
) -> Response {
    state.token_requests.fetch_add(1, Ordering::SeqCst);

    let grant_ok = form.get("grant_type").map(String::as_str) == Some("refresh_token");
    let refresh = form.get("refresh_token").map(String::as_str).unwrap_or("");
    if !grant_ok || refresh.is_empty() || refresh == REJECTED_REFRESH_TOKEN {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "invalid_grant",
                "error_description": "Token has been expired or revoked."
            })),
        )
            .into_response();
    }

    Json(json!({
        "access_token": MOCK_ACCESS_TOKEN,
        "expires_in": 3599,
        "token_type": "Bearer"
    }))
    .into_response()
}

/// `/{version}/customers/{id}/googleAds:searchStream`
async fn handle_api(
    State(state): State<Arc<MockState>>,
    Path(path): Path<String>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    let segments: Vec<&str> = path.trim_start_matches('/').split('/').collect();
    let (api_version, customer_id) = match segments.as_slice() {
        [version, "customers", id, "googleAds:searchStream"] => (*version, *id),
        _ => return error_response(StatusCode::NOT_FOUND, "Unknown endpoint"),
    };

    let header = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    };

    let expected_auth = format!("Bearer {}", MOCK_ACCESS_TOKEN);
    if header("authorization").as_deref() != Some(expected_auth.as_str()) {
        return error_response(
            StatusCode::UNAUTHORIZED,
            "Request had invalid authentication credentials.",
        );
    }

    state.searches.lock().unwrap().push(SearchRequest {
        api_version: api_version.to_string(),
        customer_id: customer_id.to_string(),
        query: body
            .get("query")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
        developer_token: header("developer-token"),
        login_customer_id: header("login-customer-id"),
    });

    if let Some((status, body)) = state.failure.lock().unwrap().clone() {
        return (status, Json(body)).into_response();
    }

    let batches = state.batches.lock().unwrap().clone();
    Json(batches).into_response()
}

fn error_response(status: StatusCode, message: &str) -> Response {
    (
        status,
        Json(json!({
            "error": {"code": status.as_u16(), "message": message}
        })),
    )
        .into_response()
}
