//! Mock backend for testing
//!
//! Returns canned batches for every query and records each call, so tests
//! can assert on the submitted GAQL or on the absence of any call.

use std::sync::Mutex;

use async_trait::async_trait;

use crate::accounts::CustomerId;
use crate::error::{Error, Result};

use super::{ReportingBackend, SearchStreamBatch};

/// A recorded `search_stream` call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedQuery {
    pub customer_id: String,
    pub query: String,
}

/// In-memory reporting backend
#[derive(Default)]
pub struct MockBackend {
    batches: Vec<SearchStreamBatch>,
    failure: Option<(u16, String)>,
    calls: Mutex<Vec<RecordedQuery>>,
}

impl MockBackend {
    /// Backend returning no rows
    pub fn new() -> Self {
        Self::default()
    }

    /// Backend returning the given batches for every query
    pub fn with_batches(batches: Vec<SearchStreamBatch>) -> Self {
        Self {
            batches,
            ..Default::default()
        }
    }

    /// Backend returning a single batch of rows for every query
    pub fn with_rows(rows: Vec<serde_json::Value>) -> Self {
        Self::with_batches(vec![SearchStreamBatch::new(rows)])
    }

    /// Backend failing every query with an API error
    pub fn failing(status: u16, message: impl Into<String>) -> Self {
        Self {
            failure: Some((status, message.into())),
            ..Default::default()
        }
    }

    /// Every call made so far, oldest first
    pub fn calls(&self) -> Vec<RecordedQuery> {
        self.calls
            .lock()
            .map(|calls| calls.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl ReportingBackend for MockBackend {
    async fn search_stream(
        &self,
        customer_id: &CustomerId,
        query: &str,
    ) -> Result<Vec<SearchStreamBatch>> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(RecordedQuery {
                customer_id: customer_id.to_string(),
                query: query.to_string(),
            });
        }

        match &self.failure {
            Some((status, message)) => Err(Error::Api {
                status: *status,
                message: message.clone(),
            }),
            None => Ok(self.batches.clone()),
        }
    }
}
