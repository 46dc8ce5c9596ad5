//! Process-wide reporting backend handle
//!
//! The backend is built on first use and then shared for the rest of the
//! process. Concurrent first calls wait on the same initialisation, so the
//! factory runs at most once per successful construction. A failed
//! construction is not remembered; the next call tries again.
//!
//! There is no invalidation: rotating credentials requires a restart.

use std::sync::Arc;

use tokio::sync::OnceCell;
use tracing::info;

use crate::error::Result;

use super::{GoogleAdsClient, ReportingBackend};

type BackendFactory = dyn Fn() -> Result<Arc<dyn ReportingBackend>> + Send + Sync;

/// Lazily constructed, never refreshed reporting backend
pub struct ClientHandle {
    cell: OnceCell<Arc<dyn ReportingBackend>>,
    factory: Box<BackendFactory>,
}

impl ClientHandle {
    /// Handle that builds the backend with the given factory on first use
    pub fn new<F>(factory: F) -> Self
    where
        F: Fn() -> Result<Arc<dyn ReportingBackend>> + Send + Sync + 'static,
    {
        Self {
            cell: OnceCell::new(),
            factory: Box::new(factory),
        }
    }

    /// Handle that builds a [`GoogleAdsClient`] from `GOOGLE_ADS_*` environment
    /// variables on first use
    pub fn from_env() -> Self {
        Self::new(|| {
            let client = GoogleAdsClient::from_env()?;
            info!(
                "Google Ads client initialised (API {}, {})",
                client.config().api_version,
                client.config().endpoint
            );
            Ok(Arc::new(client) as Arc<dyn ReportingBackend>)
        })
    }

    /// Handle around an already constructed backend
    pub fn with_backend(backend: Arc<dyn ReportingBackend>) -> Self {
        Self {
            cell: OnceCell::new_with(Some(backend)),
            factory: Box::new(unreachable_factory),
        }
    }

    /// Get the backend, constructing it if this is the first call
    pub async fn get(&self) -> Result<Arc<dyn ReportingBackend>> {
        let backend = self
            .cell
            .get_or_try_init(|| async { (self.factory)() })
            .await?;
        Ok(Arc::clone(backend))
    }

    /// Whether the backend has been constructed yet
    pub fn is_initialized(&self) -> bool {
        self.cell.initialized()
    }
}

fn unreachable_factory() -> Result<Arc<dyn ReportingBackend>> {
    Err(crate::error::Error::Config(
        "backend handle was created pre-initialised".to_string(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ads::MockBackend;
    use crate::error::Error;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn counting_handle(calls: Arc<AtomicUsize>) -> ClientHandle {
        ClientHandle::new(move || {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok(Arc::new(MockBackend::new()) as Arc<dyn ReportingBackend>)
        })
    }

    #[tokio::test]
    async fn test_factory_runs_once() {
        let calls = Arc::new(AtomicUsize::new(0));
        let handle = counting_handle(calls.clone());
        assert!(!handle.is_initialized());

        let first = handle.get().await.unwrap();
        let second = handle.get().await.unwrap();

        assert!(handle.is_initialized());
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_concurrent_first_calls_build_once() {
        let calls = Arc::new(AtomicUsize::new(0));
        let handle = Arc::new(counting_handle(calls.clone()));

        let tasks: Vec<_> = (0..8)
            .map(|_| {
                let handle = handle.clone();
                tokio::spawn(async move { handle.get().await.map(|_| ()) })
            })
            .collect();
        for task in tasks {
            task.await.unwrap().unwrap();
        }

        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_failed_construction_is_retried() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let handle = ClientHandle::new(move || {
            if counter.fetch_add(1, Ordering::SeqCst) == 0 {
                Err(Error::Config("Missing required environment variable X".into()))
            } else {
                Ok(Arc::new(MockBackend::new()) as Arc<dyn ReportingBackend>)
            }
        });

        assert!(matches!(handle.get().await, Err(Error::Config(_))));
        assert!(!handle.is_initialized());
        assert!(handle.get().await.is_ok());
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_with_backend_is_ready() {
        let handle = ClientHandle::with_backend(Arc::new(MockBackend::new()));
        assert!(handle.is_initialized());
        assert!(handle.get().await.is_ok());
    }
}
