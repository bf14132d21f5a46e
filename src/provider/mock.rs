//! Mock provider for testing
//!
//! Stands in for the HTTP client in broker and coordinator tests: canned
//! records, configurable latency and failure, and a call counter so tests
//! can assert exactly how many fetches actually ran.

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use crate::error::FetchError;
use crate::fetch::FetchContext;
use crate::provider::models::ResourceRecords;
use crate::provider::{FetchRequest, ResourceFetcher};

pub struct MockProvider {
    records: Mutex<ResourceRecords>,
    error: Mutex<Option<FetchError>>,
    latency: Mutex<Duration>,
    calls: AtomicUsize,
}

impl MockProvider {
    pub fn returning(records: ResourceRecords) -> Self {
        Self {
            records: Mutex::new(records),
            error: Mutex::new(None),
            latency: Mutex::new(Duration::ZERO),
            calls: AtomicUsize::new(0),
        }
    }

    /// Every fetch sleeps this long before resolving.
    pub fn with_latency(self, latency: Duration) -> Self {
        *self.latency.lock().unwrap() = latency;
        self
    }

    /// Every fetch fails with this error instead of resolving.
    pub fn with_error(self, error: FetchError) -> Self {
        *self.error.lock().unwrap() = Some(error);
        self
    }

    /// Swap the canned records mid-test.
    pub fn set_records(&self, records: ResourceRecords) {
        *self.records.lock().unwrap() = records;
    }

    /// Number of times `fetch` was invoked.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ResourceFetcher for MockProvider {
    async fn fetch(
        &self,
        _ctx: &FetchContext,
        _request: &FetchRequest,
    ) -> Result<ResourceRecords, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        let latency = *self.latency.lock().unwrap();
        if latency > Duration::ZERO {
            tokio::time::sleep(latency).await;
        }

        if let Some(err) = self.error.lock().unwrap().clone() {
            return Err(err);
        }
        Ok(self.records.lock().unwrap().clone())
    }
}
