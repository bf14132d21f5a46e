//! Provider-client layer
//!
//! Thin wrappers around the remote provider API. Each resource kind gets a
//! `ResourceFetcher` implementation; the broker looks them up by kind and
//! never inspects the typed records they return. Fetchers perform the
//! actual network calls, honor the supplied deadline/cancellation context,
//! and never cache.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;

pub mod http;
pub mod mask;
pub mod models;

#[cfg(test)]
pub mod fixtures;
#[cfg(test)]
pub mod mock;

pub use http::HttpProviderClient;
pub use models::{
    BucketSummary, FunctionSummary, InvocationOutcome, ResourceRecords, ServiceSummary,
};

use crate::cache::{ResourceKind, Scope};
use crate::error::FetchError;
use crate::fetch::FetchContext;

/// Everything a fetcher needs beyond its own kind: the session scope the
/// key was built from, plus the request-narrowing parameters.
#[derive(Debug, Clone)]
pub struct FetchRequest {
    pub account: String,
    pub region: String,
    pub scope: Scope,
}

/// Capability interface implemented once per resource kind.
#[async_trait]
pub trait ResourceFetcher: Send + Sync {
    async fn fetch(
        &self,
        ctx: &FetchContext,
        request: &FetchRequest,
    ) -> Result<ResourceRecords, FetchError>;
}

/// Mapping from kind tag to fetcher implementation
pub type FetcherRegistry = HashMap<ResourceKind, Arc<dyn ResourceFetcher>>;

/// Build the standard registry over one HTTP provider client.
pub fn registry(client: Arc<HttpProviderClient>) -> FetcherRegistry {
    let mut map: FetcherRegistry = HashMap::new();
    for kind in ResourceKind::ALL {
        let fetcher: Arc<dyn ResourceFetcher> = match kind {
            ResourceKind::Functions => {
                Arc::new(http::FunctionsFetcher::new(Arc::clone(&client)))
            }
            ResourceKind::Buckets => Arc::new(http::BucketsFetcher::new(Arc::clone(&client))),
            ResourceKind::Containers => {
                Arc::new(http::ServicesFetcher::new(Arc::clone(&client)))
            }
        };
        map.insert(kind, fetcher);
    }
    map
}
