//! Resource broker: cache-first orchestration over the fetch coordinator
//!
//! The broker is the single entry point the presentation layer talks to.
//! A request consults the cache under the current session epoch; a miss is
//! handed to the coordinator with the registered fetcher for the kind
//! bound to the key's scope. Explicitly constructed and injected at the
//! composition root so tests build isolated instances per case.

use std::sync::Arc;

use crate::cache::{CacheStats, CacheStore, ResourceKey, ResourceKind, Scope};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::fetch::{FetchCoordinator, FetchOutcome, FetchFuture, ResultHandle};
use crate::provider::{FetchRequest, FetcherRegistry, ResourceRecords};
use crate::session::{SessionContext, SessionSnapshot};

pub struct ResourceBroker {
    cache: Arc<CacheStore<ResourceRecords>>,
    coordinator: Arc<FetchCoordinator<ResourceRecords>>,
    session: Arc<SessionContext>,
    fetchers: FetcherRegistry,
    config: Arc<Config>,
}

impl ResourceBroker {
    pub fn new(config: Arc<Config>, session: Arc<SessionContext>, fetchers: FetcherRegistry) -> Self {
        let cache = Arc::new(CacheStore::new(config.cache.capacity));
        let coordinator = Arc::new(FetchCoordinator::new(
            Arc::clone(&cache),
            Arc::clone(&session),
        ));
        Self {
            cache,
            coordinator,
            session,
            fetchers,
            config,
        }
    }

    /// Resolve a resource request from cache or by (joining a) fetch.
    ///
    /// Invocations (`scope.payload` set) are never served from cache and
    /// never linger in it: an invoke is not idempotent, so its result is
    /// stored with a zero TTL purely to keep the write path uniform.
    /// Concurrent identical invokes still collapse onto one provider call.
    pub fn request(&self, kind: ResourceKind, scope: Scope) -> Result<ResultHandle<ResourceRecords>> {
        let snap = self.session.snapshot();
        let key = self.key_for(kind, &scope, &snap);
        let cacheable = scope.payload.is_none();

        if cacheable {
            if let Some(value) = self.cache.get(&key, snap.version) {
                return Ok(ResultHandle::ready(FetchOutcome::Resolved {
                    value,
                    from_cache: true,
                }));
            }
        }

        self.start_fetch(kind, key, scope, snap, cacheable)
    }

    /// Like `request`, but guarantees (barring failure) a fresh provider
    /// call by dropping any cached entry first. Backs the refresh key.
    pub fn force_refresh(
        &self,
        kind: ResourceKind,
        scope: Scope,
    ) -> Result<ResultHandle<ResourceRecords>> {
        let snap = self.session.snapshot();
        let key = self.key_for(kind, &scope, &snap);
        self.cache.invalidate(&key);
        let cacheable = scope.payload.is_none();

        self.start_fetch(kind, key, scope, snap, cacheable)
    }

    /// Advance to a new session epoch, cancelling all in-flight work from
    /// the old one. Lazy version checks in `get` already hide old entries;
    /// the sweep here just releases their memory early.
    pub fn switch_session(
        &self,
        account: impl Into<String>,
        region: impl Into<String>,
        profile: impl Into<String>,
    ) -> SessionSnapshot {
        let (old, new) = self.session.switch(account, region, profile);
        log::info!("session switch: epoch {} -> {}", old, new);
        self.coordinator.cancel_session(old);
        let swept = self.cache.retire_except(new);
        if swept > 0 {
            log::debug!("retired {swept} entries from old epochs");
        }
        self.session.snapshot()
    }

    pub fn session(&self) -> SessionSnapshot {
        self.session.snapshot()
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats(self.session.version())
    }

    /// Drop every cached entry. Returns the number removed.
    pub fn clear_cache(&self) -> usize {
        self.cache.clear()
    }

    pub fn in_flight_count(&self) -> usize {
        self.coordinator.in_flight_count()
    }

    fn key_for(&self, kind: ResourceKind, scope: &Scope, snap: &SessionSnapshot) -> ResourceKey {
        match &scope.name {
            Some(name) => ResourceKey::detail(kind, &snap.account, &snap.region, name),
            None => ResourceKey::list(kind, &snap.account, &snap.region),
        }
    }

    fn start_fetch(
        &self,
        kind: ResourceKind,
        key: ResourceKey,
        scope: Scope,
        snap: SessionSnapshot,
        cacheable: bool,
    ) -> Result<ResultHandle<ResourceRecords>> {
        let fetcher = self
            .fetchers
            .get(&kind)
            .cloned()
            .ok_or_else(|| Error::UnknownKind(kind.to_string()))?;

        let ttl = if cacheable {
            self.config.ttl_for(kind)
        } else {
            std::time::Duration::ZERO
        };
        let deadline = self.config.deadline_for(kind);

        let request = FetchRequest {
            account: snap.account,
            region: snap.region,
            scope,
        };
        let fetch = move |ctx| -> FetchFuture<ResourceRecords> {
            Box::pin(async move { fetcher.fetch(&ctx, &request).await })
        };

        Ok(self
            .coordinator
            .request(key, snap.version, ttl, deadline, fetch))
    }
}
