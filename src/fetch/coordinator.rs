//! In-flight fetch tracking with single-flight join semantics
//!
//! The coordinator owns the only other piece of shared mutable state in the
//! core besides the cache: the in-flight table. For any key there is at
//! most one live fetch; concurrent requests for the same key join it as
//! subscribers instead of starting duplicates. Creation and join are a
//! single check-then-act under the table lock.
//!
//! Fetch futures run on spawned tasks, never on the coordinator's
//! synchronization path. Each driver task races its future against a
//! per-fetch cancellation token and the kind's deadline; whatever happens,
//! it delivers exactly one terminal notification to every subscriber.

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use futures::future::BoxFuture;
use tokio::sync::oneshot;
use tokio_util::sync::CancellationToken;

use crate::cache::{CacheStore, ResourceKey};
use crate::error::FetchError;
use crate::fetch::handle::{FetchOutcome, ResultHandle};
use crate::session::SessionContext;
use std::sync::Arc;

/// Type-erased fetch future supplied by the provider layer
pub type FetchFuture<V> = BoxFuture<'static, Result<V, FetchError>>;

/// Deadline and cancellation signal handed to every fetch function.
///
/// The fetch function is expected to be cancellation-aware: the
/// coordinator's own bookkeeping is unconditional on the signal being
/// sent, but how quickly the underlying network call stops is up to the
/// provider client.
#[derive(Clone)]
pub struct FetchContext {
    pub deadline: Duration,
    pub cancel: CancellationToken,
}

struct InFlight<V> {
    fetch_id: u64,
    session_version: u64,
    started_at: Instant,
    cancel: CancellationToken,
    subscribers: Vec<oneshot::Sender<FetchOutcome<V>>>,
}

enum DriverEnd<V> {
    Success(V),
    Failed(FetchError),
    Cancelled,
}

/// De-duplicates concurrent fetches per key and owns their cancellation.
pub struct FetchCoordinator<V> {
    cache: Arc<CacheStore<V>>,
    session: Arc<SessionContext>,
    inflight: Mutex<HashMap<ResourceKey, InFlight<V>>>,
    next_fetch_id: AtomicU64,
}

impl<V: Clone + Send + 'static> FetchCoordinator<V> {
    pub fn new(cache: Arc<CacheStore<V>>, session: Arc<SessionContext>) -> Self {
        Self {
            cache,
            session,
            inflight: Mutex::new(HashMap::new()),
            next_fetch_id: AtomicU64::new(1),
        }
    }

    /// Join an existing in-flight fetch for `key` or start a new one.
    ///
    /// On success the fetched value is written to the cache with `ttl`
    /// before any subscriber is notified. A result arriving after the
    /// session has moved past `session_version` is discarded: subscribers
    /// get `Cancelled` and the cache is left untouched.
    pub fn request<F>(
        self: &Arc<Self>,
        key: ResourceKey,
        session_version: u64,
        ttl: Duration,
        deadline: Duration,
        fetch: F,
    ) -> ResultHandle<V>
    where
        F: FnOnce(FetchContext) -> FetchFuture<V> + Send + 'static,
    {
        let (tx, rx) = oneshot::channel();

        let mut table = self.inflight.lock().expect("inflight lock poisoned");

        if let Some(existing) = table.get_mut(&key) {
            if existing.session_version == session_version {
                log::debug!("fetch join: {} ({} waiting)", key, existing.subscribers.len());
                existing.subscribers.push(tx);
                return ResultHandle::pending(rx);
            }
            // A record from a retired epoch is still winding down. It can
            // never resolve usefully, so retire it here and start fresh;
            // joining across epochs is never allowed.
            let stale = table.remove(&key).expect("entry checked above");
            stale.cancel.cancel();
            log::debug!("fetch replace (stale epoch): {}", key);
            for sub in stale.subscribers {
                let _ = sub.send(FetchOutcome::Cancelled);
            }
        }

        let fetch_id = self.next_fetch_id.fetch_add(1, Ordering::SeqCst);
        let cancel = CancellationToken::new();
        table.insert(
            key.clone(),
            InFlight {
                fetch_id,
                session_version,
                started_at: Instant::now(),
                cancel: cancel.clone(),
                subscribers: vec![tx],
            },
        );
        drop(table);

        log::debug!("fetch start: {} (deadline {:?})", key, deadline);
        let coordinator = Arc::clone(self);
        tokio::spawn(async move {
            let ctx = FetchContext {
                deadline,
                cancel: cancel.child_token(),
            };
            let fut = fetch(ctx);

            let end = tokio::select! {
                _ = cancel.cancelled() => DriverEnd::Cancelled,
                res = tokio::time::timeout(deadline, fut) => match res {
                    Ok(Ok(value)) => DriverEnd::Success(value),
                    Ok(Err(err)) => DriverEnd::Failed(err),
                    Err(_) => DriverEnd::Failed(FetchError::Timeout(deadline)),
                },
            };

            coordinator.finish(&key, fetch_id, session_version, ttl, end);
        });

        ResultHandle::pending(rx)
    }

    /// Signal cancellation to every in-flight fetch issued under
    /// `old_version`. Record removal and subscriber notification happen in
    /// the owning driver tasks, unconditional on the fetch futures
    /// acknowledging the token.
    pub fn cancel_session(&self, old_version: u64) {
        let table = self.inflight.lock().expect("inflight lock poisoned");
        let mut cancelled = 0usize;
        for (key, entry) in table.iter() {
            if entry.session_version == old_version {
                log::debug!(
                    "fetch cancel: {} (ran {:?})",
                    key,
                    entry.started_at.elapsed()
                );
                entry.cancel.cancel();
                cancelled += 1;
            }
        }
        if cancelled > 0 {
            log::debug!("cancelled {} in-flight fetches for epoch {}", cancelled, old_version);
        }
    }

    /// Number of fetches currently in flight.
    pub fn in_flight_count(&self) -> usize {
        self.inflight.lock().expect("inflight lock poisoned").len()
    }

    /// Tear down this fetch's record and fan out the terminal notification.
    ///
    /// The generation check keeps a driver whose record was replaced (stale
    /// epoch) from touching its successor: such drivers have no subscribers
    /// left and simply drop their result.
    fn finish(&self, key: &ResourceKey, fetch_id: u64, session_version: u64, ttl: Duration, end: DriverEnd<V>) {
        let mut table = self.inflight.lock().expect("inflight lock poisoned");
        let owned = match table.get(key) {
            Some(entry) if entry.fetch_id == fetch_id => table.remove(key).expect("entry present"),
            _ => {
                log::debug!("fetch result discarded (record replaced): {}", key);
                return;
            }
        };
        drop(table);

        let outcome = match end {
            DriverEnd::Success(value) => {
                if self.session.version() == session_version {
                    // Cache write happens-before subscriber notification: a
                    // subscriber re-reading the cache sees this value.
                    self.cache.put(key.clone(), value.clone(), ttl, session_version);
                    log::debug!("fetch resolved: {}", key);
                    FetchOutcome::Resolved {
                        value,
                        from_cache: false,
                    }
                } else {
                    // Late result from a retired epoch; never cached.
                    log::debug!("fetch result discarded (stale epoch): {}", key);
                    FetchOutcome::Cancelled
                }
            }
            DriverEnd::Failed(err) => {
                log::debug!("fetch failed: {}: {}", key, err);
                FetchOutcome::Failed(err)
            }
            DriverEnd::Cancelled => {
                log::debug!("fetch cancelled: {}", key);
                FetchOutcome::Cancelled
            }
        };

        // Fan-out delivery; join order is not preserved. A receiver that
        // went away is fine to skip.
        let mut subscribers = owned.subscribers.into_iter();
        if let Some(last) = subscribers.next_back() {
            for sub in subscribers {
                let _ = sub.send(outcome.clone());
            }
            let _ = last.send(outcome);
        }
    }
}
