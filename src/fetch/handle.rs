//! Result handles delivered to fetch subscribers

use tokio::sync::oneshot;

use crate::error::FetchError;

/// Terminal notification for one subscriber of one fetch.
///
/// Every subscriber receives exactly one of these; a fetch never leaves a
/// waiter permanently unresolved, including on cancellation.
#[derive(Debug, Clone)]
pub enum FetchOutcome<V> {
    /// The fetch (or a cache hit) produced a value.
    Resolved { value: V, from_cache: bool },
    /// The underlying fetch failed; nothing was cached.
    Failed(FetchError),
    /// The session switched mid-fetch. Distinct from failure.
    Cancelled,
}

impl<V> FetchOutcome<V> {
    pub fn is_resolved(&self) -> bool {
        matches!(self, FetchOutcome::Resolved { .. })
    }
}

enum HandleState<V> {
    Ready(FetchOutcome<V>),
    Pending(oneshot::Receiver<FetchOutcome<V>>),
}

/// Awaitable subscription to a fetch result.
///
/// A cache hit produces an already-resolved handle; a miss produces one
/// backed by the in-flight fetch it joined or started. Awaiting the handle
/// is the only suspension point a caller ever sees.
pub struct ResultHandle<V> {
    state: HandleState<V>,
}

impl<V> ResultHandle<V> {
    /// Handle that resolves immediately (cache hit path).
    pub fn ready(outcome: FetchOutcome<V>) -> Self {
        Self {
            state: HandleState::Ready(outcome),
        }
    }

    pub(crate) fn pending(rx: oneshot::Receiver<FetchOutcome<V>>) -> Self {
        Self {
            state: HandleState::Pending(rx),
        }
    }

    /// Whether the handle resolved without suspending (cache hit).
    pub fn is_ready(&self) -> bool {
        matches!(self.state, HandleState::Ready(_))
    }

    /// Wait for the terminal notification.
    pub async fn resolve(self) -> FetchOutcome<V> {
        match self.state {
            HandleState::Ready(outcome) => outcome,
            // A dropped sender means the fetch record was torn down without
            // a send, which only happens on shutdown; treat as cancelled
            // rather than leaving the waiter hanging.
            HandleState::Pending(rx) => rx.await.unwrap_or(FetchOutcome::Cancelled),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_ready_handle_resolves_immediately() {
        let handle = ResultHandle::ready(FetchOutcome::Resolved {
            value: 7u32,
            from_cache: true,
        });

        assert!(handle.is_ready());
        match handle.resolve().await {
            FetchOutcome::Resolved { value, from_cache } => {
                assert_eq!(value, 7);
                assert!(from_cache);
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_pending_handle_receives_sent_outcome() {
        let (tx, rx) = oneshot::channel();
        let handle: ResultHandle<u32> = ResultHandle::pending(rx);
        assert!(!handle.is_ready());

        tx.send(FetchOutcome::Resolved {
            value: 3,
            from_cache: false,
        })
        .ok();

        assert!(handle.resolve().await.is_resolved());
    }

    #[tokio::test]
    async fn test_dropped_sender_resolves_cancelled() {
        let (tx, rx) = oneshot::channel::<FetchOutcome<u32>>();
        let handle = ResultHandle::pending(rx);
        drop(tx);

        match handle.resolve().await {
            FetchOutcome::Cancelled => (),
            other => panic!("unexpected outcome: {other:?}"),
        }
    }
}
