//! Concurrent fetch orchestration
//!
//! Tracks in-flight provider fetches per key, joins duplicate requests onto
//! a single underlying fetch, and cancels work left over when the session
//! switches.

pub mod coordinator;
pub mod handle;

pub use coordinator::{FetchContext, FetchCoordinator, FetchFuture};
pub use handle::{FetchOutcome, ResultHandle};
