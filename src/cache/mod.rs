//! Resource cache for provider responses
//!
//! A typed, TTL-bounded in-memory store keyed by resource kind + account +
//! region. The cache is best-effort and staleness-bounded, never
//! correctness-bounded: nothing survives a process restart and nothing is
//! shared across processes.

pub mod key;
pub mod store;

pub use key::{ResourceKey, ResourceKind, Scope};
pub use store::{CacheStats, CacheStore, DEFAULT_CAPACITY};
