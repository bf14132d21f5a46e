//! Current account/region/profile selection
//!
//! Every switch starts a new epoch identified by a monotonically increasing
//! version number. Cache entries and in-flight fetches are stamped with the
//! epoch they were issued under; anything stamped with an older version is
//! dead on arrival, which is what lets a switch retire stale work without
//! blocking the UI thread.

use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

/// Consistent view of the selection at a point in time
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSnapshot {
    pub account: String,
    pub region: String,
    pub profile: String,
    pub version: u64,
}

struct Selection {
    account: String,
    region: String,
    profile: String,
}

/// Process-wide session selection with an epoch counter.
///
/// The version counter can be read atomically without taking the selection
/// lock, so staleness checks on hot paths never contend with a switch.
pub struct SessionContext {
    selection: Mutex<Selection>,
    version: AtomicU64,
}

impl SessionContext {
    pub fn new(
        account: impl Into<String>,
        region: impl Into<String>,
        profile: impl Into<String>,
    ) -> Self {
        Self {
            selection: Mutex::new(Selection {
                account: account.into(),
                region: region.into(),
                profile: profile.into(),
            }),
            version: AtomicU64::new(1),
        }
    }

    /// Current epoch version.
    pub fn version(&self) -> u64 {
        self.version.load(Ordering::SeqCst)
    }

    /// Selection and version captured in a single critical section.
    pub fn snapshot(&self) -> SessionSnapshot {
        let sel = self.selection.lock().expect("session lock poisoned");
        SessionSnapshot {
            account: sel.account.clone(),
            region: sel.region.clone(),
            profile: sel.profile.clone(),
            version: self.version.load(Ordering::SeqCst),
        }
    }

    /// Replace the selection and advance the epoch. Returns
    /// `(old_version, new_version)` so the caller can cancel work issued
    /// under the old epoch.
    pub fn switch(
        &self,
        account: impl Into<String>,
        region: impl Into<String>,
        profile: impl Into<String>,
    ) -> (u64, u64) {
        let mut sel = self.selection.lock().expect("session lock poisoned");
        sel.account = account.into();
        sel.region = region.into();
        sel.profile = profile.into();
        let old = self.version.fetch_add(1, Ordering::SeqCst);
        (old, old + 1)
    }
}
