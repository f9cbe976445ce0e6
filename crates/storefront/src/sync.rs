//! Local copies of upstream data that are replaced when the upstream
//! version changes.

use serde::{Deserialize, Serialize};

/// A value mirrored from upstream, tagged with the version it came from.
///
/// Local edits go through [`Synced::value_mut`] and keep the version;
/// [`Synced::reconcile`] only replaces the value when a new version arrives.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Synced<T> {
    version: u64,
    value: T,
}

impl<T> Synced<T> {
    pub const fn new(version: u64, value: T) -> Self {
        Self { version, value }
    }

    /// Replace the local copy if `version` differs from the current one.
    ///
    /// Returns `true` if the value was replaced.
    pub fn reconcile(&mut self, version: u64, value: T) -> bool {
        if version == self.version {
            return false;
        }
        self.version = version;
        self.value = value;
        true
    }

    pub const fn version(&self) -> u64 {
        self.version
    }

    pub const fn value(&self) -> &T {
        &self.value
    }

    pub const fn value_mut(&mut self) -> &mut T {
        &mut self.value
    }
}
