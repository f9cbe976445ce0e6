//! Per-visitor in-flight registry for mutations.
//!
//! A mutation acquires a [`InFlightTicket`] keyed by visitor and action
//! before calling the backend. While the ticket is alive a second attempt
//! for the same key is refused, so a double click cannot create two
//! orders or two addresses. The ticket releases its key on drop.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, PoisonError};

use tracing::debug;

/// Registry of mutations currently waiting on the backend.
#[derive(Debug, Clone, Default)]
pub struct InFlight {
    keys: Arc<Mutex<HashSet<String>>>,
}

/// Proof that a mutation is in flight. Releases the key on drop.
#[derive(Debug)]
#[must_use = "the action is released as soon as the ticket is dropped"]
pub struct InFlightTicket {
    keys: Arc<Mutex<HashSet<String>>>,
    key: String,
}

impl InFlight {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Try to start `action` for `visitor`.
    ///
    /// Returns `None` if the same action is already in flight.
    pub fn try_begin(&self, visitor: &str, action: &str) -> Option<InFlightTicket> {
        let key = format!("{visitor}:{action}");
        let inserted = self
            .keys
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.clone());

        if inserted {
            Some(InFlightTicket {
                keys: Arc::clone(&self.keys),
                key,
            })
        } else {
            debug!(key = %key, "Refusing duplicate in-flight action");
            None
        }
    }

    /// Whether `action` is currently in flight for `visitor`.
    #[must_use]
    pub fn is_busy(&self, visitor: &str, action: &str) -> bool {
        self.keys
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(&format!("{visitor}:{action}"))
    }
}

impl Drop for InFlightTicket {
    fn drop(&mut self) {
        self.keys
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&self.key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_attempt_is_refused_until_release() {
        let registry = InFlight::new();

        let ticket = registry.try_begin("visitor-1", "checkout");
        assert!(ticket.is_some());
        assert!(registry.try_begin("visitor-1", "checkout").is_none());
        assert!(registry.is_busy("visitor-1", "checkout"));

        drop(ticket);
        assert!(!registry.is_busy("visitor-1", "checkout"));
        assert!(registry.try_begin("visitor-1", "checkout").is_some());
    }

    #[test]
    fn test_keys_are_scoped_per_visitor_and_action() {
        let registry = InFlight::new();
        let _a = registry.try_begin("visitor-1", "checkout");
        assert!(registry.try_begin("visitor-2", "checkout").is_some());
        assert!(registry.try_begin("visitor-1", "address").is_some());
    }
}
