//! Cooperative cancellation
//!
//! The oracle raises a [`SearchToken`] when its query budget runs out. Every loop in
//! the search checks the token right after each oracle call and unwinds with its
//! best-known member instead of issuing further calls.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Shared "search over" flag
///
/// Cloning a token yields a handle onto the same flag. Once cancelled, a token stays
/// cancelled.
#[derive(Clone, Debug, Default)]
pub struct SearchToken {
    cancelled: Arc<AtomicBool>,
}

impl SearchToken {
    /// Create a fresh, uncancelled token
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark the search as over
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    /// Check whether the search is over
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}
