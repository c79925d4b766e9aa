//! Observer identity for the reactive system.
//!
//! An Observer is any computation that depends on observable values. In this
//! crate the only observer is the render reaction of a connected component,
//! but the runtime is written against the trait so other observer kinds can
//! be registered the same way.

use std::sync::atomic::{AtomicU64, Ordering};

/// Unique identifier for an observer.
///
/// Each observer (a tracked computation registered with the runtime) gets a
/// unique ID when created. The ID is used to record dependencies and to look
/// the observer up when one of its dependencies changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverId(u64);

impl ObserverId {
    /// Generate a new unique observer ID.
    ///
    /// Uses an atomic counter to ensure uniqueness across threads.
    pub fn new() -> Self {
        static COUNTER: AtomicU64 = AtomicU64::new(0);
        Self(COUNTER.fetch_add(1, Ordering::Relaxed))
    }

    /// Get the raw ID value.
    pub fn raw(&self) -> u64 {
        self.0
    }
}

impl Default for ObserverId {
    fn default() -> Self {
        Self::new()
    }
}

/// A computation that can be invalidated when a dependency changes.
///
/// Implementors register with the [`Runtime`](super::Runtime); when an
/// observable they read during a tracked scope is written, the runtime calls
/// `invalidate` on them.
pub trait Observer: Send + Sync {
    /// Get the observer's unique ID.
    fn observer_id(&self) -> ObserverId;

    /// Notify the observer that one of its tracked dependencies changed.
    fn invalidate(&self);
}
