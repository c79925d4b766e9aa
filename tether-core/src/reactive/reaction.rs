//! Reaction Implementation
//!
//! A Reaction is a named, trackable computation bound to a schedule
//! callback. It is the subscription handle a connected component owns for
//! its lifetime.
//!
//! # How Reactions Work
//!
//! 1. `track(f)` drops the previous dependency set, opens a tracking scope
//!    and runs `f`. Every observable read during `f` (transitively,
//!    including nested reads outside any inner scope) becomes a dependency.
//!
//! 2. When any dependency later changes, the runtime invalidates the
//!    reaction, which invokes the schedule callback. The callback is
//!    expected to arrange a re-run of the tracked computation; the reaction
//!    itself never re-runs anything.
//!
//! 3. `dispose()` permanently unsubscribes. A disposed reaction never
//!    invokes its callback again, even if an invalidation is in flight.
//!
//! # Dependency Replacement
//!
//! Each call to `track` replaces the dependency set wholesale, so stale
//! subscriptions from a previous run never accumulate. If `f` panics, the
//! dependencies registered before the failure remain subscribed (they were
//! recorded eagerly on read) and the panic propagates unmodified.

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};

use super::observer::{Observer, ObserverId};
use super::runtime::Runtime;
use super::scope::TrackingScope;

/// Shared state of a reaction.
struct ReactionInner {
    /// The observer identity under which dependencies are recorded.
    id: ObserverId,

    /// Diagnostic name, typically the wrapped component's name.
    name: String,

    /// Schedule callback invoked when a dependency changes.
    on_invalidate: Box<dyn Fn() + Send + Sync>,

    /// Observable IDs recorded by the most recent `track` run.
    dependencies: RwLock<HashSet<u64>>,

    /// Set exactly once by `dispose`.
    disposed: AtomicBool,
}

impl Observer for ReactionInner {
    fn observer_id(&self) -> ObserverId {
        self.id
    }

    fn invalidate(&self) {
        if self.disposed.load(Ordering::SeqCst) {
            return;
        }

        tracing::trace!(name = %self.name, "reaction invalidated");
        (self.on_invalidate)();
    }
}

impl Drop for ReactionInner {
    fn drop(&mut self) {
        // The registry entry is weak, but remove it eagerly anyway.
        Runtime::unregister(self.id);
    }
}

/// A named tracked computation with a change-notification callback.
///
/// Cloning a `Reaction` produces a second handle to the same subscription.
///
/// # Example
///
/// ```rust,ignore
/// let reaction = Reaction::new("Counter", || queue.enqueue(instance));
///
/// reaction.track(|| {
///     // observable reads in here are subscribed
/// });
///
/// // later, at unmount:
/// reaction.dispose();
/// ```
pub struct Reaction {
    inner: Arc<ReactionInner>,
}

impl Reaction {
    /// Create a new reaction with a diagnostic name and a schedule callback.
    ///
    /// The reaction starts with an empty dependency set; call
    /// [`track`](Self::track) to establish one.
    pub fn new<F>(name: impl Into<String>, on_invalidate: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        let inner = Arc::new(ReactionInner {
            id: ObserverId::new(),
            name: name.into(),
            on_invalidate: Box::new(on_invalidate),
            dependencies: RwLock::new(HashSet::new()),
            disposed: AtomicBool::new(false),
        });

        Runtime::register(inner.clone());

        Self { inner }
    }

    /// Get the reaction's diagnostic name.
    pub fn name(&self) -> &str {
        &self.inner.name
    }

    /// Get the reaction's observer ID.
    pub fn observer_id(&self) -> ObserverId {
        self.inner.id
    }

    /// Execute `f` inside this reaction's tracking scope.
    ///
    /// The previous dependency set is dropped first; only observables read
    /// during this run remain subscribed afterwards. Returns `f`'s result.
    ///
    /// Calling `track` on a disposed reaction runs `f` untracked.
    pub fn track<R>(&self, f: impl FnOnce() -> R) -> R {
        if self.inner.disposed.load(Ordering::SeqCst) {
            return f();
        }

        Runtime::clear_dependencies(self.inner.id);
        self.inner
            .dependencies
            .write()
            .expect("dependencies lock poisoned")
            .clear();

        let scope = TrackingScope::enter(self.inner.id);
        let out = f();

        let reads = TrackingScope::reads();
        drop(scope);

        *self
            .inner
            .dependencies
            .write()
            .expect("dependencies lock poisoned") = reads.into_iter().collect();

        out
    }

    /// Dispose of the reaction.
    ///
    /// Unsubscribes from all dependencies; the schedule callback will never
    /// be invoked again. Disposal is exactly-once: further calls are no-ops.
    pub fn dispose(&self) {
        if self.inner.disposed.swap(true, Ordering::SeqCst) {
            return;
        }

        tracing::trace!(name = %self.inner.name, "reaction disposed");
        Runtime::unregister(self.inner.id);
        self.inner
            .dependencies
            .write()
            .expect("dependencies lock poisoned")
            .clear();
    }

    /// Check if the reaction has been disposed.
    pub fn is_disposed(&self) -> bool {
        self.inner.disposed.load(Ordering::SeqCst)
    }

    /// Get the number of observables the last `track` run subscribed to.
    pub fn dependency_count(&self) -> usize {
        self.inner
            .dependencies
            .read()
            .expect("dependencies lock poisoned")
            .len()
    }
}

impl Clone for Reaction {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl std::fmt::Debug for Reaction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Reaction")
            .field("name", &self.inner.name)
            .field("dependency_count", &self.dependency_count())
            .field("disposed", &self.is_disposed())
            .finish()
    }
}
