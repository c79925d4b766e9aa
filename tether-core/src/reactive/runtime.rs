//! Reactive Runtime
//!
//! The runtime is the ambient dependency graph shared by all observables and
//! observers in the process. It records which observers depend on which
//! observables and delivers invalidations when an observable is written.
//!
//! # How It Works
//!
//! 1. When an observer (a reaction) is created, it registers with the
//!    runtime.
//!
//! 2. When an observable is read inside a tracking scope, the runtime
//!    records the dependency for the scope's observer.
//!
//! 3. Before an observer re-runs its tracked computation, it clears its
//!    dependencies so only the reads of the newest run remain subscribed.
//!
//! 4. When an observable is written, the runtime looks up its subscribers
//!    and invalidates each one.
//!
//! # Thread Safety
//!
//! The tracking scope is thread-local; the registries are global so that
//! observables can be shared across threads. Registered observers are held
//! as weak references so the runtime never keeps a dropped observer alive.

use std::collections::HashMap;
use std::sync::{Arc, OnceLock, RwLock, Weak};

use smallvec::SmallVec;

use super::observer::{Observer, ObserverId};
use super::scope::TrackingScope;

/// Subscriber list for one observable. Most observables have a handful of
/// observers, so the list is inlined.
type Subscribers = SmallVec<[ObserverId; 4]>;

/// The ambient reactive runtime.
///
/// All registration and deregistration against the global dependency graph
/// goes through the documented calls on this type.
pub struct Runtime;

// Global registry of observers, held weakly so registration never extends an
// observer's lifetime.
static REGISTRY: OnceLock<RwLock<HashMap<ObserverId, Weak<dyn Observer>>>> = OnceLock::new();
static SUBSCRIPTIONS: OnceLock<RwLock<HashMap<u64, Subscribers>>> = OnceLock::new();

fn registry() -> &'static RwLock<HashMap<ObserverId, Weak<dyn Observer>>> {
    REGISTRY.get_or_init(|| RwLock::new(HashMap::new()))
}

fn subscriptions() -> &'static RwLock<HashMap<u64, Subscribers>> {
    SUBSCRIPTIONS.get_or_init(|| RwLock::new(HashMap::new()))
}

impl Runtime {
    /// Register an observer with the runtime.
    ///
    /// The observer is held weakly; dropping it makes the registration
    /// inert.
    pub fn register(observer: Arc<dyn Observer>) {
        let id = observer.observer_id();
        registry()
            .write()
            .expect("registry lock poisoned")
            .insert(id, Arc::downgrade(&observer));
    }

    /// Unregister an observer and drop all of its subscriptions.
    pub fn unregister(id: ObserverId) {
        registry()
            .write()
            .expect("registry lock poisoned")
            .remove(&id);

        Self::clear_dependencies(id);
    }

    /// Record that an observer depends on an observable.
    ///
    /// Called by observables when they are read within a tracking scope.
    /// Duplicate reads of the same observable in one scope collapse to a
    /// single subscription.
    pub fn add_dependency(observable_id: u64, observer_id: ObserverId) {
        let mut subs = subscriptions()
            .write()
            .expect("subscriptions lock poisoned");

        let entry = subs.entry(observable_id).or_default();
        if !entry.contains(&observer_id) {
            entry.push(observer_id);
        }
    }

    /// Remove all subscriptions held by an observer.
    ///
    /// Called before re-running a tracked computation, so stale dependencies
    /// from the previous run are dropped.
    pub fn clear_dependencies(observer_id: ObserverId) {
        let mut subs = subscriptions()
            .write()
            .expect("subscriptions lock poisoned");

        for entry in subs.values_mut() {
            entry.retain(|s| *s != observer_id);
        }
    }

    /// Notify all subscribers that an observable changed.
    ///
    /// This is the core invalidation path. Observers are invalidated in
    /// subscription order, outside the registry locks.
    pub fn notify_change(observable_id: u64) {
        let subscriber_ids: Subscribers = {
            let subs = subscriptions()
                .read()
                .expect("subscriptions lock poisoned");

            subs.get(&observable_id).cloned().unwrap_or_default()
        };

        if subscriber_ids.is_empty() {
            return;
        }

        tracing::trace!(
            observable_id,
            subscribers = subscriber_ids.len(),
            "observable changed"
        );

        let to_invalidate: Vec<_> = {
            let reg = registry().read().expect("registry lock poisoned");

            subscriber_ids
                .iter()
                .filter_map(|id| reg.get(id).and_then(Weak::upgrade))
                .collect()
        };

        // Invalidate outside the locks so callbacks may touch the runtime.
        for observer in to_invalidate {
            observer.invalidate();
        }
    }

    /// Get the observer currently being tracked on this thread, if any.
    pub fn current_observer() -> Option<ObserverId> {
        TrackingScope::current_observer()
    }

    /// Check if a tracking scope is active on this thread.
    pub fn is_tracking() -> bool {
        TrackingScope::is_active()
    }

    #[cfg(test)]
    fn subscriber_count(observable_id: u64) -> usize {
        subscriptions()
            .read()
            .expect("subscriptions lock poisoned")
            .get(&observable_id)
            .map(|s| s.len())
            .unwrap_or(0)
    }
}
