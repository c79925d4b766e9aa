//! Observable Implementation
//!
//! An Observable is the fundamental reactive primitive: a storage cell whose
//! reads are recorded by the active tracking scope and whose writes notify
//! every observer currently depending on it.
//!
//! # How Observables Work
//!
//! 1. When an observable is read inside a tracking scope, the runtime
//!    records the scope's observer as a subscriber.
//!
//! 2. When the observable's value changes, the runtime invalidates all
//!    subscribers.
//!
//! 3. Invalidation asks each observer's schedule callback to arrange a
//!    re-run; for connected components that means an enqueued re-render.
//!
//! # Thread Safety
//!
//! The value is protected by a RwLock so observables can be shared across
//! threads; dependency tracking itself is per-thread through the scope
//! stack.

use std::fmt::Debug;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

use super::runtime::Runtime;
use super::scope::TrackingScope;

/// Counter for generating unique observable IDs.
static OBSERVABLE_ID_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Generate a new unique observable ID.
fn next_observable_id() -> u64 {
    OBSERVABLE_ID_COUNTER.fetch_add(1, Ordering::Relaxed)
}

/// A reactive storage cell holding a value of type T.
///
/// Cloning an `Observable` produces a second handle to the same cell.
///
/// # Example
///
/// ```rust,ignore
/// let name = Observable::new(String::from("initial"));
///
/// // Read the value (tracked when inside a reaction)
/// let value = name.get();
///
/// // Write the value (notifies every tracked reader)
/// name.set(String::from("updated"));
/// ```
pub struct Observable<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// Unique identifier for this cell.
    id: u64,

    /// The current value, shared between handles.
    value: Arc<RwLock<T>>,
}

impl<T> Observable<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// Create a new observable with the given initial value.
    pub fn new(value: T) -> Self {
        Self {
            id: next_observable_id(),
            value: Arc::new(RwLock::new(value)),
        }
    }

    /// Get the observable's unique ID.
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Get the current value.
    ///
    /// If called within a tracking scope, the scope's observer becomes a
    /// subscriber of this cell.
    pub fn get(&self) -> T {
        if TrackingScope::is_active() {
            TrackingScope::record_read(self.id);

            if let Some(observer_id) = TrackingScope::current_observer() {
                Runtime::add_dependency(self.id, observer_id);
            }
        }

        self.value.read().expect("value lock poisoned").clone()
    }

    /// Get the current value without recording a dependency.
    pub fn get_untracked(&self) -> T {
        self.value.read().expect("value lock poisoned").clone()
    }

    /// Set a new value and notify subscribers.
    pub fn set(&self, value: T) {
        {
            let mut guard = self.value.write().expect("value lock poisoned");
            *guard = value;
        }

        Runtime::notify_change(self.id);
    }

    /// Update the value using a function of the current value.
    pub fn update<F>(&self, f: F)
    where
        F: FnOnce(&T) -> T,
    {
        let new_value = {
            let guard = self.value.read().expect("value lock poisoned");
            f(&guard)
        };
        self.set(new_value);
    }
}

impl<T> Clone for Observable<T>
where
    T: Clone + Send + Sync + 'static,
{
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            value: Arc::clone(&self.value),
        }
    }
}

impl<T> Debug for Observable<T>
where
    T: Clone + Send + Sync + Debug + 'static,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Observable")
            .field("id", &self.id)
            .field("value", &self.get_untracked())
            .finish()
    }
}
