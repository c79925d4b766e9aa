//! Tracking Scope
//!
//! A tracking scope records which observer is currently executing. This
//! enables automatic dependency tracking: when an observable is read, the
//! read is attributed to the innermost active scope.
//!
//! # Implementation
//!
//! We use a thread-local stack of scope entries. Entering a scope (running a
//! reaction's tracked computation) pushes an entry; the returned guard pops
//! it on drop, so the stack stays consistent even if the computation panics.
//! A panicking render therefore leaves behind exactly the dependencies that
//! were read before the failure.
//!
//! Scopes nest: a connected component rendered inside another connected
//! component's render pass opens its own scope, and its reads never leak to
//! the enclosing observer.

use std::cell::RefCell;

use super::ObserverId;

thread_local! {
    static SCOPE_STACK: RefCell<Vec<ScopeEntry>> = RefCell::new(Vec::new());
}

/// An entry on the tracking scope stack.
#[derive(Debug, Clone)]
struct ScopeEntry {
    /// The observer the current computation belongs to.
    observer_id: ObserverId,
    /// Observable IDs read during this computation, in read order.
    reads: Vec<u64>,
}

/// Guard for an active tracking scope. Pops the scope when dropped.
pub struct TrackingScope {
    observer_id: ObserverId,
}

impl TrackingScope {
    /// Enter a new tracking scope for the given observer.
    ///
    /// While the scope is active, every observable read on this thread is
    /// recorded against the observer. The scope is exited when the returned
    /// guard is dropped.
    pub fn enter(observer_id: ObserverId) -> Self {
        SCOPE_STACK.with(|stack| {
            stack.borrow_mut().push(ScopeEntry {
                observer_id,
                reads: Vec::new(),
            });
        });

        Self { observer_id }
    }

    /// Check if there is an active tracking scope on this thread.
    pub fn is_active() -> bool {
        SCOPE_STACK.with(|stack| !stack.borrow().is_empty())
    }

    /// Get the observer of the innermost active scope, if any.
    pub fn current_observer() -> Option<ObserverId> {
        SCOPE_STACK.with(|stack| stack.borrow().last().map(|entry| entry.observer_id))
    }

    /// Record a read of the given observable.
    ///
    /// Called by observables when they are read inside an active scope.
    pub fn record_read(observable_id: u64) {
        SCOPE_STACK.with(|stack| {
            if let Some(entry) = stack.borrow_mut().last_mut() {
                entry.reads.push(observable_id);
            }
        });
    }

    /// Get the observable IDs read so far in the innermost active scope.
    pub fn reads() -> Vec<u64> {
        SCOPE_STACK.with(|stack| {
            stack
                .borrow()
                .last()
                .map(|entry| entry.reads.clone())
                .unwrap_or_default()
        })
    }
}

impl Drop for TrackingScope {
    fn drop(&mut self) {
        SCOPE_STACK.with(|stack| {
            let popped = stack.borrow_mut().pop();

            // Verify we're popping the scope we pushed.
            if let Some(entry) = popped {
                debug_assert_eq!(
                    entry.observer_id, self.observer_id,
                    "TrackingScope mismatch: expected {:?}, got {:?}",
                    self.observer_id, entry.observer_id
                );
            }
        });
    }
}
