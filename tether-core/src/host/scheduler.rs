//! Update Scheduling
//!
//! Re-renders requested between ticks are collected on a shared update
//! queue. Enqueueing the same instance twice within a tick collapses to one
//! entry, so any number of invalidations for an instance produce at most
//! one update pass when the renderer flushes.
//!
//! The queue is the one scheduling primitive handed to connected
//! components: an [`Updater`] binds the queue to a single instance and is
//! safe to invoke from reaction callbacks.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

/// Unique identifier for a mounted component instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct InstanceId(u64);

impl InstanceId {
    /// Generate a new unique instance ID.
    pub fn new() -> Self {
        static COUNTER: AtomicU64 = AtomicU64::new(0);
        Self(COUNTER.fetch_add(1, Ordering::Relaxed))
    }

    /// Get the raw ID value.
    pub fn raw(&self) -> u64 {
        self.0
    }
}

impl Default for InstanceId {
    fn default() -> Self {
        Self::new()
    }
}

/// Queue of instances awaiting an update pass.
pub struct UpdateQueue {
    pending: Mutex<Vec<InstanceId>>,
}

impl UpdateQueue {
    /// Create an empty queue.
    pub fn new() -> Self {
        Self {
            pending: Mutex::new(Vec::new()),
        }
    }

    /// Request an update pass for an instance.
    ///
    /// Duplicate requests while the instance is still pending are dropped.
    pub fn enqueue(&self, id: InstanceId) {
        let mut pending = self.pending.lock().expect("pending lock poisoned");
        if !pending.contains(&id) {
            tracing::trace!(instance = id.raw(), "update scheduled");
            pending.push(id);
        }
    }

    /// Take all pending instances, leaving the queue empty.
    pub fn drain(&self) -> Vec<InstanceId> {
        std::mem::take(&mut *self.pending.lock().expect("pending lock poisoned"))
    }

    /// Check if any updates are pending.
    pub fn is_empty(&self) -> bool {
        self.pending.lock().expect("pending lock poisoned").is_empty()
    }
}

impl Default for UpdateQueue {
    fn default() -> Self {
        Self::new()
    }
}

/// Handle that schedules re-renders of one instance.
///
/// Handed to a component at attach time; cloneable and callable from
/// `Send + Sync` callbacks.
#[derive(Clone)]
pub struct Updater {
    queue: Arc<UpdateQueue>,
    instance: InstanceId,
}

impl Updater {
    pub(crate) fn new(queue: Arc<UpdateQueue>, instance: InstanceId) -> Self {
        Self { queue, instance }
    }

    /// Request a batched re-render of the bound instance.
    pub fn schedule(&self) {
        self.queue.enqueue(self.instance);
    }

    /// The instance this updater is bound to.
    pub fn instance_id(&self) -> InstanceId {
        self.instance
    }
}
