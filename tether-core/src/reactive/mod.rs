//! Reactive Primitives
//!
//! This module implements the observable-state engine the connection adapter
//! subscribes against: observables, tracking scopes, and reactions.
//!
//! # Concepts
//!
//! ## Observables
//!
//! An [`Observable`] is a storage cell. When its value is read inside a
//! tracking scope, the cell registers the scope's observer as a dependent.
//! When the value changes, all dependents are invalidated.
//!
//! ## Tracking Scopes
//!
//! A [`TrackingScope`] is a contiguous execution during which every
//! observable read is recorded as a dependency of the enclosing observer.
//! Scopes live on a thread-local stack and nest, so independently
//! subscribed computations inside a tracked render keep their reads to
//! themselves.
//!
//! ## Reactions
//!
//! A [`Reaction`] binds a named tracked computation to a schedule callback.
//! Each `track` run replaces the dependency set; disposal permanently
//! unsubscribes. Reactions are what connected components own, one per
//! instance.
//!
//! # Implementation Notes
//!
//! Dependency detection is automatic: reading an observable checks for an
//! active tracking scope and registers with the ambient [`Runtime`], the
//! global dependency graph. All registration and deregistration goes
//! through the runtime's documented calls; nothing mutates the graph out of
//! band.

mod observable;
mod observer;
mod reaction;
mod runtime;
mod scope;

pub use observable::Observable;
pub use observer::{Observer, ObserverId};
pub use reaction::Reaction;
pub use runtime::Runtime;
pub use scope::TrackingScope;
