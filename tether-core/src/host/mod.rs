//! Host Renderer
//!
//! This module implements the component-tree side of the system: the narrow
//! renderer contract the connection adapter plugs into, plus a concrete
//! renderer that honors it.
//!
//! # Overview
//!
//! - [`Component`] is the base abstraction: overridable lifecycle hooks
//!   (`will_mount`, `will_update`, `should_update`, `will_unmount`), a
//!   `render` function, and the seams a wrapper can use without the host
//!   knowing about reactivity (`render_scope`, `forwarded_ref`, `attach`).
//! - [`Element`] is the descriptor built from a [`ComponentType`] and
//!   [`Props`]; it can carry a reference callback.
//! - [`UpdateQueue`] and [`Updater`] are the update-scheduling facility:
//!   requests are batched and coalesced per tick.
//! - [`Renderer`] owns the mounted tree and drives mount, update, and
//!   unmount, flushing scheduled updates on [`tick`](Renderer::tick).
//!
//! # Design Decisions
//!
//! 1. Instances live in a flat arena indexed by [`InstanceId`] rather than
//!    as an owned tree, so updates scheduled by ID resolve in O(1) and
//!    flush order can be computed globally (parents first).
//!
//! 2. Child reconciliation matches by position and component type name.
//!    Keyed reconciliation is out of scope here; the adapter only ever
//!    renders a single wrapped child.
//!
//! 3. Reconciliation runs inside the parent's render scope. That makes "the
//!    update routine" one contiguous execution a tracked scope can wrap,
//!    which is exactly the boundary the connection adapter needs.

mod component;
mod element;
mod props;
mod renderer;
mod scheduler;

pub use component::{Component, ComponentHandle, ComponentType, RenderScope};
pub use element::{Element, RefCallback, View};
pub use props::{PropValue, Props};
pub use renderer::{HostError, Renderer};
pub use scheduler::{InstanceId, UpdateQueue, Updater};
