//! Component Connection
//!
//! This module is the adapter the crate exists for: it wraps a
//! presentational component type and produces a connected component type
//! whose instances re-render whenever any observable read during their
//! render changes.
//!
//! # How It Works
//!
//! 1. When a connected instance enters the tree, it allocates one
//!    [`Reaction`] named after the wrapped component. The reaction's
//!    callback enqueues the instance on the host's batched update queue.
//!
//! 2. The instance hands that reaction to the host through the
//!    [`render_scope`](Component::render_scope) seam, so the host executes
//!    the instance's entire render routine — first render and every update —
//!    inside `Reaction::track`. Every observable read during the routine
//!    becomes a dependency; each run replaces the previous dependency set.
//!    Independently connected descendants open their own nested scope, so
//!    the subscription is strictly per-instance.
//!
//! 3. Rendering computes additional props through the optional injector,
//!    shallow-merges them over the incoming props (injected keys win), and
//!    emits a single child element of the wrapped type. A ref callback on
//!    that element captures the mounted wrapped instance, which is exposed
//!    through [`Connected::wrapped_ref`] and forwarded to outer ref
//!    callbacks.
//!
//! 4. On unmount the reaction is disposed, exactly once. A disposed
//!    reaction never schedules again, so a mutation racing an unmount is
//!    silently dropped rather than reaching a dead instance.
//!
//! Scheduling order, per-tick coalescing, and suppression semantics are the
//! host's contract; the adapter only ever calls the one scheduling
//! primitive it is given.
//!
//! # Example
//!
//! ```rust,ignore
//! let counter = ComponentType::new("Counter", || Box::new(Counter));
//! let connected = connect(counter);
//!
//! let mut renderer = Renderer::new();
//! renderer.mount(Element::new(connected, Props::new().with_handle("count", count)))?;
//!
//! count.set(5);
//! renderer.tick(); // the counter re-rendered once
//! ```

use std::cell::RefCell;
use std::rc::Rc;

use crate::host::{Component, ComponentHandle, ComponentType, Element, Props, RenderScope, Updater, View};
use crate::reactive::Reaction;

/// Function computing additional props from the incoming props.
///
/// Returning `None` leaves the incoming props untouched.
pub type PropInjector = Rc<dyn Fn(&Props) -> Option<Props>>;

/// Connect a component type to observable state.
///
/// The returned type has the same external prop interface as `ty`; its
/// instances re-render whenever an observable they read during rendering
/// changes.
pub fn connect(ty: ComponentType) -> ComponentType {
    connected_type(ty, None)
}

/// Connect a component type, injecting additional props on every render.
///
/// `inject` is invoked with the pre-merge incoming props; when it returns
/// props, they are shallow-merged over the incoming ones and injected keys
/// win on conflict.
pub fn connect_with(
    ty: ComponentType,
    inject: impl Fn(&Props) -> Option<Props> + 'static,
) -> ComponentType {
    connected_type(ty, Some(Rc::new(inject)))
}

fn connected_type(ty: ComponentType, inject: Option<PropInjector>) -> ComponentType {
    let name = ty.name().to_string();
    ComponentType::new(name, move || {
        Box::new(Connected::new(ty.clone(), inject.clone()))
    })
}

/// A connected component instance.
///
/// Owns exactly one reactive subscription for its lifetime and renders a
/// single child of the wrapped type.
pub struct Connected {
    /// The wrapped presentational component type.
    wrapped: ComponentType,

    /// Optional prop injector.
    inject: Option<PropInjector>,

    /// The instance's tracking handle; created at attach, disposed at
    /// unmount.
    reaction: Option<Reaction>,

    /// Slot holding the mounted wrapped instance, set by the child
    /// element's ref callback on every render.
    wrapped_ref: Rc<RefCell<Option<ComponentHandle>>>,
}

impl Connected {
    fn new(wrapped: ComponentType, inject: Option<PropInjector>) -> Self {
        Self {
            wrapped,
            inject,
            reaction: None,
            wrapped_ref: Rc::new(RefCell::new(None)),
        }
    }

    /// Handle to the mounted wrapped-component instance.
    ///
    /// This is the actual instance the host mounted, not a descriptor.
    pub fn wrapped_ref(&self) -> Option<ComponentHandle> {
        self.wrapped_ref.borrow().clone()
    }

    /// The instance's reaction, for diagnostics.
    pub fn reaction(&self) -> Option<&Reaction> {
        self.reaction.as_ref()
    }
}

impl Component for Connected {
    fn attach(&mut self, updater: Updater) {
        self.reaction = Some(Reaction::new(self.wrapped.name(), move || {
            updater.schedule();
        }));
    }

    fn render(&mut self, props: &Props) -> View {
        let final_props = match self.inject.as_ref().and_then(|inject| inject(props)) {
            Some(additional) => props.merged_with(additional),
            None => props.clone(),
        };

        let slot = Rc::clone(&self.wrapped_ref);
        let element = Element::new(self.wrapped.clone(), final_props)
            .with_ref(move |handle| *slot.borrow_mut() = Some(handle));

        View::Element(element)
    }

    fn render_scope(&self) -> Option<Rc<dyn RenderScope>> {
        self.reaction
            .clone()
            .map(|reaction| Rc::new(reaction) as Rc<dyn RenderScope>)
    }

    fn forwarded_ref(&self) -> Option<ComponentHandle> {
        self.wrapped_ref()
    }

    fn will_unmount(&mut self) {
        if let Some(reaction) = &self.reaction {
            reaction.dispose();
        }
        self.wrapped_ref.borrow_mut().take();
    }
}

impl RenderScope for Reaction {
    fn run(&self, body: &mut dyn FnMut()) {
        self.track(|| body());
    }
}
