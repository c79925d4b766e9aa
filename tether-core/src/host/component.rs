//! Component Abstraction
//!
//! The host renderer works against a small component contract: overridable
//! lifecycle hooks, a render function producing a [`View`], and two seams a
//! connecting wrapper can plug into without the host knowing anything about
//! reactivity:
//!
//! - [`Component::render_scope`] lets an instance wrap its *entire* render
//!   pass (render plus child reconciliation) in an execution scope of its
//!   choosing. The default runs the pass directly; connected components
//!   supply their reaction's tracked scope here.
//!
//! - [`Component::forwarded_ref`] lets an instance substitute another handle
//!   when a ref callback fires for it, so wrappers stay transparent to refs.

use std::any::Any;
use std::cell::{Ref, RefCell, RefMut};
use std::fmt;
use std::rc::Rc;

use super::element::View;
use super::props::Props;
use super::scheduler::Updater;

/// A scope that wraps an instance's render pass.
pub trait RenderScope {
    /// Execute the render pass inside the scope. `body` must be called
    /// exactly once.
    fn run(&self, body: &mut dyn FnMut());
}

/// The component contract the host renders against.
///
/// All hooks have no-op defaults except `render`.
pub trait Component: Any {
    /// Called once, before the first render.
    fn will_mount(&mut self, _props: &Props) {}

    /// Called before every subsequent render.
    fn will_update(&mut self, _props: &Props) {}

    /// Update guard. Returning `false` suppresses the update pass for this
    /// instance and its subtree.
    fn should_update(&mut self, _props: &Props) -> bool {
        true
    }

    /// Called once, when the instance leaves the tree.
    fn will_unmount(&mut self) {}

    /// Produce the instance's view for the given props.
    fn render(&mut self, props: &Props) -> View;

    /// Host attachment hook, called once when the instance enters the tree,
    /// before `will_mount`. The [`Updater`] schedules a re-render of this
    /// instance through the host's batched update queue.
    fn attach(&mut self, _updater: Updater) {}

    /// Optional scope wrapping this instance's render pass.
    fn render_scope(&self) -> Option<Rc<dyn RenderScope>> {
        None
    }

    /// Optional substitute handle for ref callbacks targeting this instance.
    fn forwarded_ref(&self) -> Option<ComponentHandle> {
        None
    }
}

/// Shared handle to a mounted component instance.
///
/// The handle refers to the actual boxed instance owned by the renderer, not
/// a copy; typed access goes through [`with`](Self::with) and
/// [`with_mut`](Self::with_mut).
#[derive(Clone)]
pub struct ComponentHandle {
    inner: Rc<RefCell<Box<dyn Component>>>,
}

impl ComponentHandle {
    pub(crate) fn new(component: Box<dyn Component>) -> Self {
        Self {
            inner: Rc::new(RefCell::new(component)),
        }
    }

    pub(crate) fn borrow(&self) -> Ref<'_, Box<dyn Component>> {
        self.inner.borrow()
    }

    pub(crate) fn borrow_mut(&self) -> RefMut<'_, Box<dyn Component>> {
        self.inner.borrow_mut()
    }

    /// Run `f` against the instance downcast to `C`. Returns `None` if the
    /// instance is of a different type.
    pub fn with<C: Component, R>(&self, f: impl FnOnce(&C) -> R) -> Option<R> {
        let guard = self.inner.borrow();
        let any: &dyn Any = &**guard;
        any.downcast_ref::<C>().map(f)
    }

    /// Run `f` against the instance downcast mutably to `C`.
    pub fn with_mut<C: Component, R>(&self, f: impl FnOnce(&mut C) -> R) -> Option<R> {
        let mut guard = self.inner.borrow_mut();
        let any: &mut dyn Any = &mut **guard;
        any.downcast_mut::<C>().map(f)
    }

    /// Check whether two handles refer to the same instance.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Debug for ComponentHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ComponentHandle")
    }
}

/// A component type: a name plus a constructor.
///
/// This is what element descriptors refer to and what the connection
/// adapter wraps.
#[derive(Clone)]
pub struct ComponentType {
    name: Rc<str>,
    create: Rc<dyn Fn() -> Box<dyn Component>>,
}

impl ComponentType {
    /// Define a component type from a name and a constructor closure.
    pub fn new(name: impl Into<Rc<str>>, create: impl Fn() -> Box<dyn Component> + 'static) -> Self {
        Self {
            name: name.into(),
            create: Rc::new(create),
        }
    }

    /// The component type's name, used for reconciliation matching and
    /// diagnostics.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn name_rc(&self) -> Rc<str> {
        Rc::clone(&self.name)
    }

    pub(crate) fn instantiate(&self) -> Box<dyn Component> {
        (self.create)()
    }
}

impl fmt::Debug for ComponentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComponentType")
            .field("name", &self.name)
            .finish()
    }
}
