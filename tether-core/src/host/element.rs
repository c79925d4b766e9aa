//! Elements and Views
//!
//! An [`Element`] is the lightweight descriptor a render produces for a
//! child component: a component type, the props to mount or update it with,
//! and an optional reference callback that receives the mounted instance's
//! handle. A [`View`] is what a render returns: text, a child element, a
//! flat sequence of both, or nothing.

use std::fmt;
use std::rc::Rc;

use super::component::{ComponentHandle, ComponentType};
use super::props::Props;

/// Callback receiving the handle of a mounted child instance.
pub type RefCallback = Rc<dyn Fn(ComponentHandle)>;

/// Descriptor for a child component.
#[derive(Clone)]
pub struct Element {
    ty: ComponentType,
    props: Props,
    ref_callback: Option<RefCallback>,
}

impl Element {
    /// Construct an element of the given component type with props.
    pub fn new(ty: ComponentType, props: Props) -> Self {
        Self {
            ty,
            props,
            ref_callback: None,
        }
    }

    /// Attach a reference callback, invoked with the mounted instance's
    /// handle after every render that (re)establishes the instance.
    pub fn with_ref(mut self, callback: impl Fn(ComponentHandle) + 'static) -> Self {
        self.ref_callback = Some(Rc::new(callback));
        self
    }

    /// The element's component type name.
    pub fn type_name(&self) -> &str {
        self.ty.name()
    }

    /// The element's props.
    pub fn props(&self) -> &Props {
        &self.props
    }

    pub(crate) fn ref_callback(&self) -> Option<RefCallback> {
        self.ref_callback.clone()
    }

    pub(crate) fn into_parts(self) -> (ComponentType, Props, Option<RefCallback>) {
        (self.ty, self.props, self.ref_callback)
    }
}

impl fmt::Debug for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Element")
            .field("type", &self.ty.name())
            .field("props", &self.props)
            .field("has_ref", &self.ref_callback.is_some())
            .finish()
    }
}

/// The output of a component's render.
#[derive(Clone, Debug, Default)]
pub enum View {
    /// Renders nothing.
    #[default]
    Empty,
    /// A text segment.
    Text(String),
    /// A single child component.
    Element(Element),
    /// An ordered sequence of views.
    Fragment(Vec<View>),
}

impl View {
    /// Convenience constructor for a text view.
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    /// Flatten the view into an ordered list of items, descending into
    /// fragments.
    pub(crate) fn flatten(self) -> Vec<ViewItem> {
        let mut items = Vec::new();
        self.flatten_into(&mut items);
        items
    }

    fn flatten_into(self, items: &mut Vec<ViewItem>) {
        match self {
            Self::Empty => {}
            Self::Text(text) => items.push(ViewItem::Text(text)),
            Self::Element(el) => items.push(ViewItem::Element(el)),
            Self::Fragment(views) => {
                for view in views {
                    view.flatten_into(items);
                }
            }
        }
    }
}

impl From<Element> for View {
    fn from(el: Element) -> Self {
        Self::Element(el)
    }
}

/// A flattened view item: either text or a child element.
pub(crate) enum ViewItem {
    Text(String),
    Element(Element),
}
