//! Component Renderer
//!
//! The renderer owns the mounted tree: an arena of instances indexed by ID,
//! a root, and the shared update queue. It drives the three lifecycle
//! routines of every instance:
//!
//! - **Mount**: instantiate the component, attach its updater, run
//!   `will_mount`, then the first render pass, then fire the element's ref
//!   callback.
//!
//! - **Update**: check the `should_update` guard (suppression skips the
//!   whole pass, descendants included), run `will_update`, then a render
//!   pass.
//!
//! - **Unmount**: run `will_unmount`, then unmount the subtree.
//!
//! A render pass executes the component's render and reconciles the
//! resulting view against the instance's children, all inside the
//! instance's `render_scope` when it provides one. Children are matched in
//! order by component type name; matches receive new props and an update
//! pass, mismatches and leftovers are unmounted, new elements are mounted.
//! Because reconciliation runs inside the parent's scope, a child's update
//! is part of the parent's render routine; children that bring their own
//! scope nest it, keeping their reads out of the parent's dependency set.
//!
//! # Flushing
//!
//! `tick` drains the update queue until it is empty. Each batch is
//! processed parents-first (by tree depth), and instances that already
//! received an update pass in the current tick — directly or through a
//! parent's reconciliation — are skipped. Together with the queue's
//! deduplication this gives the per-tick coalescing contract: one update
//! pass per affected instance per tick.

use std::collections::{HashMap, HashSet};
use std::rc::Rc;
use std::sync::Arc;

use thiserror::Error;

use super::component::ComponentHandle;
use super::element::{Element, View, ViewItem};
use super::props::Props;
use super::scheduler::{InstanceId, UpdateQueue, Updater};

/// Errors from the renderer's mount surface.
#[derive(Debug, Error)]
pub enum HostError {
    /// `mount` was called while a root is already mounted.
    #[error("a root component is already mounted")]
    AlreadyMounted,

    /// `unmount` was called with no mounted root.
    #[error("no root component is mounted")]
    NotMounted,
}

/// A mounted component instance.
struct Instance {
    /// Component type name, used for reconciliation matching.
    type_name: Rc<str>,

    /// The live component.
    component: ComponentHandle,

    /// Props of the most recent mount or update.
    props: Props,

    /// Rendered output in order: text runs interleaved with children.
    segments: Vec<Segment>,

    /// Child instances in render order.
    children: Vec<InstanceId>,

    /// Distance from the root; parents flush before children.
    depth: u32,
}

/// One piece of an instance's rendered output.
enum Segment {
    Text(String),
    Child(InstanceId),
}

/// The component-tree renderer.
pub struct Renderer {
    instances: HashMap<InstanceId, Instance>,
    root: Option<InstanceId>,
    queue: Arc<UpdateQueue>,
    /// Instances that received an update pass in the current tick.
    in_flight: HashSet<InstanceId>,
}

impl Renderer {
    /// Create a renderer with nothing mounted.
    pub fn new() -> Self {
        Self {
            instances: HashMap::new(),
            root: None,
            queue: Arc::new(UpdateQueue::new()),
            in_flight: HashSet::new(),
        }
    }

    /// Mount a root element.
    pub fn mount(&mut self, element: Element) -> Result<(), HostError> {
        if self.root.is_some() {
            return Err(HostError::AlreadyMounted);
        }

        let id = self.mount_element(element, 0);
        self.root = Some(id);
        Ok(())
    }

    /// Unmount the root and its entire subtree.
    pub fn unmount(&mut self) -> Result<(), HostError> {
        let root = self.root.take().ok_or(HostError::NotMounted)?;
        self.unmount_instance(root);
        Ok(())
    }

    /// Flush all scheduled updates.
    ///
    /// Runs update passes until the queue is empty. Within the tick, every
    /// instance is updated at most once.
    pub fn tick(&mut self) {
        self.in_flight.clear();

        loop {
            let mut batch = self.queue.drain();
            if batch.is_empty() {
                break;
            }

            // Parents before children, so a parent's reconciliation covers
            // its descendants' pending updates.
            batch.sort_by_key(|id| {
                self.instances.get(id).map(|i| i.depth).unwrap_or(u32::MAX)
            });

            for id in batch {
                if self.in_flight.contains(&id) {
                    continue;
                }
                if !self.instances.contains_key(&id) {
                    // Scheduled, then unmounted before the flush.
                    continue;
                }
                self.update_instance(id);
            }
        }
    }

    /// Check if an update flush is pending.
    pub fn has_pending_updates(&self) -> bool {
        !self.queue.is_empty()
    }

    /// Concatenated text content of the mounted tree, in render order.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        if let Some(root) = self.root {
            self.collect_text(root, &mut out);
        }
        out
    }

    /// Number of mounted instances.
    pub fn instance_count(&self) -> usize {
        self.instances.len()
    }

    fn collect_text(&self, id: InstanceId, out: &mut String) {
        let Some(instance) = self.instances.get(&id) else {
            return;
        };
        for segment in &instance.segments {
            match segment {
                Segment::Text(text) => out.push_str(text),
                Segment::Child(child) => self.collect_text(*child, out),
            }
        }
    }

    /// Mount an element, returning the new instance's ID.
    fn mount_element(&mut self, element: Element, depth: u32) -> InstanceId {
        let id = InstanceId::new();
        let (ty, props, ref_callback) = element.into_parts();

        tracing::debug!(instance = id.raw(), component = ty.name(), "mount");

        let component = ComponentHandle::new(ty.instantiate());
        component
            .borrow_mut()
            .attach(Updater::new(Arc::clone(&self.queue), id));
        component.borrow_mut().will_mount(&props);

        self.instances.insert(
            id,
            Instance {
                type_name: ty.name_rc(),
                component: component.clone(),
                props,
                segments: Vec::new(),
                children: Vec::new(),
                depth,
            },
        );

        self.render_pass(id);

        if let Some(callback) = ref_callback {
            self.fire_ref(&component, &callback);
        }

        id
    }

    /// Run an update pass for an instance.
    fn update_instance(&mut self, id: InstanceId) {
        let Some(instance) = self.instances.get(&id) else {
            return;
        };
        let component = instance.component.clone();
        let props = instance.props.clone();

        self.in_flight.insert(id);

        if !component.borrow_mut().should_update(&props) {
            tracing::trace!(instance = id.raw(), "update suppressed");
            return;
        }

        component.borrow_mut().will_update(&props);
        self.render_pass(id);
    }

    /// Unmount an instance and its subtree.
    fn unmount_instance(&mut self, id: InstanceId) {
        let Some(instance) = self.instances.remove(&id) else {
            return;
        };

        tracing::debug!(instance = id.raw(), component = %instance.type_name, "unmount");

        instance.component.borrow_mut().will_unmount();
        for child in instance.children {
            self.unmount_instance(child);
        }
    }

    /// Execute the instance's render routine, inside its render scope when
    /// it provides one.
    fn render_pass(&mut self, id: InstanceId) {
        let Some(instance) = self.instances.get(&id) else {
            return;
        };
        let component = instance.component.clone();
        let scope = component.borrow().render_scope();

        match scope {
            Some(scope) => {
                let mut body = || self.render_routine(id, &component);
                scope.run(&mut body);
            }
            None => self.render_routine(id, &component),
        }
    }

    /// Render the component and reconcile its output.
    fn render_routine(&mut self, id: InstanceId, component: &ComponentHandle) {
        let Some(instance) = self.instances.get(&id) else {
            return;
        };
        let props = instance.props.clone();

        let view = component.borrow_mut().render(&props);
        self.reconcile(id, view);
    }

    /// Match the new view against the instance's children in order.
    fn reconcile(&mut self, id: InstanceId, view: View) {
        let (old_children, depth) = match self.instances.get_mut(&id) {
            Some(instance) => (std::mem::take(&mut instance.children), instance.depth),
            None => return,
        };

        let mut segments = Vec::new();
        let mut children = Vec::new();
        let mut cursor = 0usize;

        for item in view.flatten() {
            match item {
                ViewItem::Text(text) => segments.push(Segment::Text(text)),
                ViewItem::Element(element) => {
                    let reusable = old_children.get(cursor).copied().filter(|old| {
                        self.instances
                            .get(old)
                            .map(|i| &*i.type_name == element.type_name())
                            .unwrap_or(false)
                    });

                    let child_id = match reusable {
                        Some(old) => {
                            let ref_callback = element.ref_callback();
                            if let Some(instance) = self.instances.get_mut(&old) {
                                instance.props = element.props().clone();
                            }
                            self.update_instance(old);

                            if let Some(callback) = ref_callback {
                                if let Some(instance) = self.instances.get(&old) {
                                    let component = instance.component.clone();
                                    self.fire_ref(&component, &callback);
                                }
                            }
                            old
                        }
                        None => {
                            if let Some(old) = old_children.get(cursor).copied() {
                                self.unmount_instance(old);
                            }
                            self.mount_element(element, depth + 1)
                        }
                    };

                    segments.push(Segment::Child(child_id));
                    children.push(child_id);
                    cursor += 1;
                }
            }
        }

        // Unmount children the new view no longer produces.
        for old in old_children.into_iter().skip(cursor) {
            self.unmount_instance(old);
        }

        if let Some(instance) = self.instances.get_mut(&id) {
            instance.segments = segments;
            instance.children = children;
        }
    }

    /// Invoke a ref callback, honoring ref forwarding.
    fn fire_ref(&self, component: &ComponentHandle, callback: &super::element::RefCallback) {
        let target = component
            .borrow()
            .forwarded_ref()
            .unwrap_or_else(|| component.clone());
        callback(target);
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}
