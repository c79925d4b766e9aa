//! Integration Tests for Connected Components
//!
//! These tests verify the connection adapter end to end against the host
//! renderer and the observable engine: prop passthrough and injection, ref
//! forwarding, subscription and unsubscription, and update coalescing
//! across nested connected components.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use tether_core::connect::{connect, connect_with};
use tether_core::host::{
    Component, ComponentHandle, ComponentType, Element, Props, Renderer, View,
};
use tether_core::reactive::Observable;

/// Counter cell shared between a test and its components.
type Counter = Rc<Cell<i32>>;

fn counter() -> Counter {
    Rc::new(Cell::new(0))
}

/// Renders the observable passed under the `state` prop as text, counting
/// mount and update hook calls.
struct StateText {
    mounts: Counter,
    updates: Counter,
}

impl Component for StateText {
    fn will_mount(&mut self, _props: &Props) {
        self.mounts.set(self.mounts.get() + 1);
    }

    fn will_update(&mut self, _props: &Props) {
        self.updates.set(self.updates.get() + 1);
    }

    fn render(&mut self, props: &Props) -> View {
        let state: Observable<String> = props.handle("state").expect("state prop");
        View::text(state.get())
    }
}

fn state_text(name: &str, mounts: &Counter, updates: &Counter) -> ComponentType {
    let mounts = Rc::clone(mounts);
    let updates = Rc::clone(updates);
    ComponentType::new(name, move || {
        Box::new(StateText {
            mounts: Rc::clone(&mounts),
            updates: Rc::clone(&updates),
        })
    })
}

#[test]
fn passes_props_to_the_wrapped_component() {
    let mounts = counter();

    struct Probe {
        mounts: Counter,
    }

    impl Component for Probe {
        fn will_mount(&mut self, props: &Props) {
            assert_eq!(props.str("prop"), Some("value"));
            self.mounts.set(self.mounts.get() + 1);
        }

        fn render(&mut self, _props: &Props) -> View {
            View::Empty
        }
    }

    let mounts_clone = Rc::clone(&mounts);
    let child = connect(ComponentType::new("Probe", move || {
        Box::new(Probe {
            mounts: Rc::clone(&mounts_clone),
        })
    }));

    struct Root {
        child: ComponentType,
    }

    impl Component for Root {
        fn render(&mut self, props: &Props) -> View {
            View::Element(Element::new(self.child.clone(), props.clone()))
        }
    }

    let root = ComponentType::new("Root", move || {
        Box::new(Root {
            child: child.clone(),
        })
    });

    let mut renderer = Renderer::new();
    renderer
        .mount(Element::new(root, Props::new().with("prop", "value")))
        .expect("mount");

    assert_eq!(mounts.get(), 1);
}

#[test]
fn injects_additional_props() {
    let mounts = counter();
    let injections = counter();

    struct Probe {
        mounts: Counter,
    }

    impl Component for Probe {
        fn will_mount(&mut self, props: &Props) {
            assert_eq!(props.str("prop_a"), Some("valueA"));
            assert_eq!(props.str("prop_b"), Some("injectedB"));
            self.mounts.set(self.mounts.get() + 1);
        }

        fn render(&mut self, _props: &Props) -> View {
            View::Empty
        }
    }

    let mounts_clone = Rc::clone(&mounts);
    let probe = ComponentType::new("Probe", move || {
        Box::new(Probe {
            mounts: Rc::clone(&mounts_clone),
        })
    });

    let injections_clone = Rc::clone(&injections);
    let child = connect_with(probe, move |props| {
        // The injector sees the pre-merge props.
        assert_eq!(props.str("prop_a"), Some("valueA"));
        assert_eq!(props.str("prop_b"), Some("valueB"));
        injections_clone.set(injections_clone.get() + 1);
        Some(Props::new().with("prop_b", "injectedB"))
    });

    struct Root {
        child: ComponentType,
    }

    impl Component for Root {
        fn render(&mut self, props: &Props) -> View {
            View::Element(Element::new(self.child.clone(), props.clone()))
        }
    }

    let root = ComponentType::new("Root", move || {
        Box::new(Root {
            child: child.clone(),
        })
    });

    let mut renderer = Renderer::new();
    renderer
        .mount(Element::new(
            root,
            Props::new().with("prop_a", "valueA").with("prop_b", "valueB"),
        ))
        .expect("mount");

    assert_eq!(mounts.get(), 1);
    assert_eq!(injections.get(), 1);
}

#[test]
fn forwards_a_reference_to_the_wrapped_instance() {
    struct Probe {
        correct_ref: bool,
    }

    impl Component for Probe {
        fn will_mount(&mut self, _props: &Props) {
            self.correct_ref = true;
        }

        fn render(&mut self, _props: &Props) -> View {
            View::Empty
        }
    }

    let child = connect(ComponentType::new("Probe", || {
        Box::new(Probe { correct_ref: false })
    }));

    let captured: Rc<RefCell<Option<ComponentHandle>>> = Rc::new(RefCell::new(None));

    struct Root {
        child: ComponentType,
        captured: Rc<RefCell<Option<ComponentHandle>>>,
    }

    impl Component for Root {
        fn render(&mut self, props: &Props) -> View {
            let captured = Rc::clone(&self.captured);
            View::Element(
                Element::new(self.child.clone(), props.clone())
                    .with_ref(move |handle| *captured.borrow_mut() = Some(handle)),
            )
        }
    }

    let captured_clone = Rc::clone(&captured);
    let root = ComponentType::new("Root", move || {
        Box::new(Root {
            child: child.clone(),
            captured: Rc::clone(&captured_clone),
        })
    });

    let mut renderer = Renderer::new();
    renderer
        .mount(Element::new(root, Props::new()))
        .expect("mount");

    let handle = captured.borrow().clone().expect("ref fired");

    // The ref resolves to the wrapped instance itself, not the wrapper.
    assert_eq!(handle.with::<Probe, _>(|p| p.correct_ref), Some(true));
}

#[test]
fn subscribes_components_to_state_changes() {
    let state_a = Observable::new(String::from("valueA"));
    let state_b = Observable::new(String::from("valueB"));
    let x = counter(); // child updates
    let y = counter(); // root updates

    let child = connect(state_text("Child", &counter(), &x));

    struct Root {
        updates: Counter,
        child: ComponentType,
    }

    impl Component for Root {
        fn will_update(&mut self, _props: &Props) {
            self.updates.set(self.updates.get() + 1);
        }

        fn render(&mut self, props: &Props) -> View {
            let state_a: Observable<String> = props.handle("state_a").expect("state_a prop");
            let state_b = props.get("state_b").cloned().expect("state_b prop");
            View::Fragment(vec![
                View::text(format!("{} ", state_a.get())),
                View::Element(Element::new(
                    self.child.clone(),
                    Props::new().with("state", state_b),
                )),
            ])
        }
    }

    let y_clone = Rc::clone(&y);
    let root = connect(ComponentType::new("Root", move || {
        Box::new(Root {
            updates: Rc::clone(&y_clone),
            child: child.clone(),
        })
    }));

    let mut renderer = Renderer::new();
    renderer
        .mount(Element::new(
            root,
            Props::new()
                .with_handle("state_a", state_a.clone())
                .with_handle("state_b", state_b.clone()),
        ))
        .expect("mount");

    assert_eq!(renderer.text_content(), "valueA valueB");

    // Nothing re-renders before the tick.
    state_a.set(String::from("newValueA"));
    assert_eq!(renderer.text_content(), "valueA valueB");
    assert_eq!(x.get(), 0);
    assert_eq!(y.get(), 0);

    renderer.tick();
    assert_eq!(renderer.text_content(), "newValueA valueB");
    assert_eq!(x.get(), 1);
    assert_eq!(y.get(), 1);

    // A change the root never read updates only the child.
    state_b.set(String::from("newValueB"));
    renderer.tick();
    assert_eq!(renderer.text_content(), "newValueA newValueB");
    assert_eq!(x.get(), 2);
    assert_eq!(y.get(), 1);
}

#[test]
fn unsubscribes_on_unmount() {
    let state = Observable::new(String::from("valueA"));
    let updates = counter();

    let root = connect(state_text("Root", &counter(), &updates));

    let mut renderer = Renderer::new();
    renderer
        .mount(Element::new(
            root,
            Props::new().with_handle("state", state.clone()),
        ))
        .expect("mount");
    assert_eq!(renderer.text_content(), "valueA");

    renderer.unmount().expect("unmount");

    // Mutating previously-read state must be a silent no-op.
    state.set(String::from("newValue"));
    renderer.tick();

    assert_eq!(updates.get(), 0);
    assert_eq!(renderer.instance_count(), 0);
}

#[test]
fn prevents_double_updates_across_nested_connected_components() {
    let state = Observable::new(String::from("value"));
    let x_mounts = counter();
    let x = counter();
    let y_mounts = counter();
    let y = counter();

    let child = connect(state_text("Child", &x_mounts, &x));

    struct Root {
        mounts: Counter,
        updates: Counter,
        child: ComponentType,
    }

    impl Component for Root {
        fn will_mount(&mut self, _props: &Props) {
            self.mounts.set(self.mounts.get() + 1);
        }

        fn will_update(&mut self, _props: &Props) {
            self.updates.set(self.updates.get() + 1);
        }

        fn render(&mut self, props: &Props) -> View {
            let state: Observable<String> = props.handle("state").expect("state prop");
            let state_prop = props.get("state").cloned().expect("state prop");
            View::Fragment(vec![
                View::text(state.get()),
                View::Element(Element::new(
                    self.child.clone(),
                    Props::new().with("state", state_prop),
                )),
            ])
        }
    }

    let y_mounts_clone = Rc::clone(&y_mounts);
    let y_clone = Rc::clone(&y);
    let root = connect(ComponentType::new("Root", move || {
        Box::new(Root {
            mounts: Rc::clone(&y_mounts_clone),
            updates: Rc::clone(&y_clone),
            child: child.clone(),
        })
    }));

    let mut renderer = Renderer::new();
    renderer
        .mount(Element::new(
            root,
            Props::new().with_handle("state", state.clone()),
        ))
        .expect("mount");

    assert_eq!(x_mounts.get(), 1);
    assert_eq!(y_mounts.get(), 1);
    assert_eq!(renderer.text_content(), "valuevalue");

    // One mutation both components observe: exactly one update pass each.
    state.set(String::from("newValueA"));
    renderer.tick();
    assert_eq!(x.get(), 1);
    assert_eq!(y.get(), 1);
    assert_eq!(renderer.text_content(), "newValueAnewValueA");

    state.set(String::from("newValueB"));
    renderer.tick();
    assert_eq!(x.get(), 2);
    assert_eq!(y.get(), 2);
    assert_eq!(renderer.text_content(), "newValueBnewValueB");
}

#[test]
fn updates_children_when_a_parent_suppresses_its_own_update() {
    let state = Observable::new(String::from("valueA"));
    let x = counter();
    let y = counter();

    let child = connect(state_text("Child", &counter(), &x));

    struct Root {
        updates: Counter,
        child: ComponentType,
    }

    impl Component for Root {
        fn will_update(&mut self, _props: &Props) {
            self.updates.set(self.updates.get() + 1);
        }

        fn should_update(&mut self, _props: &Props) -> bool {
            false
        }

        fn render(&mut self, props: &Props) -> View {
            let state: Observable<String> = props.handle("state").expect("state prop");
            let state_prop = props.get("state").cloned().expect("state prop");
            View::Fragment(vec![
                View::text(state.get()),
                View::Element(Element::new(
                    self.child.clone(),
                    Props::new().with("state", state_prop),
                )),
            ])
        }
    }

    let y_clone = Rc::clone(&y);
    let root = connect(ComponentType::new("Root", move || {
        Box::new(Root {
            updates: Rc::clone(&y_clone),
            child: child.clone(),
        })
    }));

    let mut renderer = Renderer::new();
    renderer
        .mount(Element::new(
            root,
            Props::new().with_handle("state", state.clone()),
        ))
        .expect("mount");
    assert_eq!(renderer.text_content(), "valueAvalueA");

    state.set(String::from("newValueA"));
    renderer.tick();

    // The root's own pass is suppressed, the child still updates once.
    assert_eq!(x.get(), 1);
    assert_eq!(y.get(), 0);
    assert_eq!(renderer.text_content(), "valueAnewValueA");
}

#[test]
fn does_not_update_parents_for_child_only_state() {
    let state = Observable::new(String::from("value"));
    let x = counter();
    let y = counter();

    let child = connect(state_text("Child", &counter(), &x));

    struct Root {
        updates: Counter,
        child: ComponentType,
    }

    impl Component for Root {
        fn will_update(&mut self, _props: &Props) {
            self.updates.set(self.updates.get() + 1);
        }

        fn render(&mut self, props: &Props) -> View {
            // Passes the state handle through without reading it.
            let state_prop = props.get("state").cloned().expect("state prop");
            View::Element(Element::new(
                self.child.clone(),
                Props::new().with("state", state_prop),
            ))
        }
    }

    let y_clone = Rc::clone(&y);
    let root = connect(ComponentType::new("Root", move || {
        Box::new(Root {
            updates: Rc::clone(&y_clone),
            child: child.clone(),
        })
    }));

    let mut renderer = Renderer::new();
    renderer
        .mount(Element::new(
            root,
            Props::new().with_handle("state", state.clone()),
        ))
        .expect("mount");

    assert_eq!(x.get(), 0);
    assert_eq!(y.get(), 0);

    state.set(String::from("newValueA"));
    renderer.tick();

    assert_eq!(x.get(), 1);
    assert_eq!(y.get(), 0);
    assert_eq!(renderer.text_content(), "newValueA");
}

#[test]
fn coalesces_multiple_mutations_within_one_tick() {
    let state = Observable::new(String::from("a"));
    let updates = counter();

    let root = connect(state_text("Root", &counter(), &updates));

    let mut renderer = Renderer::new();
    renderer
        .mount(Element::new(
            root,
            Props::new().with_handle("state", state.clone()),
        ))
        .expect("mount");

    state.set(String::from("b"));
    state.set(String::from("c"));
    state.set(String::from("d"));
    renderer.tick();

    // Three mutations before the flush collapse to one update pass.
    assert_eq!(updates.get(), 1);
    assert_eq!(renderer.text_content(), "d");
}
