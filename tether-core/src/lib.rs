//! Tether Core
//!
//! This crate connects a component tree to observable state: wrap a
//! component type with [`connect`] and its instances re-render whenever any
//! observable value they read during rendering changes.
//!
//! # Architecture
//!
//! The crate is organized into three modules:
//!
//! - `reactive`: the observable engine — storage cells, tracking scopes,
//!   and reactions (named tracked computations with a schedule callback)
//! - `host`: the component-tree renderer — lifecycle hooks, element
//!   descriptors, and per-tick batched update scheduling
//! - `connect`: the adapter binding the two — one reaction per connected
//!   instance, armed around every render pass, disposed at unmount
//!
//! The adapter is the point of the crate; the other two modules implement
//! the narrow contracts it subscribes against.
//!
//! # Example
//!
//! ```rust,ignore
//! use tether_core::connect::connect;
//! use tether_core::host::{Component, ComponentType, Element, Props, Renderer, View};
//! use tether_core::reactive::Observable;
//!
//! struct Greeting;
//!
//! impl Component for Greeting {
//!     fn render(&mut self, props: &Props) -> View {
//!         let name: Observable<String> = props.handle("name").unwrap();
//!         View::text(format!("hello {}", name.get()))
//!     }
//! }
//!
//! let name = Observable::new(String::from("world"));
//! let greeting = connect(ComponentType::new("Greeting", || Box::new(Greeting)));
//!
//! let mut renderer = Renderer::new();
//! renderer.mount(Element::new(greeting, Props::new().with_handle("name", name.clone())))?;
//! assert_eq!(renderer.text_content(), "hello world");
//!
//! name.set(String::from("tether"));
//! renderer.tick();
//! assert_eq!(renderer.text_content(), "hello tether");
//! ```

pub mod connect;
pub mod host;
pub mod reactive;

pub use connect::{connect, connect_with};
