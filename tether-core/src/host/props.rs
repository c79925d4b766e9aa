//! Component Props
//!
//! Props are an ordered, shallow mapping from string keys to values. A value
//! is either a JSON scalar or an opaque shared handle, so reactive state
//! cells can travel through the tree alongside plain data.
//!
//! Shallow merging is the only structural operation: when a prop injector
//! supplies additional props, injected keys win on conflict.

use std::any::Any;
use std::fmt;
use std::rc::Rc;

use indexmap::IndexMap;
use serde_json::Value;

/// A single prop value.
///
/// Scalars compare by value; handles compare by pointer identity.
#[derive(Clone)]
pub enum PropValue {
    /// A plain JSON scalar (string, number, bool, null, ...).
    Scalar(Value),
    /// An opaque shared handle, e.g. an `Observable<T>` clone.
    Handle(Rc<dyn Any>),
}

impl PropValue {
    /// Wrap an arbitrary value in a shared handle.
    pub fn handle<T: Any>(value: T) -> Self {
        Self::Handle(Rc::new(value))
    }

    /// Get the scalar value, if this is one.
    pub fn as_scalar(&self) -> Option<&Value> {
        match self {
            Self::Scalar(v) => Some(v),
            Self::Handle(_) => None,
        }
    }

    /// Get the value as a string slice, if it is a string scalar.
    pub fn as_str(&self) -> Option<&str> {
        self.as_scalar().and_then(Value::as_str)
    }

    /// Get the value as an integer, if it is a number scalar.
    pub fn as_i64(&self) -> Option<i64> {
        self.as_scalar().and_then(Value::as_i64)
    }

    /// Get the value as a bool, if it is a bool scalar.
    pub fn as_bool(&self) -> Option<bool> {
        self.as_scalar().and_then(Value::as_bool)
    }

    /// Downcast a handle value to a concrete type, cloning it out.
    pub fn downcast<T: Any + Clone>(&self) -> Option<T> {
        match self {
            Self::Handle(h) => h.downcast_ref::<T>().cloned(),
            Self::Scalar(_) => None,
        }
    }
}

impl PartialEq for PropValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Scalar(a), Self::Scalar(b)) => a == b,
            (Self::Handle(a), Self::Handle(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl fmt::Debug for PropValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scalar(v) => write!(f, "Scalar({v})"),
            Self::Handle(_) => write!(f, "Handle(..)"),
        }
    }
}

impl From<Value> for PropValue {
    fn from(v: Value) -> Self {
        Self::Scalar(v)
    }
}

impl From<&str> for PropValue {
    fn from(v: &str) -> Self {
        Self::Scalar(Value::from(v))
    }
}

impl From<String> for PropValue {
    fn from(v: String) -> Self {
        Self::Scalar(Value::from(v))
    }
}

impl From<i64> for PropValue {
    fn from(v: i64) -> Self {
        Self::Scalar(Value::from(v))
    }
}

impl From<bool> for PropValue {
    fn from(v: bool) -> Self {
        Self::Scalar(Value::from(v))
    }
}

/// An ordered prop mapping.
#[derive(Clone, Default, PartialEq, Debug)]
pub struct Props {
    entries: IndexMap<String, PropValue>,
}

impl Props {
    /// Create an empty prop mapping.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<PropValue>) -> Self {
        self.insert(key, value);
        self
    }

    /// Builder-style insert of a shared handle.
    pub fn with_handle<T: Any>(mut self, key: impl Into<String>, value: T) -> Self {
        self.entries.insert(key.into(), PropValue::handle(value));
        self
    }

    /// Insert a prop, replacing any existing value under the key.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<PropValue>) {
        self.entries.insert(key.into(), value.into());
    }

    /// Get a prop by key.
    pub fn get(&self, key: &str) -> Option<&PropValue> {
        self.entries.get(key)
    }

    /// Get a string prop by key.
    pub fn str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(PropValue::as_str)
    }

    /// Get a handle prop by key, downcast to a concrete type.
    pub fn handle<T: Any + Clone>(&self, key: &str) -> Option<T> {
        self.get(key).and_then(PropValue::downcast)
    }

    /// Shallow-merge `overrides` over these props. Override keys win.
    pub fn merged_with(&self, overrides: Props) -> Props {
        let mut merged = self.clone();
        for (key, value) in overrides.entries {
            merged.entries.insert(key, value);
        }
        merged
    }

    /// Number of props.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the mapping is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
}
