//! The host-type capability contract and the proxy adapter.
//!
//! The registry never reflects over host types directly. It depends on one
//! narrow capability surface — [`Target`] — that any concrete type adapter
//! implements: query whether an attribute name already exists, set a named
//! attribute, and report a stable identity. [`TypeProxy`] is the built-in
//! adapter, a wrapper object standing in for "the type" in hosts where
//! types are not natively mutable.

use std::collections::{BTreeMap, BTreeSet};

use crate::attr::{CallError, Definition, Value};

/// Capability surface the registry requires from a receiving type.
///
/// `T` is the instance type the injected callables operate on.
pub trait Target<T> {
    /// Stable identifier for the receiving type. Two logically distinct
    /// types must never collide under this identifier; qualify it the way
    /// a module path qualifies a type name.
    fn identity(&self) -> &str;

    /// Whether the type already exposes an attribute under `name`,
    /// native members and injected attributes alike.
    fn has_attribute(&self, name: &str) -> bool;

    /// Attach `definition` under `name`, replacing any previous
    /// injected definition of the same name.
    fn set_attribute(&mut self, name: &str, definition: Definition<T>);
}

/// A stand-in for an externally owned type.
///
/// Holds the names the host type exposes natively (so conflicts with
/// pre-existing members are detectable) and the map of injected
/// definitions, plus dispatch helpers for consumers.
pub struct TypeProxy<T> {
    identity: String,
    native: BTreeSet<String>,
    injected: BTreeMap<String, Definition<T>>,
}

impl<T> TypeProxy<T> {
    /// Create a proxy for the type identified by `identity`.
    pub fn new(identity: impl Into<String>) -> Self {
        Self {
            identity: identity.into(),
            native: BTreeSet::new(),
            injected: BTreeMap::new(),
        }
    }

    /// Declare attribute names the host type already exposes natively.
    pub fn with_native(mut self, names: &[&str]) -> Self {
        self.native.extend(names.iter().map(|n| n.to_string()));
        self
    }

    /// The injected definition under `name`, if any.
    pub fn injected(&self, name: &str) -> Option<&Definition<T>> {
        self.injected.get(name)
    }

    /// Names of all injected attributes, sorted.
    pub fn injected_names(&self) -> Vec<&str> {
        self.injected.keys().map(String::as_str).collect()
    }

    /// Invoke an injected method against an instance.
    pub fn call(&self, instance: &T, name: &str, args: &[Value]) -> Result<Value, CallError> {
        match self.injected.get(name) {
            Some(Definition::Method(body)) => body.invoke(instance, args),
            Some(_) => Err(CallError::NotAMethod {
                name: name.to_string(),
            }),
            None => Err(CallError::UnknownAttribute {
                name: name.to_string(),
            }),
        }
    }

    /// Read an injected property or constant for an instance.
    pub fn get(&self, instance: &T, name: &str) -> Result<Value, CallError> {
        match self.injected.get(name) {
            Some(Definition::Property(body)) => body.invoke(instance, &[]),
            Some(Definition::Constant(value)) => Ok(value.clone()),
            Some(Definition::Method(_)) => Err(CallError::NotAProperty {
                name: name.to_string(),
            }),
            None => Err(CallError::UnknownAttribute {
                name: name.to_string(),
            }),
        }
    }
}

impl<T> Target<T> for TypeProxy<T> {
    fn identity(&self) -> &str {
        &self.identity
    }

    fn has_attribute(&self, name: &str) -> bool {
        self.native.contains(name) || self.injected.contains_key(name)
    }

    fn set_attribute(&mut self, name: &str, definition: Definition<T>) {
        self.injected.insert(name.to_string(), definition);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn native_attributes_are_visible_but_not_injected() {
        let proxy: TypeProxy<Value> = TypeProxy::new("test.Frame").with_native(&["shape"]);
        assert!(proxy.has_attribute("shape"));
        assert!(proxy.injected("shape").is_none());
    }

    #[test]
    fn set_attribute_makes_name_visible() {
        let mut proxy: TypeProxy<Value> = TypeProxy::new("test.Frame");
        assert!(!proxy.has_attribute("answer"));
        proxy.set_attribute("answer", Definition::constant(42));
        assert!(proxy.has_attribute("answer"));
        assert_eq!(proxy.get(&Value::Null, "answer").unwrap(), json!(42));
    }

    #[test]
    fn call_rejects_non_methods() {
        let mut proxy: TypeProxy<Value> = TypeProxy::new("test.Frame");
        proxy.set_attribute("answer", Definition::constant(42));
        let err = proxy.call(&Value::Null, "answer", &[]).unwrap_err();
        assert!(matches!(err, CallError::NotAMethod { .. }));
        let err = proxy.call(&Value::Null, "missing", &[]).unwrap_err();
        assert!(matches!(err, CallError::UnknownAttribute { .. }));
    }
}
