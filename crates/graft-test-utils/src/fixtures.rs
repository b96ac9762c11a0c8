//! Registry and target fixtures for tests.
//!
//! Every fixture returns an owned value, so each test gets a hermetic
//! registry and proxies with no shared history between test cases.

use graft_core::{Definition, Registry, TypeProxy, Value};

/// A registry with no history.
pub fn fresh_registry() -> Registry {
    Registry::new()
}

/// A proxy for the type `identity` with the given pre-existing
/// (non-framework) attribute names.
pub fn proxy(identity: &str, native: &[&str]) -> TypeProxy<Value> {
    TypeProxy::new(identity).with_native(native)
}

/// A one-parameter method that returns null, for tests that only care
/// about injection bookkeeping.
pub fn noop_method() -> Definition<Value> {
    Definition::method(1, |_, _| Ok(Value::Null))
}

/// A property that echoes the instance back.
pub fn echo_property() -> Definition<Value> {
    Definition::property(Clone::clone)
}

/// A constant definition.
pub fn constant(value: impl Into<Value>) -> Definition<Value> {
    Definition::constant(value)
}

/// A two-parameter method (instance plus one argument), for arity-check
/// tests.
pub fn binary_method() -> Definition<Value> {
    Definition::method(2, |_, args| Ok(args.first().cloned().unwrap_or(Value::Null)))
}
