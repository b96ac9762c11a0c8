//! The injection registry — check-then-set with history.
//!
//! The registry owns the process-wide record of which
//! `(target identity, attribute name)` pairs this framework created. That
//! history is what makes the conflict check meaningful: an injection either
//! succeeds and is remembered, or is rejected because it would silently
//! clobber something the framework did not itself put there. Re-running the
//! same injection is always accepted (idempotent re-application), which is
//! what lets interactive callers re-execute a cell or script without
//! tripping over their own earlier work.
//!
//! Injection permanently mutates the target for the rest of the process.
//! Treat it as a composition/bootstrap step: finish injecting before the
//! targets are used from multiple threads, or go through [`SharedRegistry`]
//! so the whole check-then-set sequence runs under one lock.

use std::collections::BTreeSet;
use std::sync::{Arc, Mutex};

use tracing::{debug, warn};

use crate::attr::Definition;
use crate::error::InjectError;
use crate::target::Target;

/// Options for a single injection.
#[derive(Debug, Clone, Copy, Default)]
pub struct InjectOptions {
    /// Permit replacing an attribute the registry did not create.
    pub overwrite: bool,
    /// Convert a one-parameter callable into a computed property
    /// before attaching.
    pub as_property: bool,
}

impl InjectOptions {
    /// Enable `overwrite`.
    pub fn overwrite(mut self) -> Self {
        self.overwrite = true;
        self
    }

    /// Enable `as_property`.
    pub fn as_property(mut self) -> Self {
        self.as_property = true;
        self
    }
}

/// Process-wide record of framework-created attributes.
///
/// Construct one per process, or one per test for hermetic tests. Records
/// are additive-only: the only transition is absent → present, via a
/// successful [`inject_one`](Registry::inject_one).
#[derive(Debug, Default)]
pub struct Registry {
    records: BTreeSet<(String, String)>,
}

impl Registry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether this registry created `(target_identity, attribute)`.
    pub fn contains(&self, target_identity: &str, attribute: &str) -> bool {
        self.records
            .contains(&(target_identity.to_string(), attribute.to_string()))
    }

    /// Number of recorded injections.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether nothing has been injected yet.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Attach one attribute definition onto a target.
    ///
    /// Precondition checks (`as_property` arity, non-empty name) and the
    /// conflict check all run before any mutation; a returned error means
    /// the target is untouched.
    pub fn inject_one<T>(
        &mut self,
        target: &mut dyn Target<T>,
        name: &str,
        definition: Definition<T>,
        opts: InjectOptions,
    ) -> Result<(), InjectError> {
        if name.is_empty() {
            return Err(InjectError::EmptyAttributeName);
        }

        let definition = if opts.as_property {
            into_property(name, definition)?
        } else {
            definition
        };

        let identity = target.identity().to_string();
        let tracked = self.contains(&identity, name);
        if target.has_attribute(name) && !tracked {
            if !opts.overwrite {
                return Err(InjectError::ExistingAttribute {
                    target: identity,
                    attribute: name.to_string(),
                });
            }
            warn!(
                target_type = %identity,
                attribute = name,
                "overwriting attribute not created by this registry"
            );
        }

        debug!(
            target_type = %identity,
            attribute = name,
            kind = definition.kind(),
            "injecting attribute"
        );
        target.set_attribute(name, definition);
        self.records.insert((identity, name.to_string()));
        Ok(())
    }

    /// Wrap this registry for use from multiple threads.
    pub fn into_shared(self) -> SharedRegistry {
        SharedRegistry {
            inner: Arc::new(Mutex::new(self)),
        }
    }
}

/// Convert a callable definition into a property, enforcing the arity
/// precondition. A definition that is already a property passes through.
fn into_property<T>(name: &str, definition: Definition<T>) -> Result<Definition<T>, InjectError> {
    match definition {
        Definition::Method(body) | Definition::Property(body) => {
            if body.params() != 1 {
                return Err(InjectError::InvalidDefinition {
                    attribute: name.to_string(),
                    params: body.params(),
                });
            }
            Ok(Definition::Property(body))
        }
        Definition::Constant(_) => Err(InjectError::NotCallable {
            attribute: name.to_string(),
        }),
    }
}

/// A clonable, thread-safe handle around a [`Registry`].
///
/// Holds the lock across the entire check-then-set sequence, so two
/// concurrent injections of the same `(target, name)` cannot both observe
/// "absent" and both proceed.
#[derive(Debug, Clone)]
pub struct SharedRegistry {
    inner: Arc<Mutex<Registry>>,
}

impl SharedRegistry {
    /// Create a shared handle over a fresh registry.
    pub fn new() -> Self {
        Registry::new().into_shared()
    }

    /// See [`Registry::inject_one`]. The lock covers the whole operation.
    pub fn inject_one<T>(
        &self,
        target: &mut dyn Target<T>,
        name: &str,
        definition: Definition<T>,
        opts: InjectOptions,
    ) -> Result<(), InjectError> {
        let mut registry = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        registry.inject_one(target, name, definition, opts)
    }

    /// See [`Registry::contains`].
    pub fn contains(&self, target_identity: &str, attribute: &str) -> bool {
        let registry = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        registry.contains(target_identity, attribute)
    }
}

impl Default for SharedRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attr::Value;
    use crate::target::TypeProxy;
    use serde_json::json;

    fn constant_def(v: i64) -> Definition<Value> {
        Definition::constant(v)
    }

    #[test]
    fn inject_records_the_pair() {
        let mut registry = Registry::new();
        let mut proxy: TypeProxy<Value> = TypeProxy::new("test.Frame");
        registry
            .inject_one(&mut proxy, "answer", constant_def(42), InjectOptions::default())
            .unwrap();
        assert!(registry.contains("test.Frame", "answer"));
        assert_eq!(registry.len(), 1);
        assert_eq!(proxy.get(&Value::Null, "answer").unwrap(), json!(42));
    }

    #[test]
    fn empty_name_is_rejected_before_mutation() {
        let mut registry = Registry::new();
        let mut proxy: TypeProxy<Value> = TypeProxy::new("test.Frame");
        let err = registry
            .inject_one(&mut proxy, "", constant_def(1), InjectOptions::default())
            .unwrap_err();
        assert!(matches!(err, InjectError::EmptyAttributeName));
        assert!(registry.is_empty());
        assert!(proxy.injected_names().is_empty());
    }

    #[test]
    fn as_property_rejects_constants() {
        let mut registry = Registry::new();
        let mut proxy: TypeProxy<Value> = TypeProxy::new("test.Frame");
        let err = registry
            .inject_one(
                &mut proxy,
                "x",
                constant_def(1),
                InjectOptions::default().as_property(),
            )
            .unwrap_err();
        assert!(matches!(err, InjectError::NotCallable { .. }));
        assert!(!proxy.has_attribute("x"));
    }

    #[test]
    fn as_property_converts_unary_method() {
        let mut registry = Registry::new();
        let mut proxy: TypeProxy<Value> = TypeProxy::new("test.Frame");
        let def: Definition<Value> = Definition::method(1, |_, _| Ok(json!("yellow")));
        registry
            .inject_one(
                &mut proxy,
                "fav_color",
                def,
                InjectOptions::default().as_property(),
            )
            .unwrap();
        // Readable as a property, not callable as a method.
        assert_eq!(proxy.get(&Value::Null, "fav_color").unwrap(), json!("yellow"));
        assert!(proxy.call(&Value::Null, "fav_color", &[]).is_err());
    }

    #[test]
    fn shared_registry_round_trip() {
        let shared = SharedRegistry::new();
        let mut proxy: TypeProxy<Value> = TypeProxy::new("test.Frame");
        shared
            .inject_one(&mut proxy, "answer", constant_def(42), InjectOptions::default())
            .unwrap();
        assert!(shared.contains("test.Frame", "answer"));
    }
}
