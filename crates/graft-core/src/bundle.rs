//! Batched injection of grouped definitions.
//!
//! A [`Bundle`] plays the role of a grouping construct: definitions declared
//! together, injected together into one or more targets. Iteration order is
//! declaration order, and for each definition every target is processed
//! before the next definition starts. A failure aborts the whole batch at
//! that pair — earlier successful attachments stay in place. Partial
//! application is a documented outcome, not a hidden hazard.

use tracing::debug;

use crate::attr::Definition;
use crate::error::InjectError;
use crate::registry::{InjectOptions, Registry};
use crate::target::Target;

/// An ordered container of named definitions awaiting injection.
pub struct Bundle<T> {
    entries: Vec<(String, Definition<T>)>,
}

impl<T> Bundle<T> {
    /// Create an empty bundle.
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Add a definition, preserving declaration order. Redefining an
    /// existing name replaces it in place.
    pub fn define(&mut self, name: impl Into<String>, definition: Definition<T>) -> &mut Self {
        let name = name.into();
        if let Some(entry) = self.entries.iter_mut().find(|(n, _)| *n == name) {
            entry.1 = definition;
        } else {
            self.entries.push((name, definition));
        }
        self
    }

    /// Builder-style [`define`](Bundle::define).
    pub fn with(mut self, name: impl Into<String>, definition: Definition<T>) -> Self {
        self.define(name, definition);
        self
    }

    /// Whether the bundle still holds a definition under `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|(n, _)| n == name)
    }

    /// Names in declaration order.
    pub fn names(&self) -> Vec<&str> {
        self.entries.iter().map(|(n, _)| n.as_str()).collect()
    }

    /// Number of definitions currently held.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the bundle holds no definitions.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<T> Default for Bundle<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Options for [`inject_bundle`].
#[derive(Debug, Clone, Copy, Default)]
pub struct BundleOptions {
    /// Permit replacing attributes the registry did not create.
    pub overwrite: bool,
    /// Convert each callable into a computed property before attaching.
    pub as_property: bool,
    /// Drain each definition from the bundle once all targets for it have
    /// been processed, modelling "moved" rather than "copied" semantics.
    pub delete_source: bool,
}

impl BundleOptions {
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

    /// Enable `delete_source`.
    pub fn delete_source(mut self) -> Self {
        self.delete_source = true;
        self
    }
}

/// Inject every definition in `bundle` into every target, in order.
///
/// Definitions iterate in declaration order; for each one, targets iterate
/// in the order supplied. The first failing pair aborts the batch with no
/// rollback of earlier attachments. With `delete_source`, a definition
/// leaves the bundle only after all targets for it succeeded, so an aborted
/// batch keeps the failing definition (and everything after it) in the
/// bundle.
pub fn inject_bundle<T>(
    registry: &mut Registry,
    bundle: &mut Bundle<T>,
    targets: &mut [&mut dyn Target<T>],
    opts: BundleOptions,
) -> Result<(), InjectError> {
    let inject_opts = InjectOptions {
        overwrite: opts.overwrite,
        as_property: opts.as_property,
    };

    debug!(
        definitions = bundle.len(),
        targets = targets.len(),
        "injecting bundle"
    );

    let mut index = 0;
    while index < bundle.entries.len() {
        let (name, definition) = bundle.entries[index].clone();
        for target in targets.iter_mut() {
            registry.inject_one(&mut **target, &name, definition.clone(), inject_opts)?;
        }
        if opts.delete_source {
            bundle.entries.remove(index);
        } else {
            index += 1;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attr::{Definition, Value};
    use crate::target::TypeProxy;
    use serde_json::json;

    #[test]
    fn define_preserves_order_and_replaces_in_place() {
        let mut bundle: Bundle<Value> = Bundle::new();
        bundle
            .define("a", Definition::constant(1))
            .define("b", Definition::constant(2))
            .define("a", Definition::constant(3));
        assert_eq!(bundle.names(), vec!["a", "b"]);
        assert_eq!(bundle.len(), 2);
    }

    #[test]
    fn failed_pair_keeps_definition_in_bundle() {
        let mut registry = Registry::new();
        let mut bundle: Bundle<Value> = Bundle::new()
            .with("ok", Definition::constant(1))
            .with("shape", Definition::constant(2));
        let mut target: TypeProxy<Value> = TypeProxy::new("test.Frame").with_native(&["shape"]);

        let err = inject_bundle(
            &mut registry,
            &mut bundle,
            &mut [&mut target],
            BundleOptions::default().delete_source(),
        )
        .unwrap_err();

        assert!(matches!(err, InjectError::ExistingAttribute { .. }));
        // "ok" was drained, the failing definition stays.
        assert!(!bundle.contains("ok"));
        assert!(bundle.contains("shape"));
        assert_eq!(target.get(&Value::Null, "ok").unwrap(), json!(1));
    }
}
