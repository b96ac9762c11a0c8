//! Error taxonomy for injection operations.

/// Errors from injection operations.
///
/// Every variant is local to a single (definition, target) attempt. Nothing
/// is retried automatically; retrying with `overwrite` enabled is an explicit
/// caller decision.
#[derive(Debug, thiserror::Error)]
pub enum InjectError {
    /// The target already exposes the attribute and the registry did not
    /// create it. Raised only when `overwrite` is false.
    #[error("target '{target}' already has attribute '{attribute}'; pass overwrite to replace it")]
    ExistingAttribute { target: String, attribute: String },

    /// `as_property` was requested for a definition that is not callable.
    #[error("attribute '{attribute}' is not callable and cannot become a property")]
    NotCallable { attribute: String },

    /// `as_property` was requested for a callable whose declared parameter
    /// count is not exactly one (the instance).
    #[error(
        "attribute '{attribute}' declares {params} parameters; a property callable takes exactly one (the instance)"
    )]
    InvalidDefinition { attribute: String, params: usize },

    /// Annotation-based discovery named a target the caller's resolver
    /// does not know.
    #[error("no target named '{name}' in the caller's environment")]
    UnknownTarget { name: String },

    /// Attribute identifiers must be non-empty.
    #[error("attribute name must not be empty")]
    EmptyAttributeName,
}
