#![deny(unsafe_code)]

//! Graft core — runtime attribute injection with history.
//!
//! Provides the extension registry that mediates attaching methods,
//! computed properties, and constants onto externally owned types. The
//! registry remembers every `(target, attribute)` pair it creates, so
//! re-running an injection is accepted while clobbering an attribute the
//! framework never created is rejected.
//!
//! Injection is global: a successful call mutates the target for the rest
//! of the process. Treat it as a bootstrap step that completes before the
//! targets see concurrent use.

/// Attribute definitions (methods, properties, constants) and call errors.
pub mod attr;
/// Batched injection of grouped definitions.
pub mod bundle;
/// Annotation-based discovery (`::Target` markers) and resolvers.
pub mod discovery;
/// The injection error taxonomy.
pub mod error;
/// The registry itself, plus the thread-safe shared handle.
pub mod registry;
/// The host-type capability contract and the proxy adapter.
pub mod target;

pub use attr::{CallError, Callable, Definition, Value};
pub use bundle::{Bundle, BundleOptions, inject_bundle};
pub use discovery::{AnnotatedReport, Candidate, Resolver, find_by_annotation, inject_annotated};
pub use error::InjectError;
pub use registry::{InjectOptions, Registry, SharedRegistry};
pub use target::{Target, TypeProxy};
