#![deny(unsafe_code)]

//! Shared test utilities for the graft workspace.
//!
//! Provides registry/proxy fixtures and tracing helpers so that individual
//! crate tests stay concise and consistent.
//!
//! Add this crate as a `[dev-dependency]` in any workspace member:
//!
//! ```toml
//! [dev-dependencies]
//! graft-test-utils = { workspace = true }
//! ```

pub mod fixtures;
pub mod tracing_setup;
