#![deny(unsafe_code)]

//! Tabular helpers for the graft workspace.
//!
//! Consumers of the injection framework: a minimal column-oriented
//! [`Frame`], the column-helper bundle injected onto its type proxy, and
//! district-name standardization for pre-merge cleanup. Everything here
//! gains its methods through [`graft_core::Registry`] — this crate is the
//! worked example of the capability contract, not a dataframe engine.

/// District-name standardization rules.
pub mod district;
/// The frame table and its type proxy.
pub mod frame;
/// Injectable column helpers.
pub mod helpers;

pub use district::{RuleSet, RulesError, standardize};
pub use frame::{FRAME_TYPE, Frame, frame_type};
pub use helpers::{column_helpers, install};
