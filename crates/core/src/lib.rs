//! Domain types shared by the analyzer crates.
//!
//! - [`EngineDescriptor`] - one engine instantiated for a run
//! - [`ConfigPayload`] - the configuration document handed to an engine
//! - [`Issue`] - a finding emitted by an engine
//! - [`IssueValidations`] - rule-based checks applied to findings

pub mod domain;
pub mod error;
pub mod validation;

pub use domain::*;
pub use error::{CoreError, Result};
pub use validation::{IssueValidations, Validation, ValidationKind};
