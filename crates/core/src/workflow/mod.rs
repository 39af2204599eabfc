//! Document lifecycle management.
//!
//! This module implements the document status state machine and the
//! type-to-type conversion table.
//!
//! # Modules
//!
//! - `types` - Transition tables and action descriptors
//! - `error` - Workflow-specific error types
//! - `service` - Transition checks and the conversion builder

pub mod error;
pub mod service;
pub mod types;

#[cfg(test)]
mod service_props;

pub use error::WorkflowError;
pub use service::{ConversionCheck, WorkflowService};
pub use types::{ActionKind, AvailableAction, CONVERSIONS, ConversionRule, STATUS_ACTIONS, StatusAction};
