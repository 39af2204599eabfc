//! Shared types, errors, and configuration for Docket.
//!
//! This crate provides common types used across all other crates:
//! - Currency and amount formatting with decimal precision
//! - Counter reset periods shared by configuration and numbering
//! - Application-wide error types
//! - Configuration management
//! - Tracing subscriber initialisation

pub mod config;
pub mod error;
pub mod telemetry;
pub mod types;

pub use config::AppConfig;
pub use error::{AppError, AppResult};
