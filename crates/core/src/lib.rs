//! Core document engine for Docket.
//!
//! This crate contains the pure engine with ZERO storage dependencies.
//! Document types, tax rules, numbering formats, lifecycle tables,
//! customization and rendering all live here.
//!
//! # Modules
//!
//! - `document` - Commercial documents, line items and lifecycle statuses
//! - `tax` - Line and document tax calculation
//! - `numbering` - Counter state, number formats and reset policy
//! - `workflow` - Status actions and document conversions
//! - `customization` - Layered render settings
//! - `profile` - The issuing company's profile
//! - `render` - Markup and stylesheet generation
//! - `export` - Output envelopes and rendering surfaces

pub mod customization;
pub mod document;
pub mod export;
pub mod numbering;
pub mod profile;
pub mod render;
pub mod tax;
pub mod workflow;
