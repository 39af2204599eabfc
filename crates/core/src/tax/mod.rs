//! Tax calculation for document line items and totals.
//!
//! # Modules
//!
//! - `types` - Tax modes and per-document tax settings
//! - `calculator` - Pure line and document total computation

pub mod calculator;
pub mod types;

#[cfg(test)]
mod calculator_props;

pub use calculator::{DocumentTotals, LineAmounts, TaxCalculator};
pub use types::{TaxSettings, TaxType};
