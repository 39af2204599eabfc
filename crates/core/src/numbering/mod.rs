//! Document and entity numbering.
//!
//! This module holds the pure half of numbering: placeholder formatting,
//! reset-period evaluation and the counter state machine. Loading and
//! persisting counters is the store's job.
//!
//! # Modules
//!
//! - `format` - Format strings and reset-boundary checks
//! - `counter` - Counters, the counter book and built-in rules

pub mod counter;
pub mod format;

#[cfg(test)]
mod format_props;

pub use counter::{Counter, CounterBook, GeneratedNumber, NumberingRules};
pub use format::{fallback_number, format_number, needs_reset};
