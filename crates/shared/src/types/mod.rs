//! Common types used across the engine.

pub mod id;
pub mod money;
pub mod period;

pub use id::*;
pub use money::{Currency, Money};
pub use period::ResetPeriod;
