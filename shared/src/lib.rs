//! Shared types and rules for the drought and flood risk platform
//!
//! This crate holds the pure pipeline: sample aggregation, monthly condition
//! classification, yearly rollup, and trend comparison. It performs no I/O.

pub mod models;
pub mod types;
pub mod validation;

pub use models::*;
pub use types::*;
pub use validation::*;
