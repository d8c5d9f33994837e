//! Configuration types
//!
//! Scan parameters are fixed constants supplied at startup. There is no
//! configuration file; boards build a [`ScanConfig`] (usually the default)
//! and hand it to the coordinator, which validates it once.

pub mod types;

pub use types::*;
