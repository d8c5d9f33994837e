//! Motion control
//!
//! Axis records, the shared condition-wait primitive, and the two motion
//! procedures built on it: homing and probing.

pub mod axis;
pub mod homing;
pub mod probe;
pub mod wait;

pub use axis::{Axis, AxisId};
pub use homing::home;
pub use probe::{probe, ProbeOutcome};
pub use wait::{wait_until, WaitOutcome};
