//! Board-agnostic core logic for the Contour surface prober
//!
//! This crate contains all scan logic that does not depend on specific
//! hardware implementations:
//!
//! - Hardware abstraction traits (axis motor, sensors, annunciator, sinks)
//! - Configuration type definitions
//! - Motion primitives (condition waits, homing, probing)
//! - Grid sequencing and the scan coordinator
//! - Safety flags and the supervisory watchers
//!
//! Everything is `async` and executor-agnostic. The only time source is an
//! [`embedded_hal_async::delay::DelayNs`] supplied by the caller, so the
//! same code runs under embassy on the rig and under `block_on` in tests.

#![no_std]
#![deny(unsafe_code)]

#[cfg(test)]
#[macro_use]
extern crate std;

// Must come first so the logging macros are visible to every module.
mod fmt;

pub mod config;
pub mod error;
pub mod events;
pub mod motion;
pub mod safety;
pub mod scan;
pub mod traits;

#[cfg(test)]
pub(crate) mod testing;

pub use error::ScanError;
