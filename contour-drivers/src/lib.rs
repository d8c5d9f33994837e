//! Hardware driver implementations
//!
//! Concrete implementations of the traits defined in contour-core:
//!
//! - Sensors (debounced endstop, abort button panel)
//! - Annunciators (PWM buzzer, channel fan-in)
//! - Simulated rig for host tests and the simulator

#![no_std]
#![deny(unsafe_code)]

#[cfg(test)]
#[macro_use]
extern crate std;

// Must come first so the logging macros are visible to every module.
mod fmt;

pub mod annunciator;
pub mod sensor;
pub mod sim;
