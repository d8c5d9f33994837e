//! Simulated rig
//!
//! A deterministic three-axis rig for host tests and the simulator. Time
//! only moves when the scan sequence waits or runs a relative move, so a
//! scan under `block_on` is fully reproducible.
//!
//! ```ignore
//! let rig = SimRig::new(41, 31, |_, _| Some(60));
//! let axes = rig.axes(&config);
//! let scanner = Scanner::new(axes, &flags, rig.delay(), Silent, sink, config)?;
//! ```

pub mod parts;
pub mod rig;

pub use parts::{SimAxis, SimBoundary, SimDelay, SimEStop, SimMotor, SimTilt};
pub use rig::{SimRig, Surface, TICK_MS};
