//! Scan sequencing
//!
//! Grid geometry and progress state, the measurement record, the raster
//! sequencer, and the coordinator that runs the full scan lifecycle.

pub mod coordinator;
pub mod grid;
pub mod measurement;
pub mod sequencer;

pub use coordinator::{run_scan, Axes, ScanReport, Scanner, Termination};
pub use grid::{Cell, GridDims, ScanState};
pub use measurement::{Measurement, MEASUREMENT_HEADER};
pub use sequencer::run_grid;
