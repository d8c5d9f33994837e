//! Hardware abstraction traits
//!
//! These traits define the interface between the scan logic and
//! board-specific implementations.

pub mod driver;
pub mod motor;
pub mod output;
pub mod sensor;

pub use driver::{AxisAdapter, AxisDriver};
pub use motor::{AxisError, AxisMotor};
pub use output::{Annunciator, EmergencyStop, MeasurementSink, Silent};
pub use sensor::{DigitalSensor, TiltSensor};
