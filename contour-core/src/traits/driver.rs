//! Axis driver trait
//!
//! The uniform capability set every axis exposes to the scan logic: run
//! continuously, run relative, stop, read position and read the boundary
//! sensor. [`AxisAdapter`] builds one from a motor and a sensor.

use super::motor::{AxisError, AxisMotor};
use super::sensor::DigitalSensor;

/// Uniform per-axis capability set
///
/// No retries happen at this layer; motor faults propagate to the caller.
#[allow(async_fn_in_trait)]
pub trait AxisDriver {
    /// Start running continuously at `speed` (sign selects direction)
    fn run_continuous(&mut self, speed: i32);

    /// Run `degrees` relative to the current position, suspending until done
    async fn run_relative(&mut self, degrees: i32, speed: u16) -> Result<(), AxisError>;

    /// Stop the axis
    fn stop(&mut self);

    /// Current position relative to the reference position
    fn position(&self) -> i32;

    /// Make the current position the reference position
    fn zero_position(&mut self);

    /// Sample the axis boundary sensor
    fn boundary_triggered(&mut self) -> bool;
}

/// Axis driver built from a motor and its boundary sensor
#[derive(Debug)]
pub struct AxisAdapter<M, S> {
    motor: M,
    boundary: S,
}

impl<M: AxisMotor, S: DigitalSensor> AxisAdapter<M, S> {
    /// Bind a motor to the sensor that marks its travel boundary
    pub fn new(motor: M, boundary: S) -> Self {
        Self { motor, boundary }
    }
}

impl<M: AxisMotor, S: DigitalSensor> AxisDriver for AxisAdapter<M, S> {
    fn run_continuous(&mut self, speed: i32) {
        self.motor.run_continuous(speed);
    }

    async fn run_relative(&mut self, degrees: i32, speed: u16) -> Result<(), AxisError> {
        self.motor.run_relative(degrees, speed).await
    }

    fn stop(&mut self) {
        self.motor.stop();
    }

    fn position(&self) -> i32 {
        self.motor.position()
    }

    fn zero_position(&mut self) {
        self.motor.zero_position();
    }

    fn boundary_triggered(&mut self) -> bool {
        self.boundary.triggered()
    }
}
