//! Axis motor trait
//!
//! Abstracts over the motor that moves one axis of the rig (hub motor with
//! encoder, stepper with step counting, ...). Positions and relative moves
//! are in motor degrees; speeds are in degrees per second.

/// Errors reported by an axis motor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AxisError {
    /// Motor could not make progress (mechanical obstruction)
    Stalled,
    /// Motion was cancelled by a stop before it completed
    Halted,
    /// Communication with the motor controller failed
    Communication,
}

/// Trait for the motor of a single axis
///
/// Position zero is the reference position chosen by the operator when
/// the rig is set up; positive travel moves toward the axis boundary
/// sensor.
#[allow(async_fn_in_trait)]
pub trait AxisMotor {
    /// Start running continuously at `speed` (sign selects direction)
    ///
    /// Returns immediately; the motor keeps running until [`stop`](Self::stop).
    fn run_continuous(&mut self, speed: i32);

    /// Run `degrees` relative to the current position at `speed`
    ///
    /// The sign of `degrees` selects the direction; `speed` is a magnitude.
    /// Suspends the caller until the move completes. A concurrent stop
    /// ends the move early with [`AxisError::Halted`] and leaves
    /// [`position`](Self::position) at the travel actually completed.
    async fn run_relative(&mut self, degrees: i32, speed: u16) -> Result<(), AxisError>;

    /// Stop the motor
    fn stop(&mut self);

    /// Current position relative to the reference position
    fn position(&self) -> i32;

    /// Make the current position the reference (zero) position
    fn zero_position(&mut self);
}
