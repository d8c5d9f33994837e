//! Sensor traits
//!
//! Boundary sensors, abort buttons and colour markers all reduce to a
//! digital "is it triggered" predicate. The tilt sensor reports a signed
//! reading in tenths of a degree.

/// A digital condition that is either triggered or not
///
/// Implemented for any `FnMut() -> bool`, so a closure over board
/// peripherals can be bound to an axis directly.
pub trait DigitalSensor {
    /// Sample the sensor
    fn triggered(&mut self) -> bool;
}

impl<F> DigitalSensor for F
where
    F: FnMut() -> bool,
{
    fn triggered(&mut self) -> bool {
        self()
    }
}

/// Tilt (pitch) sensor
///
/// Implemented for any `FnMut() -> i16`.
pub trait TiltSensor {
    /// Current pitch in tenths of a degree
    fn pitch(&mut self) -> i16;
}

impl<F> TiltSensor for F
where
    F: FnMut() -> i16,
{
    fn pitch(&mut self) -> i16 {
        self()
    }
}
