//! Operator abort inputs
//!
//! Either of the two hub buttons or the abort colour marker in front of
//! the X colour sensor requests an early stop.

use contour_core::traits::DigitalSensor;

/// Composite abort input
pub struct AbortPanel<L, R, M> {
    left: L,
    right: R,
    marker: M,
}

impl<L, R, M> AbortPanel<L, R, M>
where
    L: DigitalSensor,
    R: DigitalSensor,
    M: DigitalSensor,
{
    pub fn new(left: L, right: R, marker: M) -> Self {
        Self {
            left,
            right,
            marker,
        }
    }
}

impl<L, R, M> DigitalSensor for AbortPanel<L, R, M>
where
    L: DigitalSensor,
    R: DigitalSensor,
    M: DigitalSensor,
{
    fn triggered(&mut self) -> bool {
        // Sample every input so debounce state stays current
        let left = self.left.triggered();
        let right = self.right.triggered();
        let marker = self.marker.triggered();
        if left || right || marker {
            debug!("Abort input: left={} right={} marker={}", left, right, marker);
        }
        left || right || marker
    }
}
