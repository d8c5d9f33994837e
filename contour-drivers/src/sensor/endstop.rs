//! Debounced endstop input
//!
//! Boundary sensors and buttons on a GPIO pin. A reading counts as
//! triggered only after a number of consecutive active samples. A pin
//! that cannot be read reports triggered so the axis stops.

use contour_core::traits::DigitalSensor;
use embedded_hal::digital::InputPin;

/// Endstop on a GPIO input
pub struct Endstop<P> {
    pin: P,
    /// If true, triggered = pin LOW
    active_low: bool,
    /// Consecutive active samples required
    debounce: u8,
    /// Active samples seen so far
    active_count: u8,
}

impl<P: InputPin> Endstop<P> {
    /// Create an endstop that triggers on the first active sample
    pub fn new(pin: P, active_low: bool) -> Self {
        Self {
            pin,
            active_low,
            debounce: 1,
            active_count: 0,
        }
    }

    /// Endstop with a pull-up, switch to ground (the common wiring)
    pub fn new_active_low(pin: P) -> Self {
        Self::new(pin, true)
    }

    /// Endstop that drives the pin high when triggered
    pub fn new_active_high(pin: P) -> Self {
        Self::new(pin, false)
    }

    /// Require `samples` consecutive active readings (at least one)
    pub fn with_debounce(mut self, samples: u8) -> Self {
        self.debounce = samples.max(1);
        self
    }

    fn sample(&mut self) -> bool {
        let level = if self.active_low {
            self.pin.is_low()
        } else {
            self.pin.is_high()
        };

        match level {
            Ok(active) => active,
            Err(_) => {
                warn!("Endstop read failed, treating as triggered");
                true
            }
        }
    }
}

impl<P: InputPin> DigitalSensor for Endstop<P> {
    fn triggered(&mut self) -> bool {
        if self.sample() {
            self.active_count = self.active_count.saturating_add(1);
        } else {
            self.active_count = 0;
        }
        self.active_count >= self.debounce
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use core::convert::Infallible;
    use embedded_hal::digital::{self, ErrorKind, ErrorType};
    use std::vec::Vec;

    /// Mock input pin replaying a level sequence (last level repeats)
    pub(crate) struct MockPin {
        levels: Vec<bool>,
        reads: usize,
    }

    impl MockPin {
        pub(crate) fn new(levels: &[bool]) -> Self {
            Self {
                levels: levels.to_vec(),
                reads: 0,
            }
        }

        fn next_level(&mut self) -> bool {
            let i = self.reads.min(self.levels.len() - 1);
            self.reads += 1;
            self.levels[i]
        }
    }

    impl ErrorType for MockPin {
        type Error = Infallible;
    }

    impl InputPin for MockPin {
        fn is_high(&mut self) -> Result<bool, Self::Error> {
            Ok(self.next_level())
        }

        fn is_low(&mut self) -> Result<bool, Self::Error> {
            Ok(!self.next_level())
        }
    }

    #[derive(Debug)]
    struct PinFault;

    impl digital::Error for PinFault {
        fn kind(&self) -> ErrorKind {
            ErrorKind::Other
        }
    }

    struct BrokenPin;

    impl ErrorType for BrokenPin {
        type Error = PinFault;
    }

    impl InputPin for BrokenPin {
        fn is_high(&mut self) -> Result<bool, Self::Error> {
            Err(PinFault)
        }

        fn is_low(&mut self) -> Result<bool, Self::Error> {
            Err(PinFault)
        }
    }

    #[test]
    fn test_active_low() {
        let mut endstop = Endstop::new_active_low(MockPin::new(&[true, true, false]));

        assert!(!endstop.triggered());
        assert!(!endstop.triggered());
        assert!(endstop.triggered());
    }

    #[test]
    fn test_active_high() {
        let mut endstop = Endstop::new_active_high(MockPin::new(&[false, true]));

        assert!(!endstop.triggered());
        assert!(endstop.triggered());
    }

    #[test]
    fn test_debounce_rejects_glitch() {
        let pin = MockPin::new(&[true, false, true, true, true]);
        let mut endstop = Endstop::new_active_high(pin).with_debounce(3);

        let readings: Vec<bool> = (0..5).map(|_| endstop.triggered()).collect();
        assert_eq!(readings, [false, false, false, false, true]);
    }

    #[test]
    fn test_read_error_is_triggered() {
        let mut endstop = Endstop::new_active_low(BrokenPin);
        assert!(endstop.triggered());
    }
}
