//! PWM buzzer
//!
//! Drives a piezo from a PWM channel whose frequency is set at board
//! init. Completion events chime once, faults and skipped cells chime
//! three times, and informational events stay silent.

use contour_core::events::ScanEvent;
use contour_core::traits::Annunciator;
use embedded_hal::pwm::SetDutyCycle;
use embedded_hal_async::delay::DelayNs;

/// Buzzer timing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuzzerConfig {
    /// Length of one beep (ms)
    pub beep_ms: u32,
    /// Silence between beeps of one chime (ms)
    pub gap_ms: u32,
    /// Duty cycle while sounding (percent)
    pub duty_percent: u8,
}

impl Default for BuzzerConfig {
    fn default() -> Self {
        Self {
            beep_ms: 500,
            gap_ms: 150,
            duty_percent: 50,
        }
    }
}

/// Number of beeps announcing an event
pub fn beep_count(event: &ScanEvent) -> u8 {
    if !event.is_audible() {
        0
    } else if event.is_error_event() {
        3
    } else {
        1
    }
}

/// Piezo buzzer annunciator
pub struct Buzzer<P, D> {
    pwm: P,
    delay: D,
    config: BuzzerConfig,
}

impl<P: SetDutyCycle, D: DelayNs> Buzzer<P, D> {
    pub fn new(pwm: P, delay: D, config: BuzzerConfig) -> Self {
        Self { pwm, delay, config }
    }

    async fn beep(&mut self) {
        if self.pwm.set_duty_cycle_percent(self.config.duty_percent).is_err() {
            warn!("Buzzer PWM write failed");
        }
        self.delay.delay_ms(self.config.beep_ms).await;
        if self.pwm.set_duty_cycle_fully_off().is_err() {
            warn!("Buzzer PWM write failed");
        }
    }
}

impl<P: SetDutyCycle, D: DelayNs> Annunciator for Buzzer<P, D> {
    async fn acknowledge(&mut self, event: ScanEvent) {
        let beeps = beep_count(&event);
        for n in 0..beeps {
            if n > 0 {
                self.delay.delay_ms(self.config.gap_ms).await;
            }
            self.beep().await;
        }
    }
}
