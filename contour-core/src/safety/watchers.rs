//! Supervisory watchers
//!
//! Each watcher is a future that runs alongside the scan sequence for the
//! whole scan. Neither holds an axis: they communicate only through
//! [`AbortFlags`], plus the emergency stop line for the tilt watcher.

use embedded_hal_async::delay::DelayNs;

use super::flags::AbortFlags;
use super::tilt::TiltEnvelope;
use crate::config::ScanConfig;
use crate::events::ScanEvent;
use crate::motion::wait_until;
use crate::traits::{Annunciator, DigitalSensor, EmergencyStop, TiltSensor};

/// Watches the abort inputs and requests a graceful early stop
///
/// The input is usually a composite of both abort buttons and the abort
/// colour marker. Motors are never touched here: the sequence observes
/// the flag at its own check points.
pub struct UserAbortWatcher<'a, I, D, A> {
    input: I,
    flags: &'a AbortFlags,
    delay: D,
    annunciator: A,
    poll_interval_ms: u32,
}

impl<'a, I, D, A> UserAbortWatcher<'a, I, D, A>
where
    I: DigitalSensor,
    D: DelayNs,
    A: Annunciator,
{
    pub fn new(
        input: I,
        flags: &'a AbortFlags,
        delay: D,
        annunciator: A,
        config: &ScanConfig,
    ) -> Self {
        Self {
            input,
            flags,
            delay,
            annunciator,
            poll_interval_ms: config.poll_interval_ms,
        }
    }

    /// Wait for an abort input, then raise the early-stop flag
    ///
    /// Completes once the flag is set. The acknowledgement is emitted only
    /// if this watcher raised the flag.
    pub async fn watch(&mut self) {
        let input = &mut self.input;
        let flags = self.flags;
        wait_until(&mut self.delay, self.poll_interval_ms, None, || {
            input.triggered() || flags.stop_requested()
        })
        .await;

        if self.flags.request_stop() {
            warn!("Stopping early because user requested");
            self.annunciator
                .acknowledge(ScanEvent::AbortRequested)
                .await;
        }
    }
}

/// Watches the tilt sensor and performs the emergency stop
pub struct TiltWatcher<'a, T, E, D, A> {
    sensor: T,
    estop: E,
    flags: &'a AbortFlags,
    delay: D,
    annunciator: A,
    envelope: TiltEnvelope,
    poll_interval_ms: u32,
}

impl<'a, T, E, D, A> TiltWatcher<'a, T, E, D, A>
where
    T: TiltSensor,
    E: EmergencyStop,
    D: DelayNs,
    A: Annunciator,
{
    pub fn new(
        sensor: T,
        estop: E,
        flags: &'a AbortFlags,
        delay: D,
        annunciator: A,
        config: &ScanConfig,
    ) -> Self {
        Self {
            sensor,
            estop,
            flags,
            delay,
            annunciator,
            envelope: TiltEnvelope::from_config(config),
            poll_interval_ms: config.poll_interval_ms,
        }
    }

    /// Wait for the pitch to leave the envelope, then stop everything
    ///
    /// Latches the fault before stopping the motors, so the sequence can
    /// never issue another move. Returns the offending reading.
    pub async fn watch(&mut self) -> i16 {
        let sensor = &mut self.sensor;
        let envelope = self.envelope;
        let mut pitch = 0;
        wait_until(&mut self.delay, self.poll_interval_ms, None, || {
            pitch = sensor.pitch();
            !envelope.contains(pitch)
        })
        .await;

        self.flags.signal_fault();
        self.estop.stop_all();
        error!("Stopping because pitch measures {} degrees", pitch / 10);
        self.annunciator
            .acknowledge(ScanEvent::FaultDetected { pitch })
            .await;

        pitch
    }
}
