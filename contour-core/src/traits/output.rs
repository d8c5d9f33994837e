//! Output traits
//!
//! Everything the scan emits: operator acknowledgements, the measurement
//! stream, and the emergency stop line.

use crate::events::ScanEvent;
use crate::scan::Measurement;

/// Operator acknowledgement (buzzer, speaker, status LED, log)
///
/// Every state transition is announced so an operator without a display
/// can follow the scan by sound alone.
#[allow(async_fn_in_trait)]
pub trait Annunciator {
    /// Announce an event
    async fn acknowledge(&mut self, event: ScanEvent);
}

impl<A: Annunciator + ?Sized> Annunciator for &mut A {
    async fn acknowledge(&mut self, event: ScanEvent) {
        (**self).acknowledge(event).await
    }
}

/// Annunciator that discards every event
#[derive(Debug, Clone, Copy, Default)]
pub struct Silent;

impl Annunciator for Silent {
    async fn acknowledge(&mut self, _event: ScanEvent) {}
}

/// Consumer of the measurement stream (chart, UART, file)
pub trait MeasurementSink {
    /// Clear any previous output before a scan starts
    fn reset(&mut self) {}

    /// Record one measurement
    fn record(&mut self, measurement: Measurement);
}

impl<S: MeasurementSink + ?Sized> MeasurementSink for &mut S {
    fn reset(&mut self) {
        (**self).reset();
    }

    fn record(&mut self, measurement: Measurement) {
        (**self).record(measurement);
    }
}

/// Fixed-capacity buffer; measurements beyond capacity are dropped
impl<const N: usize> MeasurementSink for heapless::Vec<Measurement, N> {
    fn reset(&mut self) {
        self.clear();
    }

    fn record(&mut self, measurement: Measurement) {
        if self.push(measurement).is_err() {
            warn!("Measurement buffer full, dropping sample {}", measurement.index);
        }
    }
}

/// Stops every motor of the rig at once
///
/// This is the only motion capability handed to the tilt watcher. It
/// bypasses the axis records owned by the scan sequence.
pub trait EmergencyStop {
    /// Stop all motors immediately
    fn stop_all(&mut self);
}

impl<F> EmergencyStop for F
where
    F: FnMut(),
{
    fn stop_all(&mut self) {
        self()
    }
}
