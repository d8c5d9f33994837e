//! Scan events
//!
//! Every state transition of a scan is published as a [`ScanEvent`] to the
//! annunciator. Audible events get a chime; the rest are informational.

use crate::motion::AxisId;

/// Events announced during a scan
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ScanEvent {
    /// Scan lifecycle started, display state cleared
    Started,
    /// Homing found the boundary of an axis
    LimitFound { axis: AxisId, limit: i32 },
    /// Axis returned to its reference position after homing
    AxisHomed(AxisId),
    /// Grid progress after a cell was processed
    Progress { percent: u8 },
    /// Probe never touched the surface at a cell; cell skipped
    ProbeMissed { nx: u32, ny: u32 },
    /// Operator requested an early stop
    AbortRequested,
    /// Tilt left the safety envelope; motors stopped
    FaultDetected { pitch: i16 },
    /// Scan finished and the rig is back at its reference position
    ScanComplete,
}

impl ScanEvent {
    /// Check if this event should produce an audible acknowledgement
    pub fn is_audible(&self) -> bool {
        !matches!(self, ScanEvent::Started | ScanEvent::Progress { .. })
    }

    /// Check if this event reports a fault or a skipped cell
    pub fn is_error_event(&self) -> bool {
        matches!(
            self,
            ScanEvent::FaultDetected { .. } | ScanEvent::ProbeMissed { .. }
        )
    }
}
