//! Fatal scan errors
//!
//! Anything in [`ScanError`] ends the scan and forbids further motion.
//! Recoverable per-cell conditions (probe timeout, abandoned cell) are
//! reported through [`ProbeOutcome`](crate::motion::ProbeOutcome) instead.

use core::fmt;

use crate::config::ConfigError;
use crate::motion::AxisId;
use crate::traits::AxisError;

/// Errors that terminate a scan
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ScanError {
    /// Boundary sensor never triggered while homing; no limit recorded
    HomingTimeout(AxisId),
    /// Homing requested for an axis whose travel limit is already set
    AlreadyHomed(AxisId),
    /// Grid or probe needed a travel limit that was never recorded
    NotHomed(AxisId),
    /// Tilt left the safety envelope; all motors were stopped
    TiltFault,
    /// Motor fault during a commanded move
    Axis { axis: AxisId, error: AxisError },
    /// Scan configuration rejected
    Config(ConfigError),
}

impl From<ConfigError> for ScanError {
    fn from(e: ConfigError) -> Self {
        ScanError::Config(e)
    }
}

impl fmt::Display for ScanError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScanError::HomingTimeout(axis) => {
                write!(f, "{} boundary sensor did not trigger while homing", axis.name())
            }
            ScanError::AlreadyHomed(axis) => write!(f, "{} axis is already homed", axis.name()),
            ScanError::NotHomed(axis) => write!(f, "{} axis has no travel limit", axis.name()),
            ScanError::TiltFault => write!(f, "tilt fault, motors stopped"),
            ScanError::Axis { axis, error } => {
                write!(f, "{} motor fault: {:?}", axis.name(), error)
            }
            ScanError::Config(e) => write!(f, "invalid scan configuration: {:?}", e),
        }
    }
}
