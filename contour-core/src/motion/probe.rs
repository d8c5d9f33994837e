//! Surface probing
//!
//! Lowers the Z probe until it touches the surface, converts the touch
//! position into a height, and retracts to the reference position.

use embedded_hal_async::delay::DelayNs;

use super::axis::{Axis, AxisId};
use super::wait::{wait_until, WaitOutcome};
use crate::config::ScanConfig;
use crate::error::ScanError;
use crate::safety::AbortFlags;
use crate::traits::AxisDriver;

/// Per-cell result of a probe
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ProbeOutcome {
    /// Probe touched the surface; height per the configured convention
    Contact { height: i32 },
    /// Early stop requested while lowering; the cell is abandoned
    Abandoned,
    /// No contact within the probe timeout; the cell is skipped
    TimedOut,
}

/// Probe the surface below the current X/Y position
///
/// Every non-fatal outcome leaves the probe back at its reference
/// position. Fatal conditions (tilt fault, motor fault, unhomed Z axis)
/// return an error without further motion.
pub async fn probe<D, W>(
    z: &mut Axis<D>,
    flags: &AbortFlags,
    delay: &mut W,
    config: &ScanConfig,
) -> Result<ProbeOutcome, ScanError>
where
    D: AxisDriver,
    W: DelayNs,
{
    let travel_limit = z.travel_limit().ok_or(ScanError::NotHomed(AxisId::Z))?;
    flags.check_fault()?;

    z.run_toward_boundary();
    let outcome = wait_until(
        delay,
        config.poll_interval_ms,
        Some(config.probe_timeout_ms),
        || z.boundary_triggered() || flags.stop_requested() || flags.fault_detected(),
    )
    .await;
    z.stop();
    flags.check_fault()?;

    let result = if flags.stop_requested() {
        debug!("Probe abandoned at {}", z.position());
        ProbeOutcome::Abandoned
    } else if outcome == WaitOutcome::TimedOut {
        ProbeOutcome::TimedOut
    } else {
        let reading = z.position();
        ProbeOutcome::Contact {
            height: config.height_convention.height(travel_limit, reading),
        }
    };

    z.return_to_reference(flags).await?;
    Ok(result)
}
