//! Homing
//!
//! Drives an axis from its reference position to its boundary sensor,
//! records the trigger position as the travel limit, and returns the axis
//! to the reference position.

use embedded_hal_async::delay::DelayNs;

use super::axis::Axis;
use super::wait::{wait_until, WaitOutcome};
use crate::config::ScanConfig;
use crate::error::ScanError;
use crate::events::ScanEvent;
use crate::safety::AbortFlags;
use crate::traits::{Annunciator, AxisDriver};

/// Home one axis and return its travel limit
///
/// The position where the operator left the axis becomes the reference
/// position. A boundary that never triggers within the homing timeout is
/// fatal: the axis is stopped and no limit is recorded. An early-stop
/// request does not interrupt homing; a tilt fault does.
pub async fn home<D, W, A>(
    axis: &mut Axis<D>,
    flags: &AbortFlags,
    delay: &mut W,
    annunciator: &mut A,
    config: &ScanConfig,
) -> Result<i32, ScanError>
where
    D: AxisDriver,
    W: DelayNs,
    A: Annunciator,
{
    let id = axis.id();
    if axis.is_homed() {
        return Err(ScanError::AlreadyHomed(id));
    }
    flags.check_fault()?;

    info!("Homing {} axis", id.name());
    axis.zero();
    axis.run_toward_boundary();

    let outcome = wait_until(
        delay,
        config.poll_interval_ms,
        Some(config.homing_timeout_ms),
        || axis.boundary_triggered() || flags.fault_detected(),
    )
    .await;
    axis.stop();
    flags.check_fault()?;

    if outcome == WaitOutcome::TimedOut {
        error!(
            "{} boundary not found within {} ms",
            id.name(),
            config.homing_timeout_ms
        );
        return Err(ScanError::HomingTimeout(id));
    }

    let limit = axis.position();
    axis.set_travel_limit(limit)?;
    info!("Max {}: {}", id.name(), limit);
    annunciator
        .acknowledge(ScanEvent::LimitFound { axis: id, limit })
        .await;

    axis.return_to_reference(flags).await?;
    axis.stop();
    annunciator.acknowledge(ScanEvent::AxisHomed(id)).await;

    Ok(limit)
}
