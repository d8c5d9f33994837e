//! Raster grid sequencer
//!
//! X is the outer loop and Y the inner loop. Each cell: check the boundary
//! sensor and the early-stop flag, step one increment, probe. The boundary
//! check guards against drift between the computed grid and the physical
//! travel. Every exit from a loop returns its axis to reference.

use embedded_hal_async::delay::DelayNs;

use super::coordinator::Axes;
use super::grid::{Cell, GridDims, ScanState};
use crate::config::ScanConfig;
use crate::error::ScanError;
use crate::events::ScanEvent;
use crate::motion::{probe, AxisId, ProbeOutcome};
use crate::safety::AbortFlags;
use crate::traits::{Annunciator, AxisDriver, MeasurementSink};

/// Traverse the grid derived from the homed X/Y limits
///
/// Returns the final scan state. An early stop unwinds gracefully and is
/// not an error; fatal errors return immediately without further motion.
pub async fn run_grid<X, Y, Z, W, A, S>(
    axes: &mut Axes<X, Y, Z>,
    flags: &AbortFlags,
    delay: &mut W,
    annunciator: &mut A,
    sink: &mut S,
    config: &ScanConfig,
) -> Result<ScanState, ScanError>
where
    X: AxisDriver,
    Y: AxisDriver,
    Z: AxisDriver,
    W: DelayNs,
    A: Annunciator,
    S: MeasurementSink,
{
    let x_limit = axes.x.travel_limit().ok_or(ScanError::NotHomed(AxisId::X))?;
    let y_limit = axes.y.travel_limit().ok_or(ScanError::NotHomed(AxisId::Y))?;
    let grid = GridDims::from_limits(
        x_limit,
        y_limit,
        axes.x.config().increment,
        axes.y.config().increment,
    );
    let mut state = ScanState::new(grid);
    info!("Scanning {} x {} grid", grid.nx, grid.ny);

    for nx in 0..grid.nx {
        if axes.x.boundary_triggered() || flags.stop_requested() {
            break;
        }
        axes.x.step(flags).await?;

        for ny in 0..grid.ny {
            if axes.y.boundary_triggered() || flags.stop_requested() {
                break;
            }
            axes.y.step(flags).await?;

            state.cell = Cell::new(nx, ny);
            match probe(&mut axes.z, flags, delay, config).await? {
                ProbeOutcome::Contact { height } => {
                    let measurement = state.next_measurement(height);
                    trace!(
                        "Sample {}: {} {} {}",
                        measurement.index,
                        measurement.x,
                        measurement.y,
                        measurement.z
                    );
                    sink.record(measurement);
                }
                ProbeOutcome::TimedOut => {
                    state.skip_cell();
                    warn!("No surface contact at cell ({}, {}), skipping", nx, ny);
                    annunciator
                        .acknowledge(ScanEvent::ProbeMissed { nx, ny })
                        .await;
                }
                ProbeOutcome::Abandoned => continue,
            }

            let percent = state.progress_percent();
            debug!("Progress: {}%", percent);
            annunciator
                .acknowledge(ScanEvent::Progress { percent })
                .await;
        }

        axes.y.return_to_reference(flags).await?;
    }

    axes.x.return_to_reference(flags).await?;
    Ok(state)
}
