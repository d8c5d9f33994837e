//! Scan coordinator
//!
//! Owns the three axis records and runs the lifecycle: reset the output,
//! home X, Y and Z, traverse the grid, return X and Y to reference and
//! acknowledge completion. [`run_scan`] runs that sequence alongside the
//! two watchers on a single cooperative future.

use core::convert::Infallible;
use core::future::{pending, Future};

use embassy_futures::select::{select3, Either3};
use embedded_hal_async::delay::DelayNs;

use super::grid::GridDims;
use super::sequencer::run_grid;
use crate::config::ScanConfig;
use crate::error::ScanError;
use crate::events::ScanEvent;
use crate::motion::{home, Axis, AxisId};
use crate::safety::AbortFlags;
use crate::traits::{Annunciator, AxisDriver, MeasurementSink};

/// The three axis records of the rig
#[derive(Debug)]
pub struct Axes<X, Y, Z> {
    pub x: Axis<X>,
    pub y: Axis<Y>,
    pub z: Axis<Z>,
}

impl<X, Y, Z> Axes<X, Y, Z>
where
    X: AxisDriver,
    Y: AxisDriver,
    Z: AxisDriver,
{
    /// Bind the three drivers to their configured axes (none homed yet)
    pub fn new(x: X, y: Y, z: Z, config: &ScanConfig) -> Self {
        Self {
            x: Axis::new(AxisId::X, x, config.x),
            y: Axis::new(AxisId::Y, y, config.y),
            z: Axis::new(AxisId::Z, z, config.z),
        }
    }

    /// Check if all three axes have a travel limit
    pub fn all_homed(&self) -> bool {
        self.x.is_homed() && self.y.is_homed() && self.z.is_homed()
    }
}

/// How a successful scan ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Termination {
    /// Every reachable cell was processed
    Completed,
    /// The operator stopped the scan; the stream is truncated
    UserAbort,
}

/// Summary of a finished scan
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ScanReport {
    pub grid: GridDims,
    /// Measurements emitted
    pub samples: u32,
    /// Cells skipped after a probe timeout
    pub skipped: u32,
    pub termination: Termination,
}

/// Runs the main scan sequence
pub struct Scanner<'a, X, Y, Z, W, A, S> {
    axes: Axes<X, Y, Z>,
    flags: &'a AbortFlags,
    delay: W,
    annunciator: A,
    sink: S,
    config: ScanConfig,
}

impl<'a, X, Y, Z, W, A, S> Scanner<'a, X, Y, Z, W, A, S>
where
    X: AxisDriver,
    Y: AxisDriver,
    Z: AxisDriver,
    W: DelayNs,
    A: Annunciator,
    S: MeasurementSink,
{
    /// Create a scanner; the configuration is validated once here
    pub fn new(
        axes: Axes<X, Y, Z>,
        flags: &'a AbortFlags,
        delay: W,
        annunciator: A,
        sink: S,
        config: ScanConfig,
    ) -> Result<Self, ScanError> {
        config.validate()?;
        Ok(Self {
            axes,
            flags,
            delay,
            annunciator,
            sink,
            config,
        })
    }

    /// Run the full lifecycle
    ///
    /// A user abort is not an error: the report says
    /// [`Termination::UserAbort`] and the rig is back at reference.
    pub async fn run(&mut self) -> Result<ScanReport, ScanError> {
        let flags = self.flags;

        self.sink.reset();
        self.annunciator.acknowledge(ScanEvent::Started).await;
        info!("Scan started");

        home(&mut self.axes.x, flags, &mut self.delay, &mut self.annunciator, &self.config).await?;
        home(&mut self.axes.y, flags, &mut self.delay, &mut self.annunciator, &self.config).await?;
        home(&mut self.axes.z, flags, &mut self.delay, &mut self.annunciator, &self.config).await?;

        let state = run_grid(
            &mut self.axes,
            flags,
            &mut self.delay,
            &mut self.annunciator,
            &mut self.sink,
            &self.config,
        )
        .await?;

        self.axes.y.return_to_reference(flags).await?;
        self.axes.x.return_to_reference(flags).await?;

        let termination = if flags.stop_requested() {
            Termination::UserAbort
        } else {
            Termination::Completed
        };
        info!(
            "Scan finished: {} samples, {} skipped",
            state.samples,
            state.skipped
        );
        self.annunciator.acknowledge(ScanEvent::ScanComplete).await;

        Ok(ScanReport {
            grid: state.grid,
            samples: state.samples,
            skipped: state.skipped,
            termination,
        })
    }

    pub fn axes(&self) -> &Axes<X, Y, Z> {
        &self.axes
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }
}

/// Run the scan sequence alongside both watchers
///
/// The user-abort watcher stays alive after it fires so the scan can
/// finish its graceful unwind. The tilt watcher finishing ends everything:
/// the sequence future is dropped where it stands, after the watcher has
/// already stopped every motor. A sequence that observes the fault first
/// parks until the tilt watcher has finished its acknowledgement.
pub async fn run_scan<M, U, T>(scan: M, user_abort: U, tilt: T) -> Result<ScanReport, ScanError>
where
    M: Future<Output = Result<ScanReport, ScanError>>,
    U: Future<Output = ()>,
    T: Future<Output = i16>,
{
    let scan = async move {
        let result = scan.await;
        if result == Err(ScanError::TiltFault) {
            pending::<()>().await;
        }
        result
    };
    let user_abort = async move {
        user_abort.await;
        pending::<Infallible>().await
    };

    match select3(scan, user_abort, tilt).await {
        Either3::First(result) => result,
        Either3::Second(never) => match never {},
        Either3::Third(_pitch) => Err(ScanError::TiltFault),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AxisConfig;
    use crate::safety::{TiltWatcher, UserAbortWatcher};
    use crate::scan::Measurement;
    use crate::testing::{FakeAxis, FakeDelay};
    use crate::traits::Silent;
    use core::cell::Cell;
    use embassy_futures::{block_on, yield_now};
    use std::vec::Vec;

    type FakeScanner<'a> =
        Scanner<'a, FakeAxis, FakeAxis, FakeAxis, FakeDelay, Vec<ScanEvent>, Vec<Measurement>>;

    fn scanner(flags: &AbortFlags) -> FakeScanner<'_> {
        let config = ScanConfig::default();
        let axes = Axes::new(
            FakeAxis::triggering_at(20),
            FakeAxis::triggering_at(20),
            FakeAxis::touching_at(80),
            &config,
        );
        Scanner::new(axes, flags, FakeDelay::new(), Vec::new(), Vec::new(), config).unwrap()
    }

    #[test]
    fn test_lifecycle_events() {
        let flags = AbortFlags::new();
        let mut scanner = scanner(&flags);

        let report = block_on(scanner.run()).unwrap();

        assert_eq!(report.termination, Termination::Completed);
        assert_eq!((report.grid.nx, report.grid.ny), (2, 2));
        assert_eq!(report.samples, 4);
        assert_eq!(
            scanner.annunciator,
            [
                ScanEvent::Started,
                ScanEvent::LimitFound {
                    axis: AxisId::X,
                    limit: 21
                },
                ScanEvent::AxisHomed(AxisId::X),
                ScanEvent::LimitFound {
                    axis: AxisId::Y,
                    limit: 21
                },
                ScanEvent::AxisHomed(AxisId::Y),
                ScanEvent::LimitFound {
                    axis: AxisId::Z,
                    limit: 80
                },
                ScanEvent::AxisHomed(AxisId::Z),
                ScanEvent::Progress { percent: 25 },
                ScanEvent::Progress { percent: 50 },
                ScanEvent::Progress { percent: 75 },
                ScanEvent::Progress { percent: 100 },
                ScanEvent::ScanComplete,
            ]
        );
        assert!(scanner.axes().all_homed());
        assert_eq!(scanner.axes().x.position(), 0);
        assert_eq!(scanner.axes().y.position(), 0);
    }

    #[test]
    fn test_sink_is_reset_before_scan() {
        let flags = AbortFlags::new();
        let mut scanner = scanner(&flags);
        scanner.sink.push(Measurement::new(9, 9, 9, 9));

        block_on(scanner.run()).unwrap();

        assert_eq!(scanner.sink().len(), 4);
        assert_eq!(scanner.sink()[0].index, 0);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let flags = AbortFlags::new();
        let config = ScanConfig {
            x: AxisConfig::new(600, 0),
            ..Default::default()
        };
        let axes = Axes::new(FakeAxis::new(), FakeAxis::new(), FakeAxis::new(), &config);

        let result = Scanner::new(axes, &flags, FakeDelay::new(), Silent, NullSink, config);
        assert!(matches!(
            result,
            Err(ScanError::Config(crate::config::ConfigError::ZeroIncrement(AxisId::X)))
        ));
    }

    struct NullSink;

    impl MeasurementSink for NullSink {
        fn record(&mut self, _measurement: Measurement) {}
    }

    #[test]
    fn test_homing_timeout_aborts_before_grid() {
        let flags = AbortFlags::new();
        let config = ScanConfig::default();
        let axes = Axes::new(
            FakeAxis::triggering_at(20),
            FakeAxis::new(),
            FakeAxis::touching_at(80),
            &config,
        );
        let mut scanner =
            Scanner::new(axes, &flags, FakeDelay::new(), Silent, Vec::new(), config).unwrap();

        assert_eq!(
            block_on(scanner.run()),
            Err(ScanError::HomingTimeout(AxisId::Y))
        );
        assert!(scanner.sink().is_empty());
        assert!(!scanner.axes().z.is_homed());
    }

    #[test]
    fn test_watchers_idle_scan_completes() {
        let flags = AbortFlags::new();
        let config = ScanConfig::default();
        let mut scanner = scanner(&flags);
        let mut abort =
            UserAbortWatcher::new(|| false, &flags, FakeDelay::new(), Silent, &config);
        let mut tilt =
            TiltWatcher::new(|| 0i16, || {}, &flags, FakeDelay::new(), Silent, &config);

        let result = block_on(run_scan(scanner.run(), abort.watch(), tilt.watch()));

        assert_eq!(result.map(|r| r.termination), Ok(Termination::Completed));
    }

    #[test]
    fn test_user_abort_unwinds_gracefully() {
        let flags = AbortFlags::new();
        let config = ScanConfig::default();
        let mut scanner = scanner(&flags);
        let reads = Cell::new(0u32);
        // fires while homing, so the grid never starts
        let input = || {
            reads.set(reads.get() + 1);
            reads.get() > 3
        };
        let mut abort = UserAbortWatcher::new(input, &flags, FakeDelay::new(), Silent, &config);
        let mut tilt =
            TiltWatcher::new(|| 0i16, || {}, &flags, FakeDelay::new(), Silent, &config);

        let report = block_on(run_scan(scanner.run(), abort.watch(), tilt.watch())).unwrap();

        assert_eq!(report.termination, Termination::UserAbort);
        assert_eq!(report.samples, 0);
        assert!(scanner.axes().all_homed());
        assert_eq!(scanner.axes().x.position(), 0);
        assert_eq!(scanner.annunciator.last(), Some(&ScanEvent::ScanComplete));
    }

    #[test]
    fn test_tilt_fault_ends_scan() {
        let flags = AbortFlags::new();
        let config = ScanConfig::default();
        let mut scanner = scanner(&flags);
        let stops = Cell::new(0u32);
        let mut reads = 0u32;
        let sensor = move || {
            reads += 1;
            if reads > 5 {
                250i16
            } else {
                0
            }
        };
        let mut abort =
            UserAbortWatcher::new(|| false, &flags, FakeDelay::new(), Silent, &config);
        let mut tilt = TiltWatcher::new(
            sensor,
            || stops.set(stops.get() + 1),
            &flags,
            FakeDelay::new(),
            Silent,
            &config,
        );

        let result = block_on(run_scan(scanner.run(), abort.watch(), tilt.watch()));

        assert_eq!(result, Err(ScanError::TiltFault));
        assert_eq!(stops.get(), 1);
        assert!(flags.fault_detected());
        assert!(!scanner.annunciator.contains(&ScanEvent::ScanComplete));
    }

    /// Annunciator whose acknowledgement spans several polls
    #[derive(Default)]
    struct SlowChime {
        finished: Vec<ScanEvent>,
    }

    impl Annunciator for SlowChime {
        async fn acknowledge(&mut self, event: ScanEvent) {
            for _ in 0..5 {
                yield_now().await;
            }
            self.finished.push(event);
        }
    }

    #[test]
    fn test_fault_acknowledgement_runs_to_completion() {
        let flags = AbortFlags::new();
        let config = ScanConfig::default();
        let mut scanner = scanner(&flags);
        let mut chime = SlowChime::default();
        let mut reads = 0u32;
        let sensor = move || {
            reads += 1;
            if reads > 5 {
                -180i16
            } else {
                0
            }
        };
        let mut abort =
            UserAbortWatcher::new(|| false, &flags, FakeDelay::new(), Silent, &config);
        let mut tilt =
            TiltWatcher::new(sensor, || {}, &flags, FakeDelay::new(), &mut chime, &config);

        let result = block_on(run_scan(scanner.run(), abort.watch(), tilt.watch()));
        drop(tilt);

        assert_eq!(result, Err(ScanError::TiltFault));
        assert_eq!(chime.finished, [ScanEvent::FaultDetected { pitch: -180 }]);
    }
}
