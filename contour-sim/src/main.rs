//! Contour scan simulator
//!
//! Runs the full scan lifecycle against the simulated rig and writes the
//! measurement stream to stdout as `i;x;y;z` with a header row. Logs go
//! to stderr; set `RUST_LOG=info` to follow the scan.
//!
//! Exit status: 0 when the scan completed or was stopped by the operator,
//! 2 on a tilt fault, 3 when a boundary was never found, 1 otherwise.

mod surface;

use std::cell::Cell;
use std::io::{self, StdoutLock, Write};
use std::process::ExitCode;

use clap::Parser;
use contour_core::config::ScanConfig;
use contour_core::events::ScanEvent;
use contour_core::safety::{AbortFlags, TiltWatcher, UserAbortWatcher};
use contour_core::scan::{
    run_scan, Measurement, ScanReport, Scanner, Termination, MEASUREMENT_HEADER,
};
use contour_core::traits::{Annunciator, MeasurementSink};
use contour_core::ScanError;
use contour_drivers::annunciator::{beep_count, forward, ChannelAnnunciator};
use contour_drivers::sim::SimRig;
use embassy_futures::block_on;
use embassy_futures::select::{select, Either};
use embassy_sync::blocking_mutex::raw::NoopRawMutex;
use embassy_sync::channel::Channel;
use log::{debug, error, info, warn};

use surface::SurfaceKind;

/// Acknowledgement events in flight between the scan tasks and the log
const EVENT_QUEUE_SIZE: usize = 32;

#[derive(Parser, Debug)]
#[command(
    name = "contour-sim",
    about = "Simulate a surface-probing raster scan and print the measurement stream",
    long_about = None
)]
struct Args {
    /// Grid cells along X
    #[arg(long, default_value_t = 6, value_parser = clap::value_parser!(u32).range(1..))]
    nx: u32,

    /// Grid cells along Y
    #[arg(long, default_value_t = 4, value_parser = clap::value_parser!(u32).range(1..))]
    ny: u32,

    /// Surface under the probe
    #[arg(long, value_enum, default_value_t = SurfaceKind::Dome)]
    surface: SurfaceKind,

    /// Press the abort button once this many samples were recorded
    #[arg(long)]
    abort_after: Option<u32>,

    /// Tip the rig out of the tilt envelope at this simulated time (ms)
    #[arg(long)]
    tilt_at_ms: Option<u32>,

    /// Pitch reading once the rig tips (tenths of a degree)
    #[arg(long, default_value_t = 150, allow_negative_numbers = true)]
    tilt_pitch: i16,
}

/// Boundary marker position that yields `cells` grid cells
fn marker(cells: u32, increment: u16) -> i32 {
    let position = i64::from(cells) * i64::from(increment) + 1;
    i32::try_from(position).unwrap_or(i32::MAX)
}

/// Writes the measurement stream to stdout
struct StdoutSink<'a> {
    out: StdoutLock<'static>,
    recorded: &'a Cell<u32>,
}

impl<'a> StdoutSink<'a> {
    fn new(recorded: &'a Cell<u32>) -> Self {
        Self {
            out: io::stdout().lock(),
            recorded,
        }
    }
}

impl MeasurementSink for StdoutSink<'_> {
    fn reset(&mut self) {
        self.recorded.set(0);
        if let Err(e) = writeln!(self.out, "{}", MEASUREMENT_HEADER) {
            warn!("Failed to write header: {}", e);
        }
    }

    fn record(&mut self, measurement: Measurement) {
        self.recorded.set(self.recorded.get() + 1);
        if let Err(e) = writeln!(self.out, "{}", measurement) {
            warn!("Failed to write sample {}: {}", measurement.index, e);
        }
    }
}

/// Stands in for the buzzer: every acknowledgement becomes a log line
struct EventLog;

impl EventLog {
    fn log(event: ScanEvent) {
        match beep_count(&event) {
            0 => debug!("{:?}", event),
            beeps => info!("{:?} ({} beep{})", event, beeps, if beeps > 1 { "s" } else { "" }),
        }
    }
}

impl Annunciator for EventLog {
    async fn acknowledge(&mut self, event: ScanEvent) {
        Self::log(event);
    }
}

fn exit_code(e: &ScanError) -> ExitCode {
    match e {
        ScanError::TiltFault => ExitCode::from(2),
        ScanError::HomingTimeout(_) => ExitCode::from(3),
        _ => ExitCode::FAILURE,
    }
}

fn summarize(report: &ScanReport) {
    let how = match report.termination {
        Termination::Completed => "completed",
        Termination::UserAbort => "stopped early",
    };
    info!(
        "Scan {}: {} of {} cells measured, {} skipped",
        how,
        report.samples,
        report.grid.cell_count(),
        report.skipped
    );
}

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();

    let config = ScanConfig::default();
    let mut rig = SimRig::new(
        marker(args.nx, config.x.increment),
        marker(args.ny, config.y.increment),
        args.surface.depth_fn(),
    );
    if let Some(at_ms) = args.tilt_at_ms {
        rig = rig.with_tilt_fault(at_ms, args.tilt_pitch);
    }

    let flags = AbortFlags::new();
    let events: Channel<NoopRawMutex, ScanEvent, EVENT_QUEUE_SIZE> = Channel::new();
    let annunciator = ChannelAnnunciator::new(events.sender());
    let recorded = Cell::new(0u32);

    let mut scanner = match Scanner::new(
        rig.axes(&config),
        &flags,
        rig.delay(),
        annunciator.clone(),
        StdoutSink::new(&recorded),
        config,
    ) {
        Ok(scanner) => scanner,
        Err(e) => {
            error!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    let abort_after = args.abort_after;
    let abort_input = || abort_after.is_some_and(|n| recorded.get() >= n);
    let mut abort = UserAbortWatcher::new(
        abort_input,
        &flags,
        rig.watcher_delay(),
        annunciator.clone(),
        &config,
    );
    let mut tilt = TiltWatcher::new(
        rig.tilt(),
        rig.estop(),
        &flags,
        rig.watcher_delay(),
        annunciator,
        &config,
    );
    let mut event_log = EventLog;

    let scan = run_scan(scanner.run(), abort.watch(), tilt.watch());
    let result = match block_on(select(scan, forward(events.receiver(), &mut event_log))) {
        Either::First(result) => result,
        Either::Second(never) => match never {},
    };
    // Events queued during the final poll of the scan
    while let Ok(event) = events.try_receive() {
        EventLog::log(event);
    }

    info!("Simulated time: {} ms", rig.clock_ms());
    match result {
        Ok(report) => {
            summarize(&report);
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("Scan failed: {}", e);
            exit_code(&e)
        }
    }
}
