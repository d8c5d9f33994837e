//! Scripted fakes for unit tests
//!
//! [`FakeAxis`] has no clock of its own: every boundary read that comes
//! back false advances continuous motion by one 10 ms tick, which is what
//! happens between two reads inside `wait_until`.

use embassy_futures::yield_now;
use embedded_hal_async::delay::DelayNs;
use std::vec::Vec;

use crate::events::ScanEvent;
use crate::scan::Measurement;
use crate::traits::{Annunciator, AxisDriver, AxisError, MeasurementSink};

/// Tick length the fake motion model assumes (ms)
pub const TICK_MS: i32 = 10;

#[derive(Debug, Default)]
pub struct FakeAxis {
    pub position: i32,
    pub velocity: i32,
    /// Boundary sensor reads true at or beyond this position
    pub trigger_at: Option<i32>,
    /// Motion stops dead at the trigger position (probe touching a surface)
    pub contact: bool,
    pub relative_moves: u32,
    pub last_speed: u16,
    pub stops: u32,
    pub fail_moves: Option<AxisError>,
}

impl FakeAxis {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn triggering_at(trigger_at: i32) -> Self {
        Self {
            trigger_at: Some(trigger_at),
            ..Self::default()
        }
    }

    pub fn touching_at(depth: i32) -> Self {
        Self {
            trigger_at: Some(depth),
            contact: true,
            ..Self::default()
        }
    }

    fn at_boundary(&self) -> bool {
        self.trigger_at.is_some_and(|t| self.position >= t)
    }
}

impl AxisDriver for FakeAxis {
    fn run_continuous(&mut self, speed: i32) {
        self.velocity = speed;
    }

    async fn run_relative(&mut self, degrees: i32, speed: u16) -> Result<(), AxisError> {
        self.relative_moves += 1;
        self.last_speed = speed;
        if let Some(e) = self.fail_moves {
            return Err(e);
        }
        self.position += degrees;
        yield_now().await;
        Ok(())
    }

    fn stop(&mut self) {
        self.velocity = 0;
        self.stops += 1;
    }

    fn position(&self) -> i32 {
        self.position
    }

    fn zero_position(&mut self) {
        self.position = 0;
    }

    fn boundary_triggered(&mut self) -> bool {
        let hit = self.at_boundary();
        if !hit && self.velocity != 0 {
            self.position += self.velocity * TICK_MS / 1000;
            if let (true, Some(depth)) = (self.contact, self.trigger_at) {
                self.position = self.position.min(depth);
            }
        }
        hit
    }
}

/// Delay that only counts time and yields once
#[derive(Debug, Default)]
pub struct FakeDelay {
    pub elapsed_ms: u32,
}

impl FakeDelay {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DelayNs for FakeDelay {
    async fn delay_ns(&mut self, ns: u32) {
        self.elapsed_ms += ns / 1_000_000;
        yield_now().await;
    }

    async fn delay_ms(&mut self, ms: u32) {
        self.elapsed_ms += ms;
        yield_now().await;
    }
}

impl Annunciator for Vec<ScanEvent> {
    async fn acknowledge(&mut self, event: ScanEvent) {
        self.push(event);
    }
}

impl MeasurementSink for Vec<Measurement> {
    fn reset(&mut self) {
        self.clear();
    }

    fn record(&mut self, measurement: Measurement) {
        self.push(measurement);
    }
}
