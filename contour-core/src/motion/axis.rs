//! Axis records
//!
//! An [`Axis`] binds an identity and its motion configuration to a driver,
//! and holds the travel limit found by homing. The limit is written once
//! and is read-only afterwards.

use crate::config::AxisConfig;
use crate::error::ScanError;
use crate::safety::AbortFlags;
use crate::traits::AxisDriver;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Axis identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum AxisId {
    /// Outer raster axis
    X,
    /// Inner raster axis
    Y,
    /// Probe axis
    Z,
}

impl AxisId {
    /// All axes in homing order
    pub const ALL: [AxisId; 3] = [AxisId::X, AxisId::Y, AxisId::Z];

    /// Short lowercase name
    pub fn name(self) -> &'static str {
        match self {
            AxisId::X => "x",
            AxisId::Y => "y",
            AxisId::Z => "z",
        }
    }

    /// Index into per-axis arrays
    pub fn index(self) -> usize {
        match self {
            AxisId::X => 0,
            AxisId::Y => 1,
            AxisId::Z => 2,
        }
    }
}

/// One axis of the rig
#[derive(Debug)]
pub struct Axis<D> {
    id: AxisId,
    driver: D,
    config: AxisConfig,
    /// Position at which the boundary sensor triggered during homing
    travel_limit: Option<i32>,
}

impl<D: AxisDriver> Axis<D> {
    /// Create an axis record (not yet homed)
    pub fn new(id: AxisId, driver: D, config: AxisConfig) -> Self {
        Self {
            id,
            driver,
            config,
            travel_limit: None,
        }
    }

    /// Get the axis identity
    pub fn id(&self) -> AxisId {
        self.id
    }

    /// Get the motion configuration
    pub fn config(&self) -> &AxisConfig {
        &self.config
    }

    /// Travel limit recorded by homing
    pub fn travel_limit(&self) -> Option<i32> {
        self.travel_limit
    }

    /// Check if homing has completed
    pub fn is_homed(&self) -> bool {
        self.travel_limit.is_some()
    }

    /// Record the travel limit; fails if it was already recorded
    pub(crate) fn set_travel_limit(&mut self, limit: i32) -> Result<(), ScanError> {
        if self.travel_limit.is_some() {
            return Err(ScanError::AlreadyHomed(self.id));
        }
        self.travel_limit = Some(limit);
        Ok(())
    }

    /// Get the driver
    pub fn driver(&self) -> &D {
        &self.driver
    }

    /// Current position relative to the reference position
    pub fn position(&self) -> i32 {
        self.driver.position()
    }

    /// Sample the boundary sensor
    pub fn boundary_triggered(&mut self) -> bool {
        self.driver.boundary_triggered()
    }

    /// Start running toward the boundary at half speed
    pub fn run_toward_boundary(&mut self) {
        self.driver.run_continuous(i32::from(self.config.half_speed()));
    }

    /// Stop the axis
    pub fn stop(&mut self) {
        self.driver.stop();
    }

    /// Make the current position the reference position
    pub fn zero(&mut self) {
        self.driver.zero_position();
    }

    /// Advance one grid increment at half speed, then stop
    pub async fn step(&mut self, flags: &AbortFlags) -> Result<(), ScanError> {
        let increment = i32::from(self.config.increment);
        let speed = self.config.half_speed();
        self.move_relative(flags, increment, speed).await?;
        self.driver.stop();
        Ok(())
    }

    /// Move back to the reference position at full speed
    pub async fn return_to_reference(&mut self, flags: &AbortFlags) -> Result<(), ScanError> {
        let offset = -self.driver.position();
        if offset != 0 {
            let speed = self.config.max_speed;
            self.move_relative(flags, offset, speed).await?;
        }
        Ok(())
    }

    /// Every commanded move passes the fault check first. A move cut short
    /// by the emergency stop reports the fault, not the halted move.
    async fn move_relative(
        &mut self,
        flags: &AbortFlags,
        degrees: i32,
        speed: u16,
    ) -> Result<(), ScanError> {
        flags.check_fault()?;
        let result = self.driver.run_relative(degrees, speed).await;
        flags.check_fault()?;

        let id = self.id;
        result.map_err(|error| ScanError::Axis { axis: id, error })
    }
}
