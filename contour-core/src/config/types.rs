//! Configuration type definitions
//!
//! Speeds are in motor degrees per second, increments and positions in
//! motor degrees, tilt in tenths of a degree.

use crate::motion::AxisId;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Maximum X/Y speed (deg/s)
pub const DEFAULT_XY_MAX_SPEED: u16 = 600;

/// Maximum Z speed (deg/s)
pub const DEFAULT_Z_MAX_SPEED: u16 = 400;

/// Grid step for X and Y (degrees)
pub const DEFAULT_INCREMENT: u16 = 10;

/// Safety timeout for every sensor wait (ms)
pub const DEFAULT_TIMEOUT_MS: u32 = 10_000;

/// Interval between condition checks (ms)
pub const DEFAULT_POLL_INTERVAL_MS: u32 = 10;

/// Tilt envelope: readings beyond ±this are a fault (tenths of a degree)
pub const DEFAULT_TILT_LIMIT: i16 = 100;

/// How a probe reading becomes a height sample
///
/// The rig's Z motor counts positive toward the surface, so with the probe
/// mounted above the surface a deeper touch means a lower surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum HeightConvention {
    /// `height = travel_limit - reading`: height grows toward the home end
    #[default]
    LimitMinusReading,
    /// `height = reading - travel_limit`: for a probe mounted inverted
    ReadingMinusLimit,
}

impl HeightConvention {
    /// Compute the height for a probe `reading` given the Z travel limit
    pub fn height(self, travel_limit: i32, reading: i32) -> i32 {
        match self {
            HeightConvention::LimitMinusReading => travel_limit.saturating_sub(reading),
            HeightConvention::ReadingMinusLimit => reading.saturating_sub(travel_limit),
        }
    }
}

/// Per-axis motion configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AxisConfig {
    /// Maximum speed in deg/s (return-to-reference moves run at this speed)
    pub max_speed: u16,
    /// Grid step in degrees (0 for the Z axis, which has no grid)
    pub increment: u16,
}

impl AxisConfig {
    /// Create a grid axis configuration
    pub const fn new(max_speed: u16, increment: u16) -> Self {
        Self {
            max_speed,
            increment,
        }
    }

    /// Create a probe axis configuration (no grid increment)
    pub const fn probe(max_speed: u16) -> Self {
        Self {
            max_speed,
            increment: 0,
        }
    }

    /// Speed used for homing, probing and grid steps
    pub fn half_speed(&self) -> u16 {
        self.max_speed / 2
    }
}

/// Complete scan configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ScanConfig {
    /// X axis (outer raster loop)
    pub x: AxisConfig,
    /// Y axis (inner raster loop)
    pub y: AxisConfig,
    /// Z axis (probe)
    pub z: AxisConfig,
    /// Maximum time to find a boundary while homing (ms)
    pub homing_timeout_ms: u32,
    /// Maximum time for the probe to touch the surface (ms)
    pub probe_timeout_ms: u32,
    /// Interval between condition checks in every wait (ms)
    pub poll_interval_ms: u32,
    /// Tilt envelope half-width (tenths of a degree)
    pub tilt_limit: i16,
    /// Probe height sign convention
    pub height_convention: HeightConvention,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            x: AxisConfig::new(DEFAULT_XY_MAX_SPEED, DEFAULT_INCREMENT),
            y: AxisConfig::new(DEFAULT_XY_MAX_SPEED, DEFAULT_INCREMENT),
            z: AxisConfig::probe(DEFAULT_Z_MAX_SPEED),
            homing_timeout_ms: DEFAULT_TIMEOUT_MS,
            probe_timeout_ms: DEFAULT_TIMEOUT_MS,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            tilt_limit: DEFAULT_TILT_LIMIT,
            height_convention: HeightConvention::default(),
        }
    }
}

/// Configuration validation errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Axis would never move (half speed rounds to zero)
    SpeedTooLow(AxisId),
    /// Grid axis has no increment
    ZeroIncrement(AxisId),
    /// Waits would spin without suspending
    ZeroPollInterval,
    /// A timeout is shorter than one poll interval
    TimeoutTooShort,
    /// Tilt envelope must be positive
    InvalidTiltLimit,
}

impl ScanConfig {
    /// Get the configuration for an axis
    pub fn axis(&self, id: AxisId) -> &AxisConfig {
        match id {
            AxisId::X => &self.x,
            AxisId::Y => &self.y,
            AxisId::Z => &self.z,
        }
    }

    /// Check that the configuration can drive a scan
    pub fn validate(&self) -> Result<(), ConfigError> {
        for id in AxisId::ALL {
            if self.axis(id).half_speed() == 0 {
                return Err(ConfigError::SpeedTooLow(id));
            }
        }

        for id in [AxisId::X, AxisId::Y] {
            if self.axis(id).increment == 0 {
                return Err(ConfigError::ZeroIncrement(id));
            }
        }

        if self.poll_interval_ms == 0 {
            return Err(ConfigError::ZeroPollInterval);
        }

        if self.homing_timeout_ms < self.poll_interval_ms
            || self.probe_timeout_ms < self.poll_interval_ms
        {
            return Err(ConfigError::TimeoutTooShort);
        }

        if self.tilt_limit <= 0 {
            return Err(ConfigError::InvalidTiltLimit);
        }

        Ok(())
    }
}
