//! Tilt safety envelope

use crate::config::ScanConfig;

/// Symmetric pitch window the rig may operate in (tenths of a degree)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TiltEnvelope {
    limit: i16,
}

impl TiltEnvelope {
    /// Create an envelope of ±`limit`
    pub const fn new(limit: i16) -> Self {
        Self { limit }
    }

    /// Envelope from the scan configuration
    pub fn from_config(config: &ScanConfig) -> Self {
        Self::new(config.tilt_limit)
    }

    /// Envelope half-width
    pub fn limit(&self) -> i16 {
        self.limit
    }

    /// Check if a pitch reading is within the envelope (bounds inclusive)
    pub fn contains(&self, pitch: i16) -> bool {
        (-self.limit..=self.limit).contains(&pitch)
    }
}
