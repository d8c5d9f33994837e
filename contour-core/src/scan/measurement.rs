//! Measurement stream records
//!
//! The stream is the contract with downstream tooling: one record per
//! probed cell, index strictly increasing, serialized as `i;x;y;z`.

use core::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Header row of the semicolon-delimited stream
pub const MEASUREMENT_HEADER: &str = "i;x;y;z";

/// One height sample
///
/// `x` and `y` are the nominal cell coordinates in motor degrees, `z` the
/// probe height in motor degrees.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Measurement {
    pub index: u32,
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl Measurement {
    pub const fn new(index: u32, x: i32, y: i32, z: i32) -> Self {
        Self { index, x, y, z }
    }

    /// Write the record as one `i;x;y;z` row (no line terminator)
    pub fn write_row<W: fmt::Write>(&self, out: &mut W) -> fmt::Result {
        write!(out, "{};{};{};{}", self.index, self.x, self.y, self.z)
    }
}

impl fmt::Display for Measurement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_row(f)
    }
}
