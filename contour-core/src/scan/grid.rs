//! Grid geometry and scan progress

use super::measurement::Measurement;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Grid cell index
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Cell {
    pub nx: u32,
    pub ny: u32,
}

impl Cell {
    pub const fn new(nx: u32, ny: u32) -> Self {
        Self { nx, ny }
    }
}

/// Grid dimensions derived from the homed travel limits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GridDims {
    pub nx: u32,
    pub ny: u32,
    /// X increment (degrees)
    pub x_increment: u16,
    /// Y increment (degrees)
    pub y_increment: u16,
}

impl GridDims {
    /// Derive the grid from the X/Y travel limits
    ///
    /// Floor division: a partial last row or column is never probed. A
    /// non-positive limit yields an empty axis.
    pub fn from_limits(x_limit: i32, y_limit: i32, x_increment: u16, y_increment: u16) -> Self {
        Self {
            nx: cells_along(x_limit, x_increment),
            ny: cells_along(y_limit, y_increment),
            x_increment,
            y_increment,
        }
    }

    /// Total number of cells
    pub fn cell_count(&self) -> u32 {
        self.nx.saturating_mul(self.ny)
    }

    /// Check if the grid has no cells
    pub fn is_empty(&self) -> bool {
        self.cell_count() == 0
    }

    /// Nominal `(x, y)` coordinates of a cell (index × increment)
    pub fn nominal(&self, cell: Cell) -> (i32, i32) {
        (
            scale(cell.nx, self.x_increment),
            scale(cell.ny, self.y_increment),
        )
    }
}

fn cells_along(limit: i32, increment: u16) -> u32 {
    if increment == 0 {
        return 0;
    }
    limit.max(0).unsigned_abs() / u32::from(increment)
}

fn scale(index: u32, increment: u16) -> i32 {
    let value = i64::from(index) * i64::from(increment);
    i32::try_from(value).unwrap_or(i32::MAX)
}

/// Progress of one raster scan
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ScanState {
    pub grid: GridDims,
    /// Cell currently being processed
    pub cell: Cell,
    /// Measurements emitted so far; also the next sample index
    pub samples: u32,
    /// Cells skipped because the probe never touched the surface
    pub skipped: u32,
}

impl ScanState {
    pub fn new(grid: GridDims) -> Self {
        Self {
            grid,
            cell: Cell::default(),
            samples: 0,
            skipped: 0,
        }
    }

    /// Build the measurement for the current cell and advance the index
    pub fn next_measurement(&mut self, height: i32) -> Measurement {
        let (x, y) = self.grid.nominal(self.cell);
        let measurement = Measurement::new(self.samples, x, y, height);
        self.samples += 1;
        measurement
    }

    /// Record a cell the probe could not measure
    pub fn skip_cell(&mut self) {
        self.skipped += 1;
    }

    /// Percentage of cells processed (measured or skipped)
    pub fn progress_percent(&self) -> u8 {
        let total = self.grid.cell_count();
        if total == 0 {
            return 100;
        }
        let done = u64::from(self.samples + self.skipped) * 100 / u64::from(total);
        done.min(100) as u8
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_floor_division() {
        let grid = GridDims::from_limits(215, 99, 10, 20);
        assert_eq!(grid.nx, 21);
        assert_eq!(grid.ny, 4);
        assert_eq!(grid.cell_count(), 84);
    }

    #[test]
    fn test_short_or_negative_travel_is_empty() {
        assert!(GridDims::from_limits(9, 100, 10, 10).is_empty());
        assert!(GridDims::from_limits(-40, 100, 10, 10).is_empty());
    }

    #[test]
    fn test_nominal_coordinates() {
        let grid = GridDims::from_limits(45, 45, 10, 20);
        assert_eq!(grid.nominal(Cell::new(0, 0)), (0, 0));
        assert_eq!(grid.nominal(Cell::new(3, 1)), (30, 20));
        assert_eq!(grid.nominal(Cell::new(u32::MAX, 0)).0, i32::MAX);
    }

    #[test]
    fn test_measurements_and_progress() {
        let mut state = ScanState::new(GridDims::from_limits(20, 20, 10, 10));
        state.cell = Cell::new(1, 0);

        let m = state.next_measurement(7);
        assert_eq!(m, Measurement::new(0, 10, 0, 7));
        assert_eq!(state.progress_percent(), 25);

        state.skip_cell();
        assert_eq!(state.samples, 1);
        assert_eq!(state.progress_percent(), 50);
    }

    #[test]
    fn test_empty_grid_progress() {
        let state = ScanState::new(GridDims::from_limits(0, 0, 10, 10));
        assert_eq!(state.progress_percent(), 100);
    }

    proptest! {
        #[test]
        fn test_partial_cells_are_dropped(nx in 0u32..12, ny in 0u32..12, inc in 1u16..50) {
            let limit_x = (nx * u32::from(inc)) as i32;
            let limit_y = (ny * u32::from(inc)) as i32 + i32::from(inc) - 1;
            let grid = GridDims::from_limits(limit_x, limit_y, inc, inc);
            prop_assert_eq!(grid.nx, nx);
            prop_assert_eq!(grid.ny, ny);
            prop_assert_eq!(grid.cell_count(), nx * ny);

            let (last_x, last_y) = grid.nominal(Cell::new(nx, ny));
            prop_assert!(last_x <= limit_x && last_y <= limit_y);
        }
    }
}
