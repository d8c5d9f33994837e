//! Synthetic surfaces
//!
//! Depth (degrees of Z travel) below the probe at each X/Y position. The
//! Z axis homes at the reference position, so every surface must have
//! contact at (0, 0).

use clap::ValueEnum;
use contour_drivers::sim::Surface;

const BASE_DEPTH: i32 = 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SurfaceKind {
    /// Level plate
    Flat,
    /// Plate sloping up along X and down along Y
    Ramp,
    /// Smooth bump
    Dome,
    /// Bump with a diagonal pattern of holes the probe never touches
    Holes,
}

impl SurfaceKind {
    pub fn depth_fn(self) -> Surface {
        match self {
            SurfaceKind::Flat => flat,
            SurfaceKind::Ramp => ramp,
            SurfaceKind::Dome => dome,
            SurfaceKind::Holes => holes,
        }
    }
}

fn flat(_x: i32, _y: i32) -> Option<i32> {
    Some(BASE_DEPTH)
}

fn ramp(x: i32, y: i32) -> Option<i32> {
    Some(BASE_DEPTH - x / 10 + y / 20)
}

fn dome(x: i32, y: i32) -> Option<i32> {
    let (dx, dy) = (x - 35, y - 25);
    Some(BASE_DEPTH - 20 + (dx * dx + dy * dy) / 60)
}

fn holes(x: i32, y: i32) -> Option<i32> {
    if (x / 10 + y / 10) % 5 == 3 {
        None
    } else {
        dome(x, y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_surface_touches_at_reference() {
        for kind in SurfaceKind::value_variants() {
            let depth = (kind.depth_fn())(0, 0);
            assert!(depth.is_some_and(|d| d > 0), "{:?}", kind);
        }
    }

    #[test]
    fn test_dome_peaks_at_centre() {
        assert_eq!(dome(35, 25), Some(40));
        assert!(dome(0, 0) > dome(35, 25));
    }

    #[test]
    fn test_holes_pattern() {
        assert_eq!(holes(30, 0), None);
        assert_eq!(holes(10, 20), None);
        assert!(holes(20, 0).is_some());
    }
}
