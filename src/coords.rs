//! Geographic coordinates and the raster cell transform.
//!
//! This module defines [`GeoPosition`] (longitude/latitude in radians) and
//! [`GeoGrid`], the exact equirectangular mapping between pixel cells of a
//! classification raster and geographic positions. The mapping is invertible
//! for on-grid coordinates: `cell_of(cell_center(x, y)) == (x, y)` for every
//! cell of the raster.
use std::f64::consts::PI;

use glam::DVec3;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A geographic position in radians.
///
/// Longitude lies in `(-PI, PI]`, latitude in `[-PI/2, PI/2]`.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GeoPosition {
    /// Longitude in radians, positive east.
    pub lon: f64,
    /// Latitude in radians, positive north.
    pub lat: f64,
}

impl GeoPosition {
    /// Creates a position from radians.
    pub const fn new(lon: f64, lat: f64) -> Self {
        Self { lon, lat }
    }

    /// Creates a position from degrees.
    pub fn from_degrees(lon_deg: f64, lat_deg: f64) -> Self {
        Self {
            lon: lon_deg.to_radians(),
            lat: lat_deg.to_radians(),
        }
    }

    /// Returns `(lon, lat)` in degrees.
    pub fn to_degrees(self) -> (f64, f64) {
        (self.lon.to_degrees(), self.lat.to_degrees())
    }

    /// Projects the position onto the unit sphere.
    pub fn to_unit_vector(self) -> DVec3 {
        let (sin_lat, cos_lat) = self.lat.sin_cos();
        let (sin_lon, cos_lon) = self.lon.sin_cos();
        DVec3::new(cos_lat * cos_lon, cos_lat * sin_lon, sin_lat)
    }

    /// Central angle between two positions in radians.
    pub fn angular_distance(self, other: Self) -> f64 {
        let d = self.to_unit_vector().dot(other.to_unit_vector());
        d.clamp(-1.0, 1.0).acos()
    }
}

/// Pixel dimensions of a raster together with the cell transform.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GeoGrid {
    width: u32,
    height: u32,
}

impl GeoGrid {
    /// Creates a grid. Both dimensions must be non-zero.
    pub fn new(width: u32, height: u32) -> Self {
        debug_assert!(width > 0 && height > 0);
        Self { width, height }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Geographic position of the center of cell `(x, y)`.
    ///
    /// Column 0 starts just east of longitude `-PI`; row 0 sits just below
    /// latitude `PI/2`.
    pub fn cell_center(&self, x: u32, y: u32) -> GeoPosition {
        debug_assert!(x < self.width && y < self.height);
        let lon = PI * ((1.0 + 2.0 * f64::from(x)) / f64::from(self.width) - 1.0);
        let lat = PI * (0.5 - (f64::from(y) + 0.5) / f64::from(self.height));
        GeoPosition::new(lon, lat)
    }

    /// Cell containing a geographic position.
    ///
    /// Longitude `+PI` wraps to the last column and latitude `-PI/2` lands on
    /// the last row, so every in-range position maps to a valid cell.
    pub fn cell_of(&self, position: GeoPosition) -> (u32, u32) {
        let xf = ((position.lon / PI) + 1.0) * f64::from(self.width) * 0.5;
        let yf = (0.5 - position.lat / PI) * f64::from(self.height);
        let x = (xf.floor() as i64).clamp(0, i64::from(self.width) - 1) as u32;
        let y = (yf.floor() as i64).clamp(0, i64::from(self.height) - 1) as u32;
        (x, y)
    }

    /// Column distance with horizontal wraparound.
    ///
    /// The world wraps at the antimeridian, so the distance between two
    /// columns is the shorter way around.
    pub fn circular_distance(&self, a: u32, b: u32) -> u32 {
        let d = a.abs_diff(b);
        d.min(self.width - d)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cell_transform_round_trips_every_cell() {
        for (w, h) in [(4, 4), (7, 3), (360, 180)] {
            let grid = GeoGrid::new(w, h);
            for y in 0..h {
                for x in 0..w {
                    let pos = grid.cell_center(x, y);
                    assert_eq!(grid.cell_of(pos), (x, y), "raster {w}x{h} cell ({x}, {y})");
                }
            }
        }
    }

    #[test]
    fn cell_centers_stay_in_range() {
        let grid = GeoGrid::new(4, 4);
        for y in 0..4 {
            for x in 0..4 {
                let pos = grid.cell_center(x, y);
                assert!(pos.lon > -PI && pos.lon < PI);
                assert!(pos.lat > -PI / 2.0 && pos.lat < PI / 2.0);
            }
        }
    }

    #[test]
    fn extreme_corners_map_onto_the_grid() {
        let grid = GeoGrid::new(4, 4);

        // Longitude +PI wraps to the last column, latitude -PI/2 to the
        // last row; the opposite corners land on column/row zero.
        assert_eq!(grid.cell_of(GeoPosition::new(PI, PI / 2.0)), (3, 0));
        assert_eq!(grid.cell_of(GeoPosition::new(PI, -PI / 2.0)), (3, 3));
        let (x, y) = grid.cell_of(GeoPosition::new(-PI, PI / 2.0));
        assert!(x < 4 && y < 4);
        let (x, y) = grid.cell_of(GeoPosition::new(-PI, -PI / 2.0));
        assert!(x < 4 && y < 4);
    }

    #[test]
    fn named_locations_classify_without_faults() {
        let grid = GeoGrid::new(4, 4);

        let london = GeoPosition::from_degrees(-0.1276, 51.48);
        let (x, y) = grid.cell_of(london);
        assert!(x < 4 && y < 4);
        assert_eq!(y, 0);

        let brasilia = GeoPosition::from_degrees(-47.92, -15.87);
        let (x, y) = grid.cell_of(brasilia);
        assert!(x < 4 && y < 4);
        assert_eq!(y, 2);
    }

    #[test]
    fn circular_distance_wraps_horizontally() {
        let grid = GeoGrid::new(100, 50);
        assert_eq!(grid.circular_distance(10, 10), 0);
        assert_eq!(grid.circular_distance(10, 20), 10);
        assert_eq!(grid.circular_distance(2, 98), 4);
        assert_eq!(grid.circular_distance(0, 50), 50);
    }

    #[test]
    fn degrees_round_trip() {
        let pos = GeoPosition::from_degrees(-47.92, -15.87);
        let (lon, lat) = pos.to_degrees();
        assert!((lon - -47.92).abs() < 1e-9);
        assert!((lat - -15.87).abs() < 1e-9);
    }

    #[test]
    fn angular_distance_of_antipodes_is_pi() {
        let a = GeoPosition::from_degrees(0.0, 0.0);
        let b = GeoPosition::from_degrees(180.0, 0.0);
        assert!((a.angular_distance(b) - PI).abs() < 1e-12);
        assert!(a.angular_distance(a) < 1e-12);
    }
}
