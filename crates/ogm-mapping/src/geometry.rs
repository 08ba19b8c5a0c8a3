//! Conversions between polar range readings, world points and grid cells.
//!
//! World coordinates are millimetres with the origin at the bottom-left corner
//! of the map. Headings follow the rangefinder convention: degrees measured
//! clockwise from the map's "up" (+y) axis.

use crate::map::{CellIndex, WorldPoint};

/// Returns the 1-indexed cell containing `point`.
///
/// Each coordinate is divided by `ratio` (mm per cell) and rounded up. No
/// bounds checking is done; a point outside the map yields an index outside
/// `[1, width] x [1, height]`.
pub fn cell_for_point(point: WorldPoint, ratio: f64) -> CellIndex {
    CellIndex::new((point.x / ratio).ceil() as i64, (point.y / ratio).ceil() as i64)
}

/// Returns the world coordinates of the centre of `cell`.
pub fn cell_center(cell: CellIndex, ratio: f64) -> WorldPoint {
    WorldPoint::new(
        (cell.x as f64 * ratio) - (ratio / 2.0),
        (cell.y as f64 * ratio) - (ratio / 2.0),
    )
}

/// Returns the world point hit by a reading of `range` mm taken at absolute
/// `heading` degrees from `origin`.
pub fn measurement_point(range: f64, heading: f64, origin: WorldPoint) -> WorldPoint {
    let rad = heading.to_radians();
    WorldPoint::new(origin.x + range * rad.sin(), origin.y + range * rad.cos())
}

/// Angle in degrees between the rays `origin -> a` and `origin -> b`,
/// normalized into `(-180, 180]`.
///
/// Only the magnitude matters to the sensor model, which squares it.
pub fn bearing_delta(a: WorldPoint, b: WorldPoint, origin: WorldPoint) -> f64 {
    let angle_a = (origin.y - a.y).atan2(origin.x - a.x).to_degrees();
    let angle_b = (origin.y - b.y).atan2(origin.x - b.x).to_degrees();
    let mut diff = (angle_a - angle_b).abs();
    if diff > 180.0 {
        diff -= 360.0;
    }
    diff
}

/// Euclidean distance between two points.
pub fn distance(p1: WorldPoint, p2: WorldPoint) -> f64 {
    let dx = p2.x - p1.x;
    let dy = p2.y - p1.y;
    (dx * dx + dy * dy).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    const EPSILON: f64 = 1e-9;

    #[test]
    fn test_cell_for_point_rounds_up() {
        assert_eq!(cell_for_point(WorldPoint::new(0.5, 10.0), 10.0), CellIndex::new(1, 1));
        assert_eq!(cell_for_point(WorldPoint::new(10.1, 19.9), 10.0), CellIndex::new(2, 2));
        // The left and bottom edges belong to no cell.
        assert_eq!(cell_for_point(WorldPoint::new(0.0, 0.0), 10.0), CellIndex::new(0, 0));
        assert_eq!(cell_for_point(WorldPoint::new(-3.0, 5.0), 10.0), CellIndex::new(0, 1));
    }

    #[test]
    fn test_cell_center_inverts_cell_for_point() {
        for x in 1..=5 {
            for y in 1..=5 {
                let cell = CellIndex::new(x, y);
                let center = cell_center(cell, 10.0);
                assert_eq!(cell_for_point(center, 10.0), cell);
            }
        }
        let center = cell_center(CellIndex::new(1, 3), 10.0);
        assert!((center.x - 5.0).abs() < EPSILON);
        assert!((center.y - 25.0).abs() < EPSILON);
    }

    #[test]
    fn test_measurement_point_uses_sensor_convention() {
        let origin = WorldPoint::new(100.0, 100.0);

        let up = measurement_point(50.0, 0.0, origin);
        assert!((up.x - 100.0).abs() < EPSILON);
        assert!((up.y - 150.0).abs() < EPSILON);

        // Clockwise from up: 90 degrees points along +x.
        let right = measurement_point(50.0, 90.0, origin);
        assert!((right.x - 150.0).abs() < EPSILON);
        assert!((right.y - 100.0).abs() < EPSILON);

        let down = measurement_point(50.0, 180.0, origin);
        assert!((down.x - 100.0).abs() < EPSILON);
        assert!((down.y - 50.0).abs() < EPSILON);
    }

    #[test]
    fn test_straight_ahead_reading_lands_in_expected_cell() {
        let ratio = 10.0;
        for range in [5, 10, 95, 123, 400] {
            let point = measurement_point(range as f64, 0.0, WorldPoint::new(0.0, 0.0));
            let cell = cell_for_point(point, ratio);
            assert_eq!(cell.x, 0);
            assert_eq!(cell.y, (range as f64 / ratio).ceil() as i64);
        }
    }

    #[test]
    fn test_bearing_delta() {
        let origin = WorldPoint::new(0.0, 0.0);
        let up = WorldPoint::new(0.0, 10.0);
        let right = WorldPoint::new(10.0, 0.0);
        let diag = WorldPoint::new(10.0, 10.0);

        assert!((bearing_delta(up, up, origin)).abs() < EPSILON);
        assert!((bearing_delta(up, right, origin).abs() - 90.0).abs() < EPSILON);
        assert!((bearing_delta(up, diag, origin).abs() - 45.0).abs() < EPSILON);
        assert!((bearing_delta(right, diag, origin).abs() - 45.0).abs() < EPSILON);
    }

    #[test]
    fn test_bearing_delta_wraps_across_the_seam() {
        let origin = WorldPoint::new(0.0, 0.0);
        // Both rays point almost straight right, which puts their reversed
        // directions on either side of the atan2 discontinuity.
        let above = WorldPoint::new(100.0, 1.0);
        let below = WorldPoint::new(100.0, -1.0);
        let delta = bearing_delta(above, below, origin);
        let expected = 2.0 * (1.0f64 / 100.0).atan().to_degrees();
        assert!((delta.abs() - expected).abs() < 1e-6);
        assert!(delta > -180.0 && delta <= 180.0);
    }

    #[test]
    fn test_distance() {
        let d = distance(WorldPoint::new(1.0, 1.0), WorldPoint::new(4.0, 5.0));
        assert!((d - 5.0).abs() < EPSILON);
    }
}
