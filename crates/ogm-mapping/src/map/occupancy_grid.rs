#![warn(missing_docs)]

//! Log-odds occupancy grid fused from rangefinder scans.
//!
//! Cells hold `ln(p / (1 - p))`. A fresh cell holds `0`, the log-odds of the
//! 0.5 prior. Each beam contributes `logit(weight)` where `weight` comes from
//! the inverse sensor model, so repeated evidence accumulates by addition and
//! never saturates.

use ogm_odometry::{Pose, normalize_heading};
use tracing::{debug, trace, warn};

use super::{CellIndex, WorldPoint};
use crate::command::MoveCommand;
use crate::error::MapError;
use crate::geometry;
use crate::scan::Scan;
use crate::sensor_model::{
    self, FREE_SPACE_RANGE_MM, PRIOR, SENTINEL_RANGE_MM, SIMPLE_HIT_PROBABILITY,
};

/// A straight segment of the robot's travelled path, in world coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PathSegment {
    /// Where the move started.
    pub start: WorldPoint,
    /// Where the move ended.
    pub end: WorldPoint,
}

/// Counters reported by [`OccupancyGrid::full_grid_update`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct UpdateStats {
    /// Number of (cell, ray) pairs evaluated.
    pub evaluations: usize,
    /// Number of pairs that changed a cell.
    pub updates: usize,
    /// Number of rays in the scan at or above the sentinel range.
    pub sentinel_rays: usize,
}

/// A ray of a scan resolved into world coordinates.
struct Ray {
    point: WorldPoint,
    range: f64,
    sentinel: bool,
}

/// A 2D occupancy grid holding log-odds values, plus the robot state and the
/// history needed to replay a mapping session.
///
/// Cells are addressed with 1-indexed [`CellIndex`] values. The grid origin is
/// the centre of the map and is fixed for the lifetime of the grid.
#[derive(Debug, Clone)]
pub struct OccupancyGrid {
    /// Width of the grid in cells
    width: usize,
    /// Height of the grid in cells
    height: usize,
    /// Drawn size of a cell in pixels
    cell_size: u32,
    /// Real-world size of a cell side in millimetres
    ratio: f64,
    /// World position of the map centre, where the session starts
    origin: WorldPoint,
    bot_position: WorldPoint,
    /// Degrees in `[0, 360)`
    bot_heading: f64,
    /// Log-odds values, row-major: index = (y - 1) * width + (x - 1)
    data: Vec<f64>,
    path: Vec<PathSegment>,
    scans: Vec<Scan>,
    commands: Vec<MoveCommand>,
}

impl OccupancyGrid {
    /// Creates a new grid with every cell at the 0.5 prior.
    ///
    /// # Arguments
    /// * `cell_size` - Drawn width and height of a cell in pixels
    /// * `ratio` - Real-world width and height of a cell in millimetres
    /// * `height` - Height of the map in cells
    /// * `width` - Width of the map in cells
    ///
    /// # Returns
    /// * `Result<Self, MapError>` - The created grid or an error if parameters are invalid
    pub fn new(cell_size: u32, ratio: f64, height: usize, width: usize) -> Result<Self, MapError> {
        if cell_size == 0 {
            return Err(MapError::InvalidArgument("Cell size must be positive"));
        }
        if !ratio.is_finite() || ratio <= 0.0 {
            return Err(MapError::InvalidArgument("Millimetres per cell must be positive"));
        }
        if width == 0 || height == 0 {
            return Err(MapError::InvalidDimensions("Width and height must be non-zero"));
        }
        let total_cells = width
            .checked_mul(height)
            .ok_or(MapError::InvalidDimensions("Map dimensions too large, would cause overflow"))?;

        let origin = WorldPoint::new((width as f64 * ratio) / 2.0, (height as f64 * ratio) / 2.0);

        Ok(OccupancyGrid {
            width,
            height,
            cell_size,
            ratio,
            origin,
            bot_position: origin,
            bot_heading: 0.0,
            data: vec![0.0; total_cells],
            path: Vec::new(),
            scans: Vec::new(),
            commands: Vec::new(),
        })
    }

    /// Calculates the index in the data vector for a cell, if it lies on the map.
    fn get_index(&self, cell: CellIndex) -> Option<usize> {
        if cell.x < 1 || cell.y < 1 || cell.x > self.width as i64 || cell.y > self.height as i64 {
            return None;
        }
        Some((cell.y - 1) as usize * self.width + (cell.x - 1) as usize)
    }

    fn index_or_err(&self, cell: CellIndex) -> Result<usize, MapError> {
        self.get_index(cell).ok_or(MapError::IndexOutOfRange { x: cell.x, y: cell.y })
    }

    /// Width of the grid in cells.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Height of the grid in cells.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Drawn size of a cell in pixels.
    pub fn cell_size(&self) -> u32 {
        self.cell_size
    }

    /// Millimetres represented by one cell side.
    pub fn ratio(&self) -> f64 {
        self.ratio
    }

    /// World position of the map centre.
    pub fn origin(&self) -> WorldPoint {
        self.origin
    }

    /// Current world position of the robot.
    pub fn bot_position(&self) -> WorldPoint {
        self.bot_position
    }

    /// Current robot heading in degrees, `[0, 360)`.
    pub fn bot_heading(&self) -> f64 {
        self.bot_heading
    }

    /// The raw log-odds matrix, row-major from the bottom row up.
    pub fn matrix(&self) -> &[f64] {
        &self.data
    }

    /// The robot's travelled path.
    pub fn path(&self) -> &[PathSegment] {
        &self.path
    }

    /// Every scan fused into this grid, in order.
    pub fn scans(&self) -> &[Scan] {
        &self.scans
    }

    /// Every executed move command, in order.
    pub fn commands(&self) -> &[MoveCommand] {
        &self.commands
    }

    /// Cell containing a world point. See [`geometry::cell_for_point`].
    pub fn cell_for_point(&self, point: WorldPoint) -> CellIndex {
        geometry::cell_for_point(point, self.ratio)
    }

    /// World centre of a cell. See [`geometry::cell_center`].
    pub fn cell_center(&self, cell: CellIndex) -> WorldPoint {
        geometry::cell_center(cell, self.ratio)
    }

    /// Point hit by a reading taken from the robot's current position.
    pub fn measurement_point(&self, range: f64, heading: f64) -> WorldPoint {
        geometry::measurement_point(range, heading, self.bot_position)
    }

    /// Gets the log-odds value of a cell.
    ///
    /// # Returns
    /// * `Result<f64, MapError>` - The value or `IndexOutOfRange` if the cell is off the map
    pub fn occupancy(&self, cell: CellIndex) -> Result<f64, MapError> {
        let index = self.index_or_err(cell)?;
        Ok(self.data[index])
    }

    /// Sets the log-odds value of a cell.
    ///
    /// # Returns
    /// * `Result<(), MapError>` - Success or `IndexOutOfRange` if the cell is off the map
    pub fn set_occupancy(&mut self, cell: CellIndex, value: f64) -> Result<(), MapError> {
        let index = self.index_or_err(cell)?;
        self.data[index] = value;
        Ok(())
    }

    /// Gets the occupancy probability of a cell.
    pub fn probability(&self, cell: CellIndex) -> Result<f64, MapError> {
        self.occupancy(cell).map(sensor_model::probability)
    }

    /// Applies one inverse sensor model update to a cell.
    ///
    /// # Arguments
    /// * `cell` - Cell to update
    /// * `theta` - Angle in degrees between the beam and the cell
    /// * `z` - Measured range in millimetres
    /// * `d` - Distance from the robot to the cell centre in millimetres
    ///
    /// # Returns
    /// * `Result<bool, MapError>` - Whether the cell changed, or `IndexOutOfRange`
    pub fn update_cell(&mut self, cell: CellIndex, theta: f64, z: f64, d: f64) -> Result<bool, MapError> {
        let index = self.index_or_err(cell)?;
        Ok(self.apply_update(index, theta, z, d))
    }

    fn apply_update(&mut self, index: usize, theta: f64, z: f64, d: f64) -> bool {
        let weight = sensor_model::inverse_sensor_model(z, d, theta);
        if weight == PRIOR {
            return false;
        }
        self.data[index] += sensor_model::logit(weight);
        true
    }

    /// Fuses a scan into every cell of the grid.
    ///
    /// For each cell and each ray the beam angle, the cell distance and the
    /// measured range are fed to the inverse sensor model. Rays at or above the
    /// sentinel range only clear cells closer than 800 mm, using 800 mm as the
    /// range. The scan is appended to the history.
    ///
    /// # Errors
    /// Returns `MapError::InvalidArgument` if the scan has no values. Cell
    /// indexing cannot fail because only cells on the map are visited.
    pub fn full_grid_update(&mut self, scan: Scan) -> Result<UpdateStats, MapError> {
        if !scan.is_complete() {
            warn!("Rejected scan without values for full grid update");
            return Err(MapError::InvalidArgument("scan has no values"));
        }

        let origin = scan.position();
        let rays: Vec<Ray> = scan
            .rays()
            .map(|(heading, value)| {
                let point = geometry::measurement_point(value as f64, heading, origin);
                Ray {
                    point,
                    range: geometry::distance(origin, point),
                    sentinel: value >= SENTINEL_RANGE_MM,
                }
            })
            .collect();

        let mut stats = UpdateStats {
            sentinel_rays: rays.iter().filter(|r| r.sentinel).count(),
            ..UpdateStats::default()
        };

        for x in 1..=self.width as i64 {
            for y in 1..=self.height as i64 {
                let cell = CellIndex::new(x, y);
                let index = (y - 1) as usize * self.width + (x - 1) as usize;
                let center = self.cell_center(cell);
                let d = geometry::distance(origin, center);

                for ray in &rays {
                    stats.evaluations += 1;
                    let z = if ray.sentinel {
                        // Nothing seen: only clear space up to the free range.
                        if d >= FREE_SPACE_RANGE_MM {
                            continue;
                        }
                        FREE_SPACE_RANGE_MM
                    } else {
                        ray.range
                    };
                    let theta = geometry::bearing_delta(ray.point, center, origin);
                    if self.apply_update(index, theta, z, d) {
                        stats.updates += 1;
                    }
                }
            }
        }

        debug!(
            rays = rays.len(),
            sentinel_rays = stats.sentinel_rays,
            evaluations = stats.evaluations,
            updates = stats.updates,
            "Fused scan into occupancy grid"
        );
        self.scans.push(scan);
        Ok(stats)
    }

    /// Marks the cell under each non-sentinel reading as occupied.
    ///
    /// Hit cells are set to the log-odds of 0.9; no free space is inferred.
    /// Every target cell is checked before anything is written, so a reading
    /// that falls off the map aborts the whole update and leaves the grid and
    /// its history unchanged.
    ///
    /// # Returns
    /// * `Result<usize, MapError>` - Number of cells marked, or `IndexOutOfRange`
    pub fn single_ray_update(&mut self, scan: Scan) -> Result<usize, MapError> {
        if !scan.is_complete() {
            warn!("Rejected scan without values for single ray update");
            return Err(MapError::InvalidArgument("scan has no values"));
        }

        let origin = scan.position();
        let mut targets = Vec::with_capacity(scan.len());
        for (heading, value) in scan.rays() {
            if value >= SENTINEL_RANGE_MM {
                continue;
            }
            let point = geometry::measurement_point(value as f64, heading, origin);
            let cell = self.cell_for_point(point);
            match self.get_index(cell) {
                Some(index) => targets.push(index),
                None => {
                    warn!(x = cell.x, y = cell.y, heading, value, "Reading falls outside the map");
                    return Err(MapError::IndexOutOfRange { x: cell.x, y: cell.y });
                }
            }
        }

        let hit = sensor_model::logit(SIMPLE_HIT_PROBABILITY);
        for &index in &targets {
            self.data[index] = hit;
        }
        trace!(marked = targets.len(), "Applied single ray update");
        self.scans.push(scan);
        Ok(targets.len())
    }

    /// Moves the robot to `origin + pose` and sets its heading.
    ///
    /// `pose` is the reconciled odometry pose, which is relative to where the
    /// session started.
    pub fn update_bot_state(&mut self, pose: &Pose) {
        self.bot_position = WorldPoint::new(self.origin.x + pose.x, self.origin.y + pose.y);
        self.bot_heading = normalize_heading(pose.heading);
        debug!(x = self.bot_position.x, y = self.bot_position.y, heading = self.bot_heading, "Robot state updated");
    }

    /// Puts the robot back on the origin facing up.
    pub fn reset_bot_state(&mut self) {
        self.bot_position = self.origin;
        self.bot_heading = 0.0;
    }

    /// Appends a segment to the travelled path.
    pub fn add_path_segment(&mut self, start: WorldPoint, end: WorldPoint) {
        self.path.push(PathSegment { start, end });
    }

    /// Appends an executed command to the history.
    pub fn record_command(&mut self, command: MoveCommand) {
        self.commands.push(command);
    }
}

/// Greyscale shade for a log-odds value: 255 is certainly free, 0 certainly
/// occupied.
pub fn shade(log_odds: f64) -> u8 {
    let p = sensor_model::probability(log_odds);
    (255.0 - (p * 255.0).floor()).clamp(0.0, 255.0) as u8
}

impl std::fmt::Display for OccupancyGrid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "OccupancyGrid ({}x{}, ratio: {:.1}mm)", self.width, self.height, self.ratio)?;
        writeln!(
            f,
            "Robot: ({:.1}, {:.1}) heading {:.1}",
            self.bot_position.x, self.bot_position.y, self.bot_heading
        )?;

        // Top row first so the picture has "up" at the top.
        for row in self.data.chunks(self.width).rev() {
            for value in row {
                write!(f, "{:3} ", shade(*value))?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sensor_model::{confidence, inverse_sensor_model, logit};

    const EPSILON: f64 = 1e-12;

    fn grid_10x10() -> OccupancyGrid {
        OccupancyGrid::new(5, 10.0, 10, 10).unwrap()
    }

    /// A 10x10 grid with the robot moved onto the centre of cell (5, 5).
    fn grid_with_bot_on_cell_center() -> OccupancyGrid {
        let mut grid = grid_10x10();
        grid.update_bot_state(&Pose::new(-5.0, -5.0, 0.0));
        grid
    }

    fn scan_at(grid: &OccupancyGrid, rate: u32, values: Vec<i32>) -> Scan {
        Scan::new(rate, values, grid.bot_position(), grid.bot_heading()).unwrap()
    }

    #[test]
    fn test_grid_creation() {
        let grid = grid_10x10();
        assert_eq!(grid.width(), 10);
        assert_eq!(grid.height(), 10);
        assert_eq!(grid.cell_size(), 5);
        assert_eq!(grid.ratio(), 10.0);
        assert_eq!(grid.origin(), WorldPoint::new(50.0, 50.0));
        assert_eq!(grid.bot_position(), grid.origin());
        assert_eq!(grid.bot_heading(), 0.0);
        assert_eq!(grid.matrix().len(), 100);
        assert!(grid.matrix().iter().all(|v| *v == 0.0));
    }

    #[test]
    fn test_invalid_creation() {
        assert!(matches!(OccupancyGrid::new(0, 10.0, 10, 10), Err(MapError::InvalidArgument(_))));
        assert!(matches!(OccupancyGrid::new(5, 0.0, 10, 10), Err(MapError::InvalidArgument(_))));
        assert!(matches!(OccupancyGrid::new(5, -1.0, 10, 10), Err(MapError::InvalidArgument(_))));
        assert!(matches!(OccupancyGrid::new(5, 10.0, 0, 10), Err(MapError::InvalidDimensions(_))));
        assert!(matches!(OccupancyGrid::new(5, 10.0, 10, 0), Err(MapError::InvalidDimensions(_))));
        assert!(matches!(
            OccupancyGrid::new(5, 10.0, usize::MAX, 2),
            Err(MapError::InvalidDimensions(_))
        ));
    }

    #[test]
    fn test_occupancy_accessors() {
        let mut grid = grid_10x10();
        grid.set_occupancy(CellIndex::new(1, 1), 1.5).unwrap();
        grid.set_occupancy(CellIndex::new(10, 10), -2.0).unwrap();
        assert_eq!(grid.occupancy(CellIndex::new(1, 1)).unwrap(), 1.5);
        assert_eq!(grid.occupancy(CellIndex::new(10, 10)).unwrap(), -2.0);
        assert_eq!(grid.matrix()[0], 1.5);
        assert_eq!(grid.matrix()[99], -2.0);
        assert!((grid.probability(CellIndex::new(2, 2)).unwrap() - 0.5).abs() < EPSILON);

        for bad in [CellIndex::new(0, 1), CellIndex::new(1, 0), CellIndex::new(11, 5), CellIndex::new(5, 11)] {
            assert_eq!(
                grid.set_occupancy(bad, 1.0),
                Err(MapError::IndexOutOfRange { x: bad.x, y: bad.y })
            );
            assert!(grid.occupancy(bad).is_err());
        }
    }

    #[test]
    fn test_update_cell_accumulates() {
        let mut grid = grid_10x10();
        let cell = CellIndex::new(3, 4);
        let step = logit(inverse_sensor_model(300.0, 100.0, 0.0));
        assert!(step < 0.0);

        assert!(grid.update_cell(cell, 0.0, 300.0, 100.0).unwrap());
        let once = grid.occupancy(cell).unwrap();
        assert!(grid.update_cell(cell, 0.0, 300.0, 100.0).unwrap());
        assert_ne!(grid.occupancy(cell).unwrap(), once);

        for _ in 0..3 {
            grid.update_cell(cell, 0.0, 300.0, 100.0).unwrap();
        }
        assert!((grid.occupancy(cell).unwrap() - 5.0 * step).abs() < EPSILON);
    }

    #[test]
    fn test_update_cell_prior_is_noop() {
        let mut grid = grid_10x10();
        let cell = CellIndex::new(3, 4);
        assert!(!grid.update_cell(cell, 0.0, 100.0, 500.0).unwrap());
        assert!(!grid.update_cell(cell, 0.0, 950.0, 10.0).unwrap());
        assert_eq!(grid.occupancy(cell).unwrap(), 0.0);
        assert!(grid.update_cell(CellIndex::new(0, 0), 0.0, 100.0, 10.0).is_err());
    }

    #[test]
    fn test_full_update_hits_and_sentinels() {
        let mut grid = grid_with_bot_on_cell_center();
        // Up and down see a surface 30 mm away; left and right see nothing.
        let scan = scan_at(&grid, 90, vec![30, 790, 30, 790]);
        let stats = grid.full_grid_update(scan).unwrap();
        assert_eq!(stats.evaluations, 400);
        assert_eq!(stats.sentinel_rays, 2);
        assert!(stats.updates > 0);

        let occupied = logit(0.5 + confidence(30.0, 0.0));
        let up = grid.occupancy(CellIndex::new(5, 9)).unwrap();
        let down = grid.occupancy(CellIndex::new(5, 1)).unwrap();
        assert!((up - occupied).abs() < 1e-9);
        assert!((down - occupied).abs() < 1e-9);

        // Sentinel beams clear nearby cells instead of leaving them unknown.
        let free = logit(0.5 - confidence(FREE_SPACE_RANGE_MM, 0.0));
        let right = grid.occupancy(CellIndex::new(6, 5)).unwrap();
        let left = grid.occupancy(CellIndex::new(4, 5)).unwrap();
        assert!((right - free).abs() < 1e-9);
        assert!((left - free).abs() < 1e-9);

        // Cells near the robot along the hit beams are free too.
        assert!(grid.occupancy(CellIndex::new(5, 6)).unwrap() < 0.0);
        assert!(grid.occupancy(CellIndex::new(5, 4)).unwrap() < 0.0);

        // Occupied evidence only appears along the two hit beams.
        for x in 1..=10 {
            for y in 1..=10 {
                if grid.occupancy(CellIndex::new(x, y)).unwrap() > 1e-9 {
                    assert_eq!(x, 5, "unexpected occupied cell ({}, {})", x, y);
                }
            }
        }

        // Cells off every beam stay exactly at the prior.
        for cell in [CellIndex::new(7, 7), CellIndex::new(1, 10), CellIndex::new(10, 1), CellIndex::new(2, 8)] {
            assert_eq!(grid.occupancy(cell).unwrap(), 0.0);
        }
        assert_eq!(grid.scans().len(), 1);
    }

    #[test]
    fn test_full_update_twice_doubles_evidence() {
        let mut grid = grid_with_bot_on_cell_center();
        let scan = scan_at(&grid, 90, vec![30, 790, 30, 790]);
        grid.full_grid_update(scan.clone()).unwrap();
        let first = grid.occupancy(CellIndex::new(5, 9)).unwrap();
        grid.full_grid_update(scan).unwrap();
        let second = grid.occupancy(CellIndex::new(5, 9)).unwrap();
        assert!((second - 2.0 * first).abs() < 1e-9);
        assert_eq!(grid.scans().len(), 2);
    }

    #[test]
    fn test_full_update_rejects_incomplete_scan() {
        let mut grid = grid_10x10();
        let scan = Scan::with_rate(90, grid.bot_position(), 0.0).unwrap();
        assert!(matches!(grid.full_grid_update(scan), Err(MapError::InvalidArgument(_))));
        assert!(grid.scans().is_empty());
    }

    #[test]
    fn test_single_ray_update_marks_hit_cells() {
        let mut grid = grid_with_bot_on_cell_center();
        let scan = scan_at(&grid, 90, vec![30, 790, 30, 790]);
        assert_eq!(grid.single_ray_update(scan).unwrap(), 2);

        let hit = 9.0f64.ln();
        assert!((grid.occupancy(CellIndex::new(5, 8)).unwrap() - hit).abs() < EPSILON);
        assert!((grid.occupancy(CellIndex::new(5, 2)).unwrap() - hit).abs() < EPSILON);
        let marked = grid.matrix().iter().filter(|v| **v != 0.0).count();
        assert_eq!(marked, 2);
        assert_eq!(grid.scans().len(), 1);
    }

    #[test]
    fn test_single_ray_update_aborts_off_map() {
        let mut grid = grid_10x10();
        // From the centre origin the downward reading lands on the bottom
        // edge, which belongs to row 0.
        let scan = scan_at(&grid, 90, vec![50, 790, 50, 790]);
        let result = grid.single_ray_update(scan);
        assert!(matches!(result, Err(MapError::IndexOutOfRange { y: 0, .. })));
        assert!(grid.matrix().iter().all(|v| *v == 0.0));
        assert!(grid.scans().is_empty());
    }

    #[test]
    fn test_update_bot_state() {
        let mut grid = grid_10x10();
        grid.update_bot_state(&Pose { x: 20.0, y: -10.0, heading: 450.0 });
        assert_eq!(grid.bot_position(), WorldPoint::new(70.0, 40.0));
        assert!((grid.bot_heading() - 90.0).abs() < EPSILON);

        grid.update_bot_state(&Pose { x: 0.0, y: 0.0, heading: 360.0 });
        assert_eq!(grid.bot_position(), grid.origin());
        assert_eq!(grid.bot_heading(), 0.0);

        grid.update_bot_state(&Pose::new(5.0, 5.0, 30.0));
        grid.reset_bot_state();
        assert_eq!(grid.bot_position(), grid.origin());
        assert_eq!(grid.bot_heading(), 0.0);
    }

    #[test]
    fn test_path_and_history() {
        let mut grid = grid_10x10();
        grid.add_path_segment(WorldPoint::new(50.0, 50.0), WorldPoint::new(50.0, 80.0));
        grid.add_path_segment(WorldPoint::new(50.0, 80.0), WorldPoint::new(50.0, 80.0));
        assert_eq!(grid.path().len(), 2);
        assert_eq!(grid.path()[0].end, WorldPoint::new(50.0, 80.0));

        grid.record_command(MoveCommand::new(0, 30));
        assert_eq!(grid.commands().len(), 1);
        assert_eq!(grid.commands()[0].travel(), 30);
    }

    #[test]
    fn test_measurement_point_from_bot() {
        let grid = grid_10x10();
        let p = grid.measurement_point(20.0, 0.0);
        assert!((p.x - 50.0).abs() < EPSILON);
        assert!((p.y - 70.0).abs() < EPSILON);
        assert_eq!(grid.cell_for_point(p), CellIndex::new(5, 7));
    }

    #[test]
    fn test_shade() {
        assert_eq!(shade(0.0), 128);
        assert_eq!(shade(50.0), 0);
        assert_eq!(shade(-50.0), 255);
    }

    #[test]
    fn test_display() {
        let mut grid = OccupancyGrid::new(5, 10.0, 3, 3).unwrap();
        grid.set_occupancy(CellIndex::new(1, 3), 50.0).unwrap();

        let display_str = format!("{}", grid);
        assert!(display_str.contains("OccupancyGrid (3x3"));
        let rows: Vec<&str> = display_str.lines().skip(2).collect();
        assert_eq!(rows.len(), 3);
        // The top row is printed first.
        assert!(rows[0].starts_with("  0 "));
        assert!(rows[2].starts_with("128 "));
    }
}
