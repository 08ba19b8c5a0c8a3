//! Text display of visualisations.
//!
//! Reads the grid's matrix, robot state and path; never modifies them.

use ogm_mapping::sensor_model::probability;
use ogm_mapping::{CellIndex, OccupancyGrid, Visualisation};
use tracing::info;

/// Cells above this probability are drawn as occupied.
const OCCUPIED_THRESHOLD: f64 = 0.65;
/// Cells below this probability are drawn as free.
const FREE_THRESHOLD: f64 = 0.35;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MapSummary {
    pub occupied: usize,
    pub free: usize,
    pub unknown: usize,
}

pub fn summarize(grid: &OccupancyGrid) -> MapSummary {
    let mut summary = MapSummary::default();
    for value in grid.matrix() {
        let p = probability(*value);
        if p > OCCUPIED_THRESHOLD {
            summary.occupied += 1;
        } else if p < FREE_THRESHOLD {
            summary.free += 1;
        } else {
            summary.unknown += 1;
        }
    }
    summary
}

/// Draws the grid one character per cell, top row first.
///
/// `#` occupied, `.` free, blank unknown, `*` a path vertex and `R` the robot.
pub fn ascii_map(grid: &OccupancyGrid) -> String {
    let (width, height) = (grid.width(), grid.height());
    let mut canvas: Vec<Vec<char>> = grid
        .matrix()
        .chunks(width)
        .map(|row| {
            row.iter()
                .map(|value| {
                    let p = probability(*value);
                    if p > OCCUPIED_THRESHOLD {
                        '#'
                    } else if p < FREE_THRESHOLD {
                        '.'
                    } else {
                        ' '
                    }
                })
                .collect()
        })
        .collect();

    let mut mark = |cell: CellIndex, c: char| {
        if (1..=width as i64).contains(&cell.x) && (1..=height as i64).contains(&cell.y) {
            canvas[(cell.y - 1) as usize][(cell.x - 1) as usize] = c;
        }
    };
    for segment in grid.path() {
        mark(grid.cell_for_point(segment.start), '*');
        mark(grid.cell_for_point(segment.end), '*');
    }
    mark(grid.cell_for_point(grid.bot_position()), 'R');

    let mut out = String::with_capacity((width + 1) * height);
    for row in canvas.iter().rev() {
        out.extend(row.iter());
        out.push('\n');
    }
    out
}

/// Logs a summary of `vis` and prints its text rendering.
pub fn show(vis: &Visualisation) {
    match vis {
        Visualisation::OccupancyGrid(grid) => {
            let summary = summarize(grid);
            info!(
                kind = vis.kind(),
                width = grid.width(),
                height = grid.height(),
                scans = grid.scans().len(),
                moves = grid.commands().len(),
                occupied = summary.occupied,
                free = summary.free,
                unknown = summary.unknown,
                "Displaying map"
            );
            info!(
                x = grid.bot_position().x,
                y = grid.bot_position().y,
                heading = grid.bot_heading(),
                "Robot state"
            );
            print!("{}", ascii_map(grid));
        }
        Visualisation::RawScanLog(log) => {
            info!(kind = vis.kind(), scans = log.len(), "Displaying raw scans");
            print!("{}", log);
        }
    }
}
