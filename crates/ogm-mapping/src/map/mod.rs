//! Map-related functionality for occupancy grid mapping.
//!
//! This module provides the log-odds occupancy grid and the point types used
//! to address it.

pub mod occupancy_grid;
pub mod point_types;

pub use occupancy_grid::{OccupancyGrid, PathSegment, UpdateStats, shade};
pub use point_types::{CellIndex, WorldPoint};
