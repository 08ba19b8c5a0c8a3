#![warn(missing_docs)]
#![doc = "Occupancy grid mapping from rotating rangefinder scans."]
#![doc = ""]
#![doc = "This crate provides the geometry, the inverse sensor model, the scan and"]
#![doc = "move records and the log-odds occupancy grid that fuses them."]

pub mod command;
pub mod error;
pub mod geometry;
pub mod map;
pub mod scan;
pub mod sensor_model;
pub mod visualisation;

pub use command::MoveCommand;
pub use error::MapError;
pub use map::{CellIndex, OccupancyGrid, PathSegment, UpdateStats, WorldPoint};
pub use scan::Scan;
pub use visualisation::{RawEntry, RawScanLog, Visualisation};
