//! Things a display can show: a fused occupancy grid, or a log of raw scans.

use std::fmt;

use crate::map::OccupancyGrid;
use crate::scan::Scan;

/// A plain list of scans shown as `degrees: value` lines.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawScanLog {
    scans: Vec<Scan>,
}

/// One reading of a [`RawScanLog`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawEntry {
    /// Position of the scan in the log, starting at 0.
    pub scan: usize,
    /// Degrees from the first reading of the scan.
    pub degrees: u32,
    /// The raw range reading.
    pub value: i32,
}

impl RawScanLog {
    /// Creates a log from a list of scans.
    pub fn new(scans: Vec<Scan>) -> Self {
        RawScanLog { scans }
    }

    /// Appends a scan to the log.
    pub fn push(&mut self, scan: Scan) {
        self.scans.push(scan);
    }

    /// The logged scans.
    pub fn scans(&self) -> &[Scan] {
        &self.scans
    }

    /// Number of logged scans.
    pub fn len(&self) -> usize {
        self.scans.len()
    }

    /// Whether the log holds no scans.
    pub fn is_empty(&self) -> bool {
        self.scans.is_empty()
    }

    /// Iterates over every reading of every scan in order.
    pub fn entries(&self) -> impl Iterator<Item = RawEntry> + '_ {
        self.scans.iter().enumerate().flat_map(|(scan, s)| {
            let rate = s.sample_rate();
            s.values().iter().enumerate().map(move |(i, &value)| RawEntry {
                scan,
                degrees: i as u32 * rate,
                value,
            })
        })
    }
}

impl fmt::Display for RawScanLog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for entry in self.entries() {
            writeln!(f, "Scan: {} Degrees: {} Value: {}", entry.scan, entry.degrees, entry.value)?;
        }
        Ok(())
    }
}

/// Everything the display consumer knows how to show.
#[derive(Debug, Clone)]
pub enum Visualisation {
    /// A fused log-odds map.
    OccupancyGrid(OccupancyGrid),
    /// Unprocessed scan readings.
    RawScanLog(RawScanLog),
}

impl Visualisation {
    /// Human readable name of the variant.
    pub fn kind(&self) -> &'static str {
        match self {
            Visualisation::OccupancyGrid(_) => "Occupancy Grid Map",
            Visualisation::RawScanLog(_) => "Raw Data Display",
        }
    }
}

impl fmt::Display for Visualisation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Visualisation::OccupancyGrid(grid) => write!(f, "{}", grid),
            Visualisation::RawScanLog(log) => write!(f, "{}", log),
        }
    }
}
