//! Mapping session orchestration.
//!
//! A session alternates between taking a scan, fusing it into the grid and
//! asking the operator for the next move, until the operator stops.

use std::collections::VecDeque;
use std::path::Path;

use ogm_mapping::{
    MapError, MoveCommand, OccupancyGrid, RawScanLog, Scan, UpdateStats, Visualisation, WorldPoint,
    scan::validate_sample_rate,
};
use ogm_odometry::{Displacement, OdometryError, Pose, reconcile};
use serde::Deserialize;
use thiserror::Error;
use tracing::{error, info, warn};

use crate::persistence::{self, PersistenceError, SessionRecord};
use crate::transport::{Transport, TransportError};

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("map error: {0}")]
    Map(#[from] MapError),

    #[error("odometry error: {0}")]
    Odometry(#[from] OdometryError),

    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("persistence error: {0}")]
    Persistence(#[from] PersistenceError),
}

/// A move the operator asks for: rotate clockwise, then travel forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct MoveRequest {
    pub rotate: i32,
    pub travel: i32,
}

/// Decides whether mapping continues after each scan.
pub trait Operator {
    /// Returns the next move, or `None` to end the session.
    fn next_move(&mut self, grid: &OccupancyGrid) -> Option<MoveRequest>;
}

/// An operator that plays back a fixed list of moves and then stops.
#[derive(Debug, Default)]
pub struct ScriptedOperator {
    queue: VecDeque<MoveRequest>,
}

impl ScriptedOperator {
    pub fn new(plan: impl IntoIterator<Item = MoveRequest>) -> Self {
        Self {
            queue: plan.into_iter().collect(),
        }
    }

    pub fn remaining(&self) -> usize {
        self.queue.len()
    }
}

impl Operator for ScriptedOperator {
    fn next_move(&mut self, _grid: &OccupancyGrid) -> Option<MoveRequest> {
        match self.queue.pop_front() {
            Some(request) => {
                info!("Next move from plan: {:?}", request);
                Some(request)
            }
            None => {
                info!("Plan finished");
                None
            }
        }
    }
}

/// Everything one mapping session needs: the grid being built, the link to
/// the robot and the scan sample rate.
pub struct MappingSession<T: Transport> {
    grid: OccupancyGrid,
    transport: T,
    sample_rate: u32,
    single_ray_scans: usize,
}

impl<T: Transport> MappingSession<T> {
    /// Starts a session on `grid`.
    ///
    /// # Errors
    /// Returns `SessionError::Map` if `sample_rate` does not divide 360.
    pub fn new(grid: OccupancyGrid, transport: T, sample_rate: u32) -> Result<Self, SessionError> {
        validate_sample_rate(sample_rate)?;
        Ok(MappingSession {
            grid,
            transport,
            sample_rate,
            single_ray_scans: 0,
        })
    }

    pub fn grid(&self) -> &OccupancyGrid {
        &self.grid
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn into_grid(self) -> OccupancyGrid {
        self.grid
    }

    /// Takes a scan at the robot's current position and heading.
    pub fn acquire_scan(&mut self) -> Result<Scan, SessionError> {
        let values = self.transport.acquire_scan(self.sample_rate).map_err(|e| {
            error!("Scan acquisition failed: {}", e);
            e
        })?;
        let scan = Scan::new(
            self.sample_rate,
            values,
            self.grid.bot_position(),
            self.grid.bot_heading(),
        )?;
        Ok(scan)
    }

    /// Takes a scan and fuses it into every cell of the grid.
    pub fn fuse_scan(&mut self) -> Result<UpdateStats, SessionError> {
        let scan = self.acquire_scan()?;
        Ok(self.grid.full_grid_update(scan)?)
    }

    /// Takes a scan and marks only the cells the readings land in.
    ///
    /// A reading that falls outside the map aborts the update.
    pub fn simple_map(&mut self) -> Result<usize, SessionError> {
        let scan = self.acquire_scan()?;
        let marked = self.grid.single_ray_update(scan).map_err(|e| {
            warn!("Single ray update aborted: {}", e);
            SessionError::from(e)
        })?;
        self.single_ray_scans += 1;
        Ok(marked)
    }

    /// Whether a saved copy of this session replays to the same grid.
    ///
    /// Replay fuses every scan with the full update, so a session holding
    /// single-ray updates cannot be reproduced from its file.
    pub fn is_replayable(&self) -> bool {
        self.single_ray_scans == 0
    }

    /// Writes the scan and move history to `path`.
    ///
    /// Returns `Ok(false)` without touching `path` when the session is not
    /// replayable.
    pub fn save(&self, path: &Path) -> Result<bool, SessionError> {
        if !self.is_replayable() {
            warn!(
                single_ray_scans = self.single_ray_scans,
                "Session used single ray updates and cannot be replayed; not saving to {}",
                path.display()
            );
            return Ok(false);
        }
        persistence::save(path, &self.grid)?;
        Ok(true)
    }

    /// Sends a move to the robot and moves the robot on the map to match.
    ///
    /// Returns the reconciled pose after the move.
    pub fn execute_move(&mut self, request: MoveRequest) -> Result<Pose, SessionError> {
        let (before, after) = self
            .transport
            .execute_move(request.rotate, request.travel)
            .map_err(|e| {
                error!("Move {:?} failed: {}", request, e);
                e
            })?;

        let before = reconcile(before)?;
        let after = reconcile(after)?;
        let displacement = Displacement::between(&before, &after);
        info!(
            rotate = request.rotate,
            travel = request.travel,
            rotation = displacement.rotation,
            distance = displacement.distance,
            "Move executed"
        );

        let mut command = MoveCommand::new(request.rotate, request.travel);
        command.record_result(after);
        apply_move(&mut self.grid, command, after);
        Ok(after)
    }

    /// Runs the scan, fuse, move loop until the operator stops.
    ///
    /// Returns the number of scans fused.
    pub fn run(&mut self, operator: &mut impl Operator) -> Result<usize, SessionError> {
        info!(sample_rate = self.sample_rate, "Mapping session started");
        let mut scans = 0;
        loop {
            let stats = self.fuse_scan()?;
            scans += 1;
            info!(scan = scans, updates = stats.updates, sentinel_rays = stats.sentinel_rays, "Scan fused");

            match operator.next_move(&self.grid) {
                Some(request) => {
                    self.execute_move(request)?;
                }
                None => break,
            }
        }
        info!(scans, moves = self.grid.commands().len(), "Mapping session finished");
        Ok(scans)
    }

    /// Takes `count` scans without mapping them, as if from the origin
    /// facing up.
    pub fn collect_raw(&mut self, count: usize) -> Result<Visualisation, SessionError> {
        let mut log = RawScanLog::default();
        for _ in 0..count {
            let values = self.transport.acquire_scan(self.sample_rate).map_err(|e| {
                error!("Raw scan acquisition failed: {}", e);
                e
            })?;
            log.push(Scan::new(self.sample_rate, values, WorldPoint::new(0.0, 0.0), 0.0)?);
        }
        info!(scans = log.len(), "Raw scans collected");
        Ok(Visualisation::RawScanLog(log))
    }
}

/// Moves the robot on the map to `pose`, extends the path and records the
/// command.
fn apply_move(grid: &mut OccupancyGrid, command: MoveCommand, pose: Pose) {
    let start = grid.bot_position();
    grid.update_bot_state(&pose);
    let end = grid.bot_position();
    grid.add_path_segment(start, end);
    grid.record_command(command);
}

/// Rebuilds a grid from session records without contacting the robot.
///
/// The records are replayed into a fresh grid with the same parameters as
/// `grid`, which is only replaced once the whole replay has succeeded.
pub fn replay(grid: &mut OccupancyGrid, records: Vec<SessionRecord>) -> Result<(), SessionError> {
    let mut staged = OccupancyGrid::new(grid.cell_size(), grid.ratio(), grid.height(), grid.width())?;
    let count = records.len();

    for record in records {
        staged.full_grid_update(record.scan)?;
        if let Some(command) = record.command {
            let pose = command
                .result()
                .copied()
                .ok_or(MapError::InvalidArgument("replayed move has no result"))?;
            apply_move(&mut staged, command, pose);
        }
    }

    *grid = staged;
    info!(records = count, "Session replayed");
    Ok(())
}

/// Reads a saved session and replays it into `grid`.
///
/// On any error `grid` is left exactly as it was.
pub fn load_session(grid: &mut OccupancyGrid, path: &Path) -> Result<(), SessionError> {
    let records = persistence::load(path).map_err(|e| {
        warn!("Session file {} rejected: {}", path.display(), e);
        e
    })?;
    replay(grid, records)
}
