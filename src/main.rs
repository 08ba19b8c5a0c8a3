mod config; // brings `config.rs` in as `crate::config`
mod display; // text rendering of maps and raw scans
mod persistence; // session save/load
mod session; // mapping loop and replay
mod transport; // robot link and simulated robot

use anyhow::Context;
use ogm_mapping::{OccupancyGrid, Visualisation};
use tracing::{Level, info, warn};
use tracing_subscriber::EnvFilter;

use config::{SessionMode, Settings};
use session::{MappingSession, ScriptedOperator};
use transport::SimulatedRobot;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(Level::INFO.into()))
        .init();

    info!("OGM mapper started");
    let settings = config::load_settings().context("failed to load configuration")?;

    let grid = new_grid(&settings)?;
    match &settings.session.replay_path {
        Some(path) => replay(grid, path),
        None => run_live(grid, &settings),
    }
}

fn new_grid(settings: &Settings) -> anyhow::Result<OccupancyGrid> {
    let g = &settings.grid;
    let grid = OccupancyGrid::new(g.cell_size_px, g.mm_per_cell, g.height, g.width)
        .context("invalid grid settings")?;
    info!(
        width = grid.width(),
        height = grid.height(),
        ratio = grid.ratio(),
        "Occupancy grid created"
    );
    Ok(grid)
}

fn replay(mut grid: OccupancyGrid, path: &std::path::Path) -> anyhow::Result<()> {
    info!("Replaying session from {}", path.display());
    session::load_session(&mut grid, path)
        .with_context(|| format!("failed to replay {}", path.display()))?;
    display::show(&Visualisation::OccupancyGrid(grid));
    Ok(())
}

fn run_live(grid: OccupancyGrid, settings: &Settings) -> anyhow::Result<()> {
    let robot = SimulatedRobot::from_settings(&settings.simulation);
    let mut session = MappingSession::new(grid, robot, settings.scan.sample_rate)?;
    info!(mode = ?settings.session.mode, sample_rate = session.sample_rate(), "Starting live session");

    match settings.session.mode {
        SessionMode::Bayesian => {
            let mut operator = ScriptedOperator::new(settings.plan.iter().copied());
            session.run(&mut operator)?;
            if operator.remaining() > 0 {
                warn!(remaining = operator.remaining(), "Session ended before the plan finished");
            }
        }
        SessionMode::Simple => {
            let marked = session.simple_map()?;
            info!(marked, "Simple map complete");
        }
        SessionMode::Raw => {
            let raw = session.collect_raw(settings.session.raw_scans)?;
            display::show(&raw);
            return Ok(());
        }
    }

    info!(
        odometry = %session.transport().odometry(),
        scans = session.grid().scans().len(),
        "Live session complete"
    );
    let output_path = &settings.session.output_path;
    session
        .save(output_path)
        .with_context(|| format!("failed to save session to {}", output_path.display()))?;
    let grid = session.into_grid();
    display::show(&Visualisation::OccupancyGrid(grid));
    Ok(())
}
