use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment, File, FileFormat};
use ogm_mapping::scan::validate_sample_rate;
use serde::Deserialize;
use tracing::{error, info};

use crate::session::MoveRequest;

pub const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

/// Occupancy grid construction parameters.
#[derive(Debug, Clone, Deserialize)]
pub struct GridSettings {
    pub cell_size_px: u32,
    pub mm_per_cell: f64,
    pub height: usize,
    pub width: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScanSettings {
    /// Degrees between readings.
    pub sample_rate: u32,
}

/// What a live session does with the robot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionMode {
    /// Scan, fuse every cell, move, repeat.
    #[default]
    Bayesian,
    /// One scan marking only the cells the readings land in.
    Simple,
    /// Collect unmapped scans for inspection.
    Raw,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SessionSettings {
    #[serde(default)]
    pub mode: SessionMode,
    /// Number of scans taken in raw mode.
    #[serde(default = "default_raw_scans")]
    pub raw_scans: usize,
    #[serde(default = "default_output_path")]
    pub output_path: PathBuf,
    /// When set, the session is replayed from this file instead of driving
    /// the robot.
    #[serde(default)]
    pub replay_path: Option<PathBuf>,
}

impl Default for SessionSettings {
    fn default() -> Self {
        SessionSettings {
            mode: SessionMode::default(),
            raw_scans: default_raw_scans(),
            output_path: default_output_path(),
            replay_path: None,
        }
    }
}

fn default_raw_scans() -> usize {
    1
}

fn default_output_path() -> PathBuf {
    PathBuf::from("sessions/latest.txt")
}

/// The simulated room, as distances from the start point to each wall.
#[derive(Debug, Clone, Deserialize)]
pub struct SimulationSettings {
    pub room_left: f64,
    pub room_right: f64,
    pub room_bottom: f64,
    pub room_top: f64,
    #[serde(default)]
    pub noise_mm: i32,
    #[serde(default)]
    pub seed: u64,
    /// Radio range from the start point; unlimited when unset.
    #[serde(default)]
    pub link_range_mm: Option<f64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub grid: GridSettings,
    pub scan: ScanSettings,
    #[serde(default)]
    pub session: SessionSettings,
    pub simulation: SimulationSettings,
    /// Moves issued between scans, in order.
    #[serde(default)]
    pub plan: Vec<MoveRequest>,
}

impl Settings {
    /// Checks values the grid and transport do not check themselves.
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_sample_rate(self.scan.sample_rate)
            .map_err(|e| ConfigError::Message(format!("scan.sample_rate: {}", e)))?;

        let sim = &self.simulation;
        if [sim.room_left, sim.room_right, sim.room_bottom, sim.room_top]
            .iter()
            .any(|wall| !wall.is_finite() || *wall <= 0.0)
        {
            return Err(ConfigError::Message(
                "simulation room walls must be positive distances".to_string(),
            ));
        }
        if sim.noise_mm < 0 {
            return Err(ConfigError::Message(
                "simulation.noise_mm must not be negative".to_string(),
            ));
        }
        if sim.link_range_mm.is_some_and(|range| !range.is_finite() || range <= 0.0) {
            return Err(ConfigError::Message(
                "simulation.link_range_mm must be a positive distance".to_string(),
            ));
        }
        Ok(())
    }
}

/// Loads settings from `config/default.toml`, overridden by `OGM_*`
/// environment variables (e.g. `OGM_GRID__WIDTH=80`).
pub fn load_settings() -> Result<Settings, ConfigError> {
    load_settings_from(Path::new(DEFAULT_CONFIG_PATH))
}

pub fn load_settings_from(path: &Path) -> Result<Settings, ConfigError> {
    info!("Attempting to load configuration from {}", path.display());

    let settings = Config::builder()
        .add_source(File::from(path).format(FileFormat::Toml).required(true))
        .add_source(
            Environment::with_prefix("OGM")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        )
        .build()
        .and_then(|config| config.try_deserialize::<Settings>())
        .and_then(|settings| settings.validate().map(|_| settings));

    match settings {
        Ok(settings) => {
            info!("Successfully loaded configuration: {:?}", settings);
            Ok(settings)
        }
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            Err(e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    const MINIMAL: &str = r#"
[grid]
cell_size_px = 4
mm_per_cell = 20.0
height = 30
width = 40

[scan]
sample_rate = 10

[simulation]
room_left = 100.0
room_right = 100.0
room_bottom = 100.0
room_top = 100.0
"#;

    #[test]
    fn test_load_minimal() {
        let file = write_config(MINIMAL);
        let settings = load_settings_from(file.path()).unwrap();
        assert_eq!(settings.grid.width, 40);
        assert_eq!(settings.grid.height, 30);
        assert_eq!(settings.scan.sample_rate, 10);
        assert_eq!(settings.session.mode, SessionMode::Bayesian);
        assert_eq!(settings.session.raw_scans, 1);
        assert_eq!(settings.session.output_path, PathBuf::from("sessions/latest.txt"));
        assert!(settings.session.replay_path.is_none());
        assert_eq!(settings.simulation.noise_mm, 0);
        assert!(settings.simulation.link_range_mm.is_none());
        assert!(settings.plan.is_empty());
    }

    #[test]
    fn test_load_plan() {
        let contents = format!(
            "{}\n[[plan]]\nrotate = 90\ntravel = 120\n\n[[plan]]\nrotate = 0\ntravel = 40\n",
            MINIMAL
        );
        let file = write_config(&contents);
        let settings = load_settings_from(file.path()).unwrap();
        assert_eq!(
            settings.plan,
            vec![MoveRequest { rotate: 90, travel: 120 }, MoveRequest { rotate: 0, travel: 40 }]
        );
    }

    #[test]
    fn test_session_mode() {
        let contents = format!("{}\n[session]\nmode = \"raw\"\nraw_scans = 3\n", MINIMAL);
        let file = write_config(&contents);
        let settings = load_settings_from(file.path()).unwrap();
        assert_eq!(settings.session.mode, SessionMode::Raw);
        assert_eq!(settings.session.raw_scans, 3);

        let file = write_config(&format!("{}\n[session]\nmode = \"sideways\"\n", MINIMAL));
        assert!(load_settings_from(file.path()).is_err());
    }

    #[test]
    fn test_rejects_bad_sample_rate() {
        let file = write_config(&MINIMAL.replace("sample_rate = 10", "sample_rate = 7"));
        assert!(load_settings_from(file.path()).is_err());
    }

    #[test]
    fn test_rejects_bad_room() {
        let file = write_config(&MINIMAL.replace("room_top = 100.0", "room_top = -5.0"));
        assert!(load_settings_from(file.path()).is_err());
    }

    #[test]
    fn test_link_range() {
        let file = write_config(&format!("{}link_range_mm = 1500.0\n", MINIMAL));
        let settings = load_settings_from(file.path()).unwrap();
        assert_eq!(settings.simulation.link_range_mm, Some(1500.0));

        let file = write_config(&format!("{}link_range_mm = 0.0\n", MINIMAL));
        assert!(load_settings_from(file.path()).is_err());
    }

    #[test]
    fn test_missing_file() {
        assert!(load_settings_from(Path::new("does/not/exist.toml")).is_err());
    }

    #[test]
    fn test_shipped_default_is_valid() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join(DEFAULT_CONFIG_PATH);
        let settings = load_settings_from(&path).unwrap();
        assert_eq!(settings.plan.len(), 3);
    }
}
