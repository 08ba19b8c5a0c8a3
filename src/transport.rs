//! The link to the robot: scan acquisition and move execution.
//!
//! The real robot is reached over a radio link; here it is only an interface,
//! plus a simulated robot in a rectangular room for running sessions offline.

use ogm_mapping::scan::validate_sample_rate;
use ogm_mapping::sensor_model::SENTINEL_RANGE_MM;
use ogm_odometry::{OdometryPose, normalize_bearing, reconcile};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::SimulationSettings;

/// Reading the robot reports when nothing is in range.
pub const OUT_OF_RANGE_READING: i32 = 800;

#[derive(Error, Debug)]
pub enum TransportError {
    #[error("invalid sample rate: {0}")]
    InvalidSampleRate(u32),

    #[error("link to robot lost: {0}")]
    Disconnected(String),

    #[error("robot reported failure: {0}")]
    Remote(String),
}

/// Request/response access to the robot. Every call blocks until the robot
/// has finished or the link has failed.
pub trait Transport {
    /// Takes one full sweep, returning `360 / sample_rate` readings in mm.
    fn acquire_scan(&mut self, sample_rate: u32) -> Result<Vec<i32>, TransportError>;

    /// Rotates `rotate` degrees clockwise, then travels `travel` mm forward.
    ///
    /// Returns the odometry pose before and after the move, in the robot's
    /// own convention.
    fn execute_move(
        &mut self,
        rotate: i32,
        travel: i32,
    ) -> Result<(OdometryPose, OdometryPose), TransportError>;
}

/// Axis-aligned walls, given as distances from the start point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Room {
    pub left: f64,
    pub right: f64,
    pub bottom: f64,
    pub top: f64,
}

impl Room {
    /// Distance from `(x, y)` to the first wall along the map-frame heading.
    fn ray_length(&self, x: f64, y: f64, heading: f64) -> f64 {
        let rad = heading.to_radians();
        let (dx, dy) = (rad.sin(), rad.cos());
        let along = |pos: f64, dir: f64, low: f64, high: f64| {
            if dir > f64::EPSILON {
                (high - pos) / dir
            } else if dir < -f64::EPSILON {
                (low - pos) / dir
            } else {
                f64::INFINITY
            }
        };
        along(x, dx, -self.left, self.right).min(along(y, dy, -self.bottom, self.top))
    }
}

/// A robot in a rectangular room with a noisy rangefinder and perfect
/// odometry.
///
/// With a link range set, every request made while the robot is further
/// than that from the start point fails with `TransportError::Disconnected`.
pub struct SimulatedRobot {
    room: Room,
    noise_mm: i32,
    link_range_mm: Option<f64>,
    odometry: OdometryPose,
    rng: StdRng,
}

impl SimulatedRobot {
    pub fn new(room: Room, noise_mm: i32, seed: u64) -> Self {
        SimulatedRobot {
            room,
            noise_mm: noise_mm.max(0),
            link_range_mm: None,
            odometry: OdometryPose::default(),
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn from_settings(settings: &SimulationSettings) -> Self {
        let room = Room {
            left: settings.room_left,
            right: settings.room_right,
            bottom: settings.room_bottom,
            top: settings.room_top,
        };
        info!(
            ?room,
            noise_mm = settings.noise_mm,
            seed = settings.seed,
            link_range_mm = ?settings.link_range_mm,
            "Simulated robot created"
        );
        let robot = Self::new(room, settings.noise_mm, settings.seed);
        match settings.link_range_mm {
            Some(range) => robot.with_link_range(range),
            None => robot,
        }
    }

    pub fn with_link_range(mut self, range_mm: f64) -> Self {
        self.link_range_mm = Some(range_mm);
        self
    }

    /// Current odometry in the robot's convention.
    pub fn odometry(&self) -> OdometryPose {
        self.odometry
    }

    fn check_link(&self) -> Result<(), TransportError> {
        let Some(range) = self.link_range_mm else {
            return Ok(());
        };
        let distance = self.odometry.x.hypot(self.odometry.y);
        if distance > range {
            warn!(distance, range, "Simulated robot out of radio range");
            return Err(TransportError::Disconnected(format!(
                "robot is {:.0} mm from the base, link range is {:.0} mm",
                distance, range
            )));
        }
        Ok(())
    }
}

impl Transport for SimulatedRobot {
    fn acquire_scan(&mut self, sample_rate: u32) -> Result<Vec<i32>, TransportError> {
        self.check_link()?;
        validate_sample_rate(sample_rate).map_err(|_| TransportError::InvalidSampleRate(sample_rate))?;

        // The sensor sweeps in the map frame, so cast rays from the reconciled pose.
        let pose = reconcile(self.odometry).map_err(|e| TransportError::Remote(e.to_string()))?;
        let count = 360 / sample_rate;
        let mut values = Vec::with_capacity(count as usize);
        for i in 0..count {
            let heading = pose.heading + (i * sample_rate) as f64;
            let range = self.room.ray_length(pose.x, pose.y, heading);
            let noise = if self.noise_mm > 0 {
                self.rng.random_range(-self.noise_mm..=self.noise_mm)
            } else {
                0
            };
            let reading = (range.round() as i32).saturating_add(noise).max(0);
            values.push(if reading >= SENTINEL_RANGE_MM { OUT_OF_RANGE_READING } else { reading });
        }
        debug!(count, sample_rate, "Simulated scan acquired");
        Ok(values)
    }

    fn execute_move(
        &mut self,
        rotate: i32,
        travel: i32,
    ) -> Result<(OdometryPose, OdometryPose), TransportError> {
        self.check_link()?;
        let before = self.odometry;
        let mut after = before;

        // The robot's odometry turns counter-clockwise for positive angles.
        if rotate > 0 {
            after.heading = normalize_bearing(after.heading - rotate as f64);
        }
        if travel > 0 {
            let rad = after.heading.to_radians();
            after.x += travel as f64 * rad.cos();
            after.y += travel as f64 * rad.sin();
        }

        self.odometry = after;
        debug!(rotate, travel, %before, %after, "Simulated move executed");
        Ok((before, after))
    }
}
