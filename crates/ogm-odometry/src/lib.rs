#![cfg_attr(not(test), no_std)]
#![warn(missing_docs)]
#![doc = "A `no_std` library for reconciling remote robot odometry into the occupancy map frame."]
#![doc = ""]
#![doc = "This crate provides map-frame poses, the remote odometry convention, heading"]
#![doc = "normalisation and the displacement produced by a single move command."]

use core::fmt;
use libm::{fabs, fmod, sqrt};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

pub mod error;
pub use error::OdometryError;

/// Full turn in degrees.
const FULL_TURN: f64 = 360.0;
/// Half turn in degrees.
const HALF_TURN: f64 = 180.0;

/// Normalize a heading to be within `[0, 360)` degrees.
///
/// # Arguments
///
/// * `heading`: The heading in degrees to normalize.
///
/// # Returns
///
/// The normalized heading in degrees. `-0.0` is returned as `0.0`.
pub fn normalize_heading(heading: f64) -> f64 {
    let h = fmod(heading, FULL_TURN);
    let h = if h < 0.0 { h + FULL_TURN } else { h };
    // Adding a tiny negative remainder to 360 can round back up to 360.
    if h >= FULL_TURN { 0.0 } else { h + 0.0 }
}

/// Normalize a bearing difference to be within `(-180, 180]` degrees.
pub fn normalize_bearing(bearing: f64) -> f64 {
    let h = normalize_heading(bearing);
    if h > HALF_TURN { h - FULL_TURN } else { h }
}

/// A map-frame pose `(x, y, heading)`.
///
/// `x` and `y` are millimetres relative to the map origin. The heading is in
/// degrees, measured clockwise from the map's "up" axis (the rangefinder
/// convention), and normalized to `[0, 360)`.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Pose {
    /// Map-frame x offset from the origin (mm).
    pub x: f64,
    /// Map-frame y offset from the origin (mm).
    pub y: f64,
    /// Heading (degrees), normalized to `[0, 360)`.
    pub heading: f64,
}

impl Pose {
    /// Construct a new pose. The heading is normalized to `[0, 360)`.
    ///
    /// # Arguments
    ///
    /// * `x`: Map-frame x offset in millimetres.
    /// * `y`: Map-frame y offset in millimetres.
    /// * `heading`: Heading in degrees.
    pub fn new(x: f64, y: f64, heading: f64) -> Self {
        Pose {
            x,
            y,
            heading: normalize_heading(heading),
        }
    }
}

impl fmt::Display for Pose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(x: {:.1} mm, y: {:.1} mm, heading: {:.1}°)", self.x, self.y, self.heading)
    }
}

/// A pose as reported by the robot's odometry.
///
/// The remote frame has its axes swapped relative to the map and reports
/// headings counter-clockwise in `[-180, 180]` degrees.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct OdometryPose {
    /// Remote x position (mm).
    pub x: f64,
    /// Remote y position (mm).
    pub y: f64,
    /// Remote heading (degrees) in `[-180, 180]`.
    pub heading: f64,
}

impl OdometryPose {
    /// Construct a new remote odometry pose. No normalization is applied.
    pub const fn new(x: f64, y: f64, heading: f64) -> Self {
        OdometryPose { x, y, heading }
    }
}

impl fmt::Display for OdometryPose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(x: {:.1} mm, y: {:.1} mm, h: {:.1}°)", self.x, self.y, self.heading)
    }
}

/// Converts a remote odometry pose into the map frame.
///
/// The remote `(x, y)` becomes map `(-y, x)`. The remote heading is first
/// wrapped from `[-180, 180]` into `[0, 360)` and then inverted (`360 - h`),
/// because the remote frame turns the opposite way to the sensor convention.
///
/// Both the pose before and the pose after a move must go through this
/// function so the displacement between them is meaningful.
///
/// # Errors
///
/// Returns `Err(OdometryError::NonFinite)` if any component is NaN or infinite.
/// Returns `Err(OdometryError::HeadingOutOfRange)` if the heading is outside `[-180, 180]`.
pub fn reconcile(remote: OdometryPose) -> Result<Pose, OdometryError> {
    if !remote.x.is_finite() || !remote.y.is_finite() {
        return Err(OdometryError::NonFinite("position must be finite"));
    }
    if !remote.heading.is_finite() {
        return Err(OdometryError::NonFinite("heading must be finite"));
    }
    if remote.heading < -HALF_TURN || remote.heading > HALF_TURN {
        return Err(OdometryError::HeadingOutOfRange(
            "must be within [-180, 180] degrees",
        ));
    }

    let wrapped = if remote.heading < 0.0 {
        FULL_TURN - fabs(remote.heading)
    } else {
        remote.heading
    };

    Ok(Pose::new(-remote.y, remote.x, FULL_TURN - wrapped))
}

/// The motion between two map-frame poses.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Displacement {
    /// Change in x (mm).
    pub dx: f64,
    /// Change in y (mm).
    pub dy: f64,
    /// Straight-line distance travelled (mm).
    pub distance: f64,
    /// Signed heading change (degrees) in `(-180, 180]`, positive clockwise.
    pub rotation: f64,
}

impl Displacement {
    /// Computes the displacement from `before` to `after`.
    pub fn between(before: &Pose, after: &Pose) -> Self {
        let dx = after.x - before.x;
        let dy = after.y - before.y;
        Displacement {
            dx,
            dy,
            distance: sqrt(dx * dx + dy * dy),
            rotation: normalize_bearing(after.heading - before.heading),
        }
    }
}

impl fmt::Display for Displacement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(travelled: {:.1} mm, rotated: {:.1}°)", self.distance, self.rotation)
    }
}
