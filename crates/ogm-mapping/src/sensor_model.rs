//! Inverse sensor model for the rotating infra-red rangefinder.
//!
//! A single beam return of range `z` is turned into an occupancy probability
//! for a cell at distance `d` from the robot and `theta` degrees off the beam
//! axis. Around the measured surface the probability follows five zones:
//!
//! ```text
//! p
//! 0.5+s |            ______
//!       |           /      \
//! 0.5   |- - - - - / - - - -\______  unknown
//!       |         /
//! 0.5-s |________/  free
//!       +--------+----+-----+--+---- d
//!             z-D1  z+D1  z+D2 z+D3
//! ```
//!
//! `s` is the sensor confidence, which decays with the off-axis angle and
//! with the measured range.

/// Half-width (mm) of the ramp from free to occupied around the surface.
pub const D1: f64 = 5.0;
/// Distance (mm) past the surface where the occupied plateau ends.
pub const D2: f64 = 35.0;
/// Distance (mm) past the surface where the update fades back to the prior.
pub const D3: f64 = 37.0;

/// Beam narrowness. At 2 the cone is effectively +/- 1 degree.
pub const CONE_FACTOR: f64 = 2.0;
/// Range (mm) at which the sensor confidence reaches zero.
pub const CONFIDENCE_RANGE_MM: f64 = 900.0;
/// Confidence of an on-axis reading at zero range.
pub const PEAK_CONFIDENCE: f64 = 0.4;
/// Prior occupancy probability of every cell.
pub const PRIOR: f64 = 0.5;

/// Readings at or above this value mean "nothing detected".
pub const SENTINEL_RANGE_MM: i32 = 790;
/// Synthetic range used to clear free space along a sentinel beam.
pub const FREE_SPACE_RANGE_MM: f64 = 800.0;
/// Probability written by the single-ray model for a hit cell.
pub const SIMPLE_HIT_PROBABILITY: f64 = 0.9;

/// Sensor confidence for a reading of `z` mm, `theta` degrees off-axis.
///
/// The range factor `1 - z/900` is clamped into `[0, 1]`, so the result is
/// always within `[0, 0.4]`. Readings of 900 mm or more carry no information.
pub fn confidence(z: f64, theta: f64) -> f64 {
    let cone = (-(CONE_FACTOR * theta).powi(2)).exp();
    let range = (1.0 - z / CONFIDENCE_RANGE_MM).clamp(0.0, 1.0);
    cone * range * PEAK_CONFIDENCE
}

/// Occupancy probability of a cell `d` mm from the robot given a reading of
/// `z` mm whose beam is `theta` degrees away from the cell.
///
/// Returns exactly [`PRIOR`] for cells beyond `z + D3`.
pub fn inverse_sensor_model(z: f64, d: f64, theta: f64) -> f64 {
    let s = confidence(z, theta);
    let delta = if d < z - D1 {
        -s
    } else if d < z + D1 {
        -s + (s / D1) * (d - z + D1)
    } else if d < z + D2 {
        s
    } else if d < z + D3 {
        s - (s / (D3 - D2)) * (d - z - D2)
    } else {
        0.0
    };
    PRIOR + delta
}

/// Log-odds of probability `p`.
pub fn logit(p: f64) -> f64 {
    (p / (1.0 - p)).ln()
}

/// Probability for log-odds value `l`.
pub fn probability(l: f64) -> f64 {
    1.0 / (1.0 + (-l).exp())
}
