//! A single 360 degree rangefinder sweep.

use crate::error::MapError;
use crate::map::WorldPoint;

/// Degrees in a full sweep.
const FULL_SWEEP: u32 = 360;

/// Range readings from one full rotation of the sensor, plus the robot state
/// at the time the sweep was taken.
///
/// `sample_rate` is the number of degrees between readings and must divide
/// 360. Once set, the readings always number exactly `360 / sample_rate` and
/// cannot be replaced.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Scan {
    sample_rate: u32,
    values: Option<Vec<i32>>,
    position: WorldPoint,
    heading: f64,
}

impl Scan {
    /// Creates a complete scan.
    ///
    /// # Errors
    /// Returns `MapError::InvalidArgument` if `sample_rate` does not divide 360
    /// or `values` does not hold `360 / sample_rate` readings.
    pub fn new(
        sample_rate: u32,
        values: Vec<i32>,
        position: WorldPoint,
        heading: f64,
    ) -> Result<Self, MapError> {
        let mut scan = Self::with_rate(sample_rate, position, heading)?;
        scan.set_values(values)?;
        Ok(scan)
    }

    /// Creates a complete scan, inferring the sample rate from the number of
    /// readings.
    ///
    /// # Errors
    /// Returns `MapError::InvalidArgument` if the number of readings is zero or
    /// does not divide 360.
    pub fn from_values(values: Vec<i32>, position: WorldPoint, heading: f64) -> Result<Self, MapError> {
        let count = u32::try_from(values.len())
            .map_err(|_| MapError::InvalidArgument("too many scan values"))?;
        if count == 0 || FULL_SWEEP % count != 0 {
            return Err(MapError::InvalidArgument(
                "number of scan values must divide 360",
            ));
        }
        Self::new(FULL_SWEEP / count, values, position, heading)
    }

    /// Creates a scan whose readings will be supplied later with
    /// [`Scan::set_values`].
    ///
    /// # Errors
    /// Returns `MapError::InvalidArgument` if `sample_rate` is zero or does not
    /// divide 360.
    pub fn with_rate(sample_rate: u32, position: WorldPoint, heading: f64) -> Result<Self, MapError> {
        validate_sample_rate(sample_rate)?;
        Ok(Scan {
            sample_rate,
            values: None,
            position,
            heading,
        })
    }

    /// Sets the readings of a scan created with [`Scan::with_rate`].
    ///
    /// # Errors
    /// Returns `MapError::InvalidArgument` if the readings were already set or
    /// their number does not match the sample rate.
    pub fn set_values(&mut self, values: Vec<i32>) -> Result<(), MapError> {
        if self.values.is_some() {
            return Err(MapError::InvalidArgument("scan values are already set"));
        }
        if values.len() != self.expected_len() {
            return Err(MapError::InvalidArgument(
                "number of scan values does not match the sample rate",
            ));
        }
        self.values = Some(values);
        Ok(())
    }

    /// Degrees between consecutive readings.
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Number of readings a complete scan holds.
    pub fn expected_len(&self) -> usize {
        (FULL_SWEEP / self.sample_rate) as usize
    }

    /// The readings, or an empty slice if they have not been set.
    pub fn values(&self) -> &[i32] {
        self.values.as_deref().unwrap_or(&[])
    }

    /// Reading at `index`, if present.
    pub fn value(&self, index: usize) -> Option<i32> {
        self.values().get(index).copied()
    }

    /// Whether the readings have been set.
    pub fn is_complete(&self) -> bool {
        self.values.is_some()
    }

    /// Number of readings currently held.
    pub fn len(&self) -> usize {
        self.values().len()
    }

    /// Whether the scan holds no readings.
    pub fn is_empty(&self) -> bool {
        self.values().is_empty()
    }

    /// World position of the robot when the scan was taken.
    pub fn position(&self) -> WorldPoint {
        self.position
    }

    /// Robot heading in degrees when the scan was taken.
    pub fn heading(&self) -> f64 {
        self.heading
    }

    /// Iterates over `(absolute_heading, range)` pairs.
    ///
    /// The first reading is taken at the scan heading and each following one
    /// `sample_rate` degrees further clockwise, wrapping at 360.
    pub fn rays(&self) -> impl Iterator<Item = (f64, i32)> + '_ {
        let step = self.sample_rate as f64;
        self.values().iter().scan(self.heading, move |angle, &value| {
            let current = *angle;
            *angle += step;
            if *angle >= FULL_SWEEP as f64 {
                *angle -= FULL_SWEEP as f64;
            }
            Some((current, value))
        })
    }
}

/// Checks that `sample_rate` is positive and divides 360.
///
/// # Errors
/// Returns `MapError::InvalidArgument` otherwise.
pub fn validate_sample_rate(sample_rate: u32) -> Result<(), MapError> {
    if sample_rate == 0 || FULL_SWEEP % sample_rate != 0 {
        return Err(MapError::InvalidArgument("sample rate must divide 360"));
    }
    Ok(())
}
