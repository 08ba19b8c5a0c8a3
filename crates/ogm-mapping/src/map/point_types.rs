//! Cell indices and world points used to address the grid.

use crate::error::MapError;

/// Represents a cell in grid coordinates.
///
/// Cell indices are 1-indexed: the bottom-left cell is `(1, 1)`. Values
/// outside the grid are representable so callers can detect them.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CellIndex {
    /// The column index, starting at 1.
    pub x: i64,
    /// The row index, starting at 1.
    pub y: i64,
}

impl CellIndex {
    /// Creates a new `CellIndex`.
    #[must_use]
    pub const fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }

    /// Creates a `CellIndex` from floating point coordinates.
    ///
    /// # Errors
    /// Returns `MapError::InvalidArgument` if either coordinate has a
    /// fractional part or is not finite.
    pub fn from_f64(x: f64, y: f64) -> Result<Self, MapError> {
        if !x.is_finite() || !y.is_finite() {
            return Err(MapError::InvalidArgument("cell index must be finite"));
        }
        if x.fract() != 0.0 || y.fract() != 0.0 {
            return Err(MapError::InvalidArgument(
                "cell index must not have a fractional part",
            ));
        }
        Ok(Self::new(x as i64, y as i64))
    }
}

/// Represents a point in world coordinates (millimetres).
#[derive(Debug, Default, Clone, Copy, PartialEq, PartialOrd)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WorldPoint {
    /// The x-coordinate in millimetres.
    pub x: f64,
    /// The y-coordinate in millimetres.
    pub y: f64,
}

impl WorldPoint {
    /// Creates a new `WorldPoint`.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_index_from_whole_numbers() {
        assert_eq!(CellIndex::from_f64(3.0, 7.0).unwrap(), CellIndex::new(3, 7));
        assert_eq!(CellIndex::from_f64(-2.0, 0.0).unwrap(), CellIndex::new(-2, 0));
    }

    #[test]
    fn test_cell_index_rejects_fractions() {
        assert!(matches!(
            CellIndex::from_f64(2.5, 1.0),
            Err(MapError::InvalidArgument(_))
        ));
        assert!(matches!(
            CellIndex::from_f64(1.0, f64::NAN),
            Err(MapError::InvalidArgument(_))
        ));
    }
}
