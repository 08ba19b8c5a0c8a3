//! This module defines the error types used by the `ogm-mapping` crate.

#![warn(missing_docs)]

/// Error type for mapping operations.
///
/// This enum encapsulates all possible errors that can occur while building
/// scans or updating the occupancy grid.
#[derive(Debug, Clone, PartialEq)]
pub enum MapError {
    /// Error for an invalid argument.
    /// Returned for bad sample rates, mismatched scan values, fractional cell
    /// indices and non-positive grid parameters.
    InvalidArgument(&'static str),
    /// Error for invalid map dimensions.
    /// Returned when the grid width or height is zero or would overflow.
    InvalidDimensions(&'static str),
    /// Error for a cell outside `[1, width] x [1, height]`.
    IndexOutOfRange {
        /// The offending 1-indexed column.
        x: i64,
        /// The offending 1-indexed row.
        y: i64,
    },
}

impl core::fmt::Display for MapError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            MapError::InvalidArgument(msg) => write!(f, "Invalid argument: {}", msg),
            MapError::InvalidDimensions(msg) => write!(f, "Invalid map dimensions: {}", msg),
            MapError::IndexOutOfRange { x, y } => {
                write!(f, "Cell ({}, {}) is outside the map", x, y)
            }
        }
    }
}

impl core::error::Error for MapError {}
