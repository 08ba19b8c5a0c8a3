#![warn(missing_docs)]

//! Error types for the odometry library.
//!
//! This module defines error types that can occur while converting remote
//! odometry into the map frame.

use core::fmt;

/// Errors that can occur when reconciling odometry.
#[derive(Debug, Clone, PartialEq)]
pub enum OdometryError {
    /// A pose component was NaN or infinite.
    NonFinite(&'static str),
    /// A remote heading was outside `[-180, 180]` degrees.
    HeadingOutOfRange(&'static str),
}

impl fmt::Display for OdometryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OdometryError::NonFinite(msg) => write!(f, "Non-finite odometry value: {}", msg),
            OdometryError::HeadingOutOfRange(msg) => write!(f, "Odometry heading out of range: {}", msg),
        }
    }
}

impl core::error::Error for OdometryError {}
