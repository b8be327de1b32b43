//! Sheet error types

use thiserror::Error;

use crate::snap::SnapKey;

/// Errors raised by snap table lookups
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SnapError {
    /// The key was never a candidate snap for this configuration
    #[error("invalid snap point index {0}")]
    InvalidSnapReference(SnapKey),
}

/// Errors raised by the sheet command surface
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SheetError {
    #[error(transparent)]
    Snap(#[from] SnapError),

    /// Geometry has not been measured yet, so no snap table exists
    #[error("sheet geometry is not available yet")]
    GeometryUnavailable,
}

/// Failure to parse a [`SnapKey`] from text
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unrecognized snap key '{0}' (expected an index, \"close\" or \"auto\")")]
pub struct ParseSnapKeyError(pub String);

/// Result type for sheet operations
pub type Result<T> = std::result::Result<T, SheetError>;
