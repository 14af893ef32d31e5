//! Error types for spectral_core.

use thiserror::Error;

/// Which grid axis a size error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridAxis {
    /// A 1D sequence.
    Sequence,
    /// Grid height (number of rows).
    Rows,
    /// Grid width (number of columns).
    Cols,
}

impl std::fmt::Display for GridAxis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sequence => write!(f, "sequence length"),
            Self::Rows => write!(f, "rows"),
            Self::Cols => write!(f, "cols"),
        }
    }
}

/// Errors raised by transform, filter and codec operations.
///
/// All of them are precondition violations detected before any work is done;
/// no operation returns a partial result.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SpectralError {
    /// A dimension is zero or not a power of two where the transform needs one.
    #[error("invalid size: {axis} = {len} is not a power of two")]
    InvalidSize {
        /// Offending axis.
        axis: GridAxis,
        /// Offending length.
        len: usize,
    },

    /// Two grids that must share a shape do not.
    #[error("dimension mismatch: expected {expected:?}, got {actual:?}")]
    DimensionMismatch {
        /// Shape of the reference grid.
        expected: (usize, usize),
        /// Shape that was supplied.
        actual: (usize, usize),
    },

    /// A scalar parameter is out of range or not finite.
    #[error("invalid parameter `{name}`: {reason}")]
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// Why it was rejected.
        reason: String,
    },
}

impl SpectralError {
    pub(crate) fn invalid_parameter(name: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, SpectralError>;
