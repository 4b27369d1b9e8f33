//! Error types for the native minimization engine

use std::fmt;
use std::io;

/// Errors surfaced by the engine entry points.
///
/// Soft timeouts are not errors: a deadline that expires mid-run yields a
/// valid cover tagged [`SolveStatus::SoftTimeout`](super::SolveStatus).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EspressoError {
    /// A cube has the wrong width for the declared variable layout.
    DimensionMismatch {
        /// Declared (num_inputs, num_outputs).
        expected: (usize, usize),
        /// Offending cube's (num_inputs, num_outputs).
        actual: (usize, usize),
    },
    /// Invalid cube input value encountered while building a cover.
    ///
    /// Cube input values must be 0 (low), 1 (high), or 2 (don't care).
    InvalidValue {
        /// The invalid value that was encountered.
        value: u8,
        /// The position in the input vector where it occurred.
        position: usize,
    },
    /// A cube with an empty variable field reached the engine.
    EmptyField {
        /// Index of the cube inside its cover.
        cube: usize,
        /// Index of the vanished variable field.
        variable: usize,
    },
    /// The ON-set and OFF-set share a point. Detected before any
    /// transformation runs; the inputs are inconsistent.
    OffsetConflict {
        /// A cube of the shared region, PLA-rendered.
        cube: String,
    },
    /// The minimized cover failed to cover an original ON-set cube. This is
    /// a post-condition of every driver run; seeing it means an internal
    /// bug, not bad input.
    CoverageGap {
        /// The uncovered cube, PLA-rendered.
        cube: String,
    },
    /// The exact solver's enumeration outgrew the configured ceiling; the
    /// caller may retry with the heuristic driver.
    LimitExceeded {
        /// The configured ceiling.
        limit: usize,
        /// The size the enumeration reached when it gave up.
        required: usize,
    },
}

impl fmt::Display for EspressoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EspressoError::DimensionMismatch { expected, actual } => write!(
                f,
                "Cube dimensions {:?} do not match the declared layout {:?}.",
                actual, expected
            ),
            EspressoError::InvalidValue { value, position } => write!(
                f,
                "Invalid cube value {} at position {}. Expected 0 (low), 1 (high), or 2 (don't care).",
                value, position
            ),
            EspressoError::EmptyField { cube, variable } => write!(
                f,
                "Cube {} has an empty field for variable {}; such cubes denote the empty set and may not enter a cover.",
                cube, variable
            ),
            EspressoError::OffsetConflict { cube } => {
                write!(f, "ON-set and OFF-set intersect at {}.", cube)
            }
            EspressoError::CoverageGap { cube } => write!(
                f,
                "Minimized cover no longer covers {}; this is a bug in the minimizer.",
                cube
            ),
            EspressoError::LimitExceeded { limit, required } => write!(
                f,
                "Exact covering table needs {} entries, above the configured limit of {}.",
                required, limit
            ),
        }
    }
}

impl std::error::Error for EspressoError {}

impl From<EspressoError> for io::Error {
    fn from(err: EspressoError) -> Self {
        match err {
            EspressoError::DimensionMismatch { .. }
            | EspressoError::InvalidValue { .. }
            | EspressoError::EmptyField { .. }
            | EspressoError::OffsetConflict { .. } => {
                io::Error::new(io::ErrorKind::InvalidData, err)
            }
            _ => io::Error::other(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_mentions_positions() {
        let err = EspressoError::InvalidValue {
            value: 5,
            position: 2,
        };
        let msg = err.to_string();
        assert!(msg.contains("Invalid cube value 5"));
        assert!(msg.contains("position 2"));
    }

    #[test]
    fn test_limit_exceeded_to_io_error() {
        let err = EspressoError::LimitExceeded {
            limit: 10,
            required: 100,
        };
        let io_err: io::Error = err.into();
        assert_eq!(io_err.kind(), io::ErrorKind::Other);
    }

    #[test]
    fn test_offset_conflict_is_invalid_data() {
        let err = EspressoError::OffsetConflict {
            cube: "1- 1".to_string(),
        };
        let io_err: io::Error = err.into();
        assert_eq!(io_err.kind(), io::ErrorKind::InvalidData);
    }
}
