//! Error types for the minimizer library
//!
//! This module provides error types organized by source and operation.
//! Each error source has its own enum with specific variants, and
//! operations have wrapper enums that combine only the errors they can
//! produce. The engine's own errors live in
//! [`EspressoError`](crate::espresso::EspressoError) and are wrapped here.

use std::fmt;
use std::io;
use std::sync::Arc;

use crate::espresso::EspressoError;

// ============================================================================
// Source-Level Error Enums
// ============================================================================

/// Errors related to PLA format parsing and validation
///
/// These errors occur when reading or parsing PLA text with invalid format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PLAError {
    /// PLA input is missing the .i (inputs) directive
    MissingInputDirective,
    /// PLA input is missing the .o (outputs) directive
    MissingOutputDirective,
    /// Invalid value in the .i directive
    InvalidInputDirective {
        /// The invalid value string
        value: Arc<str>,
    },
    /// Invalid value in the .o directive
    InvalidOutputDirective {
        /// The invalid value string
        value: Arc<str>,
    },
    /// Invalid character in the input portion of a cube row
    InvalidInputCharacter {
        /// The invalid character
        character: char,
        /// Position in the input string
        position: usize,
    },
    /// Invalid character in the output portion of a cube row
    InvalidOutputCharacter {
        /// The invalid character
        character: char,
        /// Position in the output string
        position: usize,
    },
    /// Label directive count disagrees with the declared dimensions
    LabelCountMismatch {
        /// Which directive ("input" for .ilb, "output" for .ob)
        label_type: &'static str,
        /// The declared dimension
        expected: usize,
        /// Number of labels actually given
        actual: usize,
    },
}

impl fmt::Display for PLAError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PLAError::MissingInputDirective => {
                write!(f, "PLA input is missing the .i directive")
            }
            PLAError::MissingOutputDirective => {
                write!(f, "PLA input is missing the .o directive")
            }
            PLAError::InvalidInputDirective { value } => {
                write!(f, "Invalid .i directive value '{}'", value)
            }
            PLAError::InvalidOutputDirective { value } => {
                write!(f, "Invalid .o directive value '{}'", value)
            }
            PLAError::InvalidInputCharacter {
                character,
                position,
            } => write!(
                f,
                "Invalid input character '{}' at position {}. Expected 0, 1, or -.",
                character, position
            ),
            PLAError::InvalidOutputCharacter {
                character,
                position,
            } => write!(
                f,
                "Invalid output character '{}' at position {}. Expected 0, 1, -, or ~.",
                character, position
            ),
            PLAError::LabelCountMismatch {
                label_type,
                expected,
                actual,
            } => write!(
                f,
                "Expected {} {} labels, found {}",
                expected, label_type, actual
            ),
        }
    }
}

impl std::error::Error for PLAError {}

impl From<PLAError> for io::Error {
    fn from(err: PLAError) -> Self {
        io::Error::new(io::ErrorKind::InvalidData, err)
    }
}

// ============================================================================
// Operation-Level Wrapper Enums
// ============================================================================

/// Errors that can occur while reading PLA text
#[derive(Debug)]
pub enum PLAReadError {
    /// The text is not valid PLA format
    Pla(PLAError),
    /// Underlying IO failure
    Io(io::Error),
}

impl fmt::Display for PLAReadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PLAReadError::Pla(e) => write!(f, "PLA format error: {}", e),
            PLAReadError::Io(e) => write!(f, "IO error: {}", e),
        }
    }
}

impl std::error::Error for PLAReadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PLAReadError::Pla(e) => Some(e),
            PLAReadError::Io(e) => Some(e),
        }
    }
}

impl From<PLAError> for PLAReadError {
    fn from(err: PLAError) -> Self {
        PLAReadError::Pla(err)
    }
}

impl From<io::Error> for PLAReadError {
    fn from(err: io::Error) -> Self {
        PLAReadError::Io(err)
    }
}

impl From<PLAReadError> for io::Error {
    fn from(err: PLAReadError) -> Self {
        match err {
            PLAReadError::Io(e) => e,
            PLAReadError::Pla(e) => e.into(),
        }
    }
}

/// Errors that can occur while writing PLA text
#[derive(Debug)]
pub enum PLAWriteError {
    /// Underlying IO failure
    Io(io::Error),
}

impl fmt::Display for PLAWriteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PLAWriteError::Io(e) => write!(f, "IO error: {}", e),
        }
    }
}

impl std::error::Error for PLAWriteError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PLAWriteError::Io(e) => Some(e),
        }
    }
}

impl From<io::Error> for PLAWriteError {
    fn from(err: io::Error) -> Self {
        PLAWriteError::Io(err)
    }
}

impl From<PLAWriteError> for io::Error {
    fn from(err: PLAWriteError) -> Self {
        match err {
            PLAWriteError::Io(e) => e,
        }
    }
}

/// Errors that can occur during minimization operations
///
/// Returned by [`Minimizable`](crate::Minimizable) methods.
#[derive(Debug)]
pub enum MinimizationError {
    /// Engine-level failure (invalid cubes, conflicting sets, limits)
    Engine(EspressoError),
    /// IO error during minimization
    Io(io::Error),
}

impl fmt::Display for MinimizationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MinimizationError::Engine(e) => write!(f, "Minimization error: {}", e),
            MinimizationError::Io(e) => write!(f, "IO error: {}", e),
        }
    }
}

impl std::error::Error for MinimizationError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            MinimizationError::Engine(e) => Some(e),
            MinimizationError::Io(e) => Some(e),
        }
    }
}

impl From<EspressoError> for MinimizationError {
    fn from(err: EspressoError) -> Self {
        MinimizationError::Engine(err)
    }
}

impl From<io::Error> for MinimizationError {
    fn from(err: io::Error) -> Self {
        MinimizationError::Io(err)
    }
}

impl From<MinimizationError> for io::Error {
    fn from(err: MinimizationError) -> Self {
        match err {
            MinimizationError::Io(e) => e,
            MinimizationError::Engine(e) => e.into(),
        }
    }
}
