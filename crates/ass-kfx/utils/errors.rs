//! Crate-wide error type
//!
//! [`CoreError`] wraps the parser's [`ParseError`] and adds the failures that
//! happen outside parsing: output configuration, missing play resolution,
//! font collaborator errors and I/O.

use thiserror::Error;

use crate::parser::errors::ParseError;

/// Main error type for document operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoreError {
    /// Fatal parse failure
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// `save` was called with no output path configured
    #[error("no output target configured: set DocumentOptions::output or use write_to")]
    MissingOutput,

    /// Layout needs `PlayResX`/`PlayResY` in `[Script Info]`
    #[error("play resolution is not set in [Script Info]")]
    MissingPlayResolution,

    /// Frame rate that is not positive and finite
    #[error("invalid frame rate: {0}")]
    InvalidFrameRate(String),

    /// Font or shape collaborator failure
    #[error("font engine error: {0}")]
    Font(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),
}

impl From<std::io::Error> for CoreError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl CoreError {
    /// Create a font collaborator error
    pub fn font<T: core::fmt::Display>(message: T) -> Self {
        Self::Font(message.to_string())
    }

    /// Zero-based line index of the offending record, if the error has one
    #[must_use]
    pub const fn line_index(&self) -> Option<usize> {
        match self {
            Self::Parse(err) => err.line_index(),
            _ => None,
        }
    }
}

/// Result type alias for crate operations
pub type Result<T> = core::result::Result<T, CoreError>;
