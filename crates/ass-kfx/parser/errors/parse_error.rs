//! Fatal parse error type for ASS documents
//!
//! Contains the `ParseError` enum representing failures that abort document
//! construction. Every variant tied to a source line carries the zero-based
//! line index (within its section) and the raw line text so the offending
//! record can be found without re-reading the input.

use thiserror::Error;

/// Kind of structural record a malformed line was expected to be
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LineKind {
    /// `Style:` line in `[V4+ Styles]`
    Style,
    /// `Dialogue:` or `Comment:` line in `[Events]`
    Event,
    /// `Key: Value` line in a meta section
    Meta,
}

impl core::fmt::Display for LineKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Style => write!(f, "style"),
            Self::Event => write!(f, "event"),
            Self::Meta => write!(f, "meta"),
        }
    }
}

/// Unrecoverable parse failure
///
/// Use [`ParseIssue`](super::ParseIssue) for conditions that allow parsing
/// to continue (missing sections, unresolved style references).
///
/// # Error Categories
///
/// - **Structure errors**: a `Style:`/`Dialogue:`/`Comment:` line whose field
///   count or prefix does not match ([`ParseError::MalformedLine`])
/// - **Value errors**: a field that cannot be coerced to its declared type,
///   reported bare by the codecs and wrapped with its line by the section
///   parsers ([`ParseError::InvalidField`])
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// Structural record failed its field-count or format match
    #[error("malformed {kind} line {index}: {reason}: `{raw}`")]
    MalformedLine {
        index: usize,
        kind: LineKind,
        raw: String,
        reason: String,
    },

    /// A field value could not be coerced to its declared type
    #[error("invalid value `{value}` for field `{field}`: {reason}")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    /// A value error located on a specific source line
    #[error("line {index} (`{raw}`): {source}")]
    InvalidField {
        index: usize,
        raw: String,
        #[source]
        source: Box<ParseError>,
    },

    /// Timestamp text is not `H:MM:SS.CC`
    #[error("invalid time `{time}`: {reason}")]
    InvalidTime { time: String, reason: String },

    /// Alignment outside the 1..=9 grid
    #[error("invalid alignment `{value}`: expected 1-9")]
    InvalidAlignment { value: String },

    /// Color token is not an `&H` hex value
    #[error("invalid color `{color}`: {reason}")]
    InvalidColor { color: String, reason: String },
}

impl ParseError {
    /// Attach a source line to a bare value error
    #[must_use]
    pub fn at_line(self, index: usize, raw: &str) -> Self {
        match self {
            located @ (Self::InvalidField { .. } | Self::MalformedLine { .. }) => located,
            other => Self::InvalidField {
                index,
                raw: raw.to_string(),
                source: Box::new(other),
            },
        }
    }

    /// Zero-based line index the error refers to, if any
    #[must_use]
    pub const fn line_index(&self) -> Option<usize> {
        match self {
            Self::MalformedLine { index, .. } | Self::InvalidField { index, .. } => Some(*index),
            _ => None,
        }
    }

    /// Construct a value coercion error
    pub fn invalid_value(
        field: impl Into<String>,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidValue {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }
}
