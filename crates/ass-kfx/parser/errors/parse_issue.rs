//! Recoverable parse issues
//!
//! Missing sections and unresolved style references do not abort document
//! construction. They are collected as [`ParseIssue`] records on the
//! document and mirrored to the `log` facade as they are raised.

use core::fmt;

/// Severity of a recoverable issue
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum IssueSeverity {
    /// Informational note
    Info,
    /// Something was substituted or skipped
    Warning,
}

impl fmt::Display for IssueSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Info => write!(f, "info"),
            Self::Warning => write!(f, "warning"),
        }
    }
}

/// Area of the document an issue relates to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum IssueCategory {
    /// Section layout (missing or duplicated sections)
    Structure,
    /// Style definitions and references
    Style,
    /// Dialogue/comment events
    Event,
    /// Timing and frame conversion
    Timing,
}

impl fmt::Display for IssueCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Structure => write!(f, "structure"),
            Self::Style => write!(f, "style"),
            Self::Event => write!(f, "event"),
            Self::Timing => write!(f, "timing"),
        }
    }
}

/// A recoverable condition found while building a document
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ParseIssue {
    /// How serious the issue is
    pub severity: IssueSeverity,
    /// What part of the document it concerns
    pub category: IssueCategory,
    /// Human-readable description
    pub message: String,
    /// Zero-based line index within the section, when the issue has one
    pub line: Option<usize>,
}

impl ParseIssue {
    /// Create a new issue
    #[must_use]
    pub const fn new(
        severity: IssueSeverity,
        category: IssueCategory,
        message: String,
        line: Option<usize>,
    ) -> Self {
        Self {
            severity,
            category,
            message,
            line,
        }
    }

    /// Create warning-level issue
    #[must_use]
    pub const fn warning(category: IssueCategory, message: String, line: Option<usize>) -> Self {
        Self::new(IssueSeverity::Warning, category, message, line)
    }

    /// Create info-level issue
    #[must_use]
    pub const fn info(category: IssueCategory, message: String, line: Option<usize>) -> Self {
        Self::new(IssueSeverity::Info, category, message, line)
    }

    /// Emit the issue through the `log` facade at a level matching its severity
    pub fn log(&self) {
        match self.severity {
            IssueSeverity::Info => log::info!("{self}"),
            IssueSeverity::Warning => log::warn!("{self}"),
        }
    }
}

impl fmt::Display for ParseIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.line {
            Some(line) => write!(
                f,
                "[{line}:{}] {}: {}",
                self.category, self.severity, self.message
            ),
            None => write!(f, "[{}] {}: {}", self.category, self.severity, self.message),
        }
    }
}
