//! Error types for document parsing
//!
//! Split the same way throughout the crate: [`ParseError`] aborts the parse
//! call, [`ParseIssue`] is collected and parsing continues.

mod parse_error;
mod parse_issue;

pub use parse_error::{LineKind, ParseError};
pub use parse_issue::{IssueCategory, IssueSeverity, ParseIssue};
