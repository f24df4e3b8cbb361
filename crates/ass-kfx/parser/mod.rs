//! ASS document parsing
//!
//! Sections are sliced with [`split_sections`], `Key: Value` sections are
//! decoded through the [`schema`](crate::schema) marshaller and record
//! lines through [`Style::parse`] and [`Line::parse`].
//!
//! # Example
//!
//! ```rust
//! use ass_kfx::parser::{split_sections, Line, SectionType};
//! use ass_kfx::time::FrameRate;
//!
//! let text = "[Events]\nFormat: Layer, Start, End, Style, Name, MarginL, MarginR, MarginV, Effect, Text\nDialogue: 0,0:00:00.00,0:00:05.00,Default,,0,0,0,,Hello World!\n";
//!
//! let sections = split_sections(text);
//! assert_eq!(sections[0].section_type(), SectionType::Events);
//! let lines = sections[0]
//!     .records()
//!     .enumerate()
//!     .map(|(i, raw)| Line::parse(raw, i, FrameRate::NTSC_FILM, true))
//!     .collect::<Result<Vec<_>, _>>()?;
//! assert_eq!(lines[0].text, "Hello World!");
//! # Ok::<(), ass_kfx::parser::ParseError>(())
//! ```

pub mod ast;
pub mod errors;

pub use ast::{split_sections, Line, Meta, Section, SectionType, Style};
pub use errors::{IssueCategory, IssueSeverity, LineKind, ParseError, ParseIssue};
