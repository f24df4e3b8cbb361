//! Override-block scanning for dialogue text
//!
//! Dialogue text interleaves literal text with `{...}` override blocks.
//! [`TagBlockScanner`] walks the text with two states (outside a block,
//! inside a block) and yields [`Segment`]s with their byte offsets. An
//! unclosed `{` is treated as literal text, the same way renderers show it.
//!
//! Inside a block, [`split_override_tags`] separates the `\tag` tokens. A
//! backslash inside parentheses does not start a new tag, so
//! `\t(0,500,\blur3)` stays one token.

pub mod karaoke;

pub use karaoke::{decompose_karaoke, KaraokeKind, KaraokeSyllable};

use core::ops::Range;

/// One piece of dialogue text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment<'a> {
    /// Literal text starting at `offset`
    Text { text: &'a str, offset: usize },
    /// Override block; `body` excludes the braces, `span` includes them
    Block { body: &'a str, span: (usize, usize) },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanState {
    Outside,
    Inside { open: usize },
}

/// Two-state scanner over `{...}` override blocks
#[derive(Debug, Clone)]
pub struct TagBlockScanner<'a> {
    text: &'a str,
    pos: usize,
}

impl<'a> TagBlockScanner<'a> {
    /// Scan `text` from the start
    #[must_use]
    pub const fn new(text: &'a str) -> Self {
        Self { text, pos: 0 }
    }
}

impl<'a> Iterator for TagBlockScanner<'a> {
    type Item = Segment<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let bytes = self.text.as_bytes();
        let start = self.pos;
        if start >= bytes.len() {
            return None;
        }

        let mut state = ScanState::Outside;
        for (i, &byte) in bytes.iter().enumerate().skip(start) {
            match (state, byte) {
                (ScanState::Outside, b'{') => {
                    if i > start {
                        self.pos = i;
                        return Some(Segment::Text {
                            text: &self.text[start..i],
                            offset: start,
                        });
                    }
                    state = ScanState::Inside { open: i };
                }
                (ScanState::Inside { open }, b'}') => {
                    self.pos = i + 1;
                    return Some(Segment::Block {
                        body: &self.text[open + 1..i],
                        span: (open, i + 1),
                    });
                }
                _ => {}
            }
        }

        self.pos = bytes.len();
        Some(Segment::Text {
            text: &self.text[start..],
            offset: start,
        })
    }
}

/// Remove every `{...}` block, keeping literal text
///
/// ```rust
/// use ass_kfx::tokenizer::strip_tags;
///
/// assert_eq!(strip_tags(r"{\k50}Hel{\k50\blur2}lo"), "Hello");
/// assert_eq!(strip_tags("open { brace"), "open { brace");
/// ```
#[must_use]
pub fn strip_tags(raw: &str) -> String {
    TagBlockScanner::new(raw)
        .filter_map(|segment| match segment {
            Segment::Text { text, .. } => Some(text),
            Segment::Block { .. } => None,
        })
        .collect()
}

/// Byte ranges of the tokens in a block body, relative to the body
fn tag_ranges(body: &str) -> Vec<Range<usize>> {
    let mut ranges = Vec::new();
    let mut depth = 0usize;
    let mut start = 0usize;
    for (i, byte) in body.bytes().enumerate() {
        match byte {
            b'(' => depth += 1,
            b')' => depth = depth.saturating_sub(1),
            b'\\' if depth == 0 => {
                if i > start {
                    ranges.push(start..i);
                }
                start = i;
            }
            _ => {}
        }
    }
    if body.len() > start {
        ranges.push(start..body.len());
    }
    ranges
        .into_iter()
        .filter(|range| !body[range.clone()].trim().is_empty() && &body[range.clone()] != "\\")
        .collect()
}

/// Split a block body into its tokens
///
/// Each tag keeps its leading backslash. Text before the first backslash
/// (a comment block) is returned as its own token.
///
/// ```rust
/// use ass_kfx::tokenizer::split_override_tags;
///
/// assert_eq!(
///     split_override_tags(r"\k20\t(0,500,\blur3)\-fx"),
///     vec![r"\k20", r"\t(0,500,\blur3)", r"\-fx"]
/// );
/// ```
#[must_use]
pub fn split_override_tags(body: &str) -> Vec<&str> {
    tag_ranges(body)
        .into_iter()
        .map(|range| &body[range])
        .collect()
}

/// An override tag located in the raw dialogue text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OverrideTag<'a> {
    /// Tag text including its backslash
    pub text: &'a str,
    /// Byte offset of the tag in the raw text
    pub position: usize,
}

/// Every override token of a dialogue text, in order
#[must_use]
pub fn override_tags(raw: &str) -> Vec<OverrideTag<'_>> {
    TagBlockScanner::new(raw)
        .filter_map(|segment| match segment {
            Segment::Block { body, span } => Some((body, span.0 + 1)),
            Segment::Text { .. } => None,
        })
        .flat_map(|(body, body_offset)| {
            tag_ranges(body)
                .into_iter()
                .map(move |range| OverrideTag {
                    text: &body[range.clone()],
                    position: body_offset + range.start,
                })
        })
        .collect()
}
