//! Karaoke syllable decomposition
//!
//! Splits dialogue text at karaoke markers (`\k` or `\K`, optionally
//! suffixed with `f` or `o`, followed by a duration in centiseconds). Each
//! marker opens a syllable that runs until the next marker or the end of
//! the text.
//!
//! Tags are attributed as follows:
//!
//! - tags after a marker in the same block belong to that marker's syllable
//! - tags in blocks between a syllable's text and the next marker (with no
//!   literal text in between) belong to the next syllable
//! - tags followed by literal text without a new marker belong to the
//!   syllable that text extends
//!
//! Text before the first marker is not part of any syllable. `\-NAME`
//! tokens are inline-effect markers and are collected separately from the
//! remaining tags.

use indexmap::IndexSet;

use super::{split_override_tags, Segment, TagBlockScanner};
use crate::time::Time;

/// Karaoke marker flavour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum KaraokeKind {
    /// `\k`: instant highlight
    Instant,
    /// `\K`, `\kf` or `\Kf`: left-to-right fill
    Fill,
    /// `\ko` or `\Ko`: outline highlight
    Outline,
}

/// One syllable of a karaoke line, timed relative to the line start
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct KaraokeSyllable {
    /// Position among the line's syllables
    pub index: usize,
    /// Natural-language word the syllable belongs to
    pub word_index: usize,
    pub kind: KaraokeKind,
    /// Literal text with surrounding whitespace removed
    pub text: String,
    /// Leading whitespace characters
    pub prespace: usize,
    /// Trailing whitespace characters
    pub postspace: usize,
    pub start: Time,
    pub end: Time,
    /// Karaoke duration in seconds
    pub duration: f64,
    /// Non-karaoke override tags, backslash included
    pub tags: IndexSet<String>,
    /// Inline effect names from `\-NAME`
    pub inline_fx: IndexSet<String>,
}

/// Parse a karaoke marker token into its kind and duration in centiseconds
#[must_use]
pub fn parse_marker(tag: &str) -> Option<(KaraokeKind, u32)> {
    let name = tag.strip_prefix('\\')?;
    let mut kind = match name.as_bytes().first()? {
        b'k' => KaraokeKind::Instant,
        b'K' => KaraokeKind::Fill,
        _ => return None,
    };
    let mut digits = &name[1..];
    if let Some(rest) = digits.strip_prefix('f') {
        kind = KaraokeKind::Fill;
        digits = rest;
    } else if let Some(rest) = digits.strip_prefix('o') {
        kind = KaraokeKind::Outline;
        digits = rest;
    }
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok().map(|centis| (kind, centis))
}

#[derive(Debug)]
struct SyllableBuilder {
    kind: KaraokeKind,
    centis: u32,
    raw_text: String,
    tags: IndexSet<String>,
    inline_fx: IndexSet<String>,
}

impl SyllableBuilder {
    fn new(kind: KaraokeKind, centis: u32) -> Self {
        Self {
            kind,
            centis,
            raw_text: String::new(),
            tags: IndexSet::new(),
            inline_fx: IndexSet::new(),
        }
    }

    fn add_tag(&mut self, tag: &str) {
        if let Some(name) = tag.strip_prefix("\\-") {
            if !name.is_empty() {
                self.inline_fx.insert(name.to_string());
            }
        } else if tag.starts_with('\\') {
            self.tags.insert(tag.to_string());
        }
    }
}

/// Decompose tagged dialogue text into karaoke syllables
///
/// Returns an empty vector when the text has no karaoke markers.
///
/// ```rust
/// use ass_kfx::tokenizer::decompose_karaoke;
///
/// let syls = decompose_karaoke(r"{\k50}Hel{\k50\-glow}lo {\kf20}world");
/// let texts: Vec<_> = syls.iter().map(|s| s.text.as_str()).collect();
/// assert_eq!(texts, ["Hel", "lo", "world"]);
/// assert_eq!(syls[1].word_index, 0);
/// assert_eq!(syls[2].word_index, 1);
/// assert!(syls[1].inline_fx.contains("glow"));
/// ```
#[must_use]
pub fn decompose_karaoke(raw: &str) -> Vec<KaraokeSyllable> {
    let mut builders: Vec<SyllableBuilder> = Vec::new();
    let mut current: Option<SyllableBuilder> = None;
    let mut pending: Vec<&str> = Vec::new();

    for segment in TagBlockScanner::new(raw) {
        match segment {
            Segment::Block { body, .. } => {
                let mut marker_in_block = false;
                for tag in split_override_tags(body) {
                    if let Some((kind, centis)) = parse_marker(tag) {
                        let mut next = SyllableBuilder::new(kind, centis);
                        for tag in pending.drain(..) {
                            next.add_tag(tag);
                        }
                        builders.extend(current.replace(next));
                        marker_in_block = true;
                    } else if marker_in_block {
                        if let Some(syl) = current.as_mut() {
                            syl.add_tag(tag);
                        }
                    } else {
                        pending.push(tag);
                    }
                }
            }
            Segment::Text { text, .. } => match current.as_mut() {
                Some(syl) => {
                    for tag in pending.drain(..) {
                        syl.add_tag(tag);
                    }
                    syl.raw_text.push_str(text);
                }
                None => pending.clear(),
            },
        }
    }
    if let Some(mut syl) = current {
        for tag in pending.drain(..) {
            syl.add_tag(tag);
        }
        builders.push(syl);
    }

    finish(builders)
}

fn finish(builders: Vec<SyllableBuilder>) -> Vec<KaraokeSyllable> {
    let starts_with_space: Vec<bool> = builders
        .iter()
        .map(|b| b.raw_text.starts_with(char::is_whitespace))
        .collect();

    let mut syllables = Vec::with_capacity(builders.len());
    let mut last_end = Time::ZERO;
    let mut word_index = 0;

    for (index, builder) in builders.into_iter().enumerate() {
        let raw = builder.raw_text.as_str();
        let trimmed = raw.trim();
        let (prespace, postspace) = if trimmed.is_empty() {
            (raw.chars().count(), 0)
        } else {
            (
                raw.chars().take_while(|c| c.is_whitespace()).count(),
                raw.chars().rev().take_while(|c| c.is_whitespace()).count(),
            )
        };

        let duration = f64::from(builder.centis) / 100.0;
        let start = last_end;
        let end = start + duration;
        last_end = end;

        let word_ends = raw.ends_with(char::is_whitespace)
            || starts_with_space.get(index + 1).copied().unwrap_or(false);

        syllables.push(KaraokeSyllable {
            index,
            word_index,
            kind: builder.kind,
            text: trimmed.to_string(),
            prespace,
            postspace,
            start,
            end,
            duration,
            tags: builder.tags,
            inline_fx: builder.inline_fx,
        });

        if word_ends {
            word_index += 1;
        }
    }
    syllables
}
