//! Dialogue and comment events from `[Events]`

use crate::font::FontMetrics;
use crate::layout::positioning::PositionedExtent;
use crate::parser::ast::plist::PList;
use crate::parser::ast::units::{impl_text_unit, Char, Syllable, Word};
use crate::parser::errors::{LineKind, ParseError};
use crate::time::{FrameRate, Time, TimeRole};
use crate::tokenizer::{override_tags, strip_tags, OverrideTag};

/// `Format:` header of the events section
pub const EVENTS_FORMAT: &str =
    "Format: Layer, Start, End, Style, Name, MarginL, MarginR, MarginV, Effect, Text";

const EVENT_FIELDS: usize = 10;

/// One `Dialogue:` or `Comment:` event
///
/// `raw_text` is the text as written, override blocks included, and is what
/// gets serialized. `text` is the display text with every `{...}` block
/// removed. Layout fills `extent`, `metrics` and the unit lists.
///
/// # Examples
///
/// ```rust
/// use ass_kfx::parser::ast::Line;
/// use ass_kfx::time::FrameRate;
///
/// let line = Line::parse(
///     r"Dialogue: 0,0:00:01.00,0:00:03.00,Default,,0,0,0,,{\k50}Hel{\k50}lo",
///     0,
///     FrameRate::NTSC_FILM,
///     false,
/// )?;
/// assert_eq!(line.text, "Hello");
/// assert_eq!(line.duration, 2.0);
/// # Ok::<(), ass_kfx::parser::errors::ParseError>(())
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Line {
    /// Zero-based position in `[Events]`
    pub index: usize,
    /// `Comment:` events are never displayed
    pub comment: bool,
    pub layer: i32,
    pub start_time: Time,
    pub end_time: Time,
    /// Duration in seconds
    pub duration: f64,
    /// Name of the style the event uses
    pub style: String,
    pub actor: String,
    /// Left margin, `0` inherits the style's
    pub margin_l: i32,
    /// Right margin, `0` inherits the style's
    pub margin_r: i32,
    /// Vertical margin, `0` inherits the style's
    pub margin_v: i32,
    pub effect: String,
    pub raw_text: String,
    pub text: String,
    /// Gap to the previous event of the same style, in seconds
    pub leadin: Option<f64>,
    /// Gap to the next event of the same style, in seconds
    pub leadout: Option<f64>,
    pub extent: PositionedExtent,
    pub metrics: FontMetrics,
    pub words: PList<Word>,
    pub syls: PList<Syllable>,
    pub chars: PList<Char>,
}

impl_text_unit!(Line);

impl Default for Line {
    fn default() -> Self {
        Self::default_line("Default")
    }
}

impl Line {
    /// Empty five second dialogue event using `style`
    #[must_use]
    pub fn default_line(style: impl Into<String>) -> Self {
        Self {
            index: 0,
            comment: false,
            layer: 0,
            start_time: Time::ZERO,
            end_time: Time::from_secs(5.0),
            duration: 5.0,
            style: style.into(),
            actor: String::new(),
            margin_l: 0,
            margin_r: 0,
            margin_v: 0,
            effect: String::new(),
            raw_text: String::new(),
            text: String::new(),
            leadin: None,
            leadout: None,
            extent: PositionedExtent::default(),
            metrics: FontMetrics::default(),
            words: PList::new(),
            syls: PList::new(),
            chars: PList::new(),
        }
    }

    /// Parse a `Dialogue:` or `Comment:` line
    ///
    /// Only the first nine commas split fields; the text keeps any further
    /// commas. With `fix_timestamps`, times are snapped to the frame
    /// boundaries Aegisub would display them on.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::MalformedLine`] for an unknown prefix or fewer
    /// than ten fields, and [`ParseError::InvalidField`] when a number or
    /// timestamp cannot be read.
    pub fn parse(
        line: &str,
        index: usize,
        fps: FrameRate,
        fix_timestamps: bool,
    ) -> Result<Self, ParseError> {
        let malformed = |reason: String| ParseError::MalformedLine {
            index,
            kind: LineKind::Event,
            raw: line.to_string(),
            reason,
        };

        let (comment, body) = if let Some(body) = line.strip_prefix("Dialogue:") {
            (false, body)
        } else if let Some(body) = line.strip_prefix("Comment:") {
            (true, body)
        } else {
            return Err(malformed(
                "expected `Dialogue:` or `Comment:` prefix".to_string(),
            ));
        };

        let fields: Vec<&str> = body.trim_start().splitn(EVENT_FIELDS, ',').collect();
        if fields.len() != EVENT_FIELDS {
            return Err(malformed(format!(
                "expected {EVENT_FIELDS} fields, found {}",
                fields.len()
            )));
        }

        let read_time = |text: &str, role: TimeRole| {
            if fix_timestamps {
                Time::from_aegisub_timestamp(text, fps, role)
            } else {
                Time::from_ass_timestamp(text)
            }
        };
        let located = |err: ParseError| err.at_line(index, line);

        let start_time = read_time(fields[1], TimeRole::Start).map_err(located)?;
        let end_time = read_time(fields[2], TimeRole::End).map_err(located)?;
        let raw_text = fields[9].to_string();

        Ok(Self {
            index,
            comment,
            layer: number("Layer", fields[0]).map_err(located)?,
            start_time,
            end_time,
            duration: (end_time - start_time).as_secs(),
            style: fields[3].to_string(),
            actor: fields[4].to_string(),
            margin_l: number("MarginL", fields[5]).map_err(located)?,
            margin_r: number("MarginR", fields[6]).map_err(located)?,
            margin_v: number("MarginV", fields[7]).map_err(located)?,
            effect: fields[8].to_string(),
            text: strip_tags(&raw_text),
            raw_text,
            ..Self::default_line("")
        })
    }

    /// Replace the raw text and refresh the display text
    pub fn set_text(&mut self, raw_text: impl Into<String>) {
        self.raw_text = raw_text.into();
        self.text = strip_tags(&self.raw_text);
    }

    /// Every override tag of the raw text with its byte position
    #[must_use]
    pub fn tags(&self) -> Vec<OverrideTag<'_>> {
        override_tags(&self.raw_text)
    }

    /// Remove every override block from the text
    pub fn clean_tags(&mut self) {
        self.raw_text = strip_tags(&self.raw_text);
        self.text.clone_from(&self.raw_text);
    }

    /// Line effective margins given the style's
    #[must_use]
    pub const fn margins(&self, style: (i32, i32, i32)) -> (i32, i32, i32) {
        const fn pick(own: i32, inherited: i32) -> i32 {
            if own == 0 {
                inherited
            } else {
                own
            }
        }
        (
            pick(self.margin_l, style.0),
            pick(self.margin_r, style.1),
            pick(self.margin_v, style.2),
        )
    }

    /// Render as an event line without trailing newline
    ///
    /// With `fix_timestamps`, times are written as the centisecond text
    /// Aegisub shows for their frames at `fps`.
    #[must_use]
    pub fn to_ass_string(&self, fps: FrameRate, fix_timestamps: bool) -> String {
        let (start, end) = if fix_timestamps {
            (
                self.start_time.to_aegisub_timestamp(fps, TimeRole::Start),
                self.end_time.to_aegisub_timestamp(fps, TimeRole::End),
            )
        } else {
            (
                self.start_time.to_ass_timestamp(),
                self.end_time.to_ass_timestamp(),
            )
        };
        format!(
            "{}: {},{start},{end},{},{},{},{},{},{},{}",
            if self.comment { "Comment" } else { "Dialogue" },
            self.layer,
            self.style,
            self.actor,
            self.margin_l,
            self.margin_r,
            self.margin_v,
            self.effect,
            self.raw_text,
        )
    }
}

fn number(field: &str, value: &str) -> Result<i32, ParseError> {
    value
        .trim()
        .parse()
        .map_err(|err: core::num::ParseIntError| ParseError::invalid_value(field, value, err.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::ast::units::TextUnit;
    use pretty_assertions::assert_eq;

    const KARAOKE: &str = r"Dialogue: 0,0:00:01.00,0:00:03.00,Default,,0,0,0,,{\k50}Hel{\k50}lo";

    #[test]
    fn parses_all_fields() {
        let line = Line::parse(
            r"Comment: 2,0:00:10.50,0:00:12.00,Sign,Narrator,5,6,7,fx,{\pos(1,2)}A, comma",
            4,
            FrameRate::NTSC_FILM,
            false,
        )
        .expect("valid line");
        assert_eq!(line.index, 4);
        assert!(line.comment);
        assert_eq!(line.layer, 2);
        assert_eq!(line.start_time.as_secs(), 10.5);
        assert_eq!(line.duration, 1.5);
        assert_eq!(line.style, "Sign");
        assert_eq!(line.actor, "Narrator");
        assert_eq!(line.margins((0, 0, 0)), (5, 6, 7));
        assert_eq!(line.effect, "fx");
        assert_eq!(line.raw_text, r"{\pos(1,2)}A, comma");
        assert_eq!(line.text, "A, comma");
        assert_eq!(line.prespace(), 0);
    }

    #[test]
    fn fixed_timestamps_snap_to_frames() {
        let line = Line::parse(KARAOKE, 0, FrameRate::NTSC_FILM, true).expect("valid line");
        assert!((line.start_time.as_secs() - 1.001).abs() < 1e-9);
        assert!((line.end_time.as_secs() - 3.003).abs() < 1e-9);
        assert_eq!(
            line.to_ass_string(FrameRate::NTSC_FILM, true),
            r"Dialogue: 0,0:00:00.98,0:00:02.98,Default,,0,0,0,,{\k50}Hel{\k50}lo"
        );
    }

    #[test]
    fn raw_timestamps_round_trip() {
        let line = Line::parse(KARAOKE, 0, FrameRate::NTSC_FILM, false).expect("valid line");
        assert_eq!(line.duration, 2.0);
        assert_eq!(line.to_ass_string(FrameRate::NTSC_FILM, false), KARAOKE);
    }

    #[test]
    fn malformed_lines() {
        let err = Line::parse("Dialogue: 0,0:00:00.00", 3, FrameRate::NTSC_FILM, false)
            .expect_err("too few fields");
        assert!(matches!(err, ParseError::MalformedLine { index: 3, kind: LineKind::Event, .. }));

        let err = Line::parse("Banner: x", 0, FrameRate::NTSC_FILM, false)
            .expect_err("wrong prefix");
        assert!(matches!(err, ParseError::MalformedLine { .. }));

        let err = Line::parse(
            "Dialogue: 0,0:00:xx.00,0:00:01.00,Default,,0,0,0,,text",
            5,
            FrameRate::NTSC_FILM,
            false,
        )
        .expect_err("bad time");
        assert_eq!(err.line_index(), Some(5));
        assert!(err.to_string().contains("0:00:xx.00"));

        let err = Line::parse(
            "Dialogue: top,0:00:00.00,0:00:01.00,Default,,0,0,0,,text",
            1,
            FrameRate::NTSC_FILM,
            false,
        )
        .expect_err("bad layer");
        assert!(matches!(err, ParseError::InvalidField { index: 1, .. }));
    }

    #[test]
    fn tags_and_cleaning() {
        let mut line = Line::default_line("Default");
        line.set_text(r"{\an8\t(0,100,\fs20)}Hi {\i1}there");
        let tags: Vec<(&str, usize)> = line.tags().iter().map(|t| (t.text, t.position)).collect();
        assert_eq!(
            tags,
            vec![(r"\an8", 1), (r"\t(0,100,\fs20)", 5), (r"\i1", 25)]
        );
        line.clean_tags();
        assert_eq!(line.raw_text, "Hi there");
        assert_eq!(line.text, "Hi there");
    }

    #[test]
    fn margins_inherit_on_zero() {
        let mut line = Line::default_line("Default");
        line.margin_r = 30;
        assert_eq!(line.margins((10, 20, 40)), (10, 30, 40));
    }

    #[test]
    fn shifting_updates_both_ends() {
        let mut line = Line::default_line("Default");
        line.shift_time(1.0);
        assert_eq!(line.start_time.as_secs(), 1.0);
        assert_eq!(line.end_time.as_secs(), 6.0);
        assert_eq!(line.duration, 5.0);
    }
}
