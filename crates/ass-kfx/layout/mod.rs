//! Line, word, syllable and character layout
//!
//! [`LineLayout`] measures a line with a resolved [`Font`] and fills its
//! extent and unit lists. Positions are computed only when the play
//! resolution is known; without it units are measured but left at the
//! origin.
//!
//! Units flow left to right from the line's left edge. With vertical kanji
//! enabled, middle-aligned lines (4, 5, 6) stack their units top to bottom
//! around the vertical center of the play area instead.

pub mod positioning;

use crate::font::{Font, FontMetrics};
use crate::parser::ast::{Char, Line, Style, Syllable, TextUnit, Word};
use crate::tokenizer::{decompose_karaoke, strip_tags};
use positioning::{line_left, line_top, HorizontalAlign, PositionedExtent, VerticalAlign};

/// Layout pass for lines sharing one style and font
///
/// # Examples
///
/// ```rust
/// use ass_kfx::font::monospace::MonospaceFont;
/// use ass_kfx::layout::LineLayout;
/// use ass_kfx::parser::ast::{Line, Style};
///
/// let style = Style::default();
/// let font = MonospaceFont::new(10.0, 20.0);
/// let mut line = Line::default_line("Default");
/// line.set_text("Hello world");
///
/// LineLayout::new(&style, &font, Some((1920, 1080))).apply(&mut line);
/// assert_eq!(line.words.len(), 2);
/// assert_eq!(line.words[1].extent.right, line.extent.right);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct LineLayout<'a, F: Font> {
    style: &'a Style,
    font: &'a F,
    play_res: Option<(f64, f64)>,
    vertical_kanji: bool,
}

impl<'a, F: Font> LineLayout<'a, F> {
    /// Layout against `style` rendered with `font`
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn new(style: &'a Style, font: &'a F, play_res: Option<(i64, i64)>) -> Self {
        Self {
            style,
            font,
            play_res: play_res.map(|(x, y)| (x as f64, y as f64)),
            vertical_kanji: false,
        }
    }

    /// Stack units vertically for middle alignments
    #[must_use]
    pub const fn with_vertical_kanji(mut self, enabled: bool) -> Self {
        self.vertical_kanji = enabled;
        self
    }

    const fn stacks_vertically(&self) -> bool {
        self.vertical_kanji && self.style.an_is_middle()
    }

    /// Run every pass: line, words, syllables, then characters
    pub fn apply(&self, line: &mut Line) {
        self.place_line(line);
        self.add_words(line);
        self.add_syllables(line);
        self.add_chars(line);
    }

    fn measure(&self, text: &str) -> (PositionedExtent, FontMetrics) {
        let extents = self.font.text_extents(text);
        let extent = PositionedExtent {
            width: extents.width,
            height: extents.height,
            ..PositionedExtent::default()
        };
        (extent, self.font.metrics())
    }

    /// Measure the display text and place the line box
    pub fn place_line(&self, line: &mut Line) {
        line.text = strip_tags(&line.raw_text);
        let (extent, metrics) = self.measure(&line.text);
        line.extent = extent;
        line.metrics = metrics;

        let Some((play_res_x, play_res_y)) = self.play_res else {
            return;
        };
        let style = self.style;
        let (margin_l, margin_r, margin_v) =
            line.margins((style.margin_l, style.margin_r, style.margin_v));

        let left = line_left(
            style.horizontal(),
            play_res_x,
            extent.width,
            f64::from(margin_l),
            f64::from(margin_r),
        );
        line.extent.place_horizontal(left, style.horizontal());
        let top = line_top(
            style.vertical(),
            play_res_y,
            extent.height,
            f64::from(margin_v),
        );
        line.extent.place_vertical(top, style.vertical());
    }

    /// Split the display text into whitespace-delimited words
    pub fn add_words(&self, line: &mut Line) {
        line.words = split_words(&line.text)
            .into_iter()
            .enumerate()
            .map(|(index, (prespace, text, postspace))| {
                let (extent, metrics) = self.measure(text);
                Word {
                    index,
                    start_time: line.start_time,
                    end_time: line.end_time,
                    duration: line.duration,
                    text: text.to_string(),
                    prespace,
                    postspace,
                    extent,
                    metrics,
                }
            })
            .collect();

        let Some(play_res) = self.play_res else {
            return;
        };
        if self.stacks_vertically() {
            self.stack(&mut line.extent, &mut line.words, play_res, false);
        } else {
            self.flow(&line.extent, &mut line.words, true);
        }
    }

    /// Decompose karaoke markers into syllables
    ///
    /// Lines without markers get an empty syllable list.
    pub fn add_syllables(&self, line: &mut Line) {
        line.syls = decompose_karaoke(&line.raw_text)
            .into_iter()
            .map(|syl| {
                let (extent, metrics) = self.measure(&syl.text);
                Syllable {
                    index: syl.index,
                    word_index: syl.word_index,
                    kind: syl.kind,
                    start_time: syl.start,
                    end_time: syl.end,
                    duration: syl.duration,
                    text: syl.text,
                    prespace: syl.prespace,
                    postspace: syl.postspace,
                    tags: syl.tags,
                    inline_fx: syl.inline_fx,
                    extent,
                    metrics,
                }
            })
            .collect();

        let Some(play_res) = self.play_res else {
            return;
        };
        if self.stacks_vertically() {
            self.stack(&mut line.extent, &mut line.syls, play_res, false);
        } else {
            self.flow(&line.extent, &mut line.syls, true);
        }
    }

    /// Split syllables (or words, without karaoke) into characters
    ///
    /// Surrounding whitespace of the source unit becomes space characters,
    /// and every character keeps the timing of its source unit. In vertical
    /// mode the line box is refitted to the stacked characters.
    pub fn add_chars(&self, line: &mut Line) {
        let mut chars = Vec::new();
        if line.syls.is_empty() {
            for word in &line.words {
                self.push_chars(&mut chars, word, word.index, None);
            }
        } else {
            for syl in &line.syls {
                self.push_chars(&mut chars, syl, syl.word_index, Some(syl.index));
            }
        }
        line.chars = chars.into();

        let Some(play_res) = self.play_res else {
            return;
        };
        if self.stacks_vertically() {
            self.stack(&mut line.extent, &mut line.chars, play_res, true);
        } else {
            self.flow(&line.extent, &mut line.chars, false);
        }
    }

    fn push_chars<T: TextUnit>(
        &self,
        chars: &mut Vec<Char>,
        source: &T,
        word_index: usize,
        syl_index: Option<usize>,
    ) {
        let padded: Vec<char> = core::iter::repeat(' ')
            .take(source.prespace())
            .chain(source.text().chars())
            .chain(core::iter::repeat(' ').take(source.postspace()))
            .collect();

        for (position, &c) in padded.iter().enumerate() {
            let text = c.to_string();
            let (extent, metrics) = self.measure(&text);
            let prespace = position
                .checked_sub(1)
                .and_then(|prev| padded.get(prev))
                .is_some_and(|prev| prev.is_whitespace());
            let postspace = padded
                .get(position + 1)
                .is_some_and(|next| next.is_whitespace());
            chars.push(Char {
                index: chars.len(),
                word_index,
                syl_index,
                syl_char_index: syl_index.map(|_| position),
                start_time: source.start_time(),
                end_time: source.end_time(),
                duration: source.duration(),
                text,
                prespace: usize::from(prespace),
                postspace: usize::from(postspace),
                extent,
                metrics,
            });
        }
    }

    /// Left-to-right flow from the line's left edge
    ///
    /// With `spaced`, unit whitespace advances the cursor by the width of a
    /// space. Characters carry their spaces as units and skip that step.
    #[allow(clippy::cast_precision_loss)]
    fn flow<T: TextUnit>(&self, line: &PositionedExtent, units: &mut [T], spaced: bool) {
        let spacing = self.style.spacing;
        let align = self.style.horizontal();
        let space_width = if spaced {
            self.font.text_extents(" ").width
        } else {
            0.0
        };

        let mut cursor = line.left;
        for unit in units {
            let (prespace, postspace) = (unit.prespace() as f64, unit.postspace() as f64);
            if spaced {
                cursor += prespace * space_width;
            }
            let extent = unit.extent_mut();
            extent.place_horizontal(cursor, align);
            extent.copy_vertical(line);
            cursor += extent.width + spacing;
            if spaced {
                cursor += postspace * (space_width + spacing);
            }
        }
    }

    /// Top-to-bottom stack centered on the play area
    ///
    /// With `refit_line`, the line box takes the stacked bounds.
    fn stack<T: TextUnit>(
        &self,
        line: &mut PositionedExtent,
        units: &mut [T],
        (play_res_x, play_res_y): (f64, f64),
        refit_line: bool,
    ) {
        if units.is_empty() {
            return;
        }
        let align = self.style.horizontal();
        let max_width = units
            .iter()
            .map(|unit| unit.extent().width)
            .fold(0.0, f64::max);
        let sum_height: f64 = units.iter().map(|unit| unit.extent().height).sum();
        let mut cursor = play_res_y / 2.0 - sum_height / 2.0;

        if refit_line {
            line.width = max_width;
            line.height = sum_height;
            line.top = cursor;
            line.middle = play_res_y / 2.0;
            line.bottom = cursor + sum_height;
            match align {
                HorizontalAlign::Left => {
                    line.center = line.left + max_width / 2.0;
                    line.right = line.left + max_width;
                }
                HorizontalAlign::Center => {
                    line.left = line.center - max_width / 2.0;
                    line.right = line.left + max_width;
                }
                HorizontalAlign::Right => {
                    line.left = line.right - max_width;
                    line.center = line.left + max_width / 2.0;
                }
            }
        }

        for unit in units {
            let extent = unit.extent_mut();
            let x_fix = (max_width - extent.width) / 2.0;
            let left = match align {
                HorizontalAlign::Left => line.left + x_fix,
                HorizontalAlign::Center => play_res_x / 2.0 - extent.width / 2.0,
                HorizontalAlign::Right => line.right - extent.width - x_fix,
            };
            extent.place_horizontal(left, align);
            extent.place_vertical(cursor, VerticalAlign::Middle);
            cursor += extent.height;
        }
    }
}

/// Words with their leading and trailing whitespace counts
///
/// Whitespace between two words is counted once, as the trailing space of
/// the first.
fn split_words(text: &str) -> Vec<(usize, &str, usize)> {
    let mut words = Vec::new();
    let mut rest = text;
    loop {
        let prespace = rest.chars().take_while(|c| c.is_whitespace()).count();
        let trimmed = rest.trim_start();
        if trimmed.is_empty() {
            break;
        }
        let end = trimmed.find(char::is_whitespace).unwrap_or(trimmed.len());
        let (word, tail) = trimmed.split_at(end);
        let postspace = tail.chars().take_while(|c| c.is_whitespace()).count();
        words.push((prespace, word, postspace));
        rest = tail.trim_start();
    }
    words
}
