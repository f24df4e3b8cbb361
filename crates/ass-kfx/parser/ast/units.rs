//! Words, syllables and characters of a dialogue line
//!
//! All units share the [`TextUnit`] interface: text, timing, measured and
//! positioned extent. Frame and shape helpers are provided methods on the
//! trait, so they work the same on a [`Line`](super::Line) and on its
//! children.

use indexmap::IndexSet;

use crate::font::{Font, FontCache, FontEngine, FontMetrics, Pixel, Shape};
use crate::layout::positioning::{Alignment, PositionedExtent};
use crate::parser::ast::Style;
use crate::time::{FrameRate, Time, TimeRole};
use crate::tokenizer::KaraokeKind;
use crate::utils::Result;

/// Shared interface of lines and their decompositions
pub trait TextUnit {
    /// Displayed text
    fn text(&self) -> &str;

    fn start_time(&self) -> Time;

    fn end_time(&self) -> Time;

    /// Duration in seconds
    fn duration(&self) -> f64;

    /// Replace start and end, updating the duration
    fn set_times(&mut self, start: Time, end: Time);

    fn extent(&self) -> &PositionedExtent;

    fn extent_mut(&mut self) -> &mut PositionedExtent;

    /// Whitespace before the text
    fn prespace(&self) -> usize {
        0
    }

    /// Whitespace after the text
    fn postspace(&self) -> usize {
        0
    }

    /// Whether the unit has visible text and a positive duration
    fn is_empty_unit(&self) -> bool {
        self.text().trim().is_empty() || self.duration() <= 0.0
    }

    /// Shift start and end by `seconds`, clamping at zero
    fn shift_time(&mut self, seconds: f64) {
        let start = self.start_time() + seconds;
        let end = self.end_time() + seconds;
        self.set_times(start, end);
    }

    /// Snap start and end to the frame boundaries they display on
    ///
    /// With `shifted`, times already moved by one frame are rounded to the
    /// nearest boundary instead.
    fn shift_time0(&mut self, fps: FrameRate, shifted: bool) {
        let start = self.start_time().snap_to_frame(fps, TimeRole::Start, shifted);
        let end = self.end_time().snap_to_frame(fps, TimeRole::End, shifted);
        self.set_times(start, end);
    }

    /// Rescale times from one frame rate to another
    fn change_fps(&mut self, input: FrameRate, output: FrameRate) {
        let ratio = input.as_f64() / output.as_f64();
        let start = self.start_time() * ratio;
        let end = self.end_time() * ratio;
        self.set_times(start, end);
    }

    /// Outline of the text in `style`, optionally overriding its scale
    ///
    /// `style` is never modified; overrides apply to a copy.
    ///
    /// # Errors
    ///
    /// Propagates font loading and outline failures.
    fn to_shape<E: FontEngine>(
        &self,
        style: &Style,
        fonts: &mut FontCache<E>,
        fscx: Option<f64>,
        fscy: Option<f64>,
    ) -> Result<<E::Font as Font>::Shape> {
        let font = if fscx.is_some() || fscy.is_some() {
            let mut scaled = style.clone();
            scaled.scale_x = fscx.unwrap_or(style.scale_x);
            scaled.scale_y = fscy.unwrap_or(style.scale_y);
            fonts.get(&scaled)?
        } else {
            fonts.get(style)?
        };
        font.text_to_shape(self.text())
    }

    /// Outline aligned for use in a `\clip`
    ///
    /// # Errors
    ///
    /// Propagates font loading and outline failures.
    fn to_clip<E: FontEngine>(
        &self,
        style: &Style,
        fonts: &mut FontCache<E>,
        an: Alignment,
        fscx: Option<f64>,
        fscy: Option<f64>,
    ) -> Result<<E::Font as Font>::Shape> {
        let mut shape = self.to_shape(style, fonts, fscx, fscy)?;
        shape.align(an);
        Ok(shape)
    }

    /// Rasterized text
    ///
    /// # Errors
    ///
    /// Propagates font loading and outline failures.
    fn to_pixels<E: FontEngine>(
        &self,
        style: &Style,
        fonts: &mut FontCache<E>,
        supersampling: u32,
        anti_aliasing: bool,
    ) -> Result<Vec<Pixel>> {
        Ok(self
            .to_shape(style, fonts, None, None)?
            .to_pixels(supersampling, anti_aliasing))
    }
}

macro_rules! impl_text_unit {
    (@impl $ty:ty; $($extra:tt)*) => {
        impl $crate::parser::ast::units::TextUnit for $ty {
            fn text(&self) -> &str {
                &self.text
            }

            fn start_time(&self) -> $crate::time::Time {
                self.start_time
            }

            fn end_time(&self) -> $crate::time::Time {
                self.end_time
            }

            fn duration(&self) -> f64 {
                self.duration
            }

            fn set_times(&mut self, start: $crate::time::Time, end: $crate::time::Time) {
                self.start_time = start;
                self.end_time = end;
                self.duration = (end - start).as_secs();
            }

            fn extent(&self) -> &$crate::layout::positioning::PositionedExtent {
                &self.extent
            }

            fn extent_mut(&mut self) -> &mut $crate::layout::positioning::PositionedExtent {
                &mut self.extent
            }

            $($extra)*
        }
    };
    ($ty:ty) => {
        impl_text_unit!(@impl $ty;);
    };
    ($ty:ty, spaced) => {
        impl_text_unit!(@impl $ty;
            fn prespace(&self) -> usize {
                self.prespace
            }

            fn postspace(&self) -> usize {
                self.postspace
            }
        );
    };
}

pub(crate) use impl_text_unit;

/// A whitespace-delimited word of a line
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Word {
    /// Position among the line's words
    pub index: usize,
    pub start_time: Time,
    pub end_time: Time,
    pub duration: f64,
    pub text: String,
    /// Whitespace characters before the word
    pub prespace: usize,
    /// Whitespace characters after the word
    pub postspace: usize,
    pub extent: PositionedExtent,
    pub metrics: FontMetrics,
}

impl_text_unit!(Word, spaced);

/// A karaoke syllable of a line
///
/// Times are relative to the start of the line.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Syllable {
    /// Position among the line's syllables
    pub index: usize,
    /// Word the syllable belongs to
    pub word_index: usize,
    pub kind: KaraokeKind,
    pub start_time: Time,
    pub end_time: Time,
    pub duration: f64,
    pub text: String,
    pub prespace: usize,
    pub postspace: usize,
    /// Override tags other than the karaoke marker
    pub tags: IndexSet<String>,
    /// Inline effects (`\-NAME`)
    pub inline_fx: IndexSet<String>,
    pub extent: PositionedExtent,
    pub metrics: FontMetrics,
}

impl_text_unit!(Syllable, spaced);

/// A single character of a line
///
/// Characters inherit the timing of the syllable (or word) they come from.
/// `prespace`/`postspace` are `1` when the neighbouring character is
/// whitespace.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Char {
    /// Position among the line's characters
    pub index: usize,
    pub word_index: usize,
    /// Source syllable, when the line has karaoke
    pub syl_index: Option<usize>,
    /// Position inside the source syllable
    pub syl_char_index: Option<usize>,
    pub start_time: Time,
    pub end_time: Time,
    pub duration: f64,
    pub text: String,
    pub prespace: usize,
    pub postspace: usize,
    pub extent: PositionedExtent,
    pub metrics: FontMetrics,
}

impl_text_unit!(Char, spaced);
