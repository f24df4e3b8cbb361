//! Frame-aware timestamps
//!
//! [`Time`] is a non-negative number of seconds. Arithmetic clamps at zero
//! instead of going negative. Conversions to and from ASS text come in two
//! flavours:
//!
//! - plain: `H:MM:SS.CC` read exactly and written rounded to centiseconds
//! - frame-snapped ("fix timestamps"): the timestamp is mapped to the frame
//!   boundary Aegisub would use for its [`TimeRole`], and written back as the
//!   centisecond text Aegisub would display for that frame
//!
//! Frame conversions follow Aegisub's constant-frame-rate rules: frame `f`
//! starts at `floor(f * 1000 / fps)` milliseconds, a start time maps to the
//! first frame starting at or after it, and an end time maps to the last
//! frame starting before it.
//!
//! # Examples
//!
//! ```rust
//! use ass_kfx::time::{FrameRate, Time, TimeRole};
//!
//! let fps = FrameRate::NTSC_FILM;
//! let start = Time::from_aegisub_timestamp("0:00:01.00", fps, TimeRole::Start)?;
//! assert_eq!(start.frame(fps, TimeRole::Start), 24);
//! assert_eq!(start.to_aegisub_timestamp(fps, TimeRole::Start), "0:00:00.98");
//!
//! let plain = Time::from_ass_timestamp("0:00:03.00")? - Time::from_secs(1.0);
//! assert_eq!(plain.to_string(), "0:00:02.00");
//! # Ok::<(), ass_kfx::parser::errors::ParseError>(())
//! ```

use core::fmt;
use core::ops::{Add, AddAssign, Mul, MulAssign, Sub, SubAssign};

use crate::parser::errors::ParseError;

/// Whether a timestamp opens or closes an event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TimeRole {
    /// Event start: first displayed frame
    Start,
    /// Event end: last displayed frame
    End,
}

/// Video frame rate
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FrameRate {
    /// Exact ratio such as `24000/1001`
    Rational { num: u32, den: u32 },
    /// Approximate frames per second
    Float(f64),
}

impl FrameRate {
    /// 23.976 fps film rate
    pub const NTSC_FILM: Self = Self::Rational {
        num: 24000,
        den: 1001,
    };

    /// Create an exact frame rate
    #[must_use]
    pub const fn rational(num: u32, den: u32) -> Self {
        Self::Rational { num, den }
    }

    /// Frames per second as a float
    #[must_use]
    pub fn as_f64(self) -> f64 {
        match self {
            Self::Rational { num, den } => f64::from(num) / f64::from(den),
            Self::Float(fps) => fps,
        }
    }

    /// Whether the rate is positive and finite
    #[must_use]
    pub fn is_valid(self) -> bool {
        match self {
            Self::Rational { num, den } => num > 0 && den > 0,
            Self::Float(fps) => fps.is_finite() && fps > 0.0,
        }
    }

    /// Duration of one frame in seconds
    #[must_use]
    pub fn frame_duration(self) -> f64 {
        1.0 / self.as_f64()
    }

    /// Millisecond at which `frame` starts, rounded down
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn frame_start_ms(self, frame: i64) -> i64 {
        match self {
            Self::Rational { num, den } if num > 0 => {
                (frame * 1000 * i64::from(den)).div_euclid(i64::from(num))
            }
            _ => (frame as f64 * 1000.0 / self.as_f64()).floor() as i64,
        }
    }

    /// Last frame starting at or before `ms`
    ///
    /// Always frame 0 for a rate that is not [valid](Self::is_valid).
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn frame_at_ms(self, ms: i64) -> i64 {
        if !self.is_valid() {
            return 0;
        }
        let mut frame = (ms as f64 * self.as_f64() / 1000.0).floor() as i64;
        while self.frame_start_ms(frame + 1) <= ms {
            frame += 1;
        }
        while self.frame_start_ms(frame) > ms {
            frame -= 1;
        }
        frame
    }
}

impl Default for FrameRate {
    fn default() -> Self {
        Self::NTSC_FILM
    }
}

impl From<f64> for FrameRate {
    fn from(fps: f64) -> Self {
        Self::Float(fps)
    }
}

impl fmt::Display for FrameRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rational { num, den } => write!(f, "{num}/{den}"),
            Self::Float(fps) => write!(f, "{fps}"),
        }
    }
}

/// Non-negative timestamp or duration in seconds
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Time(f64);

impl Time {
    /// Zero seconds
    pub const ZERO: Self = Self(0.0);

    /// Create from seconds, clamping negative and NaN input to zero
    #[must_use]
    pub fn from_secs(secs: f64) -> Self {
        if secs > 0.0 {
            Self(secs)
        } else {
            Self::ZERO
        }
    }

    /// Seconds as a float
    #[must_use]
    pub const fn as_secs(self) -> f64 {
        self.0
    }

    /// Parse an `H:MM:SS.CC` timestamp exactly
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::InvalidTime`] if the text is not three
    /// `:`-separated numeric components with an optional fractional part.
    pub fn from_ass_timestamp(text: &str) -> Result<Self, ParseError> {
        let invalid = |reason: &str| ParseError::InvalidTime {
            time: text.to_string(),
            reason: reason.to_string(),
        };

        let mut parts = text.trim().split(':');
        let (Some(hours), Some(minutes), Some(seconds), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(invalid("expected H:MM:SS.CC"));
        };

        let hours = parse_digits(hours).ok_or_else(|| invalid("hours are not a number"))?;
        let minutes = parse_digits(minutes).ok_or_else(|| invalid("minutes are not a number"))?;
        let (whole, fraction) = seconds.split_once('.').unwrap_or((seconds, ""));
        let whole = parse_digits(whole).ok_or_else(|| invalid("seconds are not a number"))?;
        let fraction = if fraction.is_empty() {
            0.0
        } else {
            let digits = parse_digits(fraction)
                .ok_or_else(|| invalid("fractional seconds are not a number"))?;
            let places = i32::try_from(fraction.len()).map_err(|_| invalid("too many digits"))?;
            digits / 10f64.powi(places)
        };

        Ok(Self(hours * 3600.0 + minutes * 60.0 + whole + fraction))
    }

    /// Parse a timestamp and snap it to the frame boundary for `role`
    ///
    /// # Errors
    ///
    /// Same as [`Time::from_ass_timestamp`].
    pub fn from_aegisub_timestamp(
        text: &str,
        fps: FrameRate,
        role: TimeRole,
    ) -> Result<Self, ParseError> {
        Ok(Self::from_ass_timestamp(text)?.snap_to_frame(fps, role, false))
    }

    /// Whole milliseconds, rounded down with a small tolerance
    #[allow(clippy::cast_possible_truncation)]
    fn millis(self) -> i64 {
        (self.0 * 1000.0 + 1e-6).floor() as i64
    }

    /// Frame this timestamp refers to in the given role
    ///
    /// A start maps to the first frame starting at or after it; an end maps
    /// to the last frame starting before it.
    #[must_use]
    pub fn frame(self, fps: FrameRate, role: TimeRole) -> i64 {
        let last_before = fps.frame_at_ms(self.millis() - 1);
        match role {
            TimeRole::Start => last_before + 1,
            TimeRole::End => last_before,
        }
    }

    /// Snap to the frame boundary where the event really starts or stops
    ///
    /// With `shifted`, the time is assumed to already sit on a boundary of a
    /// shifted timeline and is rounded to the nearest boundary instead.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn snap_to_frame(self, fps: FrameRate, role: TimeRole, shifted: bool) -> Self {
        let rate = fps.as_f64();
        let boundary = if shifted {
            (self.0 * rate).round()
        } else {
            match role {
                TimeRole::Start => self.frame(fps, role) as f64,
                TimeRole::End => (self.frame(fps, role) + 1) as f64,
            }
        };
        Self::from_secs(boundary / rate)
    }

    /// Centisecond text Aegisub displays for this time's frame
    #[must_use]
    pub fn to_aegisub_timestamp(self, fps: FrameRate, role: TimeRole) -> String {
        let frame = self.frame(fps, role);
        let (prev, cur) = match role {
            TimeRole::Start => (fps.frame_start_ms(frame - 1), fps.frame_start_ms(frame)),
            TimeRole::End => (fps.frame_start_ms(frame), fps.frame_start_ms(frame + 1)),
        };
        let ms = prev + (cur - prev + 1) / 2;
        format_centiseconds((ms + 5).div_euclid(10))
    }

    /// `H:MM:SS.CC` text rounded to the nearest centisecond
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn to_ass_timestamp(self) -> String {
        format_centiseconds((self.0 * 100.0).round() as i64)
    }
}

fn parse_digits(text: &str) -> Option<f64> {
    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    text.parse().ok()
}

fn format_centiseconds(cs: i64) -> String {
    let cs = cs.max(0);
    let hours = cs / 360_000;
    let minutes = cs / 6000 % 60;
    let seconds = cs / 100 % 60;
    let centis = cs % 100;
    format!("{hours}:{minutes:02}:{seconds:02}.{centis:02}")
}

impl fmt::Display for Time {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_ass_timestamp())
    }
}

impl From<f64> for Time {
    fn from(secs: f64) -> Self {
        Self::from_secs(secs)
    }
}

impl Add for Time {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::from_secs(self.0 + rhs.0)
    }
}

impl Add<f64> for Time {
    type Output = Self;

    fn add(self, rhs: f64) -> Self {
        Self::from_secs(self.0 + rhs)
    }
}

impl Sub for Time {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::from_secs(self.0 - rhs.0)
    }
}

impl Mul<f64> for Time {
    type Output = Self;

    fn mul(self, rhs: f64) -> Self {
        Self::from_secs(self.0 * rhs)
    }
}

impl AddAssign for Time {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl AddAssign<f64> for Time {
    fn add_assign(&mut self, rhs: f64) {
        *self = *self + rhs;
    }
}

impl SubAssign for Time {
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}

impl MulAssign<f64> for Time {
    fn mul_assign(&mut self, rhs: f64) {
        *self = *self * rhs;
    }
}
