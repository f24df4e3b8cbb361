//! Style records from `[V4+ Styles]`
//!
//! A style line has exactly 23 comma-separated fields. Colors and alphas are
//! kept as opaque hex text so they re-serialize exactly as read. Boolean
//! flags keep the integer the file used (`-1`, `0`, `1`, `3`) so an
//! untouched style round-trips byte for byte.

use core::fmt;

use crate::layout::positioning::{Alignment, HorizontalAlign, VerticalAlign};
use crate::parser::ast::meta::{Meta, ScriptInfo};
use crate::parser::errors::{LineKind, ParseError};
use crate::utils::{fstr, round_to, CoreError, Result};

/// `Format:` header of the styles section
pub const STYLE_FORMAT: &str = "Format: Name, Fontname, Fontsize, PrimaryColour, SecondaryColour, OutlineColour, BackColour, Bold, Italic, Underline, StrikeOut, ScaleX, ScaleY, Spacing, Angle, BorderStyle, Outline, Shadow, Alignment, MarginL, MarginR, MarginV, Encoding";

const STYLE_FIELDS: usize = 23;

bitflags::bitflags! {
    /// Font formatting flags of a style
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct TextFormatting: u8 {
        /// Bold text formatting
        const BOLD = 1 << 0;
        /// Italic text formatting
        const ITALIC = 1 << 1;
        /// Underline text formatting
        const UNDERLINE = 1 << 2;
        /// Strike-through text formatting
        const STRIKE_OUT = 1 << 3;
    }
}

/// `BBGGRR` color component, six hex digits in the case they were read
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AssColor(String);

/// `AA` alpha component, two hex digits in the case they were read
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AssAlpha(String);

impl AssColor {
    /// Hex digits without prefix
    #[must_use]
    pub fn as_hex(&self) -> &str {
        &self.0
    }
}

impl AssAlpha {
    /// Fully opaque
    #[must_use]
    pub fn opaque() -> Self {
        Self("00".to_string())
    }

    /// Hex digits without prefix
    #[must_use]
    pub fn as_hex(&self) -> &str {
        &self.0
    }
}

/// Split an `&HAABBGGRR` token into alpha and color
///
/// Tokens with six digits or fewer are opaque. A trailing `&` is accepted.
///
/// # Errors
///
/// Returns [`ParseError::InvalidColor`] when the token lacks the `&H`
/// prefix, has no digits, has more than eight, or contains non-hex digits.
pub fn split_color(token: &str) -> core::result::Result<(AssAlpha, AssColor), ParseError> {
    let invalid = |reason: &str| ParseError::InvalidColor {
        color: token.to_string(),
        reason: reason.to_string(),
    };
    let trimmed = token.trim();
    let digits = trimmed
        .strip_prefix("&H")
        .or_else(|| trimmed.strip_prefix("&h"))
        .ok_or_else(|| invalid("missing &H prefix"))?;
    let digits = digits.strip_suffix('&').unwrap_or(digits);
    if digits.is_empty() || digits.len() > 8 {
        return Err(invalid("expected 1 to 8 hex digits"));
    }
    if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(invalid("not hexadecimal"));
    }
    if digits.len() <= 6 {
        return Ok((AssAlpha::opaque(), AssColor(format!("{digits:0>6}"))));
    }
    let (alpha, color) = digits.split_at(digits.len() - 6);
    Ok((AssAlpha(format!("{alpha:0>2}")), AssColor(color.to_string())))
}

/// Style boolean stored as the integer the file used (`-1` on, `0` off)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StyleBool(pub i32);

impl StyleBool {
    /// Any non-zero value is on
    #[must_use]
    pub const fn is_on(self) -> bool {
        self.0 != 0
    }
}

impl From<bool> for StyleBool {
    fn from(on: bool) -> Self {
        Self(if on { -1 } else { 0 })
    }
}

impl fmt::Display for StyleBool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Border style stored as read (`1` outline and shadow, `3` opaque box)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BorderStyle(pub i32);

impl BorderStyle {
    /// Whether the border is drawn as an opaque box
    #[must_use]
    pub const fn is_opaque_box(self) -> bool {
        self.0 == 3
    }
}

impl Default for BorderStyle {
    fn default() -> Self {
        Self(1)
    }
}

impl From<bool> for BorderStyle {
    fn from(opaque_box: bool) -> Self {
        Self(if opaque_box { 3 } else { 1 })
    }
}

impl fmt::Display for BorderStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Where a resample takes its source resolution from
#[derive(Debug, Clone, Copy)]
pub enum ResampleSource<'a> {
    /// Play resolution and border flag of a document
    Meta(&'a Meta),
    /// Play resolution and border flag of a `[Script Info]`
    ScriptInfo(&'a ScriptInfo),
    /// Explicit width and height
    Resolution(i64, i64),
}

/// Style definition from `[V4+ Styles]`
///
/// # Examples
///
/// ```rust
/// use ass_kfx::parser::ast::Style;
///
/// let style = Style::parse(
///     "Style: Sign,Arial,48,&H00FFFFFF,&H000000FF,&H00000000,&H80000000,-1,0,0,0,100,100,0,0,1,2.5,0,8,10,10,20,1",
///     0,
/// )?;
/// assert_eq!(style.name, "Sign");
/// assert!(style.bold.is_on());
/// assert_eq!(style.alpha_color4(), "&H80000000");
/// # Ok::<(), ass_kfx::parser::errors::ParseError>(())
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Style {
    /// Style name, unique within a document
    pub name: String,
    pub fontname: String,
    /// Font size in points
    pub fontsize: f64,
    /// Primary (fill) color
    pub color1: AssColor,
    pub alpha1: AssAlpha,
    /// Secondary color, used by karaoke fills
    pub color2: AssColor,
    pub alpha2: AssAlpha,
    /// Outline color
    pub color3: AssColor,
    pub alpha3: AssAlpha,
    /// Shadow color
    pub color4: AssColor,
    pub alpha4: AssAlpha,
    pub bold: StyleBool,
    pub italic: StyleBool,
    pub underline: StyleBool,
    pub strikeout: StyleBool,
    /// Horizontal stretch in percent
    pub scale_x: f64,
    /// Vertical stretch in percent
    pub scale_y: f64,
    /// Extra space between letters in pixels
    pub spacing: f64,
    /// Rotation in degrees
    pub angle: f64,
    pub border_style: BorderStyle,
    /// Border thickness
    pub outline: f64,
    /// Shadow distance
    pub shadow: f64,
    pub alignment: Alignment,
    pub margin_l: i32,
    pub margin_r: i32,
    /// Bottom margin, or top margin for top alignments
    pub margin_v: i32,
    /// Font codepage
    pub encoding: i32,
}

impl Default for Style {
    fn default() -> Self {
        Self::default_style()
    }
}

fn field<T: core::str::FromStr>(name: &str, raw: &str) -> core::result::Result<T, ParseError>
where
    T::Err: fmt::Display,
{
    raw.trim()
        .parse()
        .map_err(|err: T::Err| ParseError::invalid_value(name, raw, err.to_string()))
}

fn float_field(name: &str, raw: &str) -> core::result::Result<f64, ParseError> {
    let value: f64 = field(name, raw)?;
    if value.is_finite() {
        Ok(value)
    } else {
        Err(ParseError::invalid_value(name, raw, "not a finite number"))
    }
}

impl Style {
    /// Aegisub's `Default` style
    #[must_use]
    pub fn default_style() -> Self {
        let opaque = AssAlpha::opaque;
        Self {
            name: "Default".to_string(),
            fontname: "Arial".to_string(),
            fontsize: 20.0,
            color1: AssColor("FFFFFF".to_string()),
            alpha1: opaque(),
            color2: AssColor("0000FF".to_string()),
            alpha2: opaque(),
            color3: AssColor("000000".to_string()),
            alpha3: opaque(),
            color4: AssColor("000000".to_string()),
            alpha4: opaque(),
            bold: StyleBool(0),
            italic: StyleBool(0),
            underline: StyleBool(0),
            strikeout: StyleBool(0),
            scale_x: 100.0,
            scale_y: 100.0,
            spacing: 0.0,
            angle: 0.0,
            border_style: BorderStyle(1),
            outline: 2.0,
            shadow: 2.0,
            alignment: Alignment::BOTTOM_CENTER,
            margin_l: 10,
            margin_r: 10,
            margin_v: 10,
            encoding: 1,
        }
    }

    /// Parse a `Style:` line
    ///
    /// `index` is the zero-based position of the line in its section and is
    /// carried by every error.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::MalformedLine`] when the prefix is missing or the
    /// field count is not 23, and [`ParseError::InvalidField`] when a field
    /// cannot be coerced.
    pub fn parse(line: &str, index: usize) -> core::result::Result<Self, ParseError> {
        let malformed = |reason: String| ParseError::MalformedLine {
            index,
            kind: LineKind::Style,
            raw: line.to_string(),
            reason,
        };
        let body = line
            .strip_prefix("Style:")
            .ok_or_else(|| malformed("missing `Style:` prefix".to_string()))?
            .trim_start();
        let fields: Vec<&str> = body.split(',').collect();
        if fields.len() != STYLE_FIELDS {
            return Err(malformed(format!(
                "expected {STYLE_FIELDS} fields, found {}",
                fields.len()
            )));
        }
        Self::from_fields(&fields).map_err(|err| err.at_line(index, line))
    }

    fn from_fields(f: &[&str]) -> core::result::Result<Self, ParseError> {
        let (alpha1, color1) = split_color(f[3])?;
        let (alpha2, color2) = split_color(f[4])?;
        let (alpha3, color3) = split_color(f[5])?;
        let (alpha4, color4) = split_color(f[6])?;
        let alignment: u8 = field("Alignment", f[18])
            .map_err(|_| ParseError::InvalidAlignment {
                value: f[18].to_string(),
            })?;

        Ok(Self {
            name: f[0].to_string(),
            fontname: f[1].to_string(),
            fontsize: float_field("Fontsize", f[2])?,
            color1,
            alpha1,
            color2,
            alpha2,
            color3,
            alpha3,
            color4,
            alpha4,
            bold: StyleBool(field("Bold", f[7])?),
            italic: StyleBool(field("Italic", f[8])?),
            underline: StyleBool(field("Underline", f[9])?),
            strikeout: StyleBool(field("StrikeOut", f[10])?),
            scale_x: float_field("ScaleX", f[11])?,
            scale_y: float_field("ScaleY", f[12])?,
            spacing: float_field("Spacing", f[13])?,
            angle: float_field("Angle", f[14])?,
            border_style: BorderStyle(field("BorderStyle", f[15])?),
            outline: float_field("Outline", f[16])?,
            shadow: float_field("Shadow", f[17])?,
            alignment: Alignment::new(alignment)?,
            margin_l: field("MarginL", f[19])?,
            margin_r: field("MarginR", f[20])?,
            margin_v: field("MarginV", f[21])?,
            encoding: field("Encoding", f[22])?,
        })
    }

    /// Render as a `Style:` line without trailing newline
    #[must_use]
    pub fn to_ass_string(&self) -> String {
        let fields = [
            self.name.clone(),
            self.fontname.clone(),
            fstr(self.fontsize),
            self.alpha_color1(),
            self.alpha_color2(),
            self.alpha_color3(),
            self.alpha_color4(),
            self.bold.to_string(),
            self.italic.to_string(),
            self.underline.to_string(),
            self.strikeout.to_string(),
            fstr(self.scale_x),
            fstr(self.scale_y),
            fstr(self.spacing),
            fstr(self.angle),
            self.border_style.to_string(),
            fstr(self.outline),
            fstr(self.shadow),
            self.alignment.to_string(),
            self.margin_l.to_string(),
            self.margin_r.to_string(),
            self.margin_v.to_string(),
            self.encoding.to_string(),
        ];
        format!("Style: {}", fields.join(","))
    }

    /// Primary color recombined as `&HAABBGGRR`
    #[must_use]
    pub fn alpha_color1(&self) -> String {
        format!("&H{}{}", self.alpha1.0, self.color1.0)
    }

    /// Secondary color recombined as `&HAABBGGRR`
    #[must_use]
    pub fn alpha_color2(&self) -> String {
        format!("&H{}{}", self.alpha2.0, self.color2.0)
    }

    /// Outline color recombined as `&HAABBGGRR`
    #[must_use]
    pub fn alpha_color3(&self) -> String {
        format!("&H{}{}", self.alpha3.0, self.color3.0)
    }

    /// Shadow color recombined as `&HAABBGGRR`
    #[must_use]
    pub fn alpha_color4(&self) -> String {
        format!("&H{}{}", self.alpha4.0, self.color4.0)
    }

    /// Formatting flags that are switched on
    #[must_use]
    pub fn formatting(&self) -> TextFormatting {
        let mut flags = TextFormatting::empty();
        flags.set(TextFormatting::BOLD, self.bold.is_on());
        flags.set(TextFormatting::ITALIC, self.italic.is_on());
        flags.set(TextFormatting::UNDERLINE, self.underline.is_on());
        flags.set(TextFormatting::STRIKE_OUT, self.strikeout.is_on());
        flags
    }

    pub fn set_bold(&mut self, on: bool) {
        self.bold = on.into();
    }

    pub fn set_italic(&mut self, on: bool) {
        self.italic = on.into();
    }

    pub fn set_underline(&mut self, on: bool) {
        self.underline = on.into();
    }

    pub fn set_strikeout(&mut self, on: bool) {
        self.strikeout = on.into();
    }

    /// `true` for an opaque box, `false` for outline and shadow
    pub fn set_border_style(&mut self, opaque_box: bool) {
        self.border_style = opaque_box.into();
    }

    /// Column of the alignment grid
    #[must_use]
    pub const fn horizontal(&self) -> HorizontalAlign {
        self.alignment.horizontal()
    }

    /// Row of the alignment grid
    #[must_use]
    pub const fn vertical(&self) -> VerticalAlign {
        self.alignment.vertical()
    }

    #[must_use]
    pub const fn an_is_left(&self) -> bool {
        matches!(self.horizontal(), HorizontalAlign::Left)
    }

    #[must_use]
    pub const fn an_is_center(&self) -> bool {
        matches!(self.horizontal(), HorizontalAlign::Center)
    }

    #[must_use]
    pub const fn an_is_right(&self) -> bool {
        matches!(self.horizontal(), HorizontalAlign::Right)
    }

    #[must_use]
    pub const fn an_is_top(&self) -> bool {
        matches!(self.vertical(), VerticalAlign::Top)
    }

    #[must_use]
    pub const fn an_is_middle(&self) -> bool {
        matches!(self.vertical(), VerticalAlign::Middle)
    }

    #[must_use]
    pub const fn an_is_bottom(&self) -> bool {
        matches!(self.vertical(), VerticalAlign::Bottom)
    }

    /// Rescale the style from a source resolution to `target`
    ///
    /// Font size and vertical margin follow the height ratio, spacing and
    /// horizontal margins follow the width ratio. `scale_x` is stretched
    /// only when the aspect ratio changes by more than 1%. Outline and
    /// shadow follow the height ratio when `scaled_border_and_shadow` is set
    /// or the source script enables it.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::MissingPlayResolution`] when the source is a
    /// script without `PlayResX`/`PlayResY`, or when either resolution has
    /// a zero axis.
    #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
    pub fn resample(
        &mut self,
        source: ResampleSource<'_>,
        target: (i64, i64),
        scaled_border_and_shadow: bool,
    ) -> Result<()> {
        let (src, scaled) = match source {
            ResampleSource::Meta(meta) => Self::script_source(&meta.script_info)?,
            ResampleSource::ScriptInfo(info) => Self::script_source(info)?,
            ResampleSource::Resolution(x, y) => ((x, y), false),
        };
        let scaled = scaled || scaled_border_and_shadow;
        if src.0 == 0 || src.1 == 0 || target.0 == 0 || target.1 == 0 {
            return Err(CoreError::MissingPlayResolution);
        }

        let (src_x, src_y) = (src.0 as f64, src.1 as f64);
        let (target_x, target_y) = (target.0 as f64, target.1 as f64);
        let scale_width = target_x / src_x;
        let scale_height = target_y / src_y;
        let old_ar = src_x / src_y;
        let new_ar = target_x / target_y;

        if (old_ar - new_ar).abs() / new_ar > 0.01 {
            self.scale_x *= new_ar / old_ar;
        }
        self.fontsize = (self.fontsize * scale_height).round();
        self.spacing *= scale_width;
        self.margin_l = (f64::from(self.margin_l) * scale_width).round() as i32;
        self.margin_r = (f64::from(self.margin_r) * scale_width).round() as i32;
        self.margin_v = (f64::from(self.margin_v) * scale_height).round() as i32;
        if scaled {
            self.outline = round_to(self.outline * scale_height, 5);
            self.shadow = round_to(self.shadow * scale_height, 5);
        }
        log::trace!(
            "resampled style `{}` from {}x{} to {}x{}",
            self.name,
            src.0,
            src.1,
            target.0,
            target.1
        );
        Ok(())
    }

    fn script_source(info: &ScriptInfo) -> Result<((i64, i64), bool)> {
        let res = info.play_res().ok_or(CoreError::MissingPlayResolution)?;
        let scaled = info
            .scaled_border_and_shadow()
            .is_some_and(crate::schema::AssBool::is_yes);
        Ok((res, scaled))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const DEFAULT_LINE: &str = "Style: Default,Arial,20,&H00FFFFFF,&H000000FF,&H00000000,&H00000000,0,0,0,0,100,100,0,0,1,2,2,2,10,10,10,1";

    #[test]
    fn default_style_matches_aegisub_line() {
        assert_eq!(Style::default_style().to_ass_string(), DEFAULT_LINE);
        assert_eq!(Style::parse(DEFAULT_LINE, 0), Ok(Style::default()));
    }

    #[test]
    fn round_trip_keeps_text() {
        let line = "Style: Romaji,Noto Sans,52.5,&H00fFfFfF,&HFF0000FF,&H64202020,&HA0000000,-1,0,1,0,95,100,1.5,0,3,2.75,0,8,25,30,40,128";
        let style = Style::parse(line, 4).expect("valid style");
        assert_eq!(style.to_ass_string(), line);
        assert_eq!(style.alpha3.as_hex(), "64");
        assert_eq!(style.color1.as_hex(), "fFfFfF");
        assert!(style.border_style.is_opaque_box());
    }

    #[test]
    fn bold_values_round_trip_literally() {
        let off = DEFAULT_LINE.to_string();
        let on = DEFAULT_LINE.replacen(",0,0,0,0,100", ",-1,0,0,0,100", 1);
        let parsed_off = Style::parse(&off, 0).expect("valid");
        let parsed_on = Style::parse(&on, 0).expect("valid");
        assert_eq!(parsed_off.bold, StyleBool(0));
        assert_eq!(parsed_on.bold, StyleBool(-1));
        assert_eq!(parsed_on.to_ass_string(), on);

        let mut built = Style::default();
        built.set_bold(true);
        assert_eq!(built.bold, StyleBool(-1));
        assert_eq!(built.to_ass_string(), on);
        built.set_bold(false);
        assert_eq!(built.bold, StyleBool(0));
    }

    #[test]
    fn field_count_mismatch_is_malformed() {
        let err = Style::parse("Style: Broken,Arial,20", 3).expect_err("too few fields");
        match err {
            ParseError::MalformedLine { index, kind, raw, .. } => {
                assert_eq!(index, 3);
                assert_eq!(kind, LineKind::Style);
                assert_eq!(raw, "Style: Broken,Arial,20");
            }
            other => panic!("unexpected error {other:?}"),
        }
        assert!(Style::parse("Dialogue: 0", 0).is_err());
    }

    #[test]
    fn bad_values_are_located() {
        let bad_size = DEFAULT_LINE.replace(",20,", ",big,");
        let err = Style::parse(&bad_size, 2).expect_err("bad size");
        assert_eq!(err.line_index(), Some(2));
        assert!(err.to_string().contains("Fontsize"));

        let bad_alignment = DEFAULT_LINE.replace(",2,2,2,10", ",2,2,12,10");
        let err = Style::parse(&bad_alignment, 1).expect_err("bad alignment");
        assert!(err.to_string().contains("alignment"));

        let bad_color = DEFAULT_LINE.replace("&H00FFFFFF", "&HGG");
        assert!(Style::parse(&bad_color, 0).is_err());
    }

    #[test]
    fn color_splitting() {
        let (alpha, color) = split_color("&H80112233&").expect("valid");
        assert_eq!((alpha.as_hex(), color.as_hex()), ("80", "112233"));
        let (alpha, color) = split_color("&HFF").expect("valid");
        assert_eq!((alpha.as_hex(), color.as_hex()), ("00", "0000FF"));
        let (alpha, _) = split_color("&H1112233").expect("valid");
        assert_eq!(alpha.as_hex(), "01");
        assert!(split_color("112233").is_err());
        assert!(split_color("&H").is_err());
        assert!(split_color("&H123456789").is_err());
    }

    #[test]
    fn formatting_flags() {
        let mut style = Style::default();
        assert!(style.formatting().is_empty());
        style.set_italic(true);
        style.strikeout = StyleBool(1);
        assert_eq!(
            style.formatting(),
            TextFormatting::ITALIC | TextFormatting::STRIKE_OUT
        );
        style.set_border_style(true);
        assert_eq!(style.border_style, BorderStyle(3));
    }

    #[test]
    fn alignment_predicates() {
        let mut style = Style::default();
        style.alignment = Alignment::new(7).expect("valid");
        assert!(style.an_is_left() && style.an_is_top());
        assert!(!style.an_is_center() && !style.an_is_bottom());
        style.alignment = Alignment::new(6).expect("valid");
        assert!(style.an_is_right() && style.an_is_middle());
    }

    #[test]
    fn resample_scales_geometry() {
        let mut style = Style::default();
        style
            .resample(ResampleSource::Resolution(640, 360), (1920, 1080), true)
            .expect("valid resolution");
        assert_eq!(style.fontsize, 60.0);
        assert_eq!((style.margin_l, style.margin_r, style.margin_v), (30, 30, 30));
        assert_eq!(style.outline, 6.0);
        assert_eq!(style.scale_x, 100.0);
    }

    #[test]
    fn resample_stretches_on_aspect_change() {
        let mut style = Style::default();
        style
            .resample(ResampleSource::Resolution(640, 480), (1920, 1080), false)
            .expect("valid resolution");
        assert!((style.scale_x - 133.333_333).abs() < 1e-3);
        assert_eq!(style.outline, 2.0);
        assert_eq!(style.fontsize, 45.0);
    }

    #[test]
    fn resample_from_script_uses_border_flag() {
        let mut meta = Meta::default_aegisub();
        meta.script_info.set_play_res((384, 288));
        let mut style = Style::default();
        style
            .resample(ResampleSource::Meta(&meta), (768, 576), false)
            .expect("play res set");
        assert_eq!(style.outline, 4.0);

        let missing = Meta::default();
        assert_eq!(
            style.resample(ResampleSource::Meta(&missing), (768, 576), false),
            Err(CoreError::MissingPlayResolution)
        );
    }
}
