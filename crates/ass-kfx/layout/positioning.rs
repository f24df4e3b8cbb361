//! Alignment classes and anchor math
//!
//! ASS alignment values form a 3x3 numpad grid: `1..=3` bottom, `4..=6`
//! middle, `7..=9` top, and within each row left, center, right.

use crate::parser::errors::ParseError;

/// Horizontal alignment class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HorizontalAlign {
    /// 1, 4, 7
    Left,
    /// 2, 5, 8
    Center,
    /// 3, 6, 9
    Right,
}

/// Vertical alignment class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VerticalAlign {
    /// 7, 8, 9
    Top,
    /// 4, 5, 6
    Middle,
    /// 1, 2, 3
    Bottom,
}

/// Validated numpad alignment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "u8", into = "u8"))]
pub struct Alignment(u8);

impl Alignment {
    /// Bottom center, the ASS default
    pub const BOTTOM_CENTER: Self = Self(2);

    /// Validate a numpad value
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::InvalidAlignment`] outside `1..=9`.
    pub fn new(value: u8) -> Result<Self, ParseError> {
        if (1..=9).contains(&value) {
            Ok(Self(value))
        } else {
            Err(ParseError::InvalidAlignment {
                value: value.to_string(),
            })
        }
    }

    /// Numpad value
    #[must_use]
    pub const fn value(self) -> u8 {
        self.0
    }

    /// Column of the grid
    #[must_use]
    pub const fn horizontal(self) -> HorizontalAlign {
        match self.0 {
            1 | 4 | 7 => HorizontalAlign::Left,
            2 | 5 | 8 => HorizontalAlign::Center,
            _ => HorizontalAlign::Right,
        }
    }

    /// Row of the grid
    #[must_use]
    pub const fn vertical(self) -> VerticalAlign {
        match self.0 {
            7..=9 => VerticalAlign::Top,
            4..=6 => VerticalAlign::Middle,
            _ => VerticalAlign::Bottom,
        }
    }
}

impl Default for Alignment {
    fn default() -> Self {
        Self::BOTTOM_CENTER
    }
}

impl TryFrom<u8> for Alignment {
    type Error = ParseError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Alignment> for u8 {
    fn from(alignment: Alignment) -> Self {
        alignment.0
    }
}

impl core::fmt::Display for Alignment {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Measured size and computed on-screen box of a line or text unit
///
/// `x`/`y` repeat whichever of left/center/right and top/middle/bottom the
/// alignment anchors to.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PositionedExtent {
    pub width: f64,
    pub height: f64,
    pub left: f64,
    pub center: f64,
    pub right: f64,
    pub top: f64,
    pub middle: f64,
    pub bottom: f64,
    pub x: f64,
    pub y: f64,
}

impl PositionedExtent {
    /// Set left/center/right from a left edge and choose `x` by alignment
    pub fn place_horizontal(&mut self, left: f64, align: HorizontalAlign) {
        self.left = left;
        self.center = left + self.width / 2.0;
        self.right = left + self.width;
        self.x = match align {
            HorizontalAlign::Left => self.left,
            HorizontalAlign::Center => self.center,
            HorizontalAlign::Right => self.right,
        };
    }

    /// Set top/middle/bottom from a top edge and choose `y` by alignment
    pub fn place_vertical(&mut self, top: f64, align: VerticalAlign) {
        self.top = top;
        self.middle = top + self.height / 2.0;
        self.bottom = top + self.height;
        self.y = match align {
            VerticalAlign::Top => self.top,
            VerticalAlign::Middle => self.middle,
            VerticalAlign::Bottom => self.bottom,
        };
    }

    /// Copy the vertical coordinates of another extent
    pub fn copy_vertical(&mut self, other: &Self) {
        self.top = other.top;
        self.middle = other.middle;
        self.bottom = other.bottom;
        self.y = other.y;
    }
}

/// Left edge of a line box inside the play area
#[must_use]
pub fn line_left(
    align: HorizontalAlign,
    play_res_x: f64,
    width: f64,
    margin_l: f64,
    margin_r: f64,
) -> f64 {
    match align {
        HorizontalAlign::Left => margin_l,
        HorizontalAlign::Center => play_res_x / 2.0 - width / 2.0 + margin_l / 2.0 - margin_r / 2.0,
        HorizontalAlign::Right => play_res_x - margin_r - width,
    }
}

/// Top edge of a line box inside the play area
#[must_use]
pub fn line_top(align: VerticalAlign, play_res_y: f64, height: f64, margin_v: f64) -> f64 {
    match align {
        VerticalAlign::Top => margin_v,
        VerticalAlign::Middle => play_res_y / 2.0 - height / 2.0,
        VerticalAlign::Bottom => play_res_y - margin_v - height,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alignment_validation() {
        assert!(Alignment::new(0).is_err());
        assert!(Alignment::new(10).is_err());
        for value in 1..=9 {
            assert_eq!(Alignment::new(value).map(Alignment::value), Ok(value));
        }
    }

    #[test]
    fn grid_classes() {
        let classes: Vec<_> = (1..=9)
            .filter_map(|v| Alignment::new(v).ok())
            .map(|a| (a.horizontal(), a.vertical()))
            .collect();
        assert_eq!(classes[0], (HorizontalAlign::Left, VerticalAlign::Bottom));
        assert_eq!(classes[4], (HorizontalAlign::Center, VerticalAlign::Middle));
        assert_eq!(classes[8], (HorizontalAlign::Right, VerticalAlign::Top));
    }

    #[test]
    fn anchors() {
        assert_eq!(line_left(HorizontalAlign::Left, 1920.0, 100.0, 10.0, 20.0), 10.0);
        assert_eq!(line_left(HorizontalAlign::Center, 1920.0, 100.0, 0.0, 0.0), 910.0);
        assert_eq!(line_left(HorizontalAlign::Center, 1920.0, 100.0, 40.0, 20.0), 920.0);
        assert_eq!(line_left(HorizontalAlign::Right, 1920.0, 100.0, 10.0, 20.0), 1800.0);
        assert_eq!(line_top(VerticalAlign::Top, 1080.0, 50.0, 30.0), 30.0);
        assert_eq!(line_top(VerticalAlign::Middle, 1080.0, 50.0, 30.0), 515.0);
        assert_eq!(line_top(VerticalAlign::Bottom, 1080.0, 50.0, 30.0), 1000.0);
    }

    #[test]
    fn place_picks_anchor() {
        let mut extent = PositionedExtent {
            width: 100.0,
            height: 50.0,
            ..PositionedExtent::default()
        };
        extent.place_horizontal(910.0, HorizontalAlign::Center);
        extent.place_vertical(1000.0, VerticalAlign::Bottom);
        assert_eq!(extent.x, 960.0);
        assert_eq!(extent.right, 1010.0);
        assert_eq!(extent.y, 1050.0);
        assert_eq!(extent.middle, 1025.0);
    }
}
