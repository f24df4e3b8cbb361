//! Deterministic font engine for tests and headless layout
//!
//! Every glyph is a box `fontsize * 0.5` wide and `fontsize` tall, scaled by
//! the style's `scale_x`/`scale_y`. Whitespace advances the pen but draws
//! nothing.

use super::{Font, FontEngine, FontMetrics, Pixel, Shape, TextExtents};
use crate::layout::positioning::{Alignment, HorizontalAlign, VerticalAlign};
use crate::parser::ast::Style;
use crate::utils::Result;

/// Engine producing [`MonospaceFont`]s
#[derive(Debug, Clone, Copy, Default)]
pub struct MonospaceEngine;

impl FontEngine for MonospaceEngine {
    type Font = MonospaceFont;

    fn load(&self, style: &Style) -> Result<Self::Font> {
        Ok(MonospaceFont::new(
            style.fontsize * style.scale_x / 100.0 * 0.5,
            style.fontsize * style.scale_y / 100.0,
        ))
    }
}

/// Fixed-advance font
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MonospaceFont {
    advance: f64,
    height: f64,
}

impl MonospaceFont {
    /// Font with a fixed glyph advance and line height
    #[must_use]
    pub const fn new(advance: f64, height: f64) -> Self {
        Self { advance, height }
    }
}

impl Font for MonospaceFont {
    type Shape = BoxShape;

    fn metrics(&self) -> FontMetrics {
        FontMetrics {
            ascent: self.height * 0.8,
            descent: self.height * 0.2,
            internal_leading: 0.0,
            external_leading: 0.0,
        }
    }

    #[allow(clippy::cast_precision_loss)]
    fn text_extents(&self, text: &str) -> TextExtents {
        TextExtents {
            width: text.chars().count() as f64 * self.advance,
            height: self.height,
        }
    }

    #[allow(clippy::cast_precision_loss)]
    fn text_to_shape(&self, text: &str) -> Result<Self::Shape> {
        let boxes = text
            .chars()
            .enumerate()
            .filter(|(_, c)| !c.is_whitespace())
            .map(|(i, _)| {
                let left = i as f64 * self.advance;
                [left, 0.0, left + self.advance, self.height]
            })
            .collect();
        Ok(BoxShape { boxes })
    }
}

/// Shape made of axis-aligned glyph boxes `[x0, y0, x1, y1]`
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BoxShape {
    pub boxes: Vec<[f64; 4]>,
}

impl BoxShape {
    /// Bounding box of all glyph boxes
    #[must_use]
    pub fn bounds(&self) -> Option<[f64; 4]> {
        self.boxes.iter().copied().reduce(|acc, b| {
            [
                acc[0].min(b[0]),
                acc[1].min(b[1]),
                acc[2].max(b[2]),
                acc[3].max(b[3]),
            ]
        })
    }

    fn covers(&self, x: f64, y: f64) -> bool {
        self.boxes
            .iter()
            .any(|b| x >= b[0] && x < b[2] && y >= b[1] && y < b[3])
    }
}

impl Shape for BoxShape {
    fn align(&mut self, an: Alignment) {
        let Some([x0, y0, x1, y1]) = self.bounds() else {
            return;
        };
        let dx = match an.horizontal() {
            HorizontalAlign::Left => x0,
            HorizontalAlign::Center => (x0 + x1) / 2.0,
            HorizontalAlign::Right => x1,
        };
        let dy = match an.vertical() {
            VerticalAlign::Top => y0,
            VerticalAlign::Middle => (y0 + y1) / 2.0,
            VerticalAlign::Bottom => y1,
        };
        for b in &mut self.boxes {
            b[0] -= dx;
            b[2] -= dx;
            b[1] -= dy;
            b[3] -= dy;
        }
    }

    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_precision_loss,
        clippy::cast_sign_loss
    )]
    fn to_pixels(&self, supersampling: u32, anti_aliasing: bool) -> Vec<Pixel> {
        let Some([x0, y0, x1, y1]) = self.bounds() else {
            return Vec::new();
        };
        let samples = if anti_aliasing { supersampling.max(1) } else { 1 };
        let step = 1.0 / f64::from(samples);

        let mut pixels = Vec::new();
        for py in (y0.floor() as i64)..(y1.ceil() as i64) {
            for px in (x0.floor() as i64)..(x1.ceil() as i64) {
                let mut hits = 0u64;
                for sy in 0..samples {
                    for sx in 0..samples {
                        let x = px as f64 + (f64::from(sx) + 0.5) * step;
                        let y = py as f64 + (f64::from(sy) + 0.5) * step;
                        if self.covers(x, y) {
                            hits += 1;
                        }
                    }
                }
                if hits > 0 {
                    pixels.push(Pixel {
                        x: px,
                        y: py,
                        alpha: coverage_alpha(hits, samples),
                    });
                }
            }
        }
        pixels
    }
}

/// Alpha of a pixel where `hits` of `samples`² subsamples are covered
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss,
    clippy::cast_sign_loss
)]
fn coverage_alpha(hits: u64, samples: u32) -> u8 {
    let coverage = hits as f64 / f64::from(samples).powi(2);
    (255.0 * (1.0 - coverage)).round() as u8
}
