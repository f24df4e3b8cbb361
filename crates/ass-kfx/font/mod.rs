//! Font and shape collaborator interfaces
//!
//! The layout engine never opens font files. It asks a [`FontEngine`] for
//! a [`Font`] per style and reads metrics and text extents from it. Shapes
//! produced by [`Font::text_to_shape`] are handed back to callers untouched
//! apart from [`Shape::align`] and [`Shape::to_pixels`].
//!
//! [`FontCache`] memoizes loaded fonts by style content, since layout asks
//! for the same style once per line, word, syllable and character.

pub mod monospace;

use std::rc::Rc;

use ahash::RandomState;
use std::collections::HashMap;

use crate::layout::positioning::Alignment;
use crate::parser::ast::Style;
use crate::utils::{create_hash_map, Result};

/// Vertical font metrics in pixels
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FontMetrics {
    pub ascent: f64,
    pub descent: f64,
    pub internal_leading: f64,
    pub external_leading: f64,
}

/// Size of a run of text in pixels
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TextExtents {
    pub width: f64,
    pub height: f64,
}

/// One raster pixel of a shape
///
/// `alpha` follows the ASS convention: `0` is opaque, `255` transparent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Pixel {
    pub x: i64,
    pub y: i64,
    pub alpha: u8,
}

/// Vector outline of rendered text
pub trait Shape {
    /// Move the shape so its bounding box anchors at the origin for `an`
    fn align(&mut self, an: Alignment);

    /// Rasterize the shape
    fn to_pixels(&self, supersampling: u32, anti_aliasing: bool) -> Vec<Pixel>;
}

/// A font resolved for one style
pub trait Font {
    type Shape: Shape;

    /// Vertical metrics of the font
    fn metrics(&self) -> FontMetrics;

    /// Measured size of `text`
    fn text_extents(&self, text: &str) -> TextExtents;

    /// Outline of `text`
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Font`](crate::utils::CoreError::Font) when the
    /// engine cannot produce an outline.
    fn text_to_shape(&self, text: &str) -> Result<Self::Shape>;
}

/// Loads fonts for styles
pub trait FontEngine {
    type Font: Font;

    /// Resolve the font described by `style`
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Font`](crate::utils::CoreError::Font) when no
    /// matching font is available.
    fn load(&self, style: &Style) -> Result<Self::Font>;
}

/// Cache statistics for monitoring
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: usize,
    pub misses: usize,
}

impl CacheStats {
    /// Fraction of lookups served from the cache
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn hit_ratio(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

/// Per-style font memoization
pub struct FontCache<E: FontEngine> {
    engine: E,
    fonts: HashMap<String, Rc<E::Font>, RandomState>,
    stats: CacheStats,
}

impl<E: FontEngine> FontCache<E> {
    /// Create an empty cache around an engine
    pub fn new(engine: E) -> Self {
        Self {
            engine,
            fonts: create_hash_map(),
            stats: CacheStats::default(),
        }
    }

    /// Font for `style`, loading it on first use
    ///
    /// Styles are keyed by their serialized line, so two styles with the
    /// same content share a font and a modified style gets a fresh one.
    ///
    /// # Errors
    ///
    /// Propagates [`FontEngine::load`] failures. Failures are not cached.
    pub fn get(&mut self, style: &Style) -> Result<Rc<E::Font>> {
        let key = style.to_ass_string();
        if let Some(font) = self.fonts.get(&key) {
            self.stats.hits += 1;
            return Ok(Rc::clone(font));
        }
        self.stats.misses += 1;
        log::debug!("loading font for style `{}`", style.name);
        let font = Rc::new(self.engine.load(style)?);
        self.fonts.insert(key, Rc::clone(&font));
        Ok(font)
    }

    /// Number of cached fonts
    #[must_use]
    pub fn len(&self) -> usize {
        self.fonts.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fonts.is_empty()
    }

    /// Drop every cached font and reset statistics
    pub fn clear(&mut self) {
        self.fonts.clear();
        self.stats = CacheStats::default();
    }

    /// Hit/miss counters
    #[must_use]
    pub const fn stats(&self) -> CacheStats {
        self.stats
    }

    /// The wrapped engine
    #[must_use]
    pub const fn engine(&self) -> &E {
        &self.engine
    }
}

impl<E: FontEngine + core::fmt::Debug> core::fmt::Debug for FontCache<E> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("FontCache")
            .field("engine", &self.engine)
            .field("fonts", &self.fonts.len())
            .field("stats", &self.stats)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::monospace::MonospaceEngine;
    use super::*;
    use crate::utils::CoreError;

    #[test]
    fn cache_memoizes_by_style_content() {
        let mut cache = FontCache::new(MonospaceEngine);
        let style = Style::default();
        let first = cache.get(&style).expect("monospace never fails");
        let second = cache.get(&style).expect("monospace never fails");
        assert!(Rc::ptr_eq(&first, &second));
        assert_eq!(cache.stats(), CacheStats { hits: 1, misses: 1 });

        let mut bigger = style.clone();
        bigger.fontsize = 40.0;
        let third = cache.get(&bigger).expect("monospace never fails");
        assert!(!Rc::ptr_eq(&first, &third));
        assert_eq!(cache.len(), 2);
        assert!((cache.stats().hit_ratio() - 1.0 / 3.0).abs() < 1e-12);

        cache.clear();
        assert!(cache.is_empty());
        assert_eq!(cache.stats().hit_ratio(), 0.0);
    }

    struct FailingEngine;

    impl FontEngine for FailingEngine {
        type Font = monospace::MonospaceFont;

        fn load(&self, style: &Style) -> Result<Self::Font> {
            Err(CoreError::font(format!("no face named `{}`", style.fontname)))
        }
    }

    #[test]
    fn load_failures_are_not_cached() {
        let mut cache = FontCache::new(FailingEngine);
        let err = cache.get(&Style::default()).expect_err("engine fails");
        assert_eq!(err, CoreError::Font("no face named `Arial`".to_string()));
        assert!(cache.is_empty());
        assert_eq!(cache.stats().misses, 1);
    }
}
