//! # ass-kfx
//!
//! ASS (Advanced `SubStation` Alpha) subtitle model for karaoke effect
//! generation. Parses a script into owned, mutable records, decomposes each
//! dialogue line into words, karaoke syllables and characters with timing
//! and pixel positions, and writes generated lines back out.
//!
//! ## Features
//!
//! - **Typed metadata**: `[Script Info]` and `[Aegisub Project Garbage]`
//!   decoded through compile-time field tables
//! - **Frame-aware times**: timestamps snapped to the frames Aegisub shows
//! - **Karaoke decomposition**: `\k`, `\K`, `\kf` and `\ko` syllables with
//!   their tags and inline effects
//! - **Layout**: line, word, syllable and character boxes for all nine
//!   alignments, with optional vertical kanji stacking
//! - **Pluggable fonts**: metrics and outlines come from a [`FontEngine`]
//!   memoized per style
//!
//! ## Quick Start
//!
//! ```rust
//! use ass_kfx::{Document, DocumentOptions, FontCache, SaveOptions};
//! use ass_kfx::font::monospace::MonospaceEngine;
//!
//! let script_text = r"[Script Info]
//! Title: Example
//! PlayResX: 1920
//! PlayResY: 1080
//!
//! [V4+ Styles]
//! Format: Name, Fontname, Fontsize, PrimaryColour, SecondaryColour, OutlineColour, BackColour, Bold, Italic, Underline, StrikeOut, ScaleX, ScaleY, Spacing, Angle, BorderStyle, Outline, Shadow, Alignment, MarginL, MarginR, MarginV, Encoding
//! Style: Default,Arial,20,&H00FFFFFF,&H000000FF,&H00000000,&H00000000,0,0,0,0,100,100,0,0,1,2,0,2,10,10,10,1
//!
//! [Events]
//! Format: Layer, Start, End, Style, Name, MarginL, MarginR, MarginV, Effect, Text
//! Dialogue: 0,0:00:01.00,0:00:03.00,Default,,0,0,0,,{\k50}Hel{\k50}lo
//! ";
//!
//! let mut doc = Document::parse(script_text, &DocumentOptions::default())?;
//! doc.decompose(&mut FontCache::new(MonospaceEngine))?;
//!
//! let line = doc.lines()[0].clone();
//! for syl in line.syls.iter() {
//!     let mut fx = line.clone();
//!     fx.set_text(format!(r"{{\pos({},{})}}{}", syl.extent.x, syl.extent.y, syl.text));
//!     doc.add_line(&fx, None);
//! }
//! assert_eq!(doc.output_lines().len(), 2);
//! let text = doc.to_ass_string(&[], &SaveOptions::default());
//! assert!(text.contains(r"{\pos(950,1070)}Hel"));
//! # Ok::<(), ass_kfx::CoreError>(())
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]
#![deny(clippy::all)]
#![deny(unsafe_code)]

pub mod document;
pub mod font;
pub mod layout;
pub mod parser;
pub mod schema;
pub mod time;
pub mod tokenizer;
pub mod utils;

pub use document::{Document, DocumentOptions, SaveOptions};
pub use font::{Font, FontCache, FontEngine, FontMetrics, Shape};
pub use layout::positioning::{Alignment, PositionedExtent};
pub use parser::ast::{Char, Line, Meta, PList, Style, Syllable, TextUnit, Word};
pub use parser::{ParseError, ParseIssue};
pub use time::{FrameRate, Time, TimeRole};
pub use utils::{CoreError, Result};

/// Crate version for runtime compatibility checks
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
