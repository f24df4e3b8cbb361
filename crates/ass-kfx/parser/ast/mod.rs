//! Owned document records
//!
//! Unlike sections, which borrow the source text, records own their data:
//! they are mutated by layout and resampling and outlive the input buffer.

pub mod line;
pub mod meta;
pub mod plist;
mod section;
pub mod style;
pub mod units;

pub use line::{Line, EVENTS_FORMAT};
pub use meta::{Meta, ProjectGarbage, ScriptInfo};
pub use plist::PList;
pub use section::{split_sections, Section, SectionType};
pub use style::{
    split_color, AssAlpha, AssColor, BorderStyle, ResampleSource, Style, StyleBool,
    TextFormatting, STYLE_FORMAT,
};
pub use units::{Char, Syllable, TextUnit, Word};
