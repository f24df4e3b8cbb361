//! Shared helpers: error type, hashing, BOM handling and number formatting

pub mod errors;

use ahash::RandomState;
use std::collections::HashMap;

pub use errors::{CoreError, Result};

/// Create a new `HashMap` using ahash
///
/// # Example
///
/// ```rust
/// use ass_kfx::utils::create_hash_map;
///
/// let mut map = create_hash_map::<String, i32>();
/// map.insert("key".to_string(), 42);
/// ```
#[must_use]
pub fn create_hash_map<K, V>() -> HashMap<K, V, RandomState> {
    HashMap::with_hasher(RandomState::new())
}

/// Strip a leading UTF-8 byte order mark
///
/// Returns the remaining text and whether a BOM was present.
///
/// ```rust
/// use ass_kfx::utils::strip_bom;
///
/// assert_eq!(strip_bom("\u{FEFF}[Script Info]"), ("[Script Info]", true));
/// assert_eq!(strip_bom("[Script Info]"), ("[Script Info]", false));
/// ```
#[must_use]
pub fn strip_bom(text: &str) -> (&str, bool) {
    text.strip_prefix('\u{FEFF}')
        .map_or((text, false), |rest| (rest, true))
}

/// Format a float the way ASS files write numbers
///
/// Integral values drop the decimal point (`20.0` becomes `20`), everything
/// else uses the shortest representation that reads back to the same value.
#[must_use]
pub fn fstr(value: f64) -> String {
    if value == 0.0 {
        return "0".to_string();
    }
    format!("{value}")
}

/// Round to a fixed number of decimal places
#[must_use]
pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}
