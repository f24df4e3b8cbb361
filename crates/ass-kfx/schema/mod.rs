//! Schema-driven marshalling of `Key: Value` sections
//!
//! Meta records (`[Script Info]`, `[Aegisub Project Garbage]`) are plain
//! structs of optional fields. Each record type carries a compile-time field
//! table: an ordered list of `(wire name, internal name, codec)` entries
//! produced by [`schema_record!`]. [`decode`] and [`encode`] are generic over
//! that table, so adding a key is one line in the record definition.
//!
//! # Name transformation
//!
//! Wire names are `Title Case With Spaces` (`PlayResX`, `YCbCr Matrix`).
//! Internal names replace spaces with `_`, insert `_` before every uppercase
//! letter after the first character, and lowercase the result
//! (`play_res_x`, `y_cb_cr__matrix`). The reverse splits on `_`, turns each
//! empty piece into a space and title-cases the rest. Every table entry
//! satisfies both directions; the record tests check this.
//!
//! # Examples
//!
//! ```rust
//! use ass_kfx::parser::ast::ScriptInfo;
//! use ass_kfx::schema;
//!
//! let text = "Title: Demo\nPlayResX: 1280\nPlayResY: 720\nUnknown Key: dropped\n";
//! let info: ScriptInfo = schema::decode(text)?;
//! assert_eq!(info.play_res(), Some((1280, 720)));
//! assert_eq!(schema::encode(&info, &[]), "Title: Demo\nPlayResX: 1280\nPlayResY: 720\n");
//! # Ok::<(), ass_kfx::parser::errors::ParseError>(())
//! ```

pub mod values;

pub use values::{AssBool, FieldCodec};

use crate::parser::errors::ParseError;

/// One entry of a record's field table
pub struct Field<R> {
    /// Key as written in the section (`PlayResX`)
    pub wire_name: &'static str,
    /// Key after the name transformation (`play_res_x`)
    pub internal_name: &'static str,
    /// Coerce text and assign the field
    pub decode: fn(&mut R, &str) -> Result<(), String>,
    /// Render the field if it has a value
    pub encode: fn(&R) -> Option<String>,
}

impl<R> core::fmt::Debug for Field<R> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Field")
            .field("wire_name", &self.wire_name)
            .field("internal_name", &self.internal_name)
            .finish_non_exhaustive()
    }
}

/// A record type backed by a field table
pub trait Schema: Default + Sized + 'static {
    /// Fields in declaration (and serialization) order
    fn fields() -> &'static [Field<Self>];

    /// Look up a field by its internal name
    fn field(internal_name: &str) -> Option<&'static Field<Self>> {
        Self::fields()
            .iter()
            .find(|field| field.internal_name == internal_name)
    }

    /// Number of fields that currently have a value
    fn present_count(&self) -> usize {
        Self::fields()
            .iter()
            .filter(|field| (field.encode)(self).is_some())
            .count()
    }
}

/// Transform a section key into its internal field name
///
/// ```rust
/// use ass_kfx::schema::to_internal_name;
///
/// assert_eq!(to_internal_name("PlayResX"), "play_res_x");
/// assert_eq!(to_internal_name("Video AR Mode"), "video__a_r__mode");
/// ```
#[must_use]
pub fn to_internal_name(wire_name: &str) -> String {
    let mut out = String::with_capacity(wire_name.len() + 4);
    for (i, c) in wire_name.chars().enumerate() {
        if c == ' ' {
            out.push('_');
            continue;
        }
        if i > 0 && c.is_ascii_uppercase() {
            out.push('_');
        }
        out.push(c.to_ascii_lowercase());
    }
    out
}

/// Transform an internal field name back into its section key
///
/// ```rust
/// use ass_kfx::schema::to_wire_name;
///
/// assert_eq!(to_wire_name("play_res_x"), "PlayResX");
/// assert_eq!(to_wire_name("y_cb_cr__matrix"), "YCbCr Matrix");
/// ```
#[must_use]
pub fn to_wire_name(internal_name: &str) -> String {
    internal_name
        .split('_')
        .map(|piece| {
            if piece.is_empty() {
                " ".to_string()
            } else {
                title_case(piece)
            }
        })
        .collect()
}

fn title_case(word: &str) -> String {
    let mut out = String::with_capacity(word.len());
    let mut boundary = true;
    for c in word.chars() {
        if boundary {
            out.extend(c.to_uppercase());
        } else {
            out.extend(c.to_lowercase());
        }
        boundary = !c.is_alphabetic();
    }
    out
}

/// Decode a section body into a record
///
/// Lines are split at the first `": "`. Comment lines (`;`) and lines
/// without a separator are skipped, as are keys the record does not
/// declare.
///
/// # Errors
///
/// Returns [`ParseError::InvalidField`] carrying the zero-based line index
/// within `text` when a value cannot be coerced to its field type.
pub fn decode<R: Schema>(text: &str) -> Result<R, ParseError> {
    let mut record = R::default();
    for (index, line) in text.lines().enumerate() {
        if line.starts_with(';') {
            continue;
        }
        let Some((key, value)) = line.split_once(": ") else {
            continue;
        };
        let internal = to_internal_name(key);
        match R::field(&internal) {
            Some(field) => (field.decode)(&mut record, value).map_err(|reason| {
                ParseError::invalid_value(field.internal_name, value, reason).at_line(index, line)
            })?,
            None => log::trace!("dropping unknown key `{key}`"),
        }
    }
    Ok(record)
}

/// Encode a record back into section text
///
/// `comment` lines are written first, each prefixed with `; ` unless it
/// already starts with `;`. Fields follow in declaration order, one
/// `Key: Value` line per field that has a value.
#[must_use]
pub fn encode<R: Schema>(record: &R, comment: &[&str]) -> String {
    let mut out = String::new();
    for line in comment {
        if !line.starts_with(';') {
            out.push_str("; ");
        }
        out.push_str(line);
        out.push('\n');
    }
    for field in R::fields() {
        if let Some(value) = (field.encode)(record) {
            out.push_str(field.wire_name);
            out.push_str(": ");
            out.push_str(&value);
            out.push('\n');
        }
    }
    out
}

/// Declare a meta record and its field table
///
/// Every field is stored as `Option<T>` where `T: FieldCodec`. Fields
/// without `pub` are exposed through hand-written accessors.
macro_rules! schema_record {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $(
                $(#[$fmeta:meta])*
                $wire:literal as $internal:literal => $fvis:vis $field:ident: $ty:ty,
            )*
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Default, PartialEq)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        $vis struct $name {
            $(
                $(#[$fmeta])*
                $fvis $field: Option<$ty>,
            )*
        }

        impl $crate::schema::Schema for $name {
            fn fields() -> &'static [$crate::schema::Field<Self>] {
                const FIELDS: &[$crate::schema::Field<$name>] = &[
                    $(
                        $crate::schema::Field {
                            wire_name: $wire,
                            internal_name: $internal,
                            decode: |record: &mut $name, raw: &str| {
                                record.$field =
                                    Some(<$ty as $crate::schema::FieldCodec>::decode(raw)?);
                                Ok(())
                            },
                            encode: |record: &$name| {
                                record
                                    .$field
                                    .as_ref()
                                    .map($crate::schema::FieldCodec::encode)
                            },
                        },
                    )*
                ];
                FIELDS
            }
        }
    };
}

pub(crate) use schema_record;

#[cfg(test)]
mod tests {
    use super::*;

    schema_record! {
        struct Sample {
            "Title" as "title" => pub title: String,
            "PlayResX" as "play_res_x" => pub play_res_x: i64,
            "Zoom" as "zoom" => pub zoom: f64,
            "Flag" as "flag" => flag: AssBool,
        }
    }

    #[test]
    fn name_transform_examples() {
        assert_eq!(to_internal_name("Title"), "title");
        assert_eq!(to_internal_name("WrapStyle"), "wrap_style");
        assert_eq!(to_internal_name("YCbCr Matrix"), "y_cb_cr__matrix");
        assert_eq!(to_internal_name("Script Updated By"), "script__updated__by");
        assert_eq!(to_wire_name("wrap_style"), "WrapStyle");
        assert_eq!(to_wire_name("script__updated__by"), "Script Updated By");
        assert_eq!(to_wire_name("video__a_r__mode"), "Video AR Mode");
    }

    #[test]
    fn table_is_consistent_with_transform() {
        for field in Sample::fields() {
            assert_eq!(to_internal_name(field.wire_name), field.internal_name);
            assert_eq!(to_wire_name(field.internal_name), field.wire_name);
        }
    }

    #[test]
    fn decode_assigns_known_keys_and_drops_unknown() {
        let text = "; a comment: ignored\nTitle: Hello: World\nMystery: 1\nPlayResX: 640\n\nFlag: yes\n";
        let sample: Sample = decode(text).expect("valid section");
        assert_eq!(sample.title.as_deref(), Some("Hello: World"));
        assert_eq!(sample.play_res_x, Some(640));
        assert_eq!(sample.zoom, None);
        assert_eq!(sample.flag, Some(AssBool::Yes));
        assert_eq!(sample.present_count(), 3);
    }

    #[test]
    fn decode_failure_is_located() {
        let err = decode::<Sample>("Title: ok\nPlayResX: wide\n").expect_err("bad integer");
        assert_eq!(err.line_index(), Some(1));
        let msg = err.to_string();
        assert!(msg.contains("PlayResX: wide"));
        assert!(msg.contains("play_res_x"));
    }

    #[test]
    fn encode_in_declaration_order_with_comment() {
        let sample = Sample {
            title: Some("Demo".to_string()),
            play_res_x: None,
            zoom: Some(1.0),
            flag: Some(AssBool::No),
        };
        let text = encode(&sample, &["generated", "; already prefixed"]);
        assert_eq!(
            text,
            "; generated\n; already prefixed\nTitle: Demo\nZoom: 1\nFlag: no\n"
        );
    }

    #[test]
    fn round_trip_is_identical() {
        let text = "Title: Demo\nPlayResX: 1920\nZoom: 0.75\nFlag: \n";
        let sample: Sample = decode(text).expect("valid section");
        assert_eq!(encode(&sample, &[]), text);
    }
}
