//! Value codecs for schema-driven fields
//!
//! Each field type of a meta record knows how to read itself from the text
//! after `Key: ` and how to write itself back. Coercion failures report a
//! reason string that the marshaller wraps into a located
//! [`ParseError`](crate::parser::errors::ParseError).

use core::fmt;

use crate::utils::fstr;

/// Textual codec for one field type
pub trait FieldCodec: Sized {
    /// Human-readable name of the type, used in error messages
    const KIND: &'static str;

    /// Read a value from its textual form
    ///
    /// # Errors
    ///
    /// Returns the reason the text cannot be coerced to this type.
    fn decode(raw: &str) -> Result<Self, String>;

    /// Write the value back to its textual form
    fn encode(&self) -> String;
}

impl FieldCodec for String {
    const KIND: &'static str = "string";

    fn decode(raw: &str) -> Result<Self, String> {
        Ok(raw.to_string())
    }

    fn encode(&self) -> String {
        self.clone()
    }
}

impl FieldCodec for i64 {
    const KIND: &'static str = "integer";

    fn decode(raw: &str) -> Result<Self, String> {
        raw.trim()
            .parse()
            .map_err(|err| format!("expected an {}: {err}", Self::KIND))
    }

    fn encode(&self) -> String {
        self.to_string()
    }
}

impl FieldCodec for f64 {
    const KIND: &'static str = "float";

    fn decode(raw: &str) -> Result<Self, String> {
        let value: Self = raw
            .trim()
            .parse()
            .map_err(|err| format!("expected a {}: {err}", Self::KIND))?;
        if value.is_finite() {
            Ok(value)
        } else {
            Err(format!("expected a finite {}", Self::KIND))
        }
    }

    fn encode(&self) -> String {
        fstr(*self)
    }
}

/// Three-state boolean used by `[Script Info]` (`yes`, `no`, or empty)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AssBool {
    /// `yes`
    Yes,
    /// `no`
    No,
    /// Present but empty
    #[default]
    Unset,
}

impl AssBool {
    /// Truthiness: only `Yes` is true
    #[must_use]
    pub const fn is_yes(self) -> bool {
        matches!(self, Self::Yes)
    }
}

impl From<bool> for AssBool {
    fn from(value: bool) -> Self {
        if value {
            Self::Yes
        } else {
            Self::No
        }
    }
}

impl fmt::Display for AssBool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Yes => write!(f, "yes"),
            Self::No => write!(f, "no"),
            Self::Unset => Ok(()),
        }
    }
}

impl FieldCodec for AssBool {
    const KIND: &'static str = "yes/no flag";

    fn decode(raw: &str) -> Result<Self, String> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            Ok(Self::Unset)
        } else if trimmed.eq_ignore_ascii_case("yes") {
            Ok(Self::Yes)
        } else if trimmed.eq_ignore_ascii_case("no") {
            Ok(Self::No)
        } else {
            Err(format!("expected a {}", Self::KIND))
        }
    }

    fn encode(&self) -> String {
        self.to_string()
    }
}
