//! Bracketed section slicing
//!
//! A document is split at every line holding only a `[Name]` header. Each
//! section body runs from the line after its header to the next header, or
//! the end of the text. Bodies borrow from the input; nothing is copied until a
//! section is decoded.

/// Section kinds the document assembler understands
///
/// # Examples
///
/// ```rust
/// use ass_kfx::parser::ast::SectionType;
///
/// assert_eq!(SectionType::from_header("[V4+ Styles]"), SectionType::Styles);
/// assert_eq!(SectionType::from_header("[Fonts]"), SectionType::Other);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SectionType {
    /// `[Script Info]`
    ScriptInfo,
    /// `[Aegisub Project Garbage]`
    ProjectGarbage,
    /// `[V4+ Styles]`
    Styles,
    /// `[Events]`
    Events,
    /// `[Aegisub Extradata]`
    Extradata,
    /// Anything else, kept verbatim
    Other,
}

impl SectionType {
    /// Classify a header line such as `[Events]`
    #[must_use]
    pub fn from_header(header: &str) -> Self {
        match header.trim() {
            "[Script Info]" => Self::ScriptInfo,
            "[Aegisub Project Garbage]" => Self::ProjectGarbage,
            "[V4+ Styles]" => Self::Styles,
            "[Events]" => Self::Events,
            "[Aegisub Extradata]" => Self::Extradata,
            _ => Self::Other,
        }
    }

    /// Canonical header text, `None` for [`SectionType::Other`]
    #[must_use]
    pub const fn header(self) -> Option<&'static str> {
        match self {
            Self::ScriptInfo => Some("[Script Info]"),
            Self::ProjectGarbage => Some("[Aegisub Project Garbage]"),
            Self::Styles => Some("[V4+ Styles]"),
            Self::Events => Some("[Events]"),
            Self::Extradata => Some("[Aegisub Extradata]"),
            Self::Other => None,
        }
    }
}

/// One section of the source text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Section<'a> {
    /// Header including its brackets
    pub header: &'a str,
    /// Text between the header line and the next header
    pub body: &'a str,
}

impl<'a> Section<'a> {
    #[must_use]
    pub fn section_type(&self) -> SectionType {
        SectionType::from_header(self.header)
    }

    /// Record lines of the body
    ///
    /// Blank lines, `;` comments and the `Format:` line are skipped.
    pub fn records(&self) -> impl Iterator<Item = &'a str> {
        self.body.lines().filter(|line| {
            let trimmed = line.trim();
            !(trimmed.is_empty() || trimmed.starts_with(';') || trimmed.starts_with("Format:"))
        })
    }
}

/// Split `text` at `[Header]` lines
///
/// A header line holds nothing but the bracketed name.
///
/// Text before the first header is ignored.
#[must_use]
pub fn split_sections(text: &str) -> Vec<Section<'_>> {
    let mut headers = Vec::new();
    let mut offset = 0;
    for line in text.split_inclusive('\n') {
        let trimmed = line.trim();
        if trimmed.len() > 1 && trimmed.starts_with('[') && trimmed.ends_with(']') {
            let lead = line.len() - line.trim_start().len();
            let header = &text[offset + lead..offset + lead + trimmed.len()];
            headers.push((header, offset, offset + line.len()));
        }
        offset += line.len();
    }

    headers
        .iter()
        .enumerate()
        .map(|(i, &(header, _, body_start))| {
            let body_end = headers.get(i + 1).map_or(text.len(), |next| next.1);
            Section {
                header,
                body: &text[body_start..body_end],
            }
        })
        .collect()
}
