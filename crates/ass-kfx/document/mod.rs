//! Whole-document assembly
//!
//! [`Document::parse`] slices the input into sections, decodes
//! `[Script Info]` and `[Aegisub Project Garbage]` through the schema
//! marshaller, and parses every style and event record. Missing sections
//! and events referencing undefined styles are recoverable and reported as
//! [`ParseIssue`]s; malformed records abort parsing.
//!
//! [`Document::decompose`] runs the layout engine over every line and
//! computes lead-in/lead-out per style. Serialization lives in [`writer`].
//!
//! # Examples
//!
//! ```rust
//! use ass_kfx::document::{Document, DocumentOptions};
//! use ass_kfx::font::{monospace::MonospaceEngine, FontCache};
//!
//! let text = "[Script Info]\nPlayResX: 1920\nPlayResY: 1080\n\n[V4+ Styles]\nFormat: Name, Fontname, Fontsize, PrimaryColour, SecondaryColour, OutlineColour, BackColour, Bold, Italic, Underline, StrikeOut, ScaleX, ScaleY, Spacing, Angle, BorderStyle, Outline, Shadow, Alignment, MarginL, MarginR, MarginV, Encoding\nStyle: Default,Arial,20,&H00FFFFFF,&H000000FF,&H00000000,&H00000000,0,0,0,0,100,100,0,0,1,2,2,2,10,10,10,1\n\n[Events]\nFormat: Layer, Start, End, Style, Name, MarginL, MarginR, MarginV, Effect, Text\nDialogue: 0,0:00:01.00,0:00:03.00,Default,,0,0,0,,{\\k50}Hel{\\k50}lo\n";
//!
//! let mut doc = Document::parse(text, &DocumentOptions::default().with_fix_timestamps(false))?;
//! let mut fonts = FontCache::new(MonospaceEngine);
//! doc.decompose(&mut fonts)?;
//!
//! let line = &doc.lines()[0];
//! assert_eq!(line.syls.len(), 2);
//! assert_eq!(line.duration, 2.0);
//! # Ok::<(), ass_kfx::CoreError>(())
//! ```

mod options;
pub mod writer;

use std::path::Path;
use std::time::Instant;

use indexmap::IndexMap;

pub use options::{DocumentOptions, SaveOptions};

use crate::font::{FontCache, FontEngine};
use crate::layout::LineLayout;
use crate::parser::ast::{
    split_sections, Line, Meta, PList, ProjectGarbage, ResampleSource, ScriptInfo, Section,
    SectionType, Style,
};
use crate::parser::errors::{IssueCategory, ParseIssue};
use crate::schema;
use crate::time::FrameRate;
use crate::utils::{strip_bom, Result};

/// A parsed ASS document with its output buffer
#[derive(Debug, Clone)]
pub struct Document {
    meta: Meta,
    styles: Vec<Style>,
    /// Copies of `Default` standing in for undefined style names
    fallback_styles: Vec<Style>,
    lines: PList<Line>,
    /// Event records as read, for commenting out on save
    source_events: Vec<String>,
    /// `[Aegisub Extradata]` and unrecognized sections, header and body
    passthrough: Vec<(String, String)>,
    output: Vec<String>,
    options: DocumentOptions,
    issues: Vec<ParseIssue>,
    created: Instant,
}

impl Document {
    /// Document with empty metadata and no styles or lines
    #[must_use]
    pub fn void(fps: FrameRate) -> Self {
        Self::empty(DocumentOptions::default().with_fps(fps))
    }

    /// Fresh Aegisub file: default metadata, the `Default` style and one
    /// empty line
    #[must_use]
    pub fn untitled(fps: FrameRate) -> Self {
        let mut doc = Self::void(fps);
        doc.meta = Meta {
            fps,
            ..Meta::default_aegisub()
        };
        doc.styles.push(Style::default_style());
        doc.lines.push(Line::default_line("Default"));
        doc
    }

    fn empty(options: DocumentOptions) -> Self {
        Self {
            meta: Meta {
                fps: options.fps,
                ..Meta::default()
            },
            styles: Vec::new(),
            fallback_styles: Vec::new(),
            lines: PList::new(),
            source_events: Vec::new(),
            passthrough: Vec::new(),
            output: Vec::new(),
            options,
            issues: Vec::new(),
            created: Instant::now(),
        }
    }

    /// Parse a complete document
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Parse`](crate::CoreError::Parse) for a
    /// malformed style or event line, or a meta value that cannot be
    /// coerced to its field type, and
    /// [`CoreError::InvalidFrameRate`](crate::CoreError::InvalidFrameRate)
    /// when `options.fps` is not positive and finite.
    pub fn parse(text: &str, options: &DocumentOptions) -> Result<Self> {
        if !options.fps.is_valid() {
            return Err(crate::CoreError::InvalidFrameRate(options.fps.to_string()));
        }
        let (text, had_bom) = strip_bom(text);
        if had_bom {
            log::trace!("stripped byte order mark");
        }
        let sections = split_sections(text);
        let mut doc = Self::empty(options.clone());

        match find_section(&sections, SectionType::ScriptInfo) {
            Some(section) => doc.meta.script_info = schema::decode::<ScriptInfo>(section.body)?,
            None => doc.missing_section(SectionType::ScriptInfo),
        }
        match find_section(&sections, SectionType::ProjectGarbage) {
            Some(section) => {
                doc.meta.project_garbage = schema::decode::<ProjectGarbage>(section.body)?;
            }
            None => doc.missing_section(SectionType::ProjectGarbage),
        }

        match find_section(&sections, SectionType::Styles) {
            Some(section) => {
                for (index, raw) in section.records().enumerate() {
                    let style = Style::parse(raw, index)?;
                    if doc.styles.iter().any(|s| s.name == style.name) {
                        doc.record(ParseIssue::warning(
                            IssueCategory::Style,
                            format!("duplicate style `{}`, the last definition wins", style.name),
                            Some(index),
                        ));
                    }
                    doc.styles.push(style);
                }
            }
            None => doc.missing_section(SectionType::Styles),
        }

        match find_section(&sections, SectionType::Events) {
            Some(section) => {
                for (index, raw) in section.records().enumerate() {
                    let line = Line::parse(raw, index, options.fps, options.fix_timestamps)?;
                    if line.end_time < line.start_time {
                        doc.record(ParseIssue::warning(
                            IssueCategory::Timing,
                            format!("line {index} ends before it starts, duration is zero"),
                            Some(index),
                        ));
                    }
                    doc.link_style(&line);
                    doc.source_events.push(raw.to_string());
                    doc.lines.push(line);
                }
            }
            None => doc.missing_section(SectionType::Events),
        }

        doc.passthrough = sections
            .iter()
            .filter(|section| {
                matches!(
                    section.section_type(),
                    SectionType::Extradata | SectionType::Other
                )
            })
            .map(|section| (section.header.to_string(), section.body.trim().to_string()))
            .collect();

        log::debug!(
            "parsed {} styles and {} lines in {:?}",
            doc.styles.len(),
            doc.lines.len(),
            doc.created.elapsed()
        );
        Ok(doc)
    }

    /// Read and parse a UTF-8 file, with or without a byte order mark
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Io`](crate::CoreError::Io) when the file cannot
    /// be read, otherwise the same errors as [`Document::parse`].
    pub fn open(path: impl AsRef<Path>, options: &DocumentOptions) -> Result<Self> {
        let path = path.as_ref();
        log::debug!("opening {}", path.display());
        let text = std::fs::read_to_string(path)?;
        Self::parse(&text, options)
    }

    fn record(&mut self, issue: ParseIssue) {
        issue.log();
        self.issues.push(issue);
    }

    fn missing_section(&mut self, kind: SectionType) {
        let header = kind.header().unwrap_or("[?]");
        self.record(ParseIssue::warning(
            IssueCategory::Structure,
            format!("there is no {header} section"),
            None,
        ));
    }

    /// Register a stand-in style when `line` names an undefined one
    fn link_style(&mut self, line: &Line) {
        if self.style(&line.style).is_some() {
            return;
        }
        self.record(ParseIssue::warning(
            IssueCategory::Event,
            format!(
                "line {} uses undefined style `{}`, assigning the default style",
                line.index, line.style
            ),
            Some(line.index),
        ));
        log::debug!("{}: {}", line.index, line.raw_text);

        let mut fallback = self
            .styles_map()
            .get("Default")
            .map_or_else(Style::default_style, |style| (*style).clone());
        fallback.name.clone_from(&line.style);
        self.fallback_styles.push(fallback);
    }

    #[must_use]
    pub const fn meta(&self) -> &Meta {
        &self.meta
    }

    pub fn meta_mut(&mut self) -> &mut Meta {
        &mut self.meta
    }

    /// Declared styles in file order
    #[must_use]
    pub fn styles(&self) -> &[Style] {
        &self.styles
    }

    pub fn styles_mut(&mut self) -> &mut Vec<Style> {
        &mut self.styles
    }

    #[must_use]
    pub const fn lines(&self) -> &PList<Line> {
        &self.lines
    }

    pub fn lines_mut(&mut self) -> &mut PList<Line> {
        &mut self.lines
    }

    #[must_use]
    pub const fn options(&self) -> &DocumentOptions {
        &self.options
    }

    /// Recoverable problems found while parsing
    #[must_use]
    pub fn issues(&self) -> &[ParseIssue] {
        &self.issues
    }

    /// Declared styles by name, in file order
    ///
    /// A name declared twice maps to its last definition.
    #[must_use]
    pub fn styles_map(&self) -> IndexMap<&str, &Style> {
        self.styles
            .iter()
            .map(|style| (style.name.as_str(), style))
            .collect()
    }

    /// Style named `name`, including stand-ins for undefined names
    #[must_use]
    pub fn style(&self, name: &str) -> Option<&Style> {
        find_style(&self.styles, &self.fallback_styles, name)
    }

    /// Style a line is rendered with
    #[must_use]
    pub fn line_style(&self, line: &Line) -> Option<&Style> {
        self.style(&line.style)
    }

    /// Drop declared styles no line uses
    pub fn clean_styles(&mut self) {
        let before = self.styles.len();
        let lines = &self.lines;
        self.styles
            .retain(|style| lines.iter().any(|line| line.style == style.name));
        log::debug!("removed {} unused styles", before - self.styles.len());
    }

    /// Resample every style to `target` and update the play resolution
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::MissingPlayResolution`](crate::CoreError::MissingPlayResolution)
    /// when `[Script Info]` has no play resolution or `target` has a zero
    /// axis. No style is modified in that case.
    pub fn resample_styles(&mut self, target: (i64, i64)) -> Result<()> {
        let source = self
            .meta
            .play_res()
            .ok_or(crate::CoreError::MissingPlayResolution)?;
        if source.0 == 0 || source.1 == 0 || target.0 == 0 || target.1 == 0 {
            return Err(crate::CoreError::MissingPlayResolution);
        }
        let meta = &self.meta;
        for style in self.styles.iter_mut().chain(self.fallback_styles.iter_mut()) {
            style.resample(ResampleSource::Meta(meta), target, false)?;
        }
        self.meta.script_info.set_play_res(target);
        Ok(())
    }

    /// Lay out every line and compute lead-in/lead-out
    ///
    /// Fonts are requested once per line style; the cache memoizes them
    /// across lines and documents.
    ///
    /// # Errors
    ///
    /// Propagates font engine failures.
    pub fn decompose<E: FontEngine>(&mut self, fonts: &mut FontCache<E>) -> Result<()> {
        let started = Instant::now();
        let play_res = self.meta.play_res();
        if play_res.is_none() {
            self.record(ParseIssue::info(
                IssueCategory::Structure,
                "no play resolution, units are measured but not positioned".to_string(),
                None,
            ));
        }

        for line in self.lines.iter_mut() {
            let Some(style) = find_style(&self.styles, &self.fallback_styles, &line.style) else {
                continue;
            };
            let font = fonts.get(style)?;
            LineLayout::new(style, &*font, play_res)
                .with_vertical_kanji(self.options.vertical_kanji)
                .apply(line);
        }
        self.compute_leads();

        let stats = fonts.stats();
        log::debug!(
            "decomposed {} lines in {:?} (font cache: {} hits, {} misses)",
            self.lines.len(),
            started.elapsed(),
            stats.hits,
            stats.misses
        );
        Ok(())
    }

    /// Gaps between consecutive lines of the same style
    fn compute_leads(&mut self) {
        let default_lead = self.options.boundary_lead();
        let mut by_style: IndexMap<&str, Vec<usize>> = IndexMap::new();
        for (index, line) in self.lines.iter().enumerate() {
            by_style.entry(line.style.as_str()).or_default().push(index);
        }

        let mut leads = vec![(default_lead, default_lead); self.lines.len()];
        for indices in by_style.values() {
            for (position, &current) in indices.iter().enumerate() {
                let line = &self.lines[current];
                if let Some(&prev) = position.checked_sub(1).and_then(|p| indices.get(p)) {
                    leads[current].0 = (line.start_time - self.lines[prev].end_time).as_secs();
                }
                if let Some(&next) = indices.get(position + 1) {
                    leads[current].1 = (self.lines[next].start_time - line.end_time).as_secs();
                }
            }
        }

        for (line, (leadin, leadout)) in self.lines.iter_mut().zip(leads) {
            line.leadin = Some(leadin);
            line.leadout = Some(leadout);
        }
    }
}

fn find_section<'s, 'a>(sections: &'s [Section<'a>], kind: SectionType) -> Option<&'s Section<'a>> {
    sections
        .iter()
        .find(|section| section.section_type() == kind)
}

fn find_style<'a>(styles: &'a [Style], fallbacks: &'a [Style], name: &str) -> Option<&'a Style> {
    styles
        .iter()
        .rev()
        .find(|style| style.name == name)
        .or_else(|| fallbacks.iter().find(|style| style.name == name))
}
