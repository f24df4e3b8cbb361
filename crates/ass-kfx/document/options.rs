//! Document and save configuration

use std::path::PathBuf;

use crate::time::FrameRate;

/// Configuration for building a [`Document`](super::Document)
///
/// # Examples
///
/// ```rust
/// use ass_kfx::document::DocumentOptions;
/// use ass_kfx::time::FrameRate;
///
/// let options = DocumentOptions::default()
///     .with_fps(FrameRate::Float(25.0))
///     .with_fix_timestamps(false)
///     .with_output("out.ass");
/// assert!(!options.fix_timestamps);
/// assert!(options.output.is_some());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentOptions {
    /// Frame rate of the video the script is timed against
    pub fps: FrameRate,
    /// Snap event times to the frames Aegisub displays them on
    pub fix_timestamps: bool,
    /// Stack text of middle-aligned lines vertically
    pub vertical_kanji: bool,
    /// Lead-in/out in seconds for the first/last line of a style
    /// (one frame when unset)
    pub boundary_lead: Option<f64>,
    /// Where [`Document::save`](super::Document::save) writes
    pub output: Option<PathBuf>,
}

impl Default for DocumentOptions {
    fn default() -> Self {
        Self {
            fps: FrameRate::NTSC_FILM,
            fix_timestamps: true,
            vertical_kanji: false,
            boundary_lead: None,
            output: None,
        }
    }
}

impl DocumentOptions {
    /// Set the frame rate
    #[must_use]
    pub const fn with_fps(mut self, fps: FrameRate) -> Self {
        self.fps = fps;
        self
    }

    /// Enable or disable frame snapping of event times
    #[must_use]
    pub const fn with_fix_timestamps(mut self, enabled: bool) -> Self {
        self.fix_timestamps = enabled;
        self
    }

    /// Enable or disable vertical layout for alignments 4-6
    #[must_use]
    pub const fn with_vertical_kanji(mut self, enabled: bool) -> Self {
        self.vertical_kanji = enabled;
        self
    }

    /// Override the lead used at style sequence boundaries
    #[must_use]
    pub const fn with_boundary_lead(mut self, seconds: f64) -> Self {
        self.boundary_lead = Some(seconds);
        self
    }

    /// Set the output path
    #[must_use]
    pub fn with_output(mut self, path: impl Into<PathBuf>) -> Self {
        self.output = Some(path.into());
        self
    }

    /// Lead-in/out used where a style's sequence starts or ends
    #[must_use]
    pub fn boundary_lead(&self) -> f64 {
        self.boundary_lead
            .unwrap_or_else(|| self.fps.frame_duration())
    }
}

/// Configuration for serializing a document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveOptions {
    /// Re-emit the source events as comments before the generated ones
    pub comment_original: bool,
    /// Frame snapping for the written lines, the document's when unset
    pub fix_timestamps: Option<bool>,
    /// Keep `[Aegisub Extradata]` and unrecognized sections
    pub keep_extradata: bool,
    /// Comment lines written at the top of `[Script Info]`
    pub header_comment: Vec<String>,
}

impl Default for SaveOptions {
    fn default() -> Self {
        Self {
            comment_original: true,
            fix_timestamps: None,
            keep_extradata: true,
            header_comment: vec![format!(
                "; Script generated by ass-kfx {}",
                env!("CARGO_PKG_VERSION")
            )],
        }
    }
}

impl SaveOptions {
    #[must_use]
    pub const fn with_comment_original(mut self, enabled: bool) -> Self {
        self.comment_original = enabled;
        self
    }

    #[must_use]
    pub const fn with_fix_timestamps(mut self, enabled: bool) -> Self {
        self.fix_timestamps = Some(enabled);
        self
    }

    #[must_use]
    pub const fn with_keep_extradata(mut self, enabled: bool) -> Self {
        self.keep_extradata = enabled;
        self
    }

    /// Replace the header comment lines
    #[must_use]
    pub fn with_header_comment<I, S>(mut self, lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.header_comment = lines.into_iter().map(Into::into).collect();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_defaults() {
        let options = DocumentOptions::default();
        assert_eq!(options.fps, FrameRate::NTSC_FILM);
        assert!(options.fix_timestamps);
        assert!(!options.vertical_kanji);
        assert!(options.output.is_none());
        assert!((options.boundary_lead() - 1001.0 / 24000.0).abs() < 1e-12);
        assert_eq!(options.with_boundary_lead(1.5).boundary_lead(), 1.5);
    }

    #[test]
    fn save_defaults_and_builders() {
        let options = SaveOptions::default();
        assert!(options.comment_original);
        assert!(options.keep_extradata);
        assert_eq!(options.fix_timestamps, None);
        assert!(options.header_comment[0].starts_with("; Script generated by ass-kfx"));

        let options = options
            .with_comment_original(false)
            .with_fix_timestamps(false)
            .with_header_comment(["; hand made"]);
        assert!(!options.comment_original);
        assert_eq!(options.fix_timestamps, Some(false));
        assert_eq!(options.header_comment, vec!["; hand made".to_string()]);
    }
}
