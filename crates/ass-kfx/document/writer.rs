//! Serialization of a [`Document`] back to ASS text
//!
//! Output always contains the four standard sections in order. Lines are
//! collected with [`Document::add_line`] and written after the (optionally
//! commented) source events.

use std::fs::File;
use std::io::{BufWriter, Write};

use super::{Document, SaveOptions};
use crate::parser::ast::{Line, EVENTS_FORMAT, STYLE_FORMAT};
use crate::utils::{CoreError, Result};

impl Document {
    /// Render `line` and append it to the output buffer
    ///
    /// `fix_timestamps` defaults to the document's setting.
    pub fn add_line(&mut self, line: &Line, fix_timestamps: Option<bool>) {
        let fix = fix_timestamps.unwrap_or(self.options.fix_timestamps);
        self.output.push(line.to_ass_string(self.meta.fps, fix));
    }

    /// Lines added with [`Document::add_line`]
    #[must_use]
    pub fn output_lines(&self) -> &[String] {
        &self.output
    }

    /// Write the document, buffered lines and `lines` to `sink`
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Io`] when the sink fails.
    pub fn write_to<W: Write>(&self, sink: &mut W, lines: &[Line], options: &SaveOptions) -> Result<()> {
        sink.write_all(self.to_ass_string(lines, options).as_bytes())?;
        Ok(())
    }

    /// Render the document, buffered lines and `lines` as ASS text
    #[must_use]
    pub fn to_ass_string(&self, lines: &[Line], options: &SaveOptions) -> String {
        let fix = options.fix_timestamps.unwrap_or(self.options.fix_timestamps);
        let comment: Vec<&str> = options.header_comment.iter().map(String::as_str).collect();
        let mut out = String::new();

        out.push_str("[Script Info]\n");
        out.push_str(&self.meta.script_info_text(&comment));
        out.push('\n');

        out.push_str("[Aegisub Project Garbage]\n");
        out.push_str(&self.meta.project_garbage_text());
        out.push('\n');

        out.push_str("[V4+ Styles]\n");
        out.push_str(STYLE_FORMAT);
        out.push('\n');
        for style in &self.styles {
            out.push_str(&style.to_ass_string());
            out.push('\n');
        }
        out.push('\n');

        out.push_str("[Events]\n");
        out.push_str(EVENTS_FORMAT);
        out.push('\n');
        if options.comment_original {
            for raw in &self.source_events {
                out.push_str(&commented(raw));
                out.push('\n');
            }
        }
        for rendered in &self.output {
            out.push_str(rendered);
            out.push('\n');
        }
        for line in lines {
            out.push_str(&line.to_ass_string(self.meta.fps, fix));
            out.push('\n');
        }

        if options.keep_extradata {
            for (header, body) in &self.passthrough {
                out.push('\n');
                out.push_str(header);
                out.push('\n');
                if !body.is_empty() {
                    out.push_str(body);
                    out.push('\n');
                }
            }
        }
        out
    }

    /// Write to the configured output path with a UTF-8 byte order mark
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::MissingOutput`] when no output path is set and
    /// [`CoreError::Io`] when the file cannot be written.
    pub fn save(&self, lines: &[Line], options: &SaveOptions) -> Result<()> {
        let path = self.options.output.as_ref().ok_or(CoreError::MissingOutput)?;
        let mut file = BufWriter::new(File::create(path)?);
        file.write_all("\u{FEFF}".as_bytes())?;
        self.write_to(&mut file, lines, options)?;
        file.flush()?;

        log::info!("produced lines: {}", self.output.len() + lines.len());
        log::info!(
            "process duration (in seconds): {:.3}",
            self.created.elapsed().as_secs_f64()
        );
        Ok(())
    }
}

/// Turn a source event into an inert comment
fn commented(raw: &str) -> String {
    raw.strip_prefix("Dialogue:")
        .map_or_else(|| raw.to_string(), |rest| format!("Comment:{rest}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::DocumentOptions;
    use crate::time::FrameRate;
    use pretty_assertions::assert_eq;

    const SOURCE: &str = "[Script Info]
Title: Demo
ScriptType: v4.00+
PlayResX: 640
PlayResY: 360

[V4+ Styles]
Format: Name, Fontname, Fontsize, PrimaryColour, SecondaryColour, OutlineColour, BackColour, Bold, Italic, Underline, StrikeOut, ScaleX, ScaleY, Spacing, Angle, BorderStyle, Outline, Shadow, Alignment, MarginL, MarginR, MarginV, Encoding
Style: Default,Arial,20,&H00FFFFFF,&H000000FF,&H00000000,&H00000000,0,0,0,0,100,100,0,0,1,2,2,2,10,10,10,1

[Events]
Format: Layer, Start, End, Style, Name, MarginL, MarginR, MarginV, Effect, Text
Dialogue: 0,0:00:01.00,0:00:02.00,Default,,0,0,0,,{\\k100}hi
Comment: 0,0:00:02.00,0:00:03.00,Default,,0,0,0,,note

[Aegisub Extradata]
Data: 1,key,value
";

    fn document() -> Document {
        Document::parse(
            SOURCE,
            &DocumentOptions::default().with_fix_timestamps(false),
        )
        .expect("valid document")
    }

    #[test]
    fn writes_all_sections() {
        let mut doc = document();
        let mut line = doc.lines()[0].clone();
        line.set_text("generated");
        doc.add_line(&line, None);

        let options = SaveOptions::default().with_header_comment(["; test header"]);
        let expected = "[Script Info]
; test header
Title: Demo
ScriptType: v4.00+
PlayResX: 640
PlayResY: 360

[Aegisub Project Garbage]

[V4+ Styles]
Format: Name, Fontname, Fontsize, PrimaryColour, SecondaryColour, OutlineColour, BackColour, Bold, Italic, Underline, StrikeOut, ScaleX, ScaleY, Spacing, Angle, BorderStyle, Outline, Shadow, Alignment, MarginL, MarginR, MarginV, Encoding
Style: Default,Arial,20,&H00FFFFFF,&H000000FF,&H00000000,&H00000000,0,0,0,0,100,100,0,0,1,2,2,2,10,10,10,1

[Events]
Format: Layer, Start, End, Style, Name, MarginL, MarginR, MarginV, Effect, Text
Comment: 0,0:00:01.00,0:00:02.00,Default,,0,0,0,,{\\k100}hi
Comment: 0,0:00:02.00,0:00:03.00,Default,,0,0,0,,note
Dialogue: 0,0:00:01.00,0:00:02.00,Default,,0,0,0,,generated

[Aegisub Extradata]
Data: 1,key,value
";
        assert_eq!(doc.to_ass_string(&[], &options), expected);
    }

    #[test]
    fn save_options_control_output() {
        let doc = document();
        let extra = Line::default_line("Default");
        let options = SaveOptions::default()
            .with_comment_original(false)
            .with_keep_extradata(false);
        let text = doc.to_ass_string(&[extra], &options);
        assert!(!text.contains("{\\k100}hi"));
        assert!(!text.contains("[Aegisub Extradata]"));
        assert!(text.ends_with("Dialogue: 0,0:00:00.00,0:00:05.00,Default,,0,0,0,,\n"));
    }

    #[test]
    fn added_lines_use_requested_timestamps() {
        let mut doc = document();
        let line = doc.lines()[0].clone();
        doc.add_line(&line, Some(true));
        assert!(doc.output_lines()[0].starts_with("Dialogue: 0,0:00:00.98,0:00:01.98,"));

        let text = doc.to_ass_string(&[line], &SaveOptions::default().with_fix_timestamps(true));
        assert_eq!(
            text.matches("Dialogue: 0,0:00:00.98,0:00:01.98,").count(),
            2
        );
    }

    #[test]
    fn saving_requires_an_output() {
        let doc = Document::untitled(FrameRate::NTSC_FILM);
        assert_eq!(
            doc.save(&[], &SaveOptions::default()),
            Err(CoreError::MissingOutput)
        );
    }

    #[test]
    fn write_to_any_sink() {
        let doc = document();
        let mut sink = Vec::new();
        doc.write_to(&mut sink, &[], &SaveOptions::default())
            .expect("writing to memory cannot fail");
        let text = String::from_utf8(sink).expect("utf-8 output");
        assert!(text.starts_with("[Script Info]\n; Script generated by ass-kfx"));
    }
}
