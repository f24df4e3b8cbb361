//! Save and reopen documents through the file system

use ass_kfx::{
    parser::ast::STYLE_FORMAT, CoreError, Document, DocumentOptions, FrameRate, Line,
    SaveOptions, TextUnit,
};
use pretty_assertions::assert_eq;
use std::path::PathBuf;

const SOURCE: &str = "\u{FEFF}[Script Info]
; Script generated by Aegisub
Title: Round Trip
ScriptType: v4.00+
WrapStyle: 0
ScaledBorderAndShadow: yes
YCbCr Matrix: TV.709
PlayResX: 1280
PlayResY: 720

[Aegisub Project Garbage]
Audio File: song.mkv
Video File: song.mkv
Video AR Value: 1.777778
Active Line: 2

[V4+ Styles]
Format: Name, Fontname, Fontsize, PrimaryColour, SecondaryColour, OutlineColour, BackColour, Bold, Italic, Underline, StrikeOut, ScaleX, ScaleY, Spacing, Angle, BorderStyle, Outline, Shadow, Alignment, MarginL, MarginR, MarginV, Encoding
Style: Romaji,Verdana,36,&H00FFFFFF,&H000000FF,&H00000000,&H80000000,-1,0,0,0,100,100,1.5,0,1,2,0,8,20,20,15,1
Style: Unused,Arial,20,&H00FFFFFF,&H000000FF,&H00000000,&H00000000,0,0,0,0,100,100,0,0,1,2,2,2,10,10,10,1

[Events]
Format: Layer, Start, End, Style, Name, MarginL, MarginR, MarginV, Effect, Text
Comment: 0,0:00:00.00,0:00:05.00,Romaji,,0,0,0,template syl,{\\pos($x,$y)}
Dialogue: 0,0:00:10.00,0:00:12.50,Romaji,Singer,0,0,0,karaoke,{\\k25}so{\\k30}ra {\\k45}ni
Dialogue: 0,0:00:13.00,0:00:14.00,Romaji,,0,0,0,,plain text

[Aegisub Extradata]
Data: 1,fx,e{payload}

[Fonts]
fontname: verdana.ttf
";

/// Unique path under the system temp directory
fn temp_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("ass-kfx-{}-{name}.ass", std::process::id()))
}

#[test]
fn parse_reads_every_section() {
    let doc = Document::parse(SOURCE, &DocumentOptions::default()).expect("valid script");

    let info = &doc.meta().script_info;
    assert_eq!(info.title.as_deref(), Some("Round Trip"));
    assert_eq!(info.ycbcr_matrix.as_deref(), Some("TV.709"));
    assert_eq!(doc.meta().play_res(), Some((1280, 720)));
    assert_eq!(
        doc.meta().project_garbage.file(),
        (Some("song.mkv"), Some("song.mkv"))
    );
    assert_eq!(doc.meta().project_garbage.active_line, Some(2));

    assert_eq!(doc.styles().len(), 2);
    assert_eq!(doc.lines().len(), 3);
    assert!(doc.lines()[0].comment);
    assert_eq!(doc.lines()[1].actor, "Singer");
    assert_eq!(doc.lines()[1].effect, "karaoke");
    assert_eq!(doc.lines()[1].text, "sora ni");
    assert!(doc.issues().is_empty());
}

#[test]
fn save_and_reopen_keeps_the_document() {
    let path = temp_path("reopen");
    let options = DocumentOptions::default()
        .with_fix_timestamps(false)
        .with_output(&path);
    let mut doc = Document::parse(SOURCE, &options).expect("valid script");
    doc.clean_styles();

    let mut generated = doc.lines()[2].clone();
    generated.layer = 3;
    generated.shift_time(1.0);
    generated.set_text(r"{\fad(100,100)}plain text");
    doc.save(&[generated], &SaveOptions::default())
        .expect("temp dir is writable");

    let bytes = std::fs::read(&path).expect("file was written");
    assert!(bytes.starts_with("\u{FEFF}".as_bytes()));

    let reopened = Document::open(&path, &options).expect("written script parses");
    let _ = std::fs::remove_file(&path);

    assert_eq!(reopened.meta(), doc.meta());
    let names: Vec<&str> = reopened.styles().iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["Romaji"]);
    assert_eq!(reopened.styles()[0], doc.styles()[0]);

    // Source events come back as comments followed by the generated line.
    assert_eq!(reopened.lines().len(), 4);
    assert!(reopened.lines()[..3].iter().all(|line| line.comment));
    let last = &reopened.lines()[3];
    assert!(!last.comment);
    assert_eq!(last.layer, 3);
    assert_eq!(last.start_time.as_secs(), 14.0);
    assert_eq!(last.end_time.as_secs(), 15.0);
    assert_eq!(last.raw_text, r"{\fad(100,100)}plain text");
}

#[test]
fn unknown_sections_pass_through() {
    let doc = Document::parse(SOURCE, &DocumentOptions::default()).expect("valid script");
    let written = doc.to_ass_string(&[], &SaveOptions::default());
    assert!(written.ends_with(
        "\n[Aegisub Extradata]\nData: 1,fx,e{payload}\n\n[Fonts]\nfontname: verdana.ttf\n"
    ));

    let dropped = doc.to_ass_string(&[], &SaveOptions::default().with_keep_extradata(false));
    assert!(!dropped.contains("[Fonts]"));
    assert!(!dropped.contains("Data: 1"));
}

#[test]
fn resampled_document_writes_new_resolution() {
    let mut doc = Document::parse(SOURCE, &DocumentOptions::default()).expect("valid script");
    doc.resample_styles((1920, 1080)).expect("script has a resolution");

    let romaji = doc.style("Romaji").expect("declared style");
    assert_eq!(romaji.fontsize, 54.0);
    assert_eq!(romaji.margin_l, 30);
    assert_eq!(romaji.margin_v, 23);
    assert_eq!(romaji.outline, 3.0);

    let written = doc.to_ass_string(&[], &SaveOptions::default());
    assert!(written.contains("PlayResX: 1920\nPlayResY: 1080\n"));
    assert!(written.contains("Style: Romaji,Verdana,54,"));
}

#[test]
fn untitled_document_is_writable_from_scratch() {
    let mut doc = Document::untitled(FrameRate::NTSC_FILM);
    let mut line = Line::default_line("Default");
    line.set_text("hello");
    doc.add_line(&line, Some(false));

    let written = doc.to_ass_string(&[], &SaveOptions::default().with_header_comment(Vec::<String>::new()));
    assert!(written.starts_with("[Script Info]\nTitle: Default Aegisub file\n"));
    assert!(written.contains(STYLE_FORMAT));
    assert!(written.ends_with("Dialogue: 0,0:00:00.00,0:00:05.00,Default,,0,0,0,,hello\n"));
}

#[test]
fn opening_a_missing_file_is_an_io_error() {
    let err = Document::open(temp_path("missing"), &DocumentOptions::default())
        .expect_err("file does not exist");
    assert!(matches!(err, CoreError::Io(_)));
}
