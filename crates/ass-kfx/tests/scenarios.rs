//! End-to-end behavior of parsing, decomposition and serialization
//!
//! Each test drives the public API the way an effect script would: parse
//! a document, decompose it with the monospace engine, then inspect or
//! write the result.

use ass_kfx::{
    font::monospace::MonospaceEngine,
    layout::positioning::Alignment,
    parser::{ast::STYLE_FORMAT, IssueCategory, IssueSeverity},
    CoreError, Document, DocumentOptions, FontCache, FrameRate, Line, ParseError, SaveOptions,
    Style, TextUnit,
};
use pretty_assertions::assert_eq;

const DEFAULT_STYLE: &str = "Style: Default,Arial,20,&H00FFFFFF,&H000000FF,&H00000000,&H00000000,0,0,0,0,100,100,0,0,1,2,2,2,10,10,10,1";

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn script(styles: &[&str], events: &[&str]) -> String {
    let mut text = String::from("[Script Info]\nTitle: Scenario\nScriptType: v4.00+\nPlayResX: 1920\nPlayResY: 1080\n\n");
    text.push_str("[V4+ Styles]\n");
    text.push_str(STYLE_FORMAT);
    text.push('\n');
    for style in styles {
        text.push_str(style);
        text.push('\n');
    }
    text.push_str("\n[Events]\nFormat: Layer, Start, End, Style, Name, MarginL, MarginR, MarginV, Effect, Text\n");
    for event in events {
        text.push_str(event);
        text.push('\n');
    }
    text
}

fn decomposed(text: &str, options: &DocumentOptions) -> Document {
    let mut doc = Document::parse(text, options).expect("script should parse");
    doc.decompose(&mut FontCache::new(MonospaceEngine))
        .expect("monospace engine never fails");
    doc
}

#[test]
fn karaoke_line_decomposes_into_syllables() {
    init_logging();
    let text = script(
        &[DEFAULT_STYLE],
        &[r"Dialogue: 0,0:00:01.00,0:00:03.00,Default,,0,0,0,,{\k50}Hel{\k50}lo"],
    );
    let options = DocumentOptions::default()
        .with_fps(FrameRate::rational(24000, 1001))
        .with_fix_timestamps(false);
    let doc = decomposed(&text, &options);

    let line = &doc.lines()[0];
    assert_eq!(line.duration, 2.0);
    assert_eq!(line.text, "Hello");
    let syls: Vec<(&str, f64)> = line
        .syls
        .iter()
        .map(|syl| (syl.text.as_str(), syl.duration))
        .collect();
    assert_eq!(syls, vec![("Hel", 0.5), ("lo", 0.5)]);
    assert_eq!(line.syls[1].start_time.as_secs(), 0.5);
    assert_eq!(line.syls[1].end_time.as_secs(), 1.0);
    assert_eq!(line.words.len(), 1);
    assert_eq!(line.chars.len(), 5);
}

#[test]
fn syllable_durations_add_up_to_the_line() {
    let text = script(
        &[DEFAULT_STYLE],
        &[r"Dialogue: 0,0:00:01.00,0:00:03.00,Default,,0,0,0,,{\k100}Hel{\Kf60}lo {\ko40}you"],
    );
    let fps = FrameRate::NTSC_FILM;

    for fix in [false, true] {
        let options = DocumentOptions::default()
            .with_fps(fps)
            .with_fix_timestamps(fix);
        let doc = decomposed(&text, &options);
        let line = &doc.lines()[0];
        assert_eq!(line.syls.len(), 3);

        let total: f64 = line.syls.iter().map(|syl| syl.duration).sum();
        assert!((total - 2.0).abs() < 1e-9);
        for pair in line.syls.windows(2) {
            assert_eq!(pair[0].end_time, pair[1].start_time);
        }
        let last = &line.syls[line.syls.len() - 1];
        assert!((last.end_time.as_secs() - total).abs() < 1e-9);

        // Snapping moves each event edge onto a frame, so the line may
        // drift from the karaoke total by less than one frame.
        let tolerance = if fix { fps.frame_duration() } else { 1e-9 };
        assert!(
            (line.duration - total).abs() < tolerance,
            "fix_timestamps={fix}: line {} vs syllables {total}",
            line.duration
        );
    }
}

#[test]
fn style_booleans_keep_their_literal_value() {
    let off = Style::parse(DEFAULT_STYLE, 0).expect("valid style");
    assert!(!off.bold.is_on());
    assert_eq!(off.to_ass_string(), DEFAULT_STYLE);

    let on_line = DEFAULT_STYLE.replace(",0,0,0,0,100,", ",-1,0,0,0,100,");
    let on = Style::parse(&on_line, 0).expect("valid style");
    assert!(on.bold.is_on());
    assert_eq!(on.to_ass_string(), on_line);

    let mut set = off.clone();
    set.set_bold(true);
    assert_eq!(set.bold.0, -1);
    assert_eq!(set.to_ass_string(), on_line);
    set.set_bold(false);
    assert_eq!(set, off);
}

#[test]
fn middle_aligned_line_is_centered_on_the_play_area() {
    let style = DEFAULT_STYLE.replace(",2,10,10,10,1", ",5,0,0,0,1");
    // Ten glyphs at 10px each make a 100px line.
    let text = script(
        &[&style],
        &["Dialogue: 0,0:00:00.00,0:00:02.00,Default,,0,0,0,,abcdefghij"],
    );
    let doc = decomposed(&text, &DocumentOptions::default());

    let extent = doc.lines()[0].extent;
    assert_eq!(extent.width, 100.0);
    assert_eq!(extent.left, 960.0 - 50.0);
    assert_eq!(extent.x, 960.0);
    assert_eq!(extent.center, 960.0);
    assert_eq!(extent.y, 540.0);
}

#[test]
fn leads_follow_style_sequences() {
    let sign = DEFAULT_STYLE.replace("Default", "Sign");
    let text = script(
        &[DEFAULT_STYLE, &sign],
        &[
            "Dialogue: 0,0:00:01.00,0:00:02.00,Default,,0,0,0,,one",
            "Dialogue: 0,0:00:01.50,0:00:04.00,Sign,,0,0,0,,sign",
            "Dialogue: 0,0:00:02.50,0:00:03.00,Default,,0,0,0,,two",
        ],
    );
    let options = DocumentOptions::default()
        .with_fix_timestamps(false)
        .with_boundary_lead(0.25);
    let doc = decomposed(&text, &options);

    let leads: Vec<(Option<f64>, Option<f64>)> = doc
        .lines()
        .iter()
        .map(|line| (line.leadin, line.leadout))
        .collect();
    assert_eq!(
        leads,
        vec![
            (Some(0.25), Some(0.5)),
            (Some(0.25), Some(0.25)),
            (Some(0.5), Some(0.25)),
        ]
    );
}

#[test]
fn undefined_style_falls_back_to_default() {
    let text = script(
        &[DEFAULT_STYLE],
        &["Dialogue: 0,0:00:00.00,0:00:01.00,Missing,,0,0,0,,text"],
    );
    let doc = decomposed(&text, &DocumentOptions::default());

    let issue = doc
        .issues()
        .iter()
        .find(|issue| issue.category == IssueCategory::Event)
        .expect("fallback is reported");
    assert_eq!(issue.severity, IssueSeverity::Warning);

    let fallback = doc.line_style(&doc.lines()[0]).expect("fallback registered");
    assert_eq!(fallback.name, "Missing");
    assert_eq!(fallback.fontsize, 20.0);
    assert!(doc.lines()[0].extent.width > 0.0);

    let written = doc.to_ass_string(&[], &SaveOptions::default());
    assert!(!written.contains("Style: Missing"));
}

#[test]
fn malformed_event_is_fatal() {
    let text = script(&[DEFAULT_STYLE], &["Dialogue: 0,0:00:00.00,Default,text"]);
    let err = Document::parse(&text, &DocumentOptions::default()).expect_err("too few fields");
    assert!(matches!(
        err,
        CoreError::Parse(ParseError::MalformedLine { index: 0, .. })
    ));
}

#[test]
fn vertical_kanji_stacks_characters() {
    let style = DEFAULT_STYLE.replace(",2,10,10,10,1", ",5,10,10,10,1");
    let text = script(
        &[&style],
        &["Dialogue: 0,0:00:00.00,0:00:02.00,Default,,0,0,0,,abc"],
    );
    let doc = decomposed(&text, &DocumentOptions::default().with_vertical_kanji(true));

    let line = &doc.lines()[0];
    let tops: Vec<f64> = line.chars.iter().map(|c| c.extent.top).collect();
    assert_eq!(tops, vec![510.0, 530.0, 550.0]);
    assert!(line.chars.iter().all(|c| c.extent.x == 960.0));
    assert_eq!(line.extent.height, 60.0);
}

#[test]
fn generated_lines_are_written_after_commented_sources() {
    let text = script(
        &[DEFAULT_STYLE],
        &[r"Dialogue: 0,0:00:01.00,0:00:03.00,Default,,0,0,0,,{\k50}Hel{\k50}lo"],
    );
    let mut doc = decomposed(&text, &DocumentOptions::default().with_fix_timestamps(false));

    let line = doc.lines()[0].clone();
    let mut generated: Vec<Line> = Vec::new();
    for syl in line.syls.iter() {
        let mut fx = line.clone();
        fx.layer = 1;
        fx.set_times(line.start_time + syl.start_time, line.start_time + syl.end_time);
        fx.set_text(format!(r"{{\an5\pos({},{})}}{}", syl.extent.center, syl.extent.middle, syl.text));
        generated.push(fx);
    }
    doc.add_line(&generated[0], None);

    let written = doc.to_ass_string(&generated[1..], &SaveOptions::default());
    let events: Vec<&str> = written
        .lines()
        .skip_while(|l| *l != "[Events]")
        .skip(2)
        .collect();
    assert_eq!(
        events,
        vec![
            r"Comment: 0,0:00:01.00,0:00:03.00,Default,,0,0,0,,{\k50}Hel{\k50}lo",
            r"Dialogue: 1,0:00:01.00,0:00:01.50,Default,,0,0,0,,{\an5\pos(950,1060)}Hel",
            r"Dialogue: 1,0:00:01.50,0:00:02.00,Default,,0,0,0,,{\an5\pos(975,1060)}lo",
        ]
    );
}

#[test]
fn alignment_helpers_match_numpad_layout() {
    let mut style = Style::default();
    style.alignment = Alignment::new(9).expect("valid alignment");
    assert!(style.an_is_right() && style.an_is_top());
    style.alignment = Alignment::new(4).expect("valid alignment");
    assert!(style.an_is_left() && style.an_is_middle());
}
