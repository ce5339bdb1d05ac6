/// Script loading and sprite table integration tests.

use dialogue_playback::core::controller::PlaybackController;
use dialogue_playback::core::frame::Frame;
use dialogue_playback::core::sprite::SpriteTable;
use dialogue_playback::schema::line::Emotion;
use dialogue_playback::schema::script::{Script, ScriptError};
use std::path::Path;
use std::time::Duration;

#[test]
fn generator_json_fixture_loads() {
    let script = Script::load(Path::new("tests/fixtures/paper_explainer.json")).unwrap();
    assert!(script.title.starts_with("Attention Is All You Need"));
    assert_eq!(script.len(), 4);
    assert_eq!(script.lines[0].emotion, Emotion::Angry);
    assert!(script.lines[1].note.is_some());
    assert!(script.lines[2].note.is_none());
    // "Smug" is outside the set.
    assert_eq!(script.lines[3].emotion, Emotion::Normal);
    assert_eq!(script.lines[3].speaker, "Murasame");
}

#[test]
fn ron_fixture_loads() {
    let script = Script::load(Path::new("tests/fixtures/three_lines.ron")).unwrap();
    let texts: Vec<&str> = script.lines.iter().map(|l| l.text.as_str()).collect();
    assert_eq!(texts, vec!["Hello", "...", "Bye"]);
}

#[test]
fn empty_text_is_rejected_on_load() {
    let err = Script::load(Path::new("tests/fixtures/broken_line.ron")).unwrap_err();
    assert!(matches!(err, ScriptError::EmptyText { index: 1 }));
}

#[test]
fn missing_file_is_io_error() {
    let err = Script::load(Path::new("tests/fixtures/does_not_exist.ron")).unwrap_err();
    assert!(matches!(err, ScriptError::Io(_)));
}

#[test]
fn sprite_fixture_drives_frames() {
    let sprites = SpriteTable::load_from_ron(Path::new("tests/fixtures/sprites.ron")).unwrap();
    let script = Script::load(Path::new("tests/fixtures/paper_explainer.json")).unwrap();
    let mut pc = PlaybackController::start(script, Duration::ZERO);

    let Frame::Dialogue(frame) = pc.frame(&sprites) else {
        panic!("expected dialogue frame");
    };
    assert_eq!(frame.sprite.as_deref(), Some("assets/murasame_angry.png"));
    assert_eq!(frame.total, 4);
    assert_eq!(frame.text, "");

    // Proud has no dedicated sprite and falls back to normal.
    pc.advance(Duration::from_millis(1));
    pc.advance(Duration::from_millis(2));
    let Frame::Dialogue(frame) = pc.frame(&sprites) else {
        panic!("expected dialogue frame");
    };
    assert_eq!(frame.emotion, Emotion::Proud);
    assert_eq!(frame.sprite.as_deref(), Some("assets/murasame_normal.png"));
    assert!(frame.note.is_some());
    assert!(frame.show_cursor);
}
