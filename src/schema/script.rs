/// Scripts: the immutable line sequence a play-through runs over.
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

use super::line::{DialogueLine, Emotion};

pub const FALLBACK_TITLE: &str = "解析失败";
pub const FALLBACK_SPEAKER: &str = "丛雨";
pub const FALLBACK_TEXT: &str =
    "呜... 主殿，这篇论文的魔力太强了，吾辈... 吾辈看不懂... (API Error)";

#[derive(Debug, Error)]
pub enum ScriptError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("RON deserialization error: {0}")]
    Ron(#[from] ron::error::SpannedError),
    #[error("JSON deserialization error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("line {index} has empty text")]
    EmptyText { index: usize },
}

/// On-disk encodings a script can arrive in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScriptFormat {
    /// `(title: "...", lines: [...])`
    Ron,
    /// The generator's response shape: `{"title": "...", "script": [...]}`
    Json,
}

impl ScriptFormat {
    /// Picks a format from the file extension; anything but `.json` is RON.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|s| s.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Self::Json,
            _ => Self::Ron,
        }
    }
}

/// The generator's output as it appears on the wire.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratorResponse {
    pub title: String,
    #[serde(default)]
    pub script: Vec<DialogueLine>,
}

/// A title plus an ordered sequence of lines. Possibly empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Script {
    pub title: String,
    #[serde(default)]
    pub lines: Vec<DialogueLine>,
}

impl From<GeneratorResponse> for Script {
    fn from(response: GeneratorResponse) -> Self {
        Self {
            title: response.title,
            lines: response.script,
        }
    }
}

impl Script {
    pub fn new(title: impl Into<String>, lines: Vec<DialogueLine>) -> Self {
        Self {
            title: title.into(),
            lines,
        }
    }

    /// The pre-authored script substituted when generation fails.
    pub fn fallback() -> Self {
        Self::new(
            FALLBACK_TITLE,
            vec![DialogueLine::new(
                FALLBACK_SPEAKER,
                FALLBACK_TEXT,
                Emotion::Shy,
            )],
        )
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&DialogueLine> {
        self.lines.get(index)
    }

    /// Index of the final line, `None` for an empty script.
    pub fn last_index(&self) -> Option<usize> {
        self.lines.len().checked_sub(1)
    }

    /// Rejects lines whose text is empty.
    pub fn validate(&self) -> Result<(), ScriptError> {
        match self.lines.iter().position(|line| line.text.is_empty()) {
            Some(index) => Err(ScriptError::EmptyText { index }),
            None => Ok(()),
        }
    }

    /// Parse a RON script without validating it.
    pub fn parse_ron(input: &str) -> Result<Self, ScriptError> {
        Ok(ron::from_str(input)?)
    }

    /// Parse a generator JSON response without validating it.
    pub fn parse_json(input: &str) -> Result<Self, ScriptError> {
        let response: GeneratorResponse = serde_json::from_str(input)?;
        Ok(response.into())
    }

    pub fn parse(input: &str, format: ScriptFormat) -> Result<Self, ScriptError> {
        match format {
            ScriptFormat::Ron => Self::parse_ron(input),
            ScriptFormat::Json => Self::parse_json(input),
        }
    }

    /// Load and validate a script file, picking the format by extension.
    pub fn load(path: &Path) -> Result<Self, ScriptError> {
        let contents = std::fs::read_to_string(path)?;
        let script = Self::parse(&contents, ScriptFormat::from_path(path))?;
        script.validate()?;
        Ok(script)
    }

    pub fn to_json(&self) -> Result<String, ScriptError> {
        let response = GeneratorResponse {
            title: self.title.clone(),
            script: self.lines.clone(),
        };
        Ok(serde_json::to_string(&response)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_RON: &str = r#"(
        title: "Attention Is All You Need",
        lines: [
            (speaker: "丛雨", text: "Hello", emotion: "happy"),
            (speaker: "丛雨", text: "...", emotion: "shy", note: Some("silence")),
            (speaker: "丛雨", text: "Bye"),
        ],
    )"#;

    #[test]
    fn parse_ron_script() {
        let script = Script::parse_ron(SAMPLE_RON).unwrap();
        assert_eq!(script.title, "Attention Is All You Need");
        assert_eq!(script.len(), 3);
        assert_eq!(script.lines[0].emotion, Emotion::Happy);
        assert_eq!(script.lines[1].note.as_deref(), Some("silence"));
        assert_eq!(script.lines[2].emotion, Emotion::Normal);
        assert_eq!(script.last_index(), Some(2));
    }

    #[test]
    fn parse_generator_json() {
        let json = r#"{
            "title": "Transformers",
            "script": [
                {"speaker": "Murasame", "text": "Hmph.", "emotion": "PROUD", "note": null},
                {"speaker": "Murasame", "text": "Self-attention!", "emotion": "surprised",
                 "note": "A mechanism relating positions of one sequence."}
            ]
        }"#;
        let script = Script::parse_json(json).unwrap();
        assert_eq!(script.title, "Transformers");
        assert_eq!(script.lines[0].emotion, Emotion::Proud);
        assert!(script.lines[0].note.is_none());
        assert!(script.lines[1].note.is_some());
    }

    #[test]
    fn bad_emotion_values_do_not_sink_the_script() {
        let json = r#"{
            "title": "Odd output",
            "script": [
                {"speaker": "Murasame", "text": "One.", "emotion": null},
                {"speaker": "Murasame", "text": "Two.", "emotion": 3},
                {"speaker": "Murasame", "text": "Three.", "emotion": "shy"}
            ]
        }"#;
        let script = Script::parse_json(json).unwrap();
        assert_eq!(script.len(), 3);
        assert_eq!(script.lines[0].emotion, Emotion::Normal);
        assert_eq!(script.lines[1].emotion, Emotion::Normal);
        assert_eq!(script.lines[2].emotion, Emotion::Shy);
    }

    #[test]
    fn empty_script_is_valid() {
        let script = Script::parse_json(r#"{"title": "nothing", "script": []}"#).unwrap();
        assert!(script.is_empty());
        assert_eq!(script.last_index(), None);
        assert!(script.validate().is_ok());
    }

    #[test]
    fn validate_rejects_empty_text() {
        let script = Script::new(
            "t",
            vec![
                DialogueLine::new("A", "fine", Emotion::Normal),
                DialogueLine::new("A", "", Emotion::Normal),
            ],
        );
        assert!(matches!(
            script.validate(),
            Err(ScriptError::EmptyText { index: 1 })
        ));
    }

    #[test]
    fn fallback_script_shape() {
        let script = Script::fallback();
        assert_eq!(script.title, FALLBACK_TITLE);
        assert_eq!(script.len(), 1);
        assert_eq!(script.lines[0].speaker, FALLBACK_SPEAKER);
        assert_eq!(script.lines[0].emotion, Emotion::Shy);
        assert!(script.lines[0].text.ends_with("(API Error)"));
        assert!(script.validate().is_ok());
    }

    #[test]
    fn json_output_uses_generator_shape() {
        let json = Script::fallback().to_json().unwrap();
        assert!(json.contains("\"script\""));
        let back = Script::parse_json(&json).unwrap();
        assert_eq!(back, Script::fallback());
    }

    #[test]
    fn format_from_extension() {
        assert_eq!(ScriptFormat::from_path(Path::new("a.json")), ScriptFormat::Json);
        assert_eq!(ScriptFormat::from_path(Path::new("a.JSON")), ScriptFormat::Json);
        assert_eq!(ScriptFormat::from_path(Path::new("a.ron")), ScriptFormat::Ron);
        assert_eq!(ScriptFormat::from_path(Path::new("script")), ScriptFormat::Ron);
    }
}
