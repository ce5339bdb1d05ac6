use serde::de::{self, IgnoredAny, MapAccess, SeqAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// The expression a speaker wears while delivering a line.
///
/// The set is closed. Anything a generator emits outside of it degrades
/// to `Normal` instead of failing the whole script.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Emotion {
    #[default]
    Normal,
    Happy,
    Angry,
    Surprised,
    Shy,
    Proud,
}

impl Emotion {
    pub const ALL: [Emotion; 6] = [
        Self::Normal,
        Self::Happy,
        Self::Angry,
        Self::Surprised,
        Self::Shy,
        Self::Proud,
    ];

    /// Case-insensitive lookup. Returns `None` for names outside the set.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "normal" => Some(Self::Normal),
            "happy" => Some(Self::Happy),
            "angry" => Some(Self::Angry),
            "surprised" => Some(Self::Surprised),
            "shy" => Some(Self::Shy),
            "proud" => Some(Self::Proud),
            _ => None,
        }
    }

    /// Like [`Emotion::from_name`], but unknown names fall back to `Normal`.
    pub fn parse_lossy(name: &str) -> Self {
        Self::from_name(name).unwrap_or_default()
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Happy => "happy",
            Self::Angry => "angry",
            Self::Surprised => "surprised",
            Self::Shy => "shy",
            Self::Proud => "proud",
        }
    }
}

// Always a plain string on the wire, so RON and JSON scripts agree.
impl Serialize for Emotion {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

// Any value is accepted: names parse leniently, everything else (null,
// numbers, nested data) reads as `Normal`.
impl<'de> Deserialize<'de> for Emotion {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(EmotionVisitor)
    }
}

struct EmotionVisitor;

impl<'de> Visitor<'de> for EmotionVisitor {
    type Value = Emotion;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("an emotion name")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Emotion, E> {
        Ok(Emotion::parse_lossy(v))
    }

    fn visit_bool<E: de::Error>(self, _: bool) -> Result<Emotion, E> {
        Ok(Emotion::Normal)
    }

    fn visit_i64<E: de::Error>(self, _: i64) -> Result<Emotion, E> {
        Ok(Emotion::Normal)
    }

    fn visit_u64<E: de::Error>(self, _: u64) -> Result<Emotion, E> {
        Ok(Emotion::Normal)
    }

    fn visit_f64<E: de::Error>(self, _: f64) -> Result<Emotion, E> {
        Ok(Emotion::Normal)
    }

    fn visit_none<E: de::Error>(self) -> Result<Emotion, E> {
        Ok(Emotion::Normal)
    }

    fn visit_unit<E: de::Error>(self) -> Result<Emotion, E> {
        Ok(Emotion::Normal)
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Emotion, D::Error> {
        deserializer.deserialize_any(self)
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Emotion, A::Error> {
        while seq.next_element::<IgnoredAny>()?.is_some() {}
        Ok(Emotion::Normal)
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Emotion, A::Error> {
        while map.next_entry::<IgnoredAny, IgnoredAny>()?.is_some() {}
        Ok(Emotion::Normal)
    }
}

/// One unit of dialogue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DialogueLine {
    /// Opaque display string. The engine never interprets it.
    pub speaker: String,
    pub text: String,
    #[serde(default)]
    pub emotion: Emotion,
    /// Technical-term annotation, shown as a popup while the line is up.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl DialogueLine {
    pub fn new(speaker: impl Into<String>, text: impl Into<String>, emotion: Emotion) -> Self {
        Self {
            speaker: speaker.into(),
            text: text.into(),
            emotion,
            note: None,
        }
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    /// Length of the text in characters, the unit the typewriter reveals.
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }

    /// The first `chars` characters of the text, clamped to its length.
    pub fn revealed_text(&self, chars: usize) -> &str {
        match self.text.char_indices().nth(chars) {
            Some((byte_idx, _)) => &self.text[..byte_idx],
            None => &self.text,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn emotion_parse_is_case_insensitive() {
        assert_eq!(Emotion::from_name("Happy"), Some(Emotion::Happy));
        assert_eq!(Emotion::from_name("  SHY "), Some(Emotion::Shy));
        assert_eq!(Emotion::from_name("smug"), None);
    }

    #[test]
    fn unknown_emotion_degrades_to_normal() {
        assert_eq!(Emotion::parse_lossy("furious"), Emotion::Normal);
        assert_eq!(Emotion::parse_lossy(""), Emotion::Normal);

        let line: DialogueLine =
            serde_json::from_str(r#"{"speaker":"A","text":"hi","emotion":"smug"}"#).unwrap();
        assert_eq!(line.emotion, Emotion::Normal);
    }

    #[test]
    fn missing_emotion_and_null_note_are_accepted() {
        let line: DialogueLine =
            serde_json::from_str(r#"{"speaker":"A","text":"hi","note":null}"#).unwrap();
        assert_eq!(line.emotion, Emotion::Normal);
        assert!(line.note.is_none());
    }

    #[test]
    fn non_string_emotions_degrade_to_normal() {
        for raw in ["null", "3", "-1.5", "true", "[\"happy\"]", "{\"name\": \"happy\"}"] {
            let json = format!(r#"{{"speaker":"A","text":"hi","emotion":{}}}"#, raw);
            let line: DialogueLine = serde_json::from_str(&json).unwrap();
            assert_eq!(line.emotion, Emotion::Normal, "emotion {}", raw);
        }
    }

    #[test]
    fn emotion_names_match_all() {
        for emotion in Emotion::ALL {
            assert_eq!(Emotion::from_name(emotion.name()), Some(emotion));
        }
    }

    #[test]
    fn revealed_text_respects_char_boundaries() {
        let line = DialogueLine::new("丛雨", "吾辈はね", Emotion::Proud);
        assert_eq!(line.char_len(), 4);
        assert_eq!(line.revealed_text(0), "");
        assert_eq!(line.revealed_text(2), "吾辈");
        assert_eq!(line.revealed_text(4), "吾辈はね");
        assert_eq!(line.revealed_text(99), "吾辈はね");
    }

    #[test]
    fn note_is_skipped_when_absent() {
        let line = DialogueLine::new("A", "hi", Emotion::Happy);
        let json = serde_json::to_string(&line).unwrap();
        assert!(!json.contains("note"));
        assert!(json.contains("\"happy\""));

        let noted = line.with_note("a term");
        assert_eq!(noted.note.as_deref(), Some("a term"));
    }
}
