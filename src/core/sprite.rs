/// Sprite lookup: maps a line's speaker and emotion to an image resource.
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::schema::line::Emotion;

/// Stock portrait used when nothing more specific is configured.
pub const DEFAULT_SPRITE: &str = "https://i.postimg.cc/QtfXYFxW/retouch-2026010921154256.png";

/// One character's portraits. Only `normal` is required; every other
/// emotion falls back to it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpriteSet {
    pub normal: String,
    #[serde(default)]
    pub happy: Option<String>,
    #[serde(default)]
    pub angry: Option<String>,
    #[serde(default)]
    pub surprised: Option<String>,
    #[serde(default)]
    pub shy: Option<String>,
    #[serde(default)]
    pub proud: Option<String>,
}

impl SpriteSet {
    /// A set that uses the same image for every emotion.
    pub fn uniform(resource: impl Into<String>) -> Self {
        Self {
            normal: resource.into(),
            happy: None,
            angry: None,
            surprised: None,
            shy: None,
            proud: None,
        }
    }

    /// Total over the emotion set: missing entries resolve to `normal`.
    pub fn get(&self, emotion: Emotion) -> &str {
        let specific = match emotion {
            Emotion::Normal => None,
            Emotion::Happy => self.happy.as_deref(),
            Emotion::Angry => self.angry.as_deref(),
            Emotion::Surprised => self.surprised.as_deref(),
            Emotion::Shy => self.shy.as_deref(),
            Emotion::Proud => self.proud.as_deref(),
        };
        specific.unwrap_or(&self.normal)
    }
}

impl Default for SpriteSet {
    fn default() -> Self {
        Self::uniform(DEFAULT_SPRITE)
    }
}

/// Default portraits plus optional per-speaker overrides.
///
/// Speakers are matched by exact display string.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SpriteTable {
    #[serde(default)]
    pub default: SpriteSet,
    #[serde(default)]
    pub speakers: FxHashMap<String, SpriteSet>,
}

impl SpriteTable {
    pub fn new(default: SpriteSet) -> Self {
        Self {
            default,
            speakers: FxHashMap::default(),
        }
    }

    pub fn register(&mut self, speaker: impl Into<String>, sprites: SpriteSet) {
        self.speakers.insert(speaker.into(), sprites);
    }

    pub fn resolve(&self, speaker: &str, emotion: Emotion) -> &str {
        self.speakers
            .get(speaker)
            .unwrap_or(&self.default)
            .get(emotion)
    }

    pub fn parse_ron(input: &str) -> Result<Self, SpriteError> {
        Ok(ron::from_str(input)?)
    }

    pub fn load_from_ron(path: &std::path::Path) -> Result<Self, SpriteError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse_ron(&contents)
    }
}

/// Resource key for an emotion, e.g. "sprite:happy".
pub fn sprite_key(emotion: Emotion) -> &'static str {
    match emotion {
        Emotion::Normal => "sprite:normal",
        Emotion::Happy => "sprite:happy",
        Emotion::Angry => "sprite:angry",
        Emotion::Surprised => "sprite:surprised",
        Emotion::Shy => "sprite:shy",
        Emotion::Proud => "sprite:proud",
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SpriteError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("RON deserialization error: {0}")]
    Ron(#[from] ron::error::SpannedError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_emotions_fall_back_to_normal() {
        let mut set = SpriteSet::uniform("normal.png");
        set.happy = Some("happy.png".to_string());
        assert_eq!(set.get(Emotion::Happy), "happy.png");
        assert_eq!(set.get(Emotion::Angry), "normal.png");
        assert_eq!(set.get(Emotion::Normal), "normal.png");
    }

    #[test]
    fn default_table_resolves_everything() {
        let table = SpriteTable::default();
        for emotion in Emotion::ALL {
            assert_eq!(table.resolve("anyone", emotion), DEFAULT_SPRITE);
        }
    }

    #[test]
    fn speaker_override() {
        let mut table = SpriteTable::default();
        table.register("丛雨", SpriteSet::uniform("murasame.png"));
        assert_eq!(table.resolve("丛雨", Emotion::Shy), "murasame.png");
        assert_eq!(table.resolve("Murasame", Emotion::Shy), DEFAULT_SPRITE);
    }

    #[test]
    fn parse_table_from_ron() {
        let table = SpriteTable::parse_ron(
            r#"(
                default: (normal: "n.png", shy: Some("s.png")),
                speakers: {
                    "Yoshino": (normal: "y.png"),
                },
            )"#,
        )
        .unwrap();
        assert_eq!(table.resolve("x", Emotion::Shy), "s.png");
        assert_eq!(table.resolve("x", Emotion::Proud), "n.png");
        assert_eq!(table.resolve("Yoshino", Emotion::Shy), "y.png");
    }

    #[test]
    fn keys_are_distinct() {
        let keys: rustc_hash::FxHashSet<&str> = Emotion::ALL.iter().map(|e| sprite_key(*e)).collect();
        assert_eq!(keys.len(), Emotion::ALL.len());
        assert_eq!(sprite_key(Emotion::Happy), "sprite:happy");
    }
}
