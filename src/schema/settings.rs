use serde::{Deserialize, Serialize};

/// How dense the generated explanation should be. Affects line count
/// only; the playback engine never looks at it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DetailLevel {
    Brief,
    #[default]
    Detailed,
    Academic,
}

/// Tone of the generated text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Personality {
    #[default]
    Tsundere,
    Gentle,
    Strict,
}

/// User-chosen options handed to the explanation generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratorSettings {
    #[serde(default)]
    pub detail_level: DetailLevel,
    #[serde(default)]
    pub personality: Personality,
}
