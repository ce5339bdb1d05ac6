use serde::Serialize;

/// Whether the dialogue chrome (box, sprite, control bar, note) is drawn.
///
/// Independent of playback progress. While hidden, the host shows a
/// full-surface re-show target instead of the advance target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum VisibilityToggle {
    #[default]
    Shown,
    Hidden,
}

impl VisibilityToggle {
    pub fn is_hidden(&self) -> bool {
        matches!(self, Self::Hidden)
    }

    pub fn toggled(self) -> Self {
        match self {
            Self::Shown => Self::Hidden,
            Self::Hidden => Self::Shown,
        }
    }
}
