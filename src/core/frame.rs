/// Render projection: everything a host needs to draw one frame.
use serde::Serialize;

use crate::schema::line::Emotion;

/// Shown in place of the dialogue when the script has no lines.
pub const NO_CONTENT_MESSAGE: &str = "End of Chapter";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Frame {
    NoContent { message: String },
    Exited,
    Dialogue(DialogueFrame),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DialogueFrame {
    pub title: String,
    pub index: usize,
    pub total: usize,
    pub speaker: String,
    /// The typewriter prefix, not the full line.
    pub text: String,
    pub emotion: Emotion,
    /// Resource key for the emotion, e.g. "sprite:shy".
    pub sprite_key: &'static str,
    /// `None` while the UI is hidden.
    pub sprite: Option<String>,
    /// `None` while the UI is hidden or the line has no note.
    pub note: Option<String>,
    pub show_cursor: bool,
    pub show_next_indicator: bool,
    pub auto_active: bool,
    pub ui_hidden: bool,
    pub backlog_open: bool,
    pub finished: bool,
}
