/// Backlog: read-only history of the lines played so far.
use serde::Serialize;

use crate::schema::line::DialogueLine;

/// One backlog row. Always the full stored text, never the typewriter prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BacklogEntry<'a> {
    pub speaker: &'a str,
    pub text: &'a str,
}

/// A borrowed view of `lines[0..=current_index]`.
#[derive(Debug, Clone, Copy)]
pub struct Backlog<'a> {
    lines: &'a [DialogueLine],
}

impl<'a> Backlog<'a> {
    /// Project the lines up to and including `current_index`. `None` (no
    /// current line) yields an empty backlog.
    pub fn project(lines: &'a [DialogueLine], current_index: Option<usize>) -> Self {
        let end = current_index.map_or(0, |i| (i + 1).min(lines.len()));
        Self {
            lines: &lines[..end],
        }
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = BacklogEntry<'a>> + 'a {
        self.lines.iter().map(|line| BacklogEntry {
            speaker: &line.speaker,
            text: &line.text,
        })
    }

    pub fn entries(&self) -> Vec<BacklogEntry<'a>> {
        self.iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::line::Emotion;

    fn lines() -> Vec<DialogueLine> {
        vec![
            DialogueLine::new("A", "one", Emotion::Normal),
            DialogueLine::new("B", "two", Emotion::Happy),
            DialogueLine::new("A", "three", Emotion::Shy),
        ]
    }

    #[test]
    fn projection_is_inclusive() {
        let lines = lines();
        let backlog = Backlog::project(&lines, Some(1));
        assert_eq!(backlog.len(), 2);
        let entries = backlog.entries();
        assert_eq!(entries[1], BacklogEntry { speaker: "B", text: "two" });
    }

    #[test]
    fn no_current_line_is_empty() {
        let lines = lines();
        assert!(Backlog::project(&lines, None).is_empty());
        assert!(Backlog::project(&[], None).is_empty());
    }

    #[test]
    fn index_past_end_is_clamped() {
        let lines = lines();
        assert_eq!(Backlog::project(&lines, Some(10)).len(), 3);
    }
}
