/// Playback controller: the state machine behind the dialogue screen.
///
/// Owns the current position, the typing/auto/visibility/backlog flags and
/// both timers. User input and timer firings all go through `advance`, so a
/// click and an auto-fire landing on the same line resolve identically.
use serde::Serialize;
use std::time::Duration;
use tracing::debug;

use crate::core::auto_advance::AutoAdvanceTimer;
use crate::core::backlog::Backlog;
use crate::core::config::{BacklogPolicy, PlaybackConfig};
use crate::core::frame::{DialogueFrame, Frame, NO_CONTENT_MESSAGE};
use crate::core::sprite::{sprite_key, SpriteTable};
use crate::core::typewriter::TypewriterTimer;
use crate::core::visibility::VisibilityToggle;
use crate::schema::line::DialogueLine;
use crate::schema::script::Script;

/// Where playback stands on the current line. `revealed` lives only here;
/// "is typing" is always derived from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    /// The script has no lines.
    NoContent,
    Typing { index: usize, revealed: usize },
    Complete { index: usize },
}

/// The externally visible state, derived from the phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "index", rename_all = "snake_case")]
pub enum PlaybackState {
    NoContent,
    Typing(usize),
    HoldingComplete(usize),
    /// The last line is fully revealed.
    Finished,
    Exited,
}

/// Result of a single `advance` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    /// The typewriter was cut short and the whole line is now shown.
    Skipped { index: usize },
    /// Moved on to a new line, which starts typing.
    NextLine { index: usize },
    /// Already on the fully revealed last line. Auto-play is switched off.
    AtEnd,
    /// No content, or the session has exited.
    Ignored,
}

/// Who asked for an advance. Only used for logging; both take the same path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Trigger {
    User,
    Auto,
}

/// Interactions a host forwards from its UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerInput {
    /// A click on the dialogue surface.
    Click,
    ToggleAuto,
    OpenLog,
    CloseLog,
    ToggleLog,
    Hide,
    Show,
    Exit,
}

/// Notifications for the host, drained with [`PlaybackController::drain_events`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum PlaybackEvent {
    LineStarted { index: usize },
    LineCompleted { index: usize, skipped: bool },
    AutoChanged { enabled: bool },
    Finished,
    UiVisibilityChanged { hidden: bool },
    BacklogVisibilityChanged { visible: bool },
    /// The user ended the session. Hosts navigate away on this.
    Exited,
}

/// A point-in-time copy of the playback flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PlaybackSnapshot {
    pub current_index: usize,
    pub revealed_length: usize,
    pub is_typing: bool,
    pub is_auto: bool,
    pub ui_hidden: bool,
    pub log_visible: bool,
    pub state: PlaybackState,
}

#[derive(Debug)]
pub struct PlaybackController {
    script: Script,
    config: PlaybackConfig,
    phase: Phase,
    auto: bool,
    visibility: VisibilityToggle,
    log_visible: bool,
    exited: bool,
    typewriter: TypewriterTimer,
    auto_timer: AutoAdvanceTimer,
    /// Events not yet handed to the host.
    uncommitted_events: Vec<PlaybackEvent>,
}

impl PlaybackController {
    /// Begin playback of `script` at `now` with the reference timings.
    pub fn start(script: Script, now: Duration) -> Self {
        Self::with_config(script, PlaybackConfig::default(), now)
    }

    pub fn with_config(script: Script, config: PlaybackConfig, now: Duration) -> Self {
        let mut controller = Self {
            typewriter: TypewriterTimer::new(config.typing_interval()),
            auto_timer: AutoAdvanceTimer::new(config.auto_delay()),
            script,
            config,
            phase: Phase::NoContent,
            auto: false,
            visibility: VisibilityToggle::Shown,
            log_visible: false,
            exited: false,
            uncommitted_events: Vec::new(),
        };

        if controller.script.is_empty() {
            debug!(title = %controller.script.title, "script has no lines");
        } else {
            debug!(
                title = %controller.script.title,
                lines = controller.script.len(),
                "playback started"
            );
            controller.enter_line(0, now);
        }
        controller
    }

    // ------------------------------------------------------------------
    // Actions
    // ------------------------------------------------------------------

    /// Skip the reveal, move to the next line, or stop auto-play at the end.
    pub fn advance(&mut self, now: Duration) -> Advance {
        self.advance_from(Trigger::User, now)
    }

    fn advance_from(&mut self, trigger: Trigger, now: Duration) -> Advance {
        if self.exited {
            return Advance::Ignored;
        }
        match self.phase {
            Phase::NoContent => Advance::Ignored,
            Phase::Typing { index, .. } => {
                debug!(index, ?trigger, "skipping reveal");
                self.complete_line(index, true, now);
                Advance::Skipped { index }
            }
            Phase::Complete { index } if index < self.last_index() => {
                debug!(from = index, ?trigger, "next line");
                self.enter_line(index + 1, now);
                Advance::NextLine { index: index + 1 }
            }
            Phase::Complete { .. } => {
                self.set_auto(false, now);
                Advance::AtEnd
            }
        }
    }

    /// Flip auto-play. Never moves the position by itself.
    pub fn toggle_auto(&mut self, now: Duration) {
        if self.exited {
            return;
        }
        self.set_auto(!self.auto, now);
    }

    pub fn toggle_hide(&mut self) {
        self.set_visibility(self.visibility.toggled());
    }

    pub fn hide(&mut self) {
        self.set_visibility(VisibilityToggle::Hidden);
    }

    pub fn show(&mut self) {
        self.set_visibility(VisibilityToggle::Shown);
    }

    pub fn toggle_log(&mut self, now: Duration) {
        self.set_log_visible(!self.log_visible, now);
    }

    pub fn open_log(&mut self, now: Duration) {
        self.set_log_visible(true, now);
    }

    pub fn close_log(&mut self, now: Duration) {
        self.set_log_visible(false, now);
    }

    /// End the session. Both timers are cancelled; everything afterwards is
    /// a no-op.
    pub fn exit(&mut self) {
        if self.exited {
            return;
        }
        self.typewriter.cancel();
        self.auto_timer.disarm();
        self.exited = true;
        debug!("playback exited");
        self.uncommitted_events.push(PlaybackEvent::Exited);
    }

    /// Route a UI interaction. Returns the advance outcome when the input
    /// reached `advance`.
    pub fn handle(&mut self, input: PlayerInput, now: Duration) -> Option<Advance> {
        match input {
            PlayerInput::Click => {
                if self.exited {
                    None
                } else if self.visibility.is_hidden() {
                    // The re-show target sits over everything while hidden.
                    self.show();
                    None
                } else if self.log_visible {
                    None
                } else {
                    Some(self.advance(now))
                }
            }
            PlayerInput::ToggleAuto => {
                self.toggle_auto(now);
                None
            }
            PlayerInput::OpenLog => {
                self.open_log(now);
                None
            }
            PlayerInput::CloseLog => {
                self.close_log(now);
                None
            }
            PlayerInput::ToggleLog => {
                self.toggle_log(now);
                None
            }
            PlayerInput::Hide => {
                self.hide();
                None
            }
            PlayerInput::Show => {
                self.show();
                None
            }
            PlayerInput::Exit => {
                self.exit();
                None
            }
        }
    }

    /// Fire every timer due at or before `now`, earliest first, each at its
    /// own scheduled instant. Returns how many firings were processed.
    pub fn update(&mut self, now: Duration) -> usize {
        let mut fired = 0;
        loop {
            let typing_due = self.typewriter.next_deadline().filter(|d| *d <= now);
            let auto_due = self.auto_timer.deadline().filter(|d| *d <= now);
            match (typing_due, auto_due) {
                (None, None) => break,
                (Some(t), Some(a)) if a < t => self.fire_auto(now),
                (Some(_), _) => self.fire_typewriter(now),
                (None, Some(_)) => self.fire_auto(now),
            }
            fired += 1;
        }
        fired
    }

    fn fire_typewriter(&mut self, now: Duration) {
        let Some(at) = self.typewriter.poll(now) else {
            return;
        };
        if let Phase::Typing { index, revealed } = self.phase {
            let revealed = revealed + 1;
            if revealed >= self.line_len(index) {
                self.complete_line(index, false, at);
            } else {
                self.phase = Phase::Typing { index, revealed };
            }
        }
    }

    fn fire_auto(&mut self, now: Duration) {
        if let Some(at) = self.auto_timer.poll(now) {
            debug!(at_ms = at.as_millis() as u64, "auto-advance fired");
            self.advance_from(Trigger::Auto, at);
        }
    }

    // ------------------------------------------------------------------
    // Transitions
    // ------------------------------------------------------------------

    fn enter_line(&mut self, index: usize, now: Duration) {
        let len = self.line_len(index);
        self.phase = Phase::Typing { index, revealed: 0 };
        debug!(index, len, "line started");
        self.uncommitted_events
            .push(PlaybackEvent::LineStarted { index });

        // The position changed, so any pending auto-advance belongs to the
        // previous line.
        self.auto_timer.disarm();
        if !self.typewriter.start(now, len) {
            self.complete_line(index, false, now);
        }
    }

    fn complete_line(&mut self, index: usize, skipped: bool, now: Duration) {
        self.typewriter.cancel();
        self.phase = Phase::Complete { index };
        debug!(index, skipped, "line completed");
        self.uncommitted_events
            .push(PlaybackEvent::LineCompleted { index, skipped });

        if index == self.last_index() {
            debug!(index, "script finished");
            self.uncommitted_events.push(PlaybackEvent::Finished);
            // Auto-play has nowhere left to go.
            self.set_auto(false, now);
        }
        self.reschedule_auto(now);
    }

    fn set_auto(&mut self, enabled: bool, now: Duration) {
        if self.auto != enabled {
            self.auto = enabled;
            debug!(enabled, "auto-play toggled");
            self.uncommitted_events
                .push(PlaybackEvent::AutoChanged { enabled });
        }
        self.reschedule_auto(now);
    }

    fn set_visibility(&mut self, visibility: VisibilityToggle) {
        if self.exited || self.visibility == visibility {
            return;
        }
        self.visibility = visibility;
        self.uncommitted_events
            .push(PlaybackEvent::UiVisibilityChanged {
                hidden: visibility.is_hidden(),
            });
    }

    fn set_log_visible(&mut self, visible: bool, now: Duration) {
        if self.exited || self.log_visible == visible {
            return;
        }
        self.log_visible = visible;
        self.uncommitted_events
            .push(PlaybackEvent::BacklogVisibilityChanged { visible });
        if self.config.backlog_policy == BacklogPolicy::PauseAuto {
            self.reschedule_auto(now);
        }
    }

    /// Arm auto-advance iff auto is on, the line is fully shown and there is
    /// a next line (and, under `PauseAuto`, the backlog is closed). A
    /// pending firing is only kept when nothing it depends on changed.
    fn reschedule_auto(&mut self, now: Duration) {
        let wanted = !self.exited
            && self.auto
            && matches!(self.phase, Phase::Complete { index } if index < self.last_index())
            && !(self.log_visible && self.config.backlog_policy == BacklogPolicy::PauseAuto);

        match (wanted, self.auto_timer.is_armed()) {
            (true, false) => self.auto_timer.arm(now),
            (false, true) => self.auto_timer.disarm(),
            _ => {}
        }
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    pub fn state(&self) -> PlaybackState {
        if self.exited {
            return PlaybackState::Exited;
        }
        match self.phase {
            Phase::NoContent => PlaybackState::NoContent,
            Phase::Typing { index, .. } => PlaybackState::Typing(index),
            Phase::Complete { index } if index == self.last_index() => PlaybackState::Finished,
            Phase::Complete { index } => PlaybackState::HoldingComplete(index),
        }
    }

    pub fn snapshot(&self) -> PlaybackSnapshot {
        PlaybackSnapshot {
            current_index: self.current_index().unwrap_or(0),
            revealed_length: self.revealed_length(),
            is_typing: self.is_typing(),
            is_auto: self.auto,
            ui_hidden: self.visibility.is_hidden(),
            log_visible: self.log_visible,
            state: self.state(),
        }
    }

    /// `None` when the script is empty.
    pub fn current_index(&self) -> Option<usize> {
        match self.phase {
            Phase::NoContent => None,
            Phase::Typing { index, .. } | Phase::Complete { index } => Some(index),
        }
    }

    pub fn current_line(&self) -> Option<&DialogueLine> {
        self.current_index().and_then(|i| self.script.get(i))
    }

    pub fn revealed_length(&self) -> usize {
        match self.phase {
            Phase::NoContent => 0,
            Phase::Typing { revealed, .. } => revealed,
            Phase::Complete { index } => self.line_len(index),
        }
    }

    /// Always false after exit: no reveal can continue without a timer.
    pub fn is_typing(&self) -> bool {
        !self.exited && matches!(self.phase, Phase::Typing { .. })
    }

    pub fn is_auto(&self) -> bool {
        self.auto
    }

    pub fn is_finished(&self) -> bool {
        self.state() == PlaybackState::Finished
    }

    pub fn has_exited(&self) -> bool {
        self.exited
    }

    pub fn visibility(&self) -> VisibilityToggle {
        self.visibility
    }

    pub fn is_log_visible(&self) -> bool {
        self.log_visible
    }

    /// The typewriter prefix of the current line.
    pub fn visible_text(&self) -> &str {
        self.current_line()
            .map_or("", |line| line.revealed_text(self.revealed_length()))
    }

    pub fn backlog(&self) -> Backlog<'_> {
        Backlog::project(&self.script.lines, self.current_index())
    }

    pub fn script(&self) -> &Script {
        &self.script
    }

    pub fn config(&self) -> &PlaybackConfig {
        &self.config
    }

    /// Earliest pending timer deadline. Hosts can sleep until then.
    pub fn next_deadline(&self) -> Option<Duration> {
        match (self.typewriter.next_deadline(), self.auto_timer.deadline()) {
            (Some(t), Some(a)) => Some(t.min(a)),
            (t, a) => t.or(a),
        }
    }

    /// True when no timer is pending, so nothing changes until the host
    /// sends input.
    pub fn awaiting_input(&self) -> bool {
        self.next_deadline().is_none()
    }

    pub fn is_auto_armed(&self) -> bool {
        self.auto_timer.is_armed()
    }

    pub fn is_typewriter_running(&self) -> bool {
        self.typewriter.is_running()
    }

    pub fn uncommitted_events(&self) -> &[PlaybackEvent] {
        &self.uncommitted_events
    }

    pub fn drain_events(&mut self) -> Vec<PlaybackEvent> {
        std::mem::take(&mut self.uncommitted_events)
    }

    /// What the host should draw right now.
    pub fn frame(&self, sprites: &SpriteTable) -> Frame {
        if self.exited {
            return Frame::Exited;
        }
        let Some(line) = self.current_line() else {
            return Frame::NoContent {
                message: NO_CONTENT_MESSAGE.to_string(),
            };
        };
        let hidden = self.visibility.is_hidden();
        let typing = self.is_typing();
        Frame::Dialogue(DialogueFrame {
            title: self.script.title.clone(),
            index: self.current_index().unwrap_or(0),
            total: self.script.len(),
            speaker: line.speaker.clone(),
            text: self.visible_text().to_string(),
            emotion: line.emotion,
            sprite_key: sprite_key(line.emotion),
            sprite: (!hidden).then(|| sprites.resolve(&line.speaker, line.emotion).to_string()),
            note: if hidden { None } else { line.note.clone() },
            show_cursor: typing,
            show_next_indicator: !typing,
            auto_active: self.auto,
            ui_hidden: hidden,
            backlog_open: self.log_visible,
            finished: self.is_finished(),
        })
    }

    /// Only consulted once a line is current, so an empty script never
    /// reaches the fallback.
    fn last_index(&self) -> usize {
        self.script.last_index().unwrap_or(0)
    }

    fn line_len(&self, index: usize) -> usize {
        self.script.get(index).map_or(0, DialogueLine::char_len)
    }
}
