//! WASM bindings for dialogue-playback: drives the dialogue screen in a browser.

use std::time::Duration;
use wasm_bindgen::prelude::*;

use dialogue_playback::core::config::PlaybackConfig;
use dialogue_playback::core::controller::{PlaybackController, PlayerInput};
use dialogue_playback::core::sprite::SpriteTable;
use dialogue_playback::schema::script::Script;

// ---------------------------------------------------------------------------
// Conversion helpers
// ---------------------------------------------------------------------------

/// JS hands us `performance.now()`-style milliseconds. Negative or NaN
/// times read as zero; anything too large saturates.
fn to_duration(now_ms: f64) -> Duration {
    if now_ms.is_nan() || now_ms <= 0.0 {
        return Duration::ZERO;
    }
    Duration::try_from_secs_f64(now_ms / 1000.0).unwrap_or(Duration::MAX)
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<String, JsError> {
    serde_json::to_string(value).map_err(|e| JsError::new(&e.to_string()))
}

// ---------------------------------------------------------------------------
// WasmPlayer: the main exported struct
// ---------------------------------------------------------------------------
#[wasm_bindgen]
pub struct WasmPlayer {
    controller: PlaybackController,
    sprites: SpriteTable,
}

#[wasm_bindgen]
impl WasmPlayer {
    /// Start playback of a generator response.
    ///
    /// Expected JSON shape:
    /// ```json
    /// {
    ///   "title": "Attention Is All You Need",
    ///   "script": [
    ///     { "speaker": "丛雨", "text": "...", "emotion": "happy", "note": null }
    ///   ]
    /// }
    /// ```
    ///
    /// `config_json` is optional, e.g. `{"typing_interval_ms": 30,
    /// "auto_delay_ms": 2000, "backlog_policy": "KeepRunning"}`.
    #[wasm_bindgen(constructor)]
    pub fn new(
        script_json: &str,
        config_json: Option<String>,
        now_ms: f64,
    ) -> Result<WasmPlayer, JsError> {
        let script = Script::parse_json(script_json).map_err(|e| JsError::new(&e.to_string()))?;
        let config = match config_json {
            Some(json) if !json.trim().is_empty() => serde_json::from_str::<PlaybackConfig>(&json)
                .map_err(|e| JsError::new(&e.to_string()))?,
            _ => PlaybackConfig::default(),
        };

        Ok(WasmPlayer {
            controller: PlaybackController::with_config(script, config, to_duration(now_ms)),
            sprites: SpriteTable::default(),
        })
    }

    /// Start playback of the built-in fallback script.
    pub fn fallback(now_ms: f64) -> WasmPlayer {
        WasmPlayer {
            controller: PlaybackController::start(Script::fallback(), to_duration(now_ms)),
            sprites: SpriteTable::default(),
        }
    }

    /// Replace the sprite table. Expects the same shape as the RON table,
    /// in JSON: `{"default": {"normal": "..."}, "speakers": {}}`.
    pub fn set_sprites(&mut self, sprites_json: &str) -> Result<(), JsError> {
        self.sprites =
            serde_json::from_str(sprites_json).map_err(|e| JsError::new(&e.to_string()))?;
        Ok(())
    }

    /// Fire due timers. Call from `requestAnimationFrame` or a short interval.
    pub fn update(&mut self, now_ms: f64) -> usize {
        self.controller.update(to_duration(now_ms))
    }

    /// Click on the dialogue surface (re-shows the UI when it is hidden).
    pub fn click(&mut self, now_ms: f64) {
        let now = to_duration(now_ms);
        self.controller.update(now);
        self.controller.handle(PlayerInput::Click, now);
    }

    pub fn advance(&mut self, now_ms: f64) {
        let now = to_duration(now_ms);
        self.controller.update(now);
        self.controller.advance(now);
    }

    pub fn toggle_auto(&mut self, now_ms: f64) {
        let now = to_duration(now_ms);
        self.controller.update(now);
        self.controller.toggle_auto(now);
    }

    pub fn toggle_log(&mut self, now_ms: f64) {
        let now = to_duration(now_ms);
        self.controller.update(now);
        self.controller.toggle_log(now);
    }

    pub fn hide(&mut self) {
        self.controller.hide();
    }

    pub fn show(&mut self) {
        self.controller.show();
    }

    pub fn exit(&mut self) {
        self.controller.exit();
    }

    /// Milliseconds of the next timer deadline, or `undefined` when idle.
    pub fn next_deadline_ms(&self) -> Option<f64> {
        self.controller
            .next_deadline()
            .map(|d| d.as_secs_f64() * 1000.0)
    }

    /// JSON of the frame to draw.
    pub fn frame(&self) -> Result<String, JsError> {
        to_json(&self.controller.frame(&self.sprites))
    }

    /// JSON array of `{speaker, text}` backlog rows.
    pub fn backlog(&self) -> Result<String, JsError> {
        to_json(&self.controller.backlog().entries())
    }

    /// JSON of the playback flags.
    pub fn snapshot(&self) -> Result<String, JsError> {
        to_json(&self.controller.snapshot())
    }

    /// JSON array of events since the last call. An `exited` event means
    /// the host should navigate back to its title screen.
    pub fn drain_events(&mut self) -> Result<String, JsError> {
        to_json(&self.controller.drain_events())
    }

    /// The fallback script as generator JSON, for hosts that build their own.
    pub fn fallback_script() -> Result<String, JsError> {
        Script::fallback()
            .to_json()
            .map_err(|e| JsError::new(&e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negative_and_nan_times_clamp_to_zero() {
        assert_eq!(to_duration(-5.0), Duration::ZERO);
        assert_eq!(to_duration(f64::NAN), Duration::ZERO);
        assert_eq!(to_duration(1500.0), Duration::from_millis(1500));
    }

    #[test]
    fn huge_times_saturate() {
        assert_eq!(to_duration(1e300), Duration::MAX);
        assert_eq!(to_duration(f64::INFINITY), Duration::MAX);
    }
}
