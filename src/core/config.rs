/// Playback configuration: timings and the backlog/auto-play policy.
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// What auto-play does while the backlog is open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BacklogPolicy {
    /// Auto-play keeps advancing underneath the backlog.
    #[default]
    KeepRunning,
    /// Opening the backlog disarms auto-advance until it is closed again.
    PauseAuto,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaybackConfig {
    /// Milliseconds per revealed character. Zero reveals lines instantly.
    pub typing_interval_ms: u64,
    /// Milliseconds auto-play waits on a fully revealed line.
    pub auto_delay_ms: u64,
    pub backlog_policy: BacklogPolicy,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            typing_interval_ms: 30,
            auto_delay_ms: 2000,
            backlog_policy: BacklogPolicy::KeepRunning,
        }
    }
}

impl PlaybackConfig {
    pub fn typing_interval(&self) -> Duration {
        Duration::from_millis(self.typing_interval_ms)
    }

    pub fn auto_delay(&self) -> Duration {
        Duration::from_millis(self.auto_delay_ms)
    }

    pub fn parse_ron(input: &str) -> Result<Self, ConfigError> {
        Ok(ron::from_str(input)?)
    }

    pub fn load_from_ron(path: &std::path::Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse_ron(&contents)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("RON deserialization error: {0}")]
    Ron(#[from] ron::error::SpannedError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_timings() {
        let config = PlaybackConfig::default();
        assert_eq!(config.typing_interval(), Duration::from_millis(30));
        assert_eq!(config.auto_delay(), Duration::from_secs(2));
        assert_eq!(config.backlog_policy, BacklogPolicy::KeepRunning);
    }

    #[test]
    fn partial_ron_keeps_defaults() {
        let config = PlaybackConfig::parse_ron("(auto_delay_ms: 500, backlog_policy: PauseAuto)").unwrap();
        assert_eq!(config.typing_interval_ms, 30);
        assert_eq!(config.auto_delay_ms, 500);
        assert_eq!(config.backlog_policy, BacklogPolicy::PauseAuto);

        let empty = PlaybackConfig::parse_ron("()").unwrap();
        assert_eq!(empty, PlaybackConfig::default());
    }

    #[test]
    fn unknown_policy_is_an_error() {
        assert!(matches!(
            PlaybackConfig::parse_ron("(backlog_policy: Sometimes)"),
            Err(ConfigError::Ron(_))
        ));
    }
}
