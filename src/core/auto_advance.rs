/// Auto-advance timer: the single delayed "next line" signal of auto-play.
use std::time::Duration;

use super::timer::Timer;

/// Reference wait between a line finishing and auto-play moving on.
pub const DEFAULT_AUTO_DELAY: Duration = Duration::from_millis(2000);

/// At most one pending firing; arming again replaces it.
#[derive(Debug, Clone)]
pub struct AutoAdvanceTimer {
    timer: Timer,
    delay: Duration,
}

impl AutoAdvanceTimer {
    pub fn new(delay: Duration) -> Self {
        Self {
            timer: Timer::new(),
            delay,
        }
    }

    pub fn arm(&mut self, now: Duration) {
        self.timer.arm_once(now, self.delay);
    }

    pub fn disarm(&mut self) {
        self.timer.cancel();
    }

    pub fn is_armed(&self) -> bool {
        self.timer.is_armed()
    }

    pub fn deadline(&self) -> Option<Duration> {
        self.timer.deadline()
    }

    pub fn poll(&mut self, now: Duration) -> Option<Duration> {
        self.timer.poll(now)
    }
}

impl Default for AutoAdvanceTimer {
    fn default() -> Self {
        Self::new(DEFAULT_AUTO_DELAY)
    }
}
