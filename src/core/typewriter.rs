/// Typewriter timer: paces the character reveal of one line.
use std::time::Duration;

use super::timer::Timer;

/// Reference pace of the reveal.
pub const DEFAULT_TYPING_INTERVAL: Duration = Duration::from_millis(30);

/// A finite run of reveal ticks, one per character of a single line.
///
/// Starting a new run always cancels the previous one, so ticks from a
/// stale line cannot leak into the next.
#[derive(Debug, Clone)]
pub struct TypewriterTimer {
    timer: Timer,
    interval: Duration,
    remaining: usize,
}

impl TypewriterTimer {
    pub fn new(interval: Duration) -> Self {
        Self {
            timer: Timer::new(),
            interval,
            remaining: 0,
        }
    }

    /// Start ticking for a line of `chars` characters.
    ///
    /// Returns `false` when there is nothing to tick for (an empty line or a
    /// zero interval); the caller should treat the line as fully revealed.
    pub fn start(&mut self, now: Duration, chars: usize) -> bool {
        self.cancel();
        if chars == 0 || self.interval.is_zero() {
            return false;
        }
        self.remaining = chars;
        self.timer.arm_periodic(now, self.interval);
        true
    }

    pub fn cancel(&mut self) {
        self.timer.cancel();
        self.remaining = 0;
    }

    pub fn is_running(&self) -> bool {
        self.timer.is_armed()
    }

    pub fn next_deadline(&self) -> Option<Duration> {
        self.timer.deadline()
    }

    /// Take the next tick if it is due. The run disarms itself after its
    /// last tick.
    pub fn poll(&mut self, now: Duration) -> Option<Duration> {
        let at = self.timer.poll(now)?;
        self.remaining -= 1;
        if self.remaining == 0 {
            self.timer.cancel();
        }
        Some(at)
    }
}

impl Default for TypewriterTimer {
    fn default() -> Self {
        Self::new(DEFAULT_TYPING_INTERVAL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn run_is_bounded_by_line_length() {
        let mut tw = TypewriterTimer::default();
        assert!(tw.start(ms(0), 3));
        let mut ticks = Vec::new();
        while let Some(at) = tw.poll(ms(10_000)) {
            ticks.push(at);
        }
        assert_eq!(ticks, vec![ms(30), ms(60), ms(90)]);
        assert!(!tw.is_running());
    }

    #[test]
    fn restart_discards_previous_run() {
        let mut tw = TypewriterTimer::default();
        tw.start(ms(0), 10);
        assert_eq!(tw.poll(ms(30)), Some(ms(30)));
        tw.start(ms(45), 2);
        assert_eq!(tw.poll(ms(60)), None);
        assert_eq!(tw.poll(ms(75)), Some(ms(75)));
        assert_eq!(tw.poll(ms(105)), Some(ms(105)));
        assert_eq!(tw.poll(ms(10_000)), None);
    }

    #[test]
    fn nothing_to_tick() {
        let mut tw = TypewriterTimer::default();
        assert!(!tw.start(ms(0), 0));
        assert!(!tw.is_running());

        let mut instant = TypewriterTimer::new(Duration::ZERO);
        assert!(!instant.start(ms(0), 12));
        assert!(!instant.is_running());
    }

    #[test]
    fn cancel_stops_ticks() {
        let mut tw = TypewriterTimer::default();
        tw.start(ms(0), 5);
        tw.cancel();
        assert_eq!(tw.poll(ms(1_000)), None);
    }
}
