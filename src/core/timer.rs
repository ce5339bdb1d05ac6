/// Cancellable deadline timers on a host-supplied monotonic clock.
///
/// Nothing here sleeps. A timer only remembers when it is next due; the
/// owner polls it with the current time and gets back the instant each
/// firing was scheduled for, so a late poll replays firings in order.
use std::time::Duration;

#[derive(Debug, Clone, Default)]
pub struct Timer {
    deadline: Option<Duration>,
    period: Option<Duration>,
}

impl Timer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arm a single firing `delay` after `now`, replacing any pending one.
    pub fn arm_once(&mut self, now: Duration, delay: Duration) {
        self.deadline = Some(now + delay);
        self.period = None;
    }

    /// Arm a repeating firing every `interval`, first one at `now + interval`.
    ///
    /// `interval` must be non-zero.
    pub fn arm_periodic(&mut self, now: Duration, interval: Duration) {
        debug_assert!(!interval.is_zero(), "periodic timer needs a non-zero interval");
        self.deadline = Some(now + interval);
        self.period = Some(interval);
    }

    /// Drop the pending deadline. A cancelled timer has nothing left to poll.
    pub fn cancel(&mut self) {
        self.deadline = None;
        self.period = None;
    }

    pub fn is_armed(&self) -> bool {
        self.deadline.is_some()
    }

    pub fn deadline(&self) -> Option<Duration> {
        self.deadline
    }

    /// Consume one firing if it is due at `now`, returning its scheduled
    /// instant. One-shot timers disarm; periodic timers move to the next
    /// deadline.
    pub fn poll(&mut self, now: Duration) -> Option<Duration> {
        let due = self.deadline.filter(|deadline| *deadline <= now)?;
        match self.period {
            Some(period) => self.deadline = Some(due + period),
            None => self.deadline = None,
        }
        Some(due)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn one_shot_fires_once() {
        let mut timer = Timer::new();
        timer.arm_once(ms(100), ms(50));
        assert_eq!(timer.poll(ms(149)), None);
        assert_eq!(timer.poll(ms(500)), Some(ms(150)));
        assert_eq!(timer.poll(ms(1000)), None);
        assert!(!timer.is_armed());
    }

    #[test]
    fn periodic_replays_missed_firings_in_order() {
        let mut timer = Timer::new();
        timer.arm_periodic(ms(0), ms(30));
        let mut fired = Vec::new();
        while let Some(at) = timer.poll(ms(100)) {
            fired.push(at);
        }
        assert_eq!(fired, vec![ms(30), ms(60), ms(90)]);
        assert_eq!(timer.deadline(), Some(ms(120)));
    }

    #[test]
    fn rearming_replaces_pending() {
        let mut timer = Timer::new();
        timer.arm_once(ms(0), ms(100));
        timer.arm_once(ms(50), ms(100));
        assert_eq!(timer.deadline(), Some(ms(150)));
        assert_eq!(timer.poll(ms(100)), None);
        assert_eq!(timer.poll(ms(150)), Some(ms(150)));
    }

    #[test]
    fn cancelled_timer_never_fires() {
        let mut timer = Timer::new();
        timer.arm_periodic(ms(0), ms(10));
        timer.cancel();
        assert_eq!(timer.poll(ms(1_000)), None);
        assert!(!timer.is_armed());

        // Cancelling an idle timer is harmless.
        timer.cancel();
        assert_eq!(timer.deadline(), None);
    }
}
