//! Heartbeat scheduling

/// Tracks the heartbeat interval and when the last heartbeat went out
#[derive(Debug, Clone)]
pub struct HeartbeatTimer {
    default_secs: u64,
    interval_secs: u64,
    last_sent: Option<i64>,
}

impl HeartbeatTimer {
    pub fn new(default_secs: u64) -> Self {
        let default_secs = default_secs.max(1);
        Self {
            default_secs,
            interval_secs: default_secs,
            last_sent: None,
        }
    }

    /// Current interval in whole seconds
    #[inline]
    pub fn interval_secs(&self) -> u64 {
        self.interval_secs
    }

    /// Apply an interval announced by the server, in milliseconds
    ///
    /// `None` keeps the current interval, zero restores the default.
    /// Sub-second intervals round up to one second.
    pub fn set_interval_ms(&mut self, interval_ms: Option<u64>) {
        match interval_ms {
            None => {}
            Some(0) => self.interval_secs = self.default_secs,
            Some(ms) => self.interval_secs = (ms / 1000).max(1),
        }
    }

    /// Check if a heartbeat is owed at `now`
    ///
    /// Nothing has been sent yet on a fresh timer, so the first check is
    /// always due.
    pub fn is_due(&self, now: i64) -> bool {
        match self.last_sent {
            None => true,
            Some(last) => now.saturating_sub(last) >= self.interval_secs as i64,
        }
    }

    pub fn mark_sent(&mut self, now: i64) {
        self.last_sent = Some(now);
    }

    pub fn last_sent(&self) -> Option<i64> {
        self.last_sent
    }

    /// Forget the last heartbeat and the learned interval
    pub fn reset(&mut self) {
        self.interval_secs = self.default_secs;
        self.last_sent = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interval_from_milliseconds() {
        let mut timer = HeartbeatTimer::new(30);
        assert_eq!(timer.interval_secs(), 30);

        timer.set_interval_ms(Some(41_250));
        assert_eq!(timer.interval_secs(), 41);

        timer.set_interval_ms(None);
        assert_eq!(timer.interval_secs(), 41);

        timer.set_interval_ms(Some(0));
        assert_eq!(timer.interval_secs(), 30);

        timer.set_interval_ms(Some(250));
        assert_eq!(timer.interval_secs(), 1);
    }

    #[test]
    fn test_due() {
        let mut timer = HeartbeatTimer::new(30);
        assert!(timer.is_due(1000));

        timer.mark_sent(1000);
        assert!(!timer.is_due(1000));
        assert!(!timer.is_due(1029));
        assert!(timer.is_due(1030));
        assert!(timer.is_due(1100));
    }

    #[test]
    fn test_clock_going_backwards_is_not_due() {
        let mut timer = HeartbeatTimer::new(30);
        timer.mark_sent(1000);
        assert!(!timer.is_due(900));
    }

    #[test]
    fn test_reset() {
        let mut timer = HeartbeatTimer::new(30);
        timer.set_interval_ms(Some(10_000));
        timer.mark_sent(5);
        timer.reset();
        assert_eq!(timer.interval_secs(), 30);
        assert_eq!(timer.last_sent(), None);
    }

    #[test]
    fn test_zero_default_is_clamped() {
        assert_eq!(HeartbeatTimer::new(0).interval_secs(), 1);
    }
}
