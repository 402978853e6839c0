//! Idle tracking for automatic undo.
//!
//! Timestamps are host wall-clock milliseconds (for example
//! `performance.now()`); the clock never reads time itself.

/// Time of the last user interaction and the idle threshold.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InteractionClock {
    last_interaction_ms: f64,
    idle_threshold_ms: f64,
}

impl InteractionClock {
    /// A clock whose last interaction is at time zero.
    pub fn new(idle_threshold_ms: f64) -> Self {
        Self {
            last_interaction_ms: 0.0,
            idle_threshold_ms,
        }
    }

    /// Record an interaction at `now_ms`.
    pub fn touch(&mut self, now_ms: f64) {
        self.last_interaction_ms = now_ms;
    }

    /// Milliseconds since the last interaction.
    pub fn elapsed(&self, now_ms: f64) -> f64 {
        now_ms - self.last_interaction_ms
    }

    /// Check if more than the threshold has passed since the last interaction.
    ///
    /// Level-triggered: stays true on every call until the next `touch`.
    pub fn is_idle(&self, now_ms: f64) -> bool {
        self.elapsed(now_ms) > self.idle_threshold_ms
    }

    pub fn last_interaction_ms(&self) -> f64 {
        self.last_interaction_ms
    }

    pub fn idle_threshold_ms(&self) -> f64 {
        self.idle_threshold_ms
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_threshold_is_strict() {
        let mut clock = InteractionClock::new(3000.0);
        clock.touch(1000.0);

        assert!(!clock.is_idle(3999.0));
        assert!(!clock.is_idle(4000.0));
        assert!(clock.is_idle(4000.5));
    }

    #[test]
    fn test_stays_idle_until_touched() {
        let mut clock = InteractionClock::new(3000.0);
        assert!(clock.is_idle(5000.0));
        assert!(clock.is_idle(5016.0));

        clock.touch(5032.0);
        assert!(!clock.is_idle(5048.0));
        assert_eq!(clock.elapsed(5048.0), 16.0);
    }
}
