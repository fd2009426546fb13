//! Power-off debounce
//!
//! A single-slot timer. Each successful draw re-arms it; when it expires
//! the panel is powered off. Times are milliseconds on a monotonic clock.

/// Single-slot power-off timer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PowerOffTimer {
    delay_ms: u64,
    deadline_ms: Option<u64>,
}

impl PowerOffTimer {
    pub const fn new(delay_ms: u64) -> Self {
        Self {
            delay_ms,
            deadline_ms: None,
        }
    }

    /// Start or restart the timer; any pending deadline is replaced
    pub fn arm(&mut self, now_ms: u64) {
        self.deadline_ms = Some(now_ms.saturating_add(self.delay_ms));
    }

    pub fn cancel(&mut self) {
        self.deadline_ms = None;
    }

    pub fn deadline(&self) -> Option<u64> {
        self.deadline_ms
    }

    pub fn is_armed(&self) -> bool {
        self.deadline_ms.is_some()
    }

    /// Disarm and return true if the deadline has passed
    pub fn take_expired(&mut self, now_ms: u64) -> bool {
        match self.deadline_ms {
            Some(deadline) if now_ms >= deadline => {
                self.deadline_ms = None;
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rearm_replaces_deadline() {
        let mut timer = PowerOffTimer::new(2000);
        timer.arm(0);
        timer.arm(1500);
        assert_eq!(timer.deadline(), Some(3500));
        assert!(!timer.take_expired(2000));
        assert!(timer.take_expired(3500));
        assert!(!timer.is_armed());
        // Fires once
        assert!(!timer.take_expired(9000));
    }

    #[test]
    fn test_cancel() {
        let mut timer = PowerOffTimer::new(100);
        timer.arm(10);
        timer.cancel();
        assert!(!timer.take_expired(1000));
    }
}
