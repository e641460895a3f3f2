//! Timestamp sources.

use std::sync::{Mutex, PoisonError};

use chrono::{DateTime, TimeDelta, TimeZone, Utc};

/// Supplies creation timestamps.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Deterministic clock that advances by a fixed step on every reading.
#[derive(Debug)]
pub struct ManualClock {
    next: Mutex<DateTime<Utc>>,
    step: TimeDelta,
}

impl Default for ManualClock {
    /// Starts at 2024-01-01T00:00:00Z and ticks one minute per reading.
    fn default() -> Self {
        Self::new(
            Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0)
                .single()
                .unwrap_or_default(),
            TimeDelta::minutes(1),
        )
    }
}

impl ManualClock {
    pub fn new(start: DateTime<Utc>, step: TimeDelta) -> Self {
        Self {
            next: Mutex::new(start),
            step,
        }
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        let mut next = self.next.lock().unwrap_or_else(PoisonError::into_inner);
        let now = *next;
        *next += self.step;
        now
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manual_clock_ticks_forward() {
        let clock = ManualClock::default();
        let first = clock.now();
        let second = clock.now();
        assert_eq!(second - first, TimeDelta::minutes(1));

        let custom = ManualClock::new(first, TimeDelta::hours(1));
        custom.now();
        assert_eq!(custom.now() - first, TimeDelta::hours(1));
    }

    #[test]
    fn manual_clock_readings_order_as_strings() {
        let clock = ManualClock::default();
        let a = clock.now().to_rfc3339();
        let b = clock.now().to_rfc3339();
        assert!(a < b);
    }
}
