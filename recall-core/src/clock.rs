//! Monotonic event-time source shared by the store and the trigger.

use chrono::{DateTime, Duration, Utc};

/// Non-decreasing clock fed by event timestamps.
///
/// Log timestamps can regress (clock skew between producers, out-of-order
/// delivery). Every consumer reads time through this clock so that decay,
/// trigger timing, and snapshot stamps all see the same ordered sequence.
#[derive(Debug, Clone, Default)]
pub struct MonotonicClock {
    last: Option<DateTime<Utc>>,
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance the clock with an observed timestamp and return the effective
    /// time: `max(previous, ts)`.
    pub fn observe(&mut self, ts: DateTime<Utc>) -> DateTime<Utc> {
        let effective = match self.last {
            Some(prev) if prev > ts => prev,
            _ => ts,
        };
        self.last = Some(effective);
        effective
    }

    /// The latest effective time, if any timestamp has been observed.
    pub fn now(&self) -> Option<DateTime<Utc>> {
        self.last
    }
}

/// A configured number of seconds as a signed duration, saturating at the
/// largest representable span.
pub fn duration_secs(secs: u64) -> Duration {
    i64::try_from(secs)
        .ok()
        .and_then(Duration::try_seconds)
        .unwrap_or(Duration::MAX)
}

/// `ts + secs`, saturating at the latest representable instant.
pub fn add_secs(ts: DateTime<Utc>, secs: u64) -> DateTime<Utc> {
    ts.checked_add_signed(duration_secs(secs)).unwrap_or(DateTime::<Utc>::MAX_UTC)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    #[test]
    fn never_goes_backwards() {
        let t0 = Utc.timestamp_opt(1_000, 0).unwrap();
        let mut clock = MonotonicClock::new();
        assert_eq!(clock.observe(t0), t0);
        assert_eq!(clock.observe(t0 - Duration::seconds(5)), t0);
        let t1 = t0 + Duration::seconds(3);
        assert_eq!(clock.observe(t1), t1);
        assert_eq!(clock.now(), Some(t1));
    }
}
