//! Per-template burst detection over a sliding time window.

use std::collections::{HashMap, VecDeque};

use chrono::{DateTime, Duration, Utc};

use recall_core::clock::duration_secs;

#[derive(Debug, Clone, Copy, Default)]
struct EmaStats {
    mean: f64,
    var: f64,
}

/// Flags a template whose count in the window jumps above its running
/// `mean + sigma * std`.
///
/// Counts are kept per template key over `window_secs`; the mean and
/// variance are exponential moving averages with factor `alpha`. A burst is
/// only reported when the threshold itself exceeds 1, so a template's first
/// appearance never counts.
#[derive(Debug, Clone)]
pub struct TemplateBurstDetector {
    window: Duration,
    alpha: f64,
    sigma: f64,
    queue: VecDeque<(DateTime<Utc>, String)>,
    counts: HashMap<String, u64>,
    stats: HashMap<String, EmaStats>,
}

impl TemplateBurstDetector {
    pub fn new(window_secs: u64, alpha: f64, sigma: f64) -> Self {
        Self {
            window: duration_secs(window_secs),
            alpha,
            sigma,
            queue: VecDeque::new(),
            counts: HashMap::new(),
            stats: HashMap::new(),
        }
    }

    /// Record one occurrence of `key` at `ts` and report whether it bursts.
    pub fn push_and_check(&mut self, ts: DateTime<Utc>, key: &str) -> bool {
        if key.is_empty() {
            return false;
        }
        self.queue.push_back((ts, key.to_string()));
        *self.counts.entry(key.to_string()).or_insert(0) += 1;
        self.evict(ts);

        let x = self.counts.get(key).copied().unwrap_or(0) as f64;
        let alpha = self.alpha;
        let stats = match self.stats.get_mut(key) {
            Some(st) => {
                let prev_mean = st.mean;
                st.mean = (1.0 - alpha) * st.mean + alpha * x;
                st.var = (1.0 - alpha) * st.var + alpha * (x - prev_mean) * (x - st.mean);
                *st
            }
            None => {
                let st = EmaStats { mean: x, var: 0.0 };
                self.stats.insert(key.to_string(), st);
                st
            }
        };

        let threshold = stats.mean + self.sigma * stats.var.max(0.0).sqrt();
        threshold > 1.0 && x > threshold
    }

    /// Occurrences of `key` currently in the window.
    pub fn window_count(&self, key: &str) -> u64 {
        self.counts.get(key).copied().unwrap_or(0)
    }

    fn evict(&mut self, now: DateTime<Utc>) {
        if self.window <= Duration::zero() {
            return;
        }
        let Some(cutoff) = now.checked_sub_signed(self.window) else {
            return;
        };
        while let Some((ts, _)) = self.queue.front() {
            if *ts >= cutoff {
                break;
            }
            let Some((_, key)) = self.queue.pop_front() else {
                break;
            };
            if let Some(count) = self.counts.get_mut(&key) {
                *count = count.saturating_sub(1);
                if *count == 0 {
                    // Idle for a whole window: forget the template entirely.
                    self.counts.remove(&key);
                    self.stats.remove(&key);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn t(secs: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap() + Duration::seconds(secs)
    }

    #[test]
    fn empty_key_never_bursts() {
        let mut d = TemplateBurstDetector::new(60, 0.1, 3.0);
        assert!(!d.push_and_check(t(0), ""));
    }

    #[test]
    fn first_occurrence_is_not_a_burst() {
        let mut d = TemplateBurstDetector::new(60, 0.1, 3.0);
        assert!(!d.push_and_check(t(0), "served block <num>"));
    }

    #[test]
    fn sudden_spike_after_steady_rate_bursts() {
        let mut d = TemplateBurstDetector::new(10, 0.05, 2.0);
        // Steady: one every 5s. Early pushes are warm-up.
        let mut burst_seen = false;
        for i in 0..400 {
            let fired = d.push_and_check(t(i * 5), "receiving block <num>");
            if i >= 200 {
                burst_seen |= fired;
            }
        }
        assert!(!burst_seen, "steady rate must not burst");
        // Spike: many in one second.
        let mut fired = false;
        for _ in 0..30 {
            fired |= d.push_and_check(t(2_001), "receiving block <num>");
        }
        assert!(fired);
    }

    #[test]
    fn window_evicts_old_entries() {
        let mut d = TemplateBurstDetector::new(10, 0.1, 3.0);
        d.push_and_check(t(0), "k");
        d.push_and_check(t(5), "k");
        assert_eq!(d.window_count("k"), 2);
        d.push_and_check(t(30), "k");
        assert_eq!(d.window_count("k"), 1);
    }

    #[test]
    fn idle_templates_are_forgotten() {
        let mut d = TemplateBurstDetector::new(10, 0.1, 3.0);
        d.push_and_check(t(0), "a");
        d.push_and_check(t(1), "b");
        assert_eq!(d.stats.len(), 2);
        d.push_and_check(t(100), "b");
        assert!(!d.stats.contains_key("a"));
        assert_eq!(d.window_count("a"), 0);
        assert_eq!(d.stats.len(), 1);
    }
}
