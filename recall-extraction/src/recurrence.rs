use std::collections::{BTreeSet, HashMap, VecDeque};

use chrono::{DateTime, Duration, Utc};

use recall_core::clock::duration_secs;

/// Counts, per token, how many lines inside a sliding time window
/// contained it. A token repeated within one line counts once.
#[derive(Debug, Clone)]
pub struct TokenRecurrenceCounter {
    window: Duration,
    queue: VecDeque<(DateTime<Utc>, BTreeSet<String>)>,
    counts: HashMap<String, usize>,
}

impl TokenRecurrenceCounter {
    pub fn new(window_secs: u64) -> Self {
        Self {
            window: duration_secs(window_secs),
            queue: VecDeque::new(),
            counts: HashMap::new(),
        }
    }

    pub fn push<'a>(&mut self, ts: DateTime<Utc>, tokens: impl IntoIterator<Item = &'a str>) {
        let set: BTreeSet<String> = tokens.into_iter().filter(|t| !t.is_empty()).map(str::to_string).collect();
        for t in &set {
            *self.counts.entry(t.clone()).or_insert(0) += 1;
        }
        self.queue.push_back((ts, set));
        self.evict(ts);
    }

    /// Lines in the window containing `token`.
    pub fn rf(&self, token: &str) -> usize {
        self.counts.get(token).copied().unwrap_or(0)
    }

    fn evict(&mut self, now: DateTime<Utc>) {
        if self.window <= Duration::zero() {
            return;
        }
        let Some(cutoff) = now.checked_sub_signed(self.window) else {
            return;
        };
        while self.queue.front().is_some_and(|(ts, _)| *ts < cutoff) {
            let Some((_, set)) = self.queue.pop_front() else {
                break;
            };
            for t in set {
                if let Some(c) = self.counts.get_mut(&t) {
                    *c = c.saturating_sub(1);
                    if *c == 0 {
                        self.counts.remove(&t);
                    }
                }
            }
        }
    }
}
