//! Urgent line-level signals: severity keywords and template bursts.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use recall_core::config::TriggerConfig;
use recall_core::text::mask_for_template_key;

use crate::burst::TemplateBurstDetector;

/// A line that should start a cycle without waiting for novelty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum UrgentSignal {
    Severity { level: u8 },
    Burst { template_key: String },
}

/// Severity of a message: 3 fatal, 2 error, 1 warning, 0 otherwise.
pub fn severity_level(config: &TriggerConfig, message: &str) -> u8 {
    let lower = message.to_lowercase();
    if config.severity_keywords_fatal.iter().any(|kw| lower.contains(kw.as_str())) {
        return 3;
    }
    if config.severity_keywords_error.iter().any(|kw| lower.contains(kw.as_str())) {
        return 2;
    }
    if lower.contains("warn") {
        return 1;
    }
    0
}

/// Checks each line for urgent signals. Severity wins over burst; the burst
/// detector still sees every line so its statistics stay current.
#[derive(Debug, Clone)]
pub struct SignalDetector {
    config: TriggerConfig,
    burst: TemplateBurstDetector,
}

impl SignalDetector {
    pub fn new(config: TriggerConfig) -> Self {
        let burst = TemplateBurstDetector::new(config.burst_window_secs, config.burst_ema_alpha, config.burst_sigma);
        Self { config, burst }
    }

    pub fn check(&mut self, ts: DateTime<Utc>, message: &str) -> Option<UrgentSignal> {
        let severity = if self.config.enable_severity_trigger {
            let lower = message.to_lowercase();
            self.config
                .trigger_keywords
                .iter()
                .any(|kw| lower.contains(kw.as_str()))
                .then(|| UrgentSignal::Severity {
                    level: severity_level(&self.config, message),
                })
        } else {
            None
        };

        let burst = if self.config.enable_burst_trigger {
            let key = mask_for_template_key(message);
            self.burst
                .push_and_check(ts, &key)
                .then_some(UrgentSignal::Burst { template_key: key })
        } else {
            None
        };

        severity.or(burst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn ts() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
    }

    #[test]
    fn severity_levels() {
        let config = TriggerConfig::default();
        assert_eq!(severity_level(&config, "KERNEL PANIC on node 7"), 3);
        assert_eq!(severity_level(&config, "Exception in receiveBlock"), 2);
        assert_eq!(severity_level(&config, "WARN slow disk"), 1);
        assert_eq!(severity_level(&config, "Served block blk_1"), 0);
    }

    #[test]
    fn keyword_line_is_urgent() {
        let mut detector = SignalDetector::new(TriggerConfig::default());
        let signal = detector.check(ts(), "java.io.IOException: Connection reset, fatal");
        assert_eq!(signal, Some(UrgentSignal::Severity { level: 3 }));
    }

    #[test]
    fn disabled_signals_stay_quiet() {
        let config = TriggerConfig {
            enable_severity_trigger: false,
            enable_burst_trigger: false,
            ..TriggerConfig::default()
        };
        let mut detector = SignalDetector::new(config);
        assert_eq!(detector.check(ts(), "fatal machine check"), None);
    }

    #[test]
    fn ordinary_line_is_not_urgent() {
        let mut detector = SignalDetector::new(TriggerConfig::default());
        assert_eq!(detector.check(ts(), "Receiving block blk_12 src: /10.0.0.1:50010"), None);
    }
}
