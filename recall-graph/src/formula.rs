//! Weight arithmetic shared by sightings and decay passes.

use chrono::{DateTime, Utc};

/// Seconds from `from` to `to`, clamped at zero.
pub fn elapsed_secs(from: DateTime<Utc>, to: DateTime<Utc>) -> f64 {
    let millis = (to - from).num_milliseconds().max(0);
    millis as f64 / 1000.0
}

/// Multiplicative decay after `elapsed_secs` for the given half-life.
///
/// Returns 1.0 for non-positive elapsed time or a non-positive half-life.
pub fn decay_factor(elapsed_secs: f64, half_life_secs: f64) -> f64 {
    if elapsed_secs <= 0.0 || half_life_secs <= 0.0 {
        return 1.0;
    }
    0.5_f64.powf(elapsed_secs / half_life_secs)
}

/// Bring a weight from `as_of` forward to `now`.
pub fn decayed(weight: f64, as_of: DateTime<Utc>, now: DateTime<Utc>, half_life_secs: f64) -> f64 {
    clamp_unit(weight * decay_factor(elapsed_secs(as_of, now), half_life_secs))
}

/// Saturating reinforcement: `1 - (1 - w)(1 - gain)`.
pub fn reinforce(weight: f64, gain: f64) -> f64 {
    let gain = clamp_unit(gain);
    clamp_unit(1.0 - (1.0 - clamp_unit(weight)) * (1.0 - gain))
}

/// Clamp into [0.0, 1.0]; NaN maps to 0.0.
pub fn clamp_unit(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}
