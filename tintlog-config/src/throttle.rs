//! Repeat-suppression parameters.
//!
//! The window is rolling: every passing call restarts it, so a tight loop
//! stays inside one window for as long as it keeps logging.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Serialize, Deserialize, Validate, Clone, PartialEq, Eq)]
pub struct ThrottleConfig {
    /// Silence (ms) after which a streak of identical logs ends.
    #[serde(default = "default_window_ms")]
    #[validate(range(min = 10, max = 3_600_000))]
    pub window_ms: u64,

    /// Identical calls in a row that are still emitted individually.
    #[serde(default = "default_min_threshold")]
    #[validate(range(min = 1, max = 10_000))]
    pub min_threshold: u32,
}

fn default_window_ms() -> u64 {
    1000
}

fn default_min_threshold() -> u32 {
    5
}

impl Default for ThrottleConfig {
    fn default() -> Self {
        Self {
            window_ms: default_window_ms(),
            min_threshold: default_min_threshold(),
        }
    }
}

impl ThrottleConfig {
    #[inline]
    pub fn window(&self) -> Duration {
        Duration::from_millis(self.window_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() {
        let config = ThrottleConfig::default();
        assert_eq!(config.window_ms, 1000);
        assert_eq!(config.min_threshold, 5);
        config.validate().expect("default throttle should validate");
    }

    #[test]
    fn zero_threshold_is_rejected() {
        let config = ThrottleConfig {
            min_threshold: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn partial_yaml_fills_defaults() {
        let config: ThrottleConfig = serde_yaml::from_str("window_ms: 250").unwrap();
        assert_eq!(config.window(), Duration::from_millis(250));
        assert_eq!(config.min_threshold, 5);
    }
}
