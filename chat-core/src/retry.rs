//! Bounded retry policy for feed recovery.
//!
//! A broken subscription is never retried automatically. The owning layer
//! decides whether to resubscribe and uses this policy to pace the
//! attempts: delays grow exponentially with random jitter, and the
//! attempt count is capped so recovery can never turn into a silent
//! infinite loop.

use serde::Deserialize;
use std::time::Duration;

/// Maximum random jitter added to each delay, in milliseconds.
const JITTER_MS: u64 = 250;

/// Pacing for bounded resubscribe attempts.
///
/// Deserializable so embedders can carry it as a section of their config
/// files; every field has a default.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RetryPolicy {
    /// Maximum number of attempts before giving up (default: 5).
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    /// Delay before the first retry, in milliseconds (default: 500).
    #[serde(default = "default_base_delay_ms")]
    pub base_delay_ms: u64,
    /// Upper bound for any single delay, in milliseconds (default: 15000).
    #[serde(default = "default_max_delay_ms")]
    pub max_delay_ms: u64,
}

// Default value functions
fn default_max_attempts() -> u32 {
    5
}

fn default_base_delay_ms() -> u64 {
    500
}

fn default_max_delay_ms() -> u64 {
    15_000 // 15 seconds
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            base_delay_ms: default_base_delay_ms(),
            max_delay_ms: default_max_delay_ms(),
        }
    }
}

impl RetryPolicy {
    /// Delay to wait after the given failed attempt (1-based) before the
    /// next one.
    ///
    /// Returns `None` once the attempt budget is exhausted, i.e. when no
    /// further attempt is allowed after `attempt`.
    ///
    /// Formula: min(base * 2^(attempt-1), max) + random(0..250ms)
    pub fn delay_for(&self, attempt: u32) -> Option<Duration> {
        if attempt == 0 || attempt >= self.max_attempts {
            return None;
        }
        // Exponent capped well below u64 overflow; max_delay_ms caps the
        // result anyway.
        let exponent = attempt.saturating_sub(1).min(16);
        let base_ms = self
            .base_delay_ms
            .saturating_mul(2u64.pow(exponent))
            .min(self.max_delay_ms);
        Some(Duration::from_millis(base_ms) + Duration::from_millis(random_jitter_ms()))
    }
}

/// Generate random jitter between 0 and 250 milliseconds.
fn random_jitter_ms() -> u64 {
    let mut bytes = [0u8; 8];
    getrandom::getrandom(&mut bytes).expect("getrandom failed");
    let random = u64::from_le_bytes(bytes);
    random % (JITTER_MS + 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_policy_is_valid() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.max_attempts, 5);
        assert_eq!(policy.base_delay_ms, 500);
        assert_eq!(policy.max_delay_ms, 15_000);
    }

    #[test]
    fn delay_grows_with_attempt() {
        let policy = RetryPolicy::default();

        // Attempt 1: base = 500ms. Attempt 3: base = 2000ms.
        let delay1 = policy.delay_for(1).unwrap();
        let delay3 = policy.delay_for(3).unwrap();

        assert!(delay1 >= Duration::from_millis(500));
        assert!(delay3 >= Duration::from_millis(2000));
    }

    #[test]
    fn delay_capped_at_max_plus_jitter() {
        let policy = RetryPolicy {
            max_attempts: 10,
            base_delay_ms: 500,
            max_delay_ms: 1_000,
        };

        let delay = policy.delay_for(9).unwrap();

        assert!(delay <= Duration::from_millis(1_000 + JITTER_MS));
    }

    #[test]
    fn exhausted_attempts_return_none() {
        let policy = RetryPolicy::default();

        // Default budget is 5 attempts: delays exist after failures 1-4,
        // none after the fifth.
        assert!(policy.delay_for(4).is_some());
        assert!(policy.delay_for(5).is_none());
        assert!(policy.delay_for(0).is_none());
    }

    #[test]
    fn zero_attempt_policy_never_delays() {
        let policy = RetryPolicy {
            max_attempts: 0,
            ..RetryPolicy::default()
        };

        assert!(policy.delay_for(1).is_none());
    }

    #[test]
    fn jitter_creates_variance() {
        let policy = RetryPolicy::default();
        let mut delays: Vec<Duration> = Vec::new();

        for _ in 0..20 {
            delays.push(policy.delay_for(1).unwrap());
        }

        // Probabilistic: 20 samples over 251 jitter values collide on a
        // narrow band only with negligible probability.
        let min = delays.iter().min().unwrap();
        let max = delays.iter().max().unwrap();
        assert!(
            max.as_millis() - min.as_millis() >= 10,
            "Expected jitter variance, got min={:?} max={:?}",
            min,
            max
        );
    }

    #[test]
    fn policy_from_toml_string() {
        let toml = r#"
max_attempts = 3
base_delay_ms = 100
max_delay_ms = 2000
"#;

        let policy: RetryPolicy = toml::from_str(toml).unwrap();
        assert_eq!(policy.max_attempts, 3);
        assert_eq!(policy.base_delay_ms, 100);
        assert_eq!(policy.max_delay_ms, 2000);
    }

    #[test]
    fn policy_missing_fields_use_defaults() {
        let policy: RetryPolicy = toml::from_str("max_attempts = 2\n").unwrap();

        assert_eq!(policy.max_attempts, 2);
        assert_eq!(policy.base_delay_ms, 500);
        assert_eq!(policy.max_delay_ms, 15_000);
    }
}
