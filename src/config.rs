//! # Engine Configuration
//!
//! Small plain-struct configuration with environment overrides. The engine has
//! deliberately few knobs: the counter-retry budget and its backoff shape.

use crate::error::{EngineError, Result};
use std::time::Duration;

/// Tunable parameters for the execution engine.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Maximum attempts for an atomic counter increment that keeps hitting
    /// persistence conflicts. Exhaustion degrades to a per-increment failure,
    /// never a pass-level abort.
    pub max_counter_retries: u32,
    /// Base delay for conflict-retry backoff.
    pub backoff_base: Duration,
    /// Cap applied after exponential growth.
    pub backoff_max: Duration,
    /// Multiplier applied per attempt.
    pub backoff_multiplier: f64,
    /// Apply up to 10% random jitter to each delay.
    pub backoff_jitter: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_counter_retries: 4,
            backoff_base: Duration::from_millis(25),
            backoff_max: Duration::from_millis(250),
            backoff_multiplier: 2.0,
            backoff_jitter: true,
        }
    }
}

impl EngineConfig {
    /// Load defaults, then apply any `TASKFLOW_*` environment overrides.
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(retries) = std::env::var("TASKFLOW_MAX_COUNTER_RETRIES") {
            config.max_counter_retries = retries.parse().map_err(|e| {
                EngineError::Configuration(format!("invalid max_counter_retries: {e}"))
            })?;
        }

        if let Ok(base_ms) = std::env::var("TASKFLOW_BACKOFF_BASE_MS") {
            let ms: u64 = base_ms.parse().map_err(|e| {
                EngineError::Configuration(format!("invalid backoff_base_ms: {e}"))
            })?;
            config.backoff_base = Duration::from_millis(ms);
        }

        if let Ok(max_ms) = std::env::var("TASKFLOW_BACKOFF_MAX_MS") {
            let ms: u64 = max_ms
                .parse()
                .map_err(|e| EngineError::Configuration(format!("invalid backoff_max_ms: {e}")))?;
            config.backoff_max = Duration::from_millis(ms);
        }

        if let Ok(jitter) = std::env::var("TASKFLOW_BACKOFF_JITTER") {
            config.backoff_jitter = jitter.parse().map_err(|e| {
                EngineError::Configuration(format!("invalid backoff_jitter: {e}"))
            })?;
        }

        Ok(config)
    }

    /// Delay before the given retry attempt (0-based), or `None` once the
    /// budget is exhausted.
    pub fn retry_delay(&self, attempt: u32) -> Option<Duration> {
        if attempt >= self.max_counter_retries {
            return None;
        }

        let delay = self
            .backoff_base
            .mul_f64(self.backoff_multiplier.powi(attempt as i32))
            .min(self.backoff_max);

        if self.backoff_jitter {
            let jitter = fastrand::f64() * 0.1; // 10% jitter
            Some(delay.mul_f64(1.0 + jitter).min(self.backoff_max))
        } else {
            Some(delay)
        }
    }
}
