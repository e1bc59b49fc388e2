//! # Allocator Configuration

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Hard ceiling on `max_attempts`.
pub const MAX_ATTEMPTS_CEILING: u32 = 16;

/// Retry and backoff settings for optimistic allocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AllocatorConfig {
    /// Attempts per allocation before reporting contention. Clamped to `1..=16`.
    pub max_attempts: u32,
    /// Backoff before the second attempt; doubles per attempt.
    pub base_backoff_ms: u64,
    /// Upper bound on a single backoff.
    pub max_backoff_ms: u64,
    /// Randomize each backoff within `[b/2, b]`.
    pub jitter: bool,
}

impl Default for AllocatorConfig {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            base_backoff_ms: 5,
            max_backoff_ms: 100,
            jitter: true,
        }
    }
}

impl AllocatorConfig {
    /// No sleeping between attempts. For tests and single-writer setups.
    pub fn without_backoff(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            base_backoff_ms: 0,
            max_backoff_ms: 0,
            jitter: false,
        }
    }

    pub fn effective_max_attempts(&self) -> u32 {
        self.max_attempts.clamp(1, MAX_ATTEMPTS_CEILING)
    }

    /// Delay after failed attempt number `attempt` (1-based).
    pub fn backoff(&self, attempt: u32) -> Duration {
        let shift = attempt.saturating_sub(1).min(16);
        let ms = self
            .base_backoff_ms
            .saturating_mul(1u64 << shift)
            .min(self.max_backoff_ms);

        let ms = if self.jitter && ms > 1 {
            rand::thread_rng().gen_range(ms / 2..=ms)
        } else {
            ms
        };
        Duration::from_millis(ms)
    }
}
