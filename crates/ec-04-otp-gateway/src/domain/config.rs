//! # OTP Configuration

use chrono::Duration;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OtpConfig {
    /// Decimal digits per code. Clamped to `4..=10`.
    pub code_length: usize,
    pub code_ttl_secs: u64,
    pub token_ttl_secs: u64,
    /// Wrong codes tolerated before the OTP expires. Clamped to `1..=100`.
    pub max_failed_attempts: u32,
}

impl Default for OtpConfig {
    fn default() -> Self {
        Self {
            code_length: 6,
            code_ttl_secs: 600,
            token_ttl_secs: 3600,
            max_failed_attempts: 5,
        }
    }
}

impl OtpConfig {
    pub fn effective_code_length(&self) -> usize {
        self.code_length.clamp(4, 10)
    }

    pub fn effective_max_failed_attempts(&self) -> u32 {
        self.max_failed_attempts.clamp(1, MAX_FAILED_ATTEMPTS)
    }

    pub fn code_ttl(&self) -> Duration {
        seconds(self.code_ttl_secs)
    }

    pub fn token_ttl(&self) -> Duration {
        seconds(self.token_ttl_secs)
    }
}

const MAX_FAILED_ATTEMPTS: u32 = 100;

/// Longer lifetimes are capped to one year.
const MAX_TTL_SECS: u64 = 365 * 24 * 60 * 60;

fn seconds(secs: u64) -> Duration {
    Duration::seconds(secs.min(MAX_TTL_SECS) as i64)
}
