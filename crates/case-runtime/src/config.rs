//! # Runtime Configuration
//!
//! Unified configuration for all subsystems.
//!
//! ## Security Requirements
//!
//! - The signing secret MUST NOT be the default zero value in production
//! - Every other setting has a sane default with override capability

use crate::telemetry::TelemetryConfig;
use ec_01_signature_engine::{KeyRing, SignatureError, SigningKey};
use ec_02_sequence_allocator::{AllocatorConfig, IdentifierFormat};
use ec_03_chain_linker::LinkerConfig;
use ec_04_otp_gateway::OtpConfig;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;
use tracing::{info, warn};

/// Complete runtime configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    pub signing: SigningConfig,
    /// Retry policy for number allocation and lifecycle updates.
    pub allocator: AllocatorConfig,
    pub identifiers: IdentifierFormat,
    pub otp: OtpConfig,
    pub telemetry: TelemetryConfig,
}

impl RuntimeConfig {
    /// Defaults overridden by environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `EC_SIGNING_SECRET`: hex-encoded HMAC secret, at least 32 bytes
    /// - `EC_SIGNING_KEY_ID`: id stamped into signatures (default: k1)
    /// - `EC_OTP_TTL_SECS`: code lifetime (default: 600)
    /// - `EC_TOKEN_TTL_SECS`: access token lifetime (default: 3600)
    /// - `EC_OTP_MAX_FAILED_ATTEMPTS`: wrong codes before expiry (default: 5)
    /// - `EC_ALLOCATOR_MAX_ATTEMPTS`: allocation attempts (default: 5)
    /// - plus the logging variables read by [`TelemetryConfig`]
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Like [`from_env`](Self::from_env) with an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(secret) = lookup("EC_SIGNING_SECRET") {
            config.signing.secret_hex = secret.trim().to_string();
            info!("Loaded signing secret from environment");
        }
        if let Some(key_id) = lookup("EC_SIGNING_KEY_ID") {
            config.signing.key_id = key_id.trim().to_string();
        }

        override_parsed(&lookup, "EC_OTP_TTL_SECS", &mut config.otp.code_ttl_secs);
        override_parsed(&lookup, "EC_TOKEN_TTL_SECS", &mut config.otp.token_ttl_secs);
        override_parsed(
            &lookup,
            "EC_OTP_MAX_FAILED_ATTEMPTS",
            &mut config.otp.max_failed_attempts,
        );
        override_parsed(
            &lookup,
            "EC_ALLOCATOR_MAX_ATTEMPTS",
            &mut config.allocator.max_attempts,
        );

        config.telemetry = TelemetryConfig::from_lookup(&lookup);
        config
    }

    pub fn from_json_str(raw: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(raw)?)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&raw)
    }

    /// Replace the active signing key.
    pub fn with_signing_secret(mut self, key_id: impl Into<String>, secret: &[u8]) -> Self {
        self.signing.key_id = key_id.into();
        self.signing.secret_hex = hex::encode(secret);
        self
    }

    pub fn linker_config(&self) -> LinkerConfig {
        LinkerConfig {
            allocator: self.allocator.clone(),
            identifiers: self.identifiers.clone(),
        }
    }

    /// Validate configuration for production readiness.
    ///
    /// # Returns
    ///
    /// Returns `Err` if:
    /// - the signing secret is the default zero value
    /// - any configured key is malformed or too short
    pub fn validate_for_production(&self) -> Result<(), ConfigError> {
        let secret = decode_secret(&self.signing.key_id, &self.signing.secret_hex)?;
        if secret.iter().all(|b| *b == 0) {
            return Err(ConfigError::InsecureSigningSecret);
        }
        self.signing.key_ring().map(|_| ())
    }
}

fn override_parsed<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, var: &str, slot: &mut T) {
    let Some(raw) = lookup(var) else {
        return;
    };
    match raw.trim().parse() {
        Ok(value) => *slot = value,
        Err(_) => warn!(variable = var, value = %raw, "Ignoring unparseable override"),
    }
}

/// Key material for the signature engine.
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SigningConfig {
    pub key_id: String,
    /// Hex-encoded HMAC secret. MUST be overridden in production.
    pub secret_hex: String,
    /// Rotated-out keys still accepted for verification.
    pub retired: Vec<RetiredKey>,
}

impl Default for SigningConfig {
    fn default() -> Self {
        Self {
            key_id: "k1".to_string(),
            secret_hex: "00".repeat(32),
            retired: Vec::new(),
        }
    }
}

impl SigningConfig {
    pub fn key_ring(&self) -> Result<KeyRing, ConfigError> {
        let active = build_key(&self.key_id, &self.secret_hex)?;
        self.retired.iter().try_fold(KeyRing::new(active), |ring, key| {
            Ok(ring.with_retired(build_key(&key.key_id, &key.secret_hex)?))
        })
    }
}

impl fmt::Debug for SigningConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SigningConfig")
            .field("key_id", &self.key_id)
            .field("secret_hex", &"<redacted>")
            .field("retired", &self.retired)
            .finish()
    }
}

#[derive(Clone, Serialize, Deserialize)]
pub struct RetiredKey {
    pub key_id: String,
    pub secret_hex: String,
}

impl fmt::Debug for RetiredKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RetiredKey")
            .field("key_id", &self.key_id)
            .finish_non_exhaustive()
    }
}

fn decode_secret(key_id: &str, secret_hex: &str) -> Result<Vec<u8>, ConfigError> {
    hex::decode(secret_hex.trim()).map_err(|_| ConfigError::SecretNotHex {
        key_id: key_id.to_string(),
    })
}

fn build_key(key_id: &str, secret_hex: &str) -> Result<SigningKey, ConfigError> {
    let secret = decode_secret(key_id, secret_hex)?;
    SigningKey::new(key_id, secret).map_err(|source| ConfigError::InvalidKey {
        key_id: key_id.to_string(),
        source,
    })
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error(
        "SECURITY VIOLATION: signing secret is the default zero value. \
         Set EC_SIGNING_SECRET or provide it in the config file."
    )]
    InsecureSigningSecret,

    #[error("Signing secret for key `{key_id}` is not valid hex")]
    SecretNotHex { key_id: String },

    #[error("Signing key `{key_id}` rejected: {source}")]
    InvalidKey {
        key_id: String,
        #[source]
        source: SignatureError,
    },

    #[error("Cannot read config file {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed config: {0}")]
    Parse(#[from] serde_json::Error),
}
