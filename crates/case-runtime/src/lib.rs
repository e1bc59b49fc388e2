//! # Case Runtime
//!
//! Hosts the evidence-chain subsystems in one process.
//!
//! ## Modular Structure
//!
//! - `config` - `RuntimeConfig`, loaded from JSON or environment
//! - `errors` - `IngestError` for signing and storing new evidence
//! - `telemetry` - `tracing-subscriber` bootstrap
//! - `store` - in-memory store implementing every outbound port
//! - `mailer` - log-only OTP mailer
//! - `runtime` - the `EvidenceRuntime` facade
//!
//! ## Startup Sequence
//!
//! 1. Load configuration (file named by `EC_CONFIG`, else environment)
//! 2. Initialize logging
//! 3. Refuse the default signing secret
//! 4. Wire the services over a fresh store
//! 5. Serve until interrupted

pub mod config;
pub mod errors;
pub mod mailer;
pub mod runtime;
pub mod store;
pub mod telemetry;

pub use config::{ConfigError, RetiredKey, RuntimeConfig, SigningConfig};
pub use errors::IngestError;
pub use mailer::LoggingMailer;
pub use runtime::{EvidenceRuntime, RuntimeOtpGateway};
pub use store::{FlaggedRecord, InMemoryEvidenceStore};
pub use telemetry::{TelemetryConfig, TelemetryError};
