//! # Signature Engine (EC-01)
//!
//! Makes evidentiary records tamper-evident once captured.
//!
//! ## Architecture
//!
//! This subsystem follows hexagonal architecture:
//! - **Domain Layer** (`domain/`): canonical encoding and HMAC primitives, no I/O
//! - **Ports Layer** (`ports/`): inbound API and the integrity-flag sink
//! - **Service Layer** (`service.rs`): wires the key ring to the domain
//!
//! ## Guarantees
//!
//! - **Deterministic canonicalization**: fixed field order, fixed number
//!   encoding, so verification is a pure function of stored content.
//! - **Keyed digest**: HMAC-SHA256 under a secret held only by the service.
//! - **Report, never raise**: a failed verification is a `false` / an
//!   [`IntegrityReport::Violated`], flagged for manual review. Reads are not blocked.

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

pub use adapters::InMemoryFlagSink;
pub use domain::canonical::{canonical_bytes, Canonical, CanonicalWriter, CANONICAL_VERSION};
pub use domain::entities::{IntegrityFailure, IntegrityReport, KeyRing, RecordKind, RecordRef, SigningKey};
pub use domain::errors::SignatureError;
pub use ports::inbound::SignatureEngineApi;
pub use ports::outbound::IntegrityFlagSink;
pub use service::SignatureService;
