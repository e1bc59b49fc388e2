//! # Signature Entities
//!
//! Key material, record references, and integrity reports.

use crate::domain::errors::SignatureError;
use std::fmt;
use uuid::Uuid;
use zeroize::Zeroizing;

/// Minimum secret length accepted for HMAC-SHA256 (bytes).
pub const MIN_SECRET_LEN: usize = 32;

/// Which kind of evidentiary record a signature covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordKind {
    EmissionReading,
    Challan,
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordKind::EmissionReading => f.write_str("emission_reading"),
            RecordKind::Challan => f.write_str("challan"),
        }
    }
}

/// Pointer to a signed record, used when flagging it for review.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RecordRef {
    pub kind: RecordKind,
    pub id: Uuid,
}

impl RecordRef {
    pub fn new(kind: RecordKind, id: Uuid) -> Self {
        Self { kind, id }
    }
}

impl fmt::Display for RecordRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.kind, self.id)
    }
}

/// A named HMAC secret.
///
/// The secret is wiped from memory when the key is dropped.
#[derive(Clone)]
pub struct SigningKey {
    key_id: String,
    secret: Zeroizing<Vec<u8>>,
}

impl SigningKey {
    /// Create a key.
    ///
    /// # Errors
    ///
    /// - `InvalidKey` if the id is empty or contains `:` (the signature separator)
    /// - `InvalidKey` if the secret is shorter than [`MIN_SECRET_LEN`] or all zero
    pub fn new(key_id: impl Into<String>, secret: Vec<u8>) -> Result<Self, SignatureError> {
        let key_id = key_id.into();
        let secret = Zeroizing::new(secret);

        if key_id.is_empty() || key_id.contains(':') {
            return Err(SignatureError::InvalidKey("key id must be non-empty and free of ':'"));
        }
        if secret.len() < MIN_SECRET_LEN {
            return Err(SignatureError::InvalidKey("secret shorter than 32 bytes"));
        }
        if secret.iter().all(|b| *b == 0) {
            return Err(SignatureError::InvalidKey("secret is all zero"));
        }

        Ok(Self { key_id, secret })
    }

    pub fn key_id(&self) -> &str {
        &self.key_id
    }

    pub(crate) fn secret(&self) -> &[u8] {
        &self.secret
    }
}

impl fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SigningKey")
            .field("key_id", &self.key_id)
            .field("secret", &"<redacted>")
            .finish()
    }
}

/// The active signing key plus retired keys still accepted for verification.
#[derive(Debug, Clone)]
pub struct KeyRing {
    active: SigningKey,
    retired: Vec<SigningKey>,
}

impl KeyRing {
    pub fn new(active: SigningKey) -> Self {
        Self {
            active,
            retired: Vec::new(),
        }
    }

    /// Keep accepting signatures made under a rotated-out key.
    pub fn with_retired(mut self, key: SigningKey) -> Self {
        if key.key_id() != self.active.key_id() {
            self.retired.push(key);
        }
        self
    }

    pub fn active(&self) -> &SigningKey {
        &self.active
    }

    /// Look up a key by id among active and retired keys.
    pub fn find(&self, key_id: &str) -> Option<&SigningKey> {
        std::iter::once(&self.active)
            .chain(self.retired.iter())
            .find(|k| k.key_id() == key_id)
    }
}

/// Why a stored record failed verification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntegrityFailure {
    /// No signature was stored with the record.
    Unsigned,
    /// The stored signature value does not parse.
    MalformedSignature,
    /// The signature names a key this service does not hold.
    UnknownKey,
    /// Stored fields no longer have a canonical encoding (e.g. NaN).
    Unencodable,
    /// Digest mismatch: fields were altered after signing.
    Mismatch,
}

impl fmt::Display for IntegrityFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            IntegrityFailure::Unsigned => "record is unsigned",
            IntegrityFailure::MalformedSignature => "signature value is malformed",
            IntegrityFailure::UnknownKey => "signature key is unknown",
            IntegrityFailure::Unencodable => "stored fields cannot be canonicalized",
            IntegrityFailure::Mismatch => "digest mismatch",
        };
        f.write_str(s)
    }
}

/// Result of checking a stored record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntegrityReport {
    Intact,
    Violated(IntegrityFailure),
}

impl IntegrityReport {
    pub fn is_intact(&self) -> bool {
        matches!(self, IntegrityReport::Intact)
    }
}
