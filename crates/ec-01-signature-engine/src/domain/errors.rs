//! # Signature Errors
//!
//! Error types for signing and integrity checks.

use crate::domain::entities::{IntegrityFailure, RecordRef};
use shared_types::{Classify, ErrorKind};
use thiserror::Error;

/// Errors that can occur while signing or checking a record.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SignatureError {
    /// A numeric field is NaN or infinite and has no canonical encoding.
    #[error("Field `{field}` is not a finite number")]
    NonFiniteValue { field: &'static str },

    /// A required text field is empty.
    #[error("Field `{field}` must not be empty")]
    EmptyField { field: &'static str },

    /// Key material rejected at construction.
    #[error("Invalid signing key: {0}")]
    InvalidKey(&'static str),

    /// Stored signature value does not parse.
    #[error("Malformed signature value: {0}")]
    MalformedSignature(&'static str),

    /// The record failed verification.
    #[error("Integrity violation on {record}: {failure}")]
    IntegrityViolation {
        record: RecordRef,
        failure: IntegrityFailure,
    },
}

impl Classify for SignatureError {
    fn kind(&self) -> ErrorKind {
        match self {
            SignatureError::IntegrityViolation { .. } => ErrorKind::Integrity,
            _ => ErrorKind::Validation,
        }
    }
}
