//! # Error Types
//!
//! The failure taxonomy shared by all subsystems.
//!
//! Subsystem errors stay crate-specific (one variant per invariant), but each
//! classifies itself into an [`ErrorKind`] so a web/API layer can map any
//! failure to a response without knowing which crate produced it.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Outcome category of a failed operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    /// Malformed or mismatched input. Safe to retry with corrected input.
    Validation,
    /// A uniqueness or 1:1-linkage invariant would be violated.
    Conflict,
    /// Signature verification failed. Never blocks a read.
    Integrity,
    /// A time-boxed credential has passed its expiry. Restart the flow.
    Expired,
    /// Referenced entity does not exist.
    NotFound,
    /// Persistence layer fault. Not a business outcome.
    Storage,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorKind::Validation => "validation",
            ErrorKind::Conflict => "conflict",
            ErrorKind::Integrity => "integrity",
            ErrorKind::Expired => "expired",
            ErrorKind::NotFound => "not_found",
            ErrorKind::Storage => "storage",
        };
        f.write_str(s)
    }
}

/// Sub-code distinguishing the causes of a [`ErrorKind::Conflict`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConflictCode {
    /// The parent already has a child in the evidence chain.
    AlreadyLinked,
    /// An identifier was already issued within its scope.
    DuplicateIdentifier,
    /// The allocator's bounded retry budget was exhausted under contention.
    AllocatorContention,
    /// A single-use credential was already consumed.
    AlreadyVerified,
    /// A write-once field was already set, or the record is in a terminal state.
    Immutable,
}

impl fmt::Display for ConflictCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ConflictCode::AlreadyLinked => "already_linked",
            ConflictCode::DuplicateIdentifier => "duplicate_identifier",
            ConflictCode::AllocatorContention => "allocator_contention",
            ConflictCode::AlreadyVerified => "already_verified",
            ConflictCode::Immutable => "immutable",
        };
        f.write_str(s)
    }
}

/// Classification hook implemented by every subsystem error.
pub trait Classify {
    fn kind(&self) -> ErrorKind;

    fn conflict_code(&self) -> Option<ConflictCode> {
        None
    }
}

/// Failure reported by a persistence collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// The store could not be reached or the operation failed.
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    /// Stored data could not be interpreted.
    #[error("Store data corrupted: {0}")]
    Corrupted(String),
}

impl Classify for StoreError {
    fn kind(&self) -> ErrorKind {
        ErrorKind::Storage
    }
}
