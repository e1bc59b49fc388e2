//! # Allocation Errors

use crate::domain::scope::SequenceScope;
use shared_types::{Classify, ConflictCode, ErrorKind, StoreError};
use thiserror::Error;

/// Errors surfaced by the allocator itself.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AllocationError {
    /// Bounded retry budget exhausted under sustained contention.
    ///
    /// Distinct from a legitimate duplicate attempt: operators should read
    /// this as "allocator contention".
    #[error("Allocator contention on {scope}: gave up after {attempts} attempts")]
    Contention { scope: SequenceScope, attempts: u32 },

    /// The scope has issued `u32::MAX` numbers.
    #[error("Sequence space exhausted for {scope}")]
    Exhausted { scope: SequenceScope },

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl Classify for AllocationError {
    fn kind(&self) -> ErrorKind {
        match self {
            AllocationError::Contention { .. } | AllocationError::Exhausted { .. } => {
                ErrorKind::Conflict
            }
            AllocationError::Store(_) => ErrorKind::Storage,
        }
    }

    fn conflict_code(&self) -> Option<ConflictCode> {
        match self {
            AllocationError::Contention { .. } => Some(ConflictCode::AllocatorContention),
            AllocationError::Exhausted { .. } => Some(ConflictCode::DuplicateIdentifier),
            AllocationError::Store(_) => None,
        }
    }
}

/// Outcome of one attempt inside [`allocate_with`](crate::SequenceAllocator::allocate_with).
#[derive(Debug)]
pub enum AttemptError<E> {
    /// The candidate number was taken by a concurrent writer; retry.
    Collision,
    /// Any other failure; stop and surface it.
    Abort(E),
}

impl<E> From<E> for AttemptError<E> {
    fn from(err: E) -> Self {
        AttemptError::Abort(err)
    }
}

impl<E> AttemptError<E> {
    /// Wrap a non-retryable failure.
    pub fn abort(err: impl Into<E>) -> Self {
        AttemptError::Abort(err.into())
    }
}

/// Rejected identifier input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdentifierError {
    /// Organization codes must be non-empty ASCII alphanumerics.
    #[error("Invalid organization code: {0:?}")]
    InvalidOrgCode(String),

    #[error("Year {0} cannot be rendered as four digits")]
    InvalidYear(i32),

    #[error("Not a recognised identifier: {0:?}")]
    Unparseable(String),
}

impl Classify for IdentifierError {
    fn kind(&self) -> ErrorKind {
        ErrorKind::Validation
    }
}
