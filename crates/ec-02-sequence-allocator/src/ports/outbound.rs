//! # Outbound Ports (Driven Ports / SPI)

use crate::domain::scope::{SequenceNumber, SequenceScope};
use shared_types::StoreError;
use std::sync::Arc;

/// Read side of whatever table holds issued numbers.
///
/// Implemented by a unit of work so the read happens inside the same
/// transaction that will insert the new row.
pub trait SequenceLedger {
    /// Highest number issued in `scope`, or `None` for a fresh scope.
    fn highest_issued(&self, scope: &SequenceScope) -> Result<Option<SequenceNumber>, StoreError>;
}

/// A dedicated counter per scope, advanced by compare-and-set.
pub trait SequenceCounterStore: Send + Sync {
    fn load(&self, scope: &SequenceScope) -> Result<Option<SequenceNumber>, StoreError>;

    /// Set the counter to `next` only if it still equals `expected`.
    ///
    /// Returns `Ok(false)` when another writer moved the counter first.
    fn compare_and_set(
        &self,
        scope: &SequenceScope,
        expected: Option<SequenceNumber>,
        next: SequenceNumber,
    ) -> Result<bool, StoreError>;
}

impl<T: SequenceCounterStore + ?Sized> SequenceCounterStore for Arc<T> {
    fn load(&self, scope: &SequenceScope) -> Result<Option<SequenceNumber>, StoreError> {
        (**self).load(scope)
    }

    fn compare_and_set(
        &self,
        scope: &SequenceScope,
        expected: Option<SequenceNumber>,
        next: SequenceNumber,
    ) -> Result<bool, StoreError> {
        (**self).compare_and_set(scope, expected, next)
    }
}
