//! # Outbound Ports (Driven Ports / SPI)
//!
//! Dependencies the Signature Engine needs from the host.

use crate::domain::entities::{IntegrityFailure, RecordRef};
use shared_types::StoreError;
use std::sync::Arc;

/// Receives records that failed verification, for manual review.
///
/// Flagging never blocks the read that discovered the violation.
pub trait IntegrityFlagSink: Send + Sync {
    fn flag(&self, record: RecordRef, failure: IntegrityFailure) -> Result<(), StoreError>;
}

impl<T: IntegrityFlagSink + ?Sized> IntegrityFlagSink for Arc<T> {
    fn flag(&self, record: RecordRef, failure: IntegrityFailure) -> Result<(), StoreError> {
        (**self).flag(record, failure)
    }
}
