//! # Inbound Ports (Driving Ports / API)

use crate::domain::errors::AllocationError;
use crate::domain::scope::{SequenceNumber, SequenceScope};

/// Standalone number issuance for callers that do not write their own row.
pub trait SequenceAllocatorApi: Send + Sync {
    /// Reserve the next number in `scope`.
    ///
    /// # Errors
    /// - `Contention`: retry budget exhausted; the scope is hot
    /// - `Exhausted`: the scope's number space is used up
    /// - `Store`: counter storage failed
    fn next(&self, scope: &SequenceScope) -> Result<SequenceNumber, AllocationError>;
}
