//! # Ingestion Errors

use ec_01_signature_engine::SignatureError;
use ec_03_chain_linker::ChainError;
use shared_types::{Classify, ConflictCode, ErrorKind};
use thiserror::Error;

/// Failure to sign or store a new reading or challan.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IngestError {
    #[error(transparent)]
    Signature(#[from] SignatureError),

    #[error(transparent)]
    Chain(#[from] ChainError),
}

impl Classify for IngestError {
    fn kind(&self) -> ErrorKind {
        match self {
            IngestError::Signature(e) => e.kind(),
            IngestError::Chain(e) => e.kind(),
        }
    }

    fn conflict_code(&self) -> Option<ConflictCode> {
        match self {
            IngestError::Signature(e) => e.conflict_code(),
            IngestError::Chain(e) => e.conflict_code(),
        }
    }
}
