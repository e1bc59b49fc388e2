//! # Chain Linker Errors

use ec_02_sequence_allocator::{AllocationError, IdentifierError};
use shared_types::{
    CaseId, CaseStatus, ChallanId, ChallanStatus, Classify, ConflictCode, CourtId, ErrorKind,
    FirId, JudgeId, ReadingId, StationId, StoreError, ViolationId,
};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChainError {
    #[error("Emission reading {0} not found")]
    ReadingNotFound(ReadingId),

    #[error("Challan {0} not found")]
    ChallanNotFound(ChallanId),

    #[error("FIR {0} not found")]
    FirNotFound(FirId),

    #[error("Case {0} not found")]
    CaseNotFound(CaseId),

    #[error("Station {0} not found")]
    StationNotFound(StationId),

    #[error("Judge {0} not found")]
    JudgeNotFound(JudgeId),

    #[error("Court {0} not found")]
    CourtNotFound(CourtId),

    #[error("Violation {0} not found")]
    ViolationNotFound(ViolationId),

    /// Only cognizable violations may open an FIR.
    #[error("Challan {challan} cites non-cognizable violation {violation}")]
    ViolationNotCognizable {
        challan: ChallanId,
        violation: ViolationId,
    },

    #[error("Field '{0}' must not be empty")]
    EmptyField(&'static str),

    #[error(transparent)]
    Identifier(#[from] IdentifierError),

    /// Station and court codes are unique within their kind.
    #[error("Organisation code '{code}' is already in use")]
    DuplicateOrgCode { code: String },

    /// Readings are immutable once stored.
    #[error("Emission reading {reading} already exists")]
    ReadingExists { reading: ReadingId },

    /// Challans are only ever filed once; status is changed through its own call.
    #[error("Challan {challan} already exists")]
    ChallanExists { challan: ChallanId },

    /// A reading backs at most one challan.
    #[error("Emission reading {reading} is already cited by challan {challan}")]
    ReadingAlreadyCited {
        reading: ReadingId,
        challan: ChallanId,
    },

    /// A challan maps to at most one FIR.
    #[error("Challan {challan} already has an FIR")]
    ChallanAlreadyLinked { challan: ChallanId },

    /// A FIR maps to at most one Case.
    #[error("FIR {fir} already has a case")]
    FirAlreadyLinked { fir: FirId },

    #[error(transparent)]
    Allocation(#[from] AllocationError),

    #[error("Challan {challan} is paid; its status is final")]
    ChallanSettled { challan: ChallanId },

    #[error("Challan cannot move from {from} to {to}")]
    InvalidChallanTransition {
        from: ChallanStatus,
        to: ChallanStatus,
    },

    #[error("FIR {fir} is closed")]
    FirClosed { fir: FirId },

    #[error("Case {case} is {status}; no further changes allowed")]
    CaseTerminal { case: CaseId, status: CaseStatus },

    #[error("Case cannot move from {from} to {to}")]
    InvalidCaseTransition { from: CaseStatus, to: CaseStatus },

    #[error("Case {case} already has a verdict")]
    VerdictAlreadyRecorded { case: CaseId },

    /// Optimistic update kept losing to concurrent writers.
    #[error("Concurrent update to {record}: gave up after {attempts} attempts")]
    ConcurrentUpdate { record: String, attempts: u32 },

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl Classify for ChainError {
    fn kind(&self) -> ErrorKind {
        match self {
            ChainError::ReadingNotFound(_)
            | ChainError::ChallanNotFound(_)
            | ChainError::FirNotFound(_)
            | ChainError::CaseNotFound(_)
            | ChainError::StationNotFound(_)
            | ChainError::JudgeNotFound(_)
            | ChainError::CourtNotFound(_)
            | ChainError::ViolationNotFound(_) => ErrorKind::NotFound,

            ChainError::ViolationNotCognizable { .. }
            | ChainError::EmptyField(_)
            | ChainError::InvalidChallanTransition { .. }
            | ChainError::InvalidCaseTransition { .. } => ErrorKind::Validation,
            ChainError::Identifier(e) => e.kind(),

            ChainError::ReadingAlreadyCited { .. }
            | ChainError::ChallanAlreadyLinked { .. }
            | ChainError::FirAlreadyLinked { .. }
            | ChainError::DuplicateOrgCode { .. }
            | ChainError::ReadingExists { .. }
            | ChainError::ChallanExists { .. }
            | ChainError::ChallanSettled { .. }
            | ChainError::FirClosed { .. }
            | ChainError::CaseTerminal { .. }
            | ChainError::VerdictAlreadyRecorded { .. }
            | ChainError::ConcurrentUpdate { .. } => ErrorKind::Conflict,
            ChainError::Allocation(e) => e.kind(),

            ChainError::Store(_) => ErrorKind::Storage,
        }
    }

    fn conflict_code(&self) -> Option<ConflictCode> {
        match self {
            ChainError::ReadingAlreadyCited { .. }
            | ChainError::ChallanAlreadyLinked { .. }
            | ChainError::FirAlreadyLinked { .. } => Some(ConflictCode::AlreadyLinked),
            ChainError::DuplicateOrgCode { .. } => Some(ConflictCode::DuplicateIdentifier),
            ChainError::ReadingExists { .. } | ChainError::ChallanExists { .. } => {
                Some(ConflictCode::Immutable)
            }
            ChainError::ChallanSettled { .. }
            | ChainError::FirClosed { .. }
            | ChainError::CaseTerminal { .. }
            | ChainError::VerdictAlreadyRecorded { .. } => Some(ConflictCode::Immutable),
            ChainError::Allocation(e) => e.conflict_code(),
            _ => None,
        }
    }
}
