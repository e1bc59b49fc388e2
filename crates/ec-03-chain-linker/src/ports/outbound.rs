//! # Outbound Ports (Driven Ports / SPI)
//!
//! The persistence collaborator, seen through a unit of work.

use ec_02_sequence_allocator::SequenceLedger;
use shared_types::{
    Case, CaseId, Challan, ChallanId, Court, CourtId, EmissionReading, Fir, FirId, Judge,
    JudgeId, ReadingId, Station, StationId, StoreError, Violation, ViolationId,
};
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// A uniqueness constraint the store enforces at commit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UniqueConstraint {
    /// Reading ids are never reused.
    ReadingId,
    /// Challan ids are never reused.
    ChallanId,
    /// At most one challan per emission reading.
    ChallanReading,
    /// At most one FIR per challan.
    FirChallan,
    /// FIR sequence within `(station, year)` must be unused and above the current maximum.
    FirNumber,
    /// At most one Case per FIR.
    CaseFir,
    /// Case sequence within `(court, year)` must be unused and above the current maximum.
    CaseNumber,
}

impl fmt::Display for UniqueConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            UniqueConstraint::ReadingId => "reading_pkey",
            UniqueConstraint::ChallanId => "challan_pkey",
            UniqueConstraint::ChallanReading => "challan_reading_unique",
            UniqueConstraint::FirChallan => "fir_challan_unique",
            UniqueConstraint::FirNumber => "fir_number_unique",
            UniqueConstraint::CaseFir => "case_fir_unique",
            UniqueConstraint::CaseNumber => "case_number_unique",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommitError {
    #[error("Unique constraint violated: {0}")]
    UniqueViolation(UniqueConstraint),

    /// A row staged for update changed after it was read.
    #[error("Write conflict: row changed since it was read")]
    WriteConflict,

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// One atomic unit of work.
///
/// Reads see committed state. Writes are staged and applied together by
/// [`commit`](Self::commit), which either applies all of them or none.
/// Dropping a transaction without committing discards its writes.
pub trait ChainTransaction: SequenceLedger {
    fn reading(&self, id: ReadingId) -> Result<Option<EmissionReading>, StoreError>;
    fn challan(&self, id: ChallanId) -> Result<Option<Challan>, StoreError>;
    fn violation(&self, id: ViolationId) -> Result<Option<Violation>, StoreError>;
    fn station(&self, id: StationId) -> Result<Option<Station>, StoreError>;
    fn judge(&self, id: JudgeId) -> Result<Option<Judge>, StoreError>;
    fn court(&self, id: CourtId) -> Result<Option<Court>, StoreError>;
    fn fir(&self, id: FirId) -> Result<Option<Fir>, StoreError>;
    fn case(&self, id: CaseId) -> Result<Option<Case>, StoreError>;

    /// The challan citing `reading`, if any.
    fn challan_for_reading(&self, reading: ReadingId) -> Result<Option<Challan>, StoreError>;

    /// The FIR referencing `challan`, if any.
    fn fir_for_challan(&self, challan: ChallanId) -> Result<Option<Fir>, StoreError>;

    /// The Case referencing `fir`, if any.
    fn case_for_fir(&self, fir: FirId) -> Result<Option<Case>, StoreError>;

    fn insert_reading(&mut self, reading: EmissionReading);
    fn insert_challan(&mut self, challan: Challan);
    fn insert_fir(&mut self, fir: Fir);
    fn insert_case(&mut self, case: Case);

    /// Replace `current` with `updated`; the commit fails with
    /// [`CommitError::WriteConflict`] unless the stored row still equals `current`.
    fn update_challan(&mut self, current: Challan, updated: Challan);
    fn update_fir(&mut self, current: Fir, updated: Fir);
    fn update_case(&mut self, current: Case, updated: Case);

    fn commit(self) -> Result<(), CommitError>;
}

/// Opens units of work.
pub trait ChainStore: Send + Sync {
    type Tx: ChainTransaction;

    fn begin(&self) -> Result<Self::Tx, StoreError>;
}

impl<T: ChainStore + ?Sized> ChainStore for Arc<T> {
    type Tx = T::Tx;

    fn begin(&self) -> Result<Self::Tx, StoreError> {
        (**self).begin()
    }
}
