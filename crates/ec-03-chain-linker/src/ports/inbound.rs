//! # Inbound Ports (Driving Ports / API)

use crate::domain::errors::ChainError;
use crate::domain::requests::{CaseRequest, FirRequest};
use shared_types::{
    Case, CaseId, CaseStatus, Challan, ChallanId, ChallanStatus, EmissionReading, Fir, FirId,
    Timestamp,
};

/// Evidence-chain minting and lifecycle API.
pub trait ChainLinkerApi: Send + Sync {
    /// Store a signed reading. Readings are never replaced.
    ///
    /// # Errors
    /// - `ReadingExists`: the id is already stored
    fn record_reading(&self, reading: EmissionReading) -> Result<EmissionReading, ChainError>;

    /// Store a signed challan, linking it to the reading it cites.
    ///
    /// # Errors
    /// - `ChallanExists`: the id is already stored
    /// - `ReadingNotFound`: the cited reading does not exist
    /// - `ReadingAlreadyCited`: another challan already cites the reading
    fn file_challan(&self, challan: Challan) -> Result<Challan, ChainError>;

    /// Escalate a cognizable challan into a FIR with a fresh station-scoped number.
    ///
    /// # Errors
    /// - `ChallanNotFound` / `StationNotFound` / `ViolationNotFound`
    /// - `ViolationNotCognizable`
    /// - `ChallanAlreadyLinked`: the challan already has a FIR
    /// - `Allocation(Contention)`: number allocation kept colliding
    fn issue_fir(&self, request: FirRequest) -> Result<Fir, ChainError>;

    /// Open a Case from a FIR with a fresh court-scoped number.
    ///
    /// # Errors
    /// - `FirNotFound` / `JudgeNotFound` / `CourtNotFound`
    /// - `FirAlreadyLinked`: the FIR already has a case
    /// - `Allocation(Contention)`
    fn issue_case(&self, request: CaseRequest) -> Result<Case, ChainError>;

    fn update_challan_status(
        &self,
        challan: ChallanId,
        status: ChallanStatus,
    ) -> Result<Challan, ChainError>;

    /// Append a section to the FIR's investigation report.
    fn file_investigation_report(&self, fir: FirId, report: &str) -> Result<Fir, ChainError>;

    fn close_fir(&self, fir: FirId) -> Result<Fir, ChainError>;

    /// Non-terminal status moves, optionally rescheduling the hearing.
    fn update_case_status(
        &self,
        case: CaseId,
        status: CaseStatus,
        hearing_date: Option<Timestamp>,
    ) -> Result<Case, ChainError>;

    /// Set the verdict and close the case as `Decided` or `Dismissed`.
    fn record_verdict(
        &self,
        case: CaseId,
        verdict: &str,
        outcome: CaseStatus,
    ) -> Result<Case, ChainError>;
}
