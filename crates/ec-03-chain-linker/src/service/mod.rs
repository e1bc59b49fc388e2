//! # Chain Linker Service
//!
//! Implements [`ChainLinkerApi`] over a [`ChainStore`].
//!
//! - `ingestion.rs`: `record_reading` / `file_challan`, insert-only
//! - `issuance.rs`: `issue_fir` / `issue_case`, each one allocation loop
//!   whose every round is a fresh unit of work
//! - `lifecycle.rs`: optimistic updates of existing records

mod ingestion;
mod issuance;
mod lifecycle;

use crate::domain::config::LinkerConfig;
use crate::domain::errors::ChainError;
use crate::domain::requests::{CaseRequest, FirRequest};
use crate::ports::inbound::ChainLinkerApi;
use crate::ports::outbound::ChainStore;
use ec_02_sequence_allocator::{IdentifierFormat, SequenceAllocator};
use shared_types::{
    Case, CaseId, CaseStatus, Challan, ChallanId, ChallanStatus, EmissionReading, Fir, FirId,
    TimeSource, Timestamp,
};

/// The Chain Linker service.
pub struct ChainLinker<S: ChainStore, T: TimeSource> {
    pub(crate) store: S,
    /// Filing dates and scope years come from here.
    pub(crate) time_source: T,
    pub(crate) allocator: SequenceAllocator,
    pub(crate) identifiers: IdentifierFormat,
}

/// Dependencies for ChainLinker
pub struct ChainLinkerDependencies<S, T> {
    pub store: S,
    pub time_source: T,
}

impl<S: ChainStore, T: TimeSource> ChainLinker<S, T> {
    pub fn new(deps: ChainLinkerDependencies<S, T>, config: LinkerConfig) -> Self {
        Self {
            store: deps.store,
            time_source: deps.time_source,
            allocator: SequenceAllocator::new(config.allocator),
            identifiers: config.identifiers,
        }
    }

    pub fn identifiers(&self) -> &IdentifierFormat {
        &self.identifiers
    }
}

impl<S: ChainStore, T: TimeSource> ChainLinkerApi for ChainLinker<S, T> {
    fn record_reading(&self, reading: EmissionReading) -> Result<EmissionReading, ChainError> {
        self.insert_reading(reading)
    }

    fn file_challan(&self, challan: Challan) -> Result<Challan, ChainError> {
        self.insert_challan(challan)
    }

    fn issue_fir(&self, request: FirRequest) -> Result<Fir, ChainError> {
        self.mint_fir(request)
    }

    fn issue_case(&self, request: CaseRequest) -> Result<Case, ChainError> {
        self.mint_case(request)
    }

    fn update_challan_status(
        &self,
        challan: ChallanId,
        status: ChallanStatus,
    ) -> Result<Challan, ChainError> {
        self.change_challan_status(challan, status)
    }

    fn file_investigation_report(&self, fir: FirId, report: &str) -> Result<Fir, ChainError> {
        self.append_report(fir, report)
    }

    fn close_fir(&self, fir: FirId) -> Result<Fir, ChainError> {
        self.close(fir)
    }

    fn update_case_status(
        &self,
        case: CaseId,
        status: CaseStatus,
        hearing_date: Option<Timestamp>,
    ) -> Result<Case, ChainError> {
        self.change_case_status(case, status, hearing_date)
    }

    fn record_verdict(
        &self,
        case: CaseId,
        verdict: &str,
        outcome: CaseStatus,
    ) -> Result<Case, ChainError> {
        self.decide(case, verdict, outcome)
    }
}
