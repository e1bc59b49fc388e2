//! FIR and Case minting.

use super::ChainLinker;
use crate::domain::errors::ChainError;
use crate::domain::requests::{CaseRequest, FirRequest};
use crate::ports::outbound::{ChainStore, ChainTransaction, CommitError, UniqueConstraint};
use chrono::Datelike;
use ec_02_sequence_allocator::{AttemptError, ScopeKind, SequenceNumber, SequenceScope};
use shared_types::{Case, CaseId, CaseStatus, Fir, FirId, FirStatus, Judge, TimeSource, Timestamp};
use tracing::{info, warn};

impl<S: ChainStore, T: TimeSource> ChainLinker<S, T> {
    pub(crate) fn mint_fir(&self, request: FirRequest) -> Result<Fir, ChainError> {
        if request.description.trim().is_empty() {
            return Err(ChainError::EmptyField("description"));
        }

        let filed_at = self.time_source.now();
        let scope = SequenceScope::fir(request.station_id, filed_at.year());

        let fir = self.allocator.allocate_with(
            &scope,
            || self.store.begin().map_err(ChainError::from),
            |tx, sequence| self.try_insert_fir(tx, &request, sequence, filed_at),
        )?;

        info!(
            fir_number = %fir.fir_number,
            challan = %fir.challan_id,
            station = %fir.station_id,
            "FIR issued"
        );
        Ok(fir)
    }

    fn try_insert_fir(
        &self,
        mut tx: S::Tx,
        request: &FirRequest,
        sequence: SequenceNumber,
        filed_at: Timestamp,
    ) -> Result<Fir, AttemptError<ChainError>> {
        let fir = self.prepare_fir(&tx, request, sequence, filed_at)?;
        tx.insert_fir(fir.clone());

        match tx.commit() {
            Ok(()) => Ok(fir),
            Err(CommitError::UniqueViolation(UniqueConstraint::FirChallan)) => {
                warn!(challan = %request.challan_id, "Lost race to file FIR for challan");
                Err(ChainError::ChallanAlreadyLinked {
                    challan: request.challan_id,
                }
                .into())
            }
            Err(CommitError::UniqueViolation(_)) | Err(CommitError::WriteConflict) => {
                Err(AttemptError::Collision)
            }
            Err(CommitError::Store(e)) => Err(ChainError::from(e).into()),
        }
    }

    fn prepare_fir(
        &self,
        tx: &S::Tx,
        request: &FirRequest,
        sequence: SequenceNumber,
        filed_at: Timestamp,
    ) -> Result<Fir, ChainError> {
        let challan = tx
            .challan(request.challan_id)?
            .ok_or(ChainError::ChallanNotFound(request.challan_id))?;

        if let Some(existing) = tx.fir_for_challan(challan.id)? {
            warn!(
                challan = %challan.id,
                existing = %existing.fir_number,
                "Duplicate FIR request rejected"
            );
            return Err(ChainError::ChallanAlreadyLinked {
                challan: challan.id,
            });
        }

        let violation = tx
            .violation(challan.violation_id)?
            .ok_or(ChainError::ViolationNotFound(challan.violation_id))?;
        if !violation.cognizable {
            return Err(ChainError::ViolationNotCognizable {
                challan: challan.id,
                violation: violation.id,
            });
        }

        let station = tx
            .station(request.station_id)?
            .ok_or(ChainError::StationNotFound(request.station_id))?;

        let year = filed_at.year();
        let fir_number = self
            .identifiers
            .render(ScopeKind::Fir, &station.code, year, sequence)?;

        Ok(Fir {
            id: FirId::new(),
            fir_number,
            station_id: station.id,
            year,
            sequence: sequence.value(),
            informant_id: request.informant_id,
            challan_id: challan.id,
            filed_at,
            status: FirStatus::Filed,
            description: request.description.trim().to_string(),
            investigation_report: Vec::new(),
        })
    }

    pub(crate) fn mint_case(&self, request: CaseRequest) -> Result<Case, ChainError> {
        if request.case_type.trim().is_empty() {
            return Err(ChainError::EmptyField("case_type"));
        }

        // The judge fixes the court, and with it the numbering scope.
        let judge = self
            .store
            .begin()?
            .judge(request.judge_id)?
            .ok_or(ChainError::JudgeNotFound(request.judge_id))?;

        let opened_at = self.time_source.now();
        let scope = SequenceScope::case(judge.court_id, opened_at.year());

        let case = self.allocator.allocate_with(
            &scope,
            || self.store.begin().map_err(ChainError::from),
            |tx, sequence| self.try_insert_case(tx, &request, &judge, sequence, opened_at),
        )?;

        info!(
            case_number = %case.case_number,
            fir = %case.fir_id,
            court = %case.court_id,
            "Case opened"
        );
        Ok(case)
    }

    fn try_insert_case(
        &self,
        mut tx: S::Tx,
        request: &CaseRequest,
        judge: &Judge,
        sequence: SequenceNumber,
        opened_at: Timestamp,
    ) -> Result<Case, AttemptError<ChainError>> {
        let case = self.prepare_case(&tx, request, judge, sequence, opened_at)?;
        tx.insert_case(case.clone());

        match tx.commit() {
            Ok(()) => Ok(case),
            Err(CommitError::UniqueViolation(UniqueConstraint::CaseFir)) => {
                warn!(fir = %request.fir_id, "Lost race to open case for FIR");
                Err(ChainError::FirAlreadyLinked {
                    fir: request.fir_id,
                }
                .into())
            }
            Err(CommitError::UniqueViolation(_)) | Err(CommitError::WriteConflict) => {
                Err(AttemptError::Collision)
            }
            Err(CommitError::Store(e)) => Err(ChainError::from(e).into()),
        }
    }

    fn prepare_case(
        &self,
        tx: &S::Tx,
        request: &CaseRequest,
        judge: &Judge,
        sequence: SequenceNumber,
        opened_at: Timestamp,
    ) -> Result<Case, ChainError> {
        let fir = tx
            .fir(request.fir_id)?
            .ok_or(ChainError::FirNotFound(request.fir_id))?;

        if let Some(existing) = tx.case_for_fir(fir.id)? {
            warn!(
                fir = %fir.fir_number,
                existing = %existing.case_number,
                "Duplicate case request rejected"
            );
            return Err(ChainError::FirAlreadyLinked { fir: fir.id });
        }

        let court = tx
            .court(judge.court_id)?
            .ok_or(ChainError::CourtNotFound(judge.court_id))?;

        let year = opened_at.year();
        let case_number = self
            .identifiers
            .render(ScopeKind::Case, &court.code, year, sequence)?;

        Ok(Case {
            id: CaseId::new(),
            case_number,
            court_id: court.id,
            year,
            sequence: sequence.value(),
            fir_id: fir.id,
            judge_id: judge.id,
            case_type: request.case_type.trim().to_string(),
            status: CaseStatus::Open,
            hearing_date: request.hearing_date,
            opened_at,
            verdict: None,
        })
    }
}
