//! Optimistic updates of challans, FIRs and cases.

use super::ChainLinker;
use crate::domain::errors::ChainError;
use crate::domain::lifecycle;
use crate::ports::outbound::{ChainStore, ChainTransaction, CommitError};
use shared_types::{
    Case, CaseId, CaseStatus, Challan, ChallanId, ChallanStatus, Fir, FirId, TimeSource,
    Timestamp,
};
use std::fmt;
use tracing::{debug, info, warn};

impl<S: ChainStore, T: TimeSource> ChainLinker<S, T> {
    /// Run `stage` in a fresh unit of work and commit, retrying when a
    /// concurrent writer changed the row first.
    fn update_with<R>(
        &self,
        record: impl fmt::Display,
        mut stage: impl FnMut(&mut S::Tx) -> Result<R, ChainError>,
    ) -> Result<R, ChainError> {
        let config = self.allocator.config();
        let attempts = config.effective_max_attempts();

        for round in 1..=attempts {
            let mut tx = self.store.begin()?;
            let out = stage(&mut tx)?;
            match tx.commit() {
                Ok(()) => return Ok(out),
                Err(CommitError::Store(e)) => return Err(e.into()),
                Err(e) => {
                    debug!(%record, round, error = %e, "Update lost to concurrent writer, retrying");
                    if round < attempts {
                        std::thread::sleep(config.backoff(round));
                    }
                }
            }
        }

        warn!(%record, attempts, "Concurrent update: retry budget exhausted");
        Err(ChainError::ConcurrentUpdate {
            record: record.to_string(),
            attempts,
        })
    }

    pub(crate) fn change_challan_status(
        &self,
        id: ChallanId,
        status: ChallanStatus,
    ) -> Result<Challan, ChainError> {
        let challan = self.update_with(format_args!("challan/{}", id), |tx| {
            let current = tx.challan(id)?.ok_or(ChainError::ChallanNotFound(id))?;
            let updated = lifecycle::change_challan_status(&current, status)?;
            tx.update_challan(current, updated.clone());
            Ok(updated)
        })?;

        info!(challan = %id, %status, "Challan status updated");
        Ok(challan)
    }

    pub(crate) fn append_report(&self, id: FirId, report: &str) -> Result<Fir, ChainError> {
        let recorded_at = self.time_source.now();
        let fir = self.update_with(format_args!("fir/{}", id), |tx| {
            let current = tx.fir(id)?.ok_or(ChainError::FirNotFound(id))?;
            let updated = lifecycle::append_investigation_note(&current, report, recorded_at)?;
            tx.update_fir(current, updated.clone());
            Ok(updated)
        })?;

        info!(
            fir_number = %fir.fir_number,
            sections = fir.investigation_report.len(),
            "Investigation report filed"
        );
        Ok(fir)
    }

    pub(crate) fn close(&self, id: FirId) -> Result<Fir, ChainError> {
        let fir = self.update_with(format_args!("fir/{}", id), |tx| {
            let current = tx.fir(id)?.ok_or(ChainError::FirNotFound(id))?;
            let updated = lifecycle::close_fir(&current)?;
            tx.update_fir(current, updated.clone());
            Ok(updated)
        })?;

        info!(fir_number = %fir.fir_number, "FIR closed");
        Ok(fir)
    }

    pub(crate) fn change_case_status(
        &self,
        id: CaseId,
        status: CaseStatus,
        hearing_date: Option<Timestamp>,
    ) -> Result<Case, ChainError> {
        let case = self.update_with(format_args!("case/{}", id), |tx| {
            let current = tx.case(id)?.ok_or(ChainError::CaseNotFound(id))?;
            let updated = lifecycle::change_case_status(&current, status, hearing_date)?;
            tx.update_case(current, updated.clone());
            Ok(updated)
        })?;

        info!(case_number = %case.case_number, %status, "Case status updated");
        Ok(case)
    }

    pub(crate) fn decide(
        &self,
        id: CaseId,
        verdict: &str,
        outcome: CaseStatus,
    ) -> Result<Case, ChainError> {
        let recorded_at = self.time_source.now();
        let case = self.update_with(format_args!("case/{}", id), |tx| {
            let current = tx.case(id)?.ok_or(ChainError::CaseNotFound(id))?;
            let updated = lifecycle::record_verdict(&current, verdict, outcome, recorded_at)?;
            tx.update_case(current, updated.clone());
            Ok(updated)
        })?;

        info!(case_number = %case.case_number, %outcome, "Verdict recorded");
        Ok(case)
    }
}
