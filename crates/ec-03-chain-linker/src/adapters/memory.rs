//! # In-Memory Chain Store
//!
//! Committed state behind one `RwLock`. Transactions read through the lock
//! and validate every staged write under the write lock at commit, which is
//! what a serializable relational store would do for these constraints.

use crate::domain::errors::ChainError;
use crate::ports::outbound::{ChainStore, ChainTransaction, CommitError, UniqueConstraint};
use ec_02_sequence_allocator::{SequenceLedger, SequenceNumber, SequenceScope};
use parking_lot::RwLock;
use shared_types::{
    Case, CaseId, Challan, ChallanId, Court, CourtId, EmissionReading, Fir, FirId, Judge,
    JudgeId, ReadingId, Station, StationId, StoreError, VehicleId, Violation, ViolationId,
};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

#[derive(Debug, Default)]
struct ChainTables {
    stations: HashMap<StationId, Station>,
    courts: HashMap<CourtId, Court>,
    judges: HashMap<JudgeId, Judge>,
    violations: HashMap<ViolationId, Violation>,
    readings: HashMap<ReadingId, EmissionReading>,
    challans: HashMap<ChallanId, Challan>,
    firs: HashMap<FirId, Fir>,
    cases: HashMap<CaseId, Case>,
    challan_by_reading: HashMap<ReadingId, ChallanId>,
    fir_by_challan: HashMap<ChallanId, FirId>,
    case_by_fir: HashMap<FirId, CaseId>,
    issued_numbers: HashSet<String>,
    highest: HashMap<SequenceScope, SequenceNumber>,
}

impl ChainTables {
    fn check(&self, write: &StagedWrite) -> Result<(), CommitError> {
        match write {
            StagedWrite::InsertReading(reading) => {
                if self.readings.contains_key(&reading.id) {
                    return Err(CommitError::UniqueViolation(UniqueConstraint::ReadingId));
                }
            }
            StagedWrite::InsertChallan(challan) => {
                if self.challans.contains_key(&challan.id) {
                    return Err(CommitError::UniqueViolation(UniqueConstraint::ChallanId));
                }
                if challan
                    .emission_reading_id
                    .is_some_and(|r| self.challan_by_reading.contains_key(&r))
                {
                    return Err(CommitError::UniqueViolation(
                        UniqueConstraint::ChallanReading,
                    ));
                }
            }
            StagedWrite::InsertFir(fir) => {
                if self.fir_by_challan.contains_key(&fir.challan_id) {
                    return Err(CommitError::UniqueViolation(UniqueConstraint::FirChallan));
                }
                let scope = SequenceScope::fir(fir.station_id, fir.year);
                if !self.accepts(&scope, fir.sequence, &fir.fir_number) {
                    return Err(CommitError::UniqueViolation(UniqueConstraint::FirNumber));
                }
            }
            StagedWrite::InsertCase(case) => {
                if self.case_by_fir.contains_key(&case.fir_id) {
                    return Err(CommitError::UniqueViolation(UniqueConstraint::CaseFir));
                }
                let scope = SequenceScope::case(case.court_id, case.year);
                if !self.accepts(&scope, case.sequence, &case.case_number) {
                    return Err(CommitError::UniqueViolation(UniqueConstraint::CaseNumber));
                }
            }
            StagedWrite::UpdateChallan { current, .. } => {
                if self.challans.get(&current.id) != Some(current) {
                    return Err(CommitError::WriteConflict);
                }
            }
            StagedWrite::UpdateFir { current, .. } => {
                if self.firs.get(&current.id) != Some(current) {
                    return Err(CommitError::WriteConflict);
                }
            }
            StagedWrite::UpdateCase { current, .. } => {
                if self.cases.get(&current.id) != Some(current) {
                    return Err(CommitError::WriteConflict);
                }
            }
        }
        Ok(())
    }

    /// New numbers must be unused and exceed the scope's highest.
    fn accepts(&self, scope: &SequenceScope, sequence: u32, number: &str) -> bool {
        let above_highest = self
            .highest
            .get(scope)
            .map_or(true, |h| sequence > h.value());
        above_highest && !self.issued_numbers.contains(number)
    }

    fn record_number(&mut self, scope: SequenceScope, sequence: u32, number: &str) {
        if let Some(n) = SequenceNumber::new(sequence) {
            self.highest.insert(scope, n);
        }
        self.issued_numbers.insert(number.to_string());
    }

    fn put_challan(&mut self, challan: Challan) {
        if let Some(previous) = self.challans.get(&challan.id) {
            if let Some(reading) = previous.emission_reading_id {
                self.challan_by_reading.remove(&reading);
            }
        }
        if let Some(reading) = challan.emission_reading_id {
            self.challan_by_reading.insert(reading, challan.id);
        }
        self.challans.insert(challan.id, challan);
    }

    /// Organisation codes are rendered into identifiers, so two stations (or
    /// two courts) sharing one would mint identical numbers.
    fn code_taken<'a, I, K>(mut existing: I, id: K, code: &str) -> bool
    where
        I: Iterator<Item = (&'a K, &'a str)>,
        K: PartialEq + 'a,
    {
        existing.any(|(other, taken)| *other != id && taken == code)
    }

    fn apply(&mut self, write: StagedWrite) {
        match write {
            StagedWrite::InsertReading(reading) => {
                self.readings.insert(reading.id, reading);
            }
            StagedWrite::InsertChallan(challan) => self.put_challan(challan),
            StagedWrite::InsertFir(fir) => {
                self.record_number(
                    SequenceScope::fir(fir.station_id, fir.year),
                    fir.sequence,
                    &fir.fir_number,
                );
                self.fir_by_challan.insert(fir.challan_id, fir.id);
                self.firs.insert(fir.id, fir);
            }
            StagedWrite::InsertCase(case) => {
                self.record_number(
                    SequenceScope::case(case.court_id, case.year),
                    case.sequence,
                    &case.case_number,
                );
                self.case_by_fir.insert(case.fir_id, case.id);
                self.cases.insert(case.id, case);
            }
            StagedWrite::UpdateChallan { updated, .. } => self.put_challan(updated),
            StagedWrite::UpdateFir { updated, .. } => {
                self.firs.insert(updated.id, updated);
            }
            StagedWrite::UpdateCase { updated, .. } => {
                self.cases.insert(updated.id, updated);
            }
        }
    }
}

#[derive(Debug)]
enum StagedWrite {
    InsertReading(EmissionReading),
    InsertChallan(Challan),
    InsertFir(Fir),
    InsertCase(Case),
    UpdateChallan { current: Challan, updated: Challan },
    UpdateFir { current: Fir, updated: Fir },
    UpdateCase { current: Case, updated: Case },
}

/// Shared, thread-safe evidence-chain tables.
#[derive(Debug, Clone, Default)]
pub struct InMemoryChainStore {
    tables: Arc<RwLock<ChainTables>>,
}

impl InMemoryChainStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a station. Its code must not belong to another station.
    pub fn seed_station(&self, station: Station) -> Result<(), ChainError> {
        let mut tables = self.tables.write();
        let existing = tables.stations.iter().map(|(id, s)| (id, s.code.as_str()));
        if ChainTables::code_taken(existing, station.id, &station.code) {
            return Err(ChainError::DuplicateOrgCode { code: station.code });
        }
        tables.stations.insert(station.id, station);
        Ok(())
    }

    /// Insert or replace a court. Its code must not belong to another court.
    pub fn seed_court(&self, court: Court) -> Result<(), ChainError> {
        let mut tables = self.tables.write();
        let existing = tables.courts.iter().map(|(id, c)| (id, c.code.as_str()));
        if ChainTables::code_taken(existing, court.id, &court.code) {
            return Err(ChainError::DuplicateOrgCode { code: court.code });
        }
        tables.courts.insert(court.id, court);
        Ok(())
    }

    pub fn seed_judge(&self, judge: Judge) {
        self.tables.write().judges.insert(judge.id, judge);
    }

    pub fn seed_violation(&self, violation: Violation) {
        self.tables.write().violations.insert(violation.id, violation);
    }

    /// Write a reading back verbatim, as when replaying a backup.
    ///
    /// No uniqueness or signature checks apply; integrity audits are what
    /// catch a restored record that was altered.
    pub fn restore_reading(&self, reading: EmissionReading) {
        self.tables.write().readings.insert(reading.id, reading);
    }

    /// Write a challan back verbatim, as when replaying a backup.
    pub fn restore_challan(&self, challan: Challan) {
        self.tables.write().put_challan(challan);
    }

    pub fn reading(&self, id: ReadingId) -> Option<EmissionReading> {
        self.tables.read().readings.get(&id).cloned()
    }

    pub fn challan_for_reading(&self, reading: ReadingId) -> Option<Challan> {
        let tables = self.tables.read();
        tables
            .challan_by_reading
            .get(&reading)
            .and_then(|id| tables.challans.get(id))
            .cloned()
    }

    pub fn challan(&self, id: ChallanId) -> Option<Challan> {
        self.tables.read().challans.get(&id).cloned()
    }

    pub fn fir(&self, id: FirId) -> Option<Fir> {
        self.tables.read().firs.get(&id).cloned()
    }

    pub fn case(&self, id: CaseId) -> Option<Case> {
        self.tables.read().cases.get(&id).cloned()
    }

    pub fn fir_for_challan(&self, challan: ChallanId) -> Option<Fir> {
        let tables = self.tables.read();
        tables
            .fir_by_challan
            .get(&challan)
            .and_then(|id| tables.firs.get(id))
            .cloned()
    }

    pub fn case_for_fir(&self, fir: FirId) -> Option<Case> {
        let tables = self.tables.read();
        tables
            .case_by_fir
            .get(&fir)
            .and_then(|id| tables.cases.get(id))
            .cloned()
    }

    /// Challans issued against `vehicle`, oldest first.
    pub fn challans_for_vehicle(&self, vehicle: VehicleId) -> Vec<Challan> {
        let mut challans: Vec<Challan> = self
            .tables
            .read()
            .challans
            .values()
            .filter(|c| c.vehicle_id == vehicle)
            .cloned()
            .collect();
        challans.sort_by_key(|c| c.issued_at);
        challans
    }

    pub fn challan_count(&self) -> usize {
        self.tables.read().challans.len()
    }

    pub fn fir_count(&self) -> usize {
        self.tables.read().firs.len()
    }

    pub fn case_count(&self) -> usize {
        self.tables.read().cases.len()
    }
}

impl ChainStore for InMemoryChainStore {
    type Tx = InMemoryChainTransaction;

    fn begin(&self) -> Result<Self::Tx, StoreError> {
        Ok(InMemoryChainTransaction {
            tables: Arc::clone(&self.tables),
            staged: Vec::new(),
        })
    }
}

/// Unit of work over [`InMemoryChainStore`].
#[derive(Debug)]
pub struct InMemoryChainTransaction {
    tables: Arc<RwLock<ChainTables>>,
    staged: Vec<StagedWrite>,
}

impl SequenceLedger for InMemoryChainTransaction {
    fn highest_issued(&self, scope: &SequenceScope) -> Result<Option<SequenceNumber>, StoreError> {
        Ok(self.tables.read().highest.get(scope).copied())
    }
}

impl ChainTransaction for InMemoryChainTransaction {
    fn reading(&self, id: ReadingId) -> Result<Option<EmissionReading>, StoreError> {
        Ok(self.tables.read().readings.get(&id).cloned())
    }

    fn challan(&self, id: ChallanId) -> Result<Option<Challan>, StoreError> {
        Ok(self.tables.read().challans.get(&id).cloned())
    }

    fn violation(&self, id: ViolationId) -> Result<Option<Violation>, StoreError> {
        Ok(self.tables.read().violations.get(&id).cloned())
    }

    fn station(&self, id: StationId) -> Result<Option<Station>, StoreError> {
        Ok(self.tables.read().stations.get(&id).cloned())
    }

    fn judge(&self, id: JudgeId) -> Result<Option<Judge>, StoreError> {
        Ok(self.tables.read().judges.get(&id).cloned())
    }

    fn court(&self, id: CourtId) -> Result<Option<Court>, StoreError> {
        Ok(self.tables.read().courts.get(&id).cloned())
    }

    fn fir(&self, id: FirId) -> Result<Option<Fir>, StoreError> {
        Ok(self.tables.read().firs.get(&id).cloned())
    }

    fn case(&self, id: CaseId) -> Result<Option<Case>, StoreError> {
        Ok(self.tables.read().cases.get(&id).cloned())
    }

    fn challan_for_reading(&self, reading: ReadingId) -> Result<Option<Challan>, StoreError> {
        let tables = self.tables.read();
        Ok(tables
            .challan_by_reading
            .get(&reading)
            .and_then(|id| tables.challans.get(id))
            .cloned())
    }

    fn fir_for_challan(&self, challan: ChallanId) -> Result<Option<Fir>, StoreError> {
        let tables = self.tables.read();
        Ok(tables
            .fir_by_challan
            .get(&challan)
            .and_then(|id| tables.firs.get(id))
            .cloned())
    }

    fn case_for_fir(&self, fir: FirId) -> Result<Option<Case>, StoreError> {
        let tables = self.tables.read();
        Ok(tables
            .case_by_fir
            .get(&fir)
            .and_then(|id| tables.cases.get(id))
            .cloned())
    }

    fn insert_reading(&mut self, reading: EmissionReading) {
        self.staged.push(StagedWrite::InsertReading(reading));
    }

    fn insert_challan(&mut self, challan: Challan) {
        self.staged.push(StagedWrite::InsertChallan(challan));
    }

    fn insert_fir(&mut self, fir: Fir) {
        self.staged.push(StagedWrite::InsertFir(fir));
    }

    fn insert_case(&mut self, case: Case) {
        self.staged.push(StagedWrite::InsertCase(case));
    }

    fn update_challan(&mut self, current: Challan, updated: Challan) {
        self.staged
            .push(StagedWrite::UpdateChallan { current, updated });
    }

    fn update_fir(&mut self, current: Fir, updated: Fir) {
        self.staged.push(StagedWrite::UpdateFir { current, updated });
    }

    fn update_case(&mut self, current: Case, updated: Case) {
        self.staged.push(StagedWrite::UpdateCase { current, updated });
    }

    fn commit(self) -> Result<(), CommitError> {
        let mut tables = self.tables.write();
        for write in &self.staged {
            tables.check(write)?;
        }
        for write in self.staged {
            tables.apply(write);
        }
        Ok(())
    }
}
