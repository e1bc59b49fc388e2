//! # In-Memory Evidence Store
//!
//! One store behind every outbound port of the four subsystems:
//!
//! - [`ChainStore`] by delegating to the chain linker's transactional tables
//! - [`OwnerDirectory`] and [`CaseStatusReader`] over vehicles, owners and the chain
//! - [`IntegrityFlagSink`] as a review queue, stamped by the injected clock
//!
//! Readings and challans live in the chain tables and only enter through
//! the chain linker. Cloning shares the underlying tables.

use ec_01_signature_engine::{IntegrityFailure, IntegrityFlagSink, RecordRef};
use ec_03_chain_linker::{ChainStore, InMemoryChainStore, InMemoryChainTransaction};
use ec_04_otp_gateway::{
    CaseStatusProjection, CaseStatusReader, CaseStatusView, ChallanStatusView, FirStatusView,
    OwnerDirectory, OwnerKey, RegisteredOwner,
};
use parking_lot::RwLock;
use shared_types::{
    Accused, AccusedId, Challan, EmissionReading, ReadingId, StoreError, SystemTimeSource,
    TimeSource, Timestamp, Vehicle, VehicleId,
};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::warn;

/// A record queued for manual review.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlaggedRecord {
    pub record: RecordRef,
    pub failure: IntegrityFailure,
    pub flagged_at: Timestamp,
}

#[derive(Debug, Default)]
struct EvidenceTables {
    vehicles: HashMap<VehicleId, Vehicle>,
    accused: HashMap<AccusedId, Accused>,
    review_queue: Vec<FlaggedRecord>,
}

#[derive(Clone)]
pub struct InMemoryEvidenceStore {
    chain: InMemoryChainStore,
    tables: Arc<RwLock<EvidenceTables>>,
    clock: Arc<dyn TimeSource>,
}

impl fmt::Debug for InMemoryEvidenceStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InMemoryEvidenceStore")
            .field("chain", &self.chain)
            .field("tables", &self.tables)
            .finish_non_exhaustive()
    }
}

impl Default for InMemoryEvidenceStore {
    fn default() -> Self {
        Self::with_clock(Arc::new(SystemTimeSource))
    }
}

impl InMemoryEvidenceStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Review-queue entries are stamped from `clock`.
    pub fn with_clock(clock: Arc<dyn TimeSource>) -> Self {
        Self {
            chain: InMemoryChainStore::new(),
            tables: Arc::default(),
            clock,
        }
    }

    /// Stations, courts, judges, violations and challans live here.
    pub fn chain(&self) -> &InMemoryChainStore {
        &self.chain
    }

    pub fn reading(&self, id: ReadingId) -> Option<EmissionReading> {
        self.chain.reading(id)
    }

    /// Register a vehicle together with its owner.
    pub fn register_vehicle(&self, owner: Accused, vehicle: Vehicle) {
        let mut tables = self.tables.write();
        tables.accused.insert(owner.id, owner);
        tables.vehicles.insert(vehicle.id, vehicle);
    }

    pub fn vehicle_by_registration(&self, registration_no: &str) -> Option<Vehicle> {
        let wanted = registration_no.trim();
        self.tables
            .read()
            .vehicles
            .values()
            .find(|v| v.registration_no.trim().eq_ignore_ascii_case(wanted))
            .cloned()
    }

    /// Everything flagged so far, oldest first.
    pub fn review_queue(&self) -> Vec<FlaggedRecord> {
        self.tables.read().review_queue.clone()
    }

    fn owner_of(&self, vehicle: &Vehicle) -> Result<Accused, StoreError> {
        self.tables
            .read()
            .accused
            .get(&vehicle.owner_id)
            .cloned()
            .ok_or_else(|| {
                StoreError::Corrupted(format!(
                    "vehicle {} references missing owner {}",
                    vehicle.id, vehicle.owner_id
                ))
            })
    }

    fn cnic_of(&self, accused: AccusedId) -> Option<String> {
        self.tables
            .read()
            .accused
            .get(&accused)
            .map(|a| a.cnic.clone())
    }

    fn challan_view(&self, challan: &Challan) -> ChallanStatusView {
        let fir = self.chain.fir_for_challan(challan.id).map(|fir| {
            let case = self.chain.case_for_fir(fir.id).map(|case| CaseStatusView {
                case_number: case.case_number,
                status: case.status,
                hearing_date: case.hearing_date,
                verdict: case.verdict.map(|v| v.text),
            });
            FirStatusView {
                fir_number: fir.fir_number,
                status: fir.status,
                filed_at: fir.filed_at,
                case,
            }
        });

        ChallanStatusView {
            challan_id: challan.id,
            issued_at: challan.issued_at,
            due_at: challan.due_at,
            status: challan.status,
            fir,
        }
    }
}

/// CNICs compared on their digits, so `3520212345671` equals `35202-1234567-1`.
fn same_cnic(a: &str, b: &str) -> bool {
    let digits = |s: &str| s.chars().filter(char::is_ascii_digit).collect::<String>();
    let a = digits(a);
    !a.is_empty() && a == digits(b)
}

impl ChainStore for InMemoryEvidenceStore {
    type Tx = InMemoryChainTransaction;

    fn begin(&self) -> Result<Self::Tx, StoreError> {
        self.chain.begin()
    }
}

impl OwnerDirectory for InMemoryEvidenceStore {
    fn registered_owner(&self, vehicle_no: &str) -> Result<Option<RegisteredOwner>, StoreError> {
        let Some(vehicle) = self.vehicle_by_registration(vehicle_no) else {
            return Ok(None);
        };
        let owner = self.owner_of(&vehicle)?;
        Ok(Some(RegisteredOwner {
            cnic: owner.cnic,
            email: owner.email,
        }))
    }
}

impl CaseStatusReader for InMemoryEvidenceStore {
    fn case_status(&self, key: &OwnerKey) -> Result<CaseStatusProjection, StoreError> {
        let mut projection = CaseStatusProjection::empty(key.vehicle_no.clone());
        let Some(vehicle) = self.vehicle_by_registration(&key.vehicle_no) else {
            return Ok(projection);
        };

        projection.challans = self
            .chain
            .challans_for_vehicle(vehicle.id)
            .iter()
            .filter(|c| {
                self.cnic_of(c.accused_id)
                    .is_some_and(|cnic| same_cnic(&cnic, &key.cnic))
            })
            .map(|c| self.challan_view(c))
            .collect();
        Ok(projection)
    }
}

impl IntegrityFlagSink for InMemoryEvidenceStore {
    fn flag(&self, record: RecordRef, failure: IntegrityFailure) -> Result<(), StoreError> {
        warn!(record = %record, %failure, "Record queued for manual review");
        self.tables.write().review_queue.push(FlaggedRecord {
            record,
            failure,
            flagged_at: self.clock.now(),
        });
        Ok(())
    }
}
