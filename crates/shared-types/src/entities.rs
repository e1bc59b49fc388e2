//! # Core Domain Entities
//!
//! The evidentiary records of the enforcement pipeline and the reference
//! data they point at.
//!
//! ## Clusters
//!
//! - **Evidence chain**: `EmissionReading` → `Challan` → `Fir` → `Case`
//! - **Reference data**: `Station`, `Court`, `Judge`, `Violation`, `Vehicle`, `Accused`
//!
//! Each link of the chain is a plain foreign-key field. Reverse lookups
//! ("which FIR references this challan?") are persistence queries.

use crate::ids::*;
use crate::time::Timestamp;
use serde::{Deserialize, Serialize};
use std::fmt;

// =============================================================================
// CLUSTER A: THE EVIDENCE CHAIN
// =============================================================================

/// Opaque tamper-evidence value attached to a signed record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SignatureValue(String);

impl SignatureValue {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SignatureValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The four gas concentrations reported by an emission sensor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GasReadings {
    /// Carbon monoxide, parts per million.
    pub co_ppm: f64,
    /// Carbon dioxide, percent by volume.
    pub co2_percent: f64,
    /// Unburnt hydrocarbons, parts per million.
    pub hc_ppm: f64,
    /// Nitrogen oxides, parts per million.
    pub nox_ppm: f64,
}

/// A single IoT device capture. Immutable once signed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmissionReading {
    pub id: ReadingId,
    pub device_id: String,
    pub gases: GasReadings,
    pub sound_level_db: f64,
    pub captured_at: Timestamp,
    /// Label assigned by the roadside classifier.
    pub classification: String,
    pub signature: Option<SignatureValue>,
}

/// Payment state of a challan. The only field that changes after issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChallanStatus {
    Unpaid,
    Paid,
    Disputed,
}

impl fmt::Display for ChallanStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ChallanStatus::Unpaid => "Unpaid",
            ChallanStatus::Paid => "Paid",
            ChallanStatus::Disputed => "Disputed",
        };
        f.write_str(s)
    }
}

/// A violation citation issued by an officer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Challan {
    pub id: ChallanId,
    pub officer_id: OfficerId,
    pub accused_id: AccusedId,
    pub vehicle_id: VehicleId,
    pub violation_id: ViolationId,
    /// At most one supporting reading.
    pub emission_reading_id: Option<ReadingId>,
    pub issued_at: Timestamp,
    pub due_at: Timestamp,
    pub status: ChallanStatus,
    pub signature: Option<SignatureValue>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FirStatus {
    Filed,
    UnderInvestigation,
    Closed,
}

impl fmt::Display for FirStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            FirStatus::Filed => "Filed",
            FirStatus::UnderInvestigation => "UnderInvestigation",
            FirStatus::Closed => "Closed",
        };
        f.write_str(s)
    }
}

/// One appended section of a FIR's investigation report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvestigationNote {
    pub recorded_at: Timestamp,
    pub text: String,
}

/// First Information Report, minted from exactly one cognizable challan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fir {
    pub id: FirId,
    /// Formatted `FIR-{station}-{year}-{seq}`; unique within (station, year).
    pub fir_number: String,
    pub station_id: StationId,
    pub year: i32,
    pub sequence: u32,
    pub informant_id: OfficerId,
    pub challan_id: ChallanId,
    pub filed_at: Timestamp,
    pub status: FirStatus,
    pub description: String,
    /// Append-only.
    pub investigation_report: Vec<InvestigationNote>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CaseStatus {
    Open,
    Hearing,
    Adjourned,
    Decided,
    Dismissed,
}

impl CaseStatus {
    /// Terminal statuses freeze the verdict.
    pub fn is_terminal(&self) -> bool {
        matches!(self, CaseStatus::Decided | CaseStatus::Dismissed)
    }
}

impl fmt::Display for CaseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            CaseStatus::Open => "Open",
            CaseStatus::Hearing => "Hearing",
            CaseStatus::Adjourned => "Adjourned",
            CaseStatus::Decided => "Decided",
            CaseStatus::Dismissed => "Dismissed",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verdict {
    pub text: String,
    pub recorded_at: Timestamp,
}

/// Judicial proceeding opened from exactly one FIR.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Case {
    pub id: CaseId,
    /// Formatted `CASE-{court}-{year}-{seq}`; unique within (court, year).
    pub case_number: String,
    pub court_id: CourtId,
    pub year: i32,
    pub sequence: u32,
    pub fir_id: FirId,
    pub judge_id: JudgeId,
    pub case_type: String,
    pub status: CaseStatus,
    pub hearing_date: Timestamp,
    pub opened_at: Timestamp,
    /// Set once; frozen after a terminal status.
    pub verdict: Option<Verdict>,
}

// =============================================================================
// CLUSTER B: REFERENCE DATA
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Station {
    pub id: StationId,
    /// Short code embedded in FIR numbers, e.g. `S1`.
    pub code: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Court {
    pub id: CourtId,
    /// Short code embedded in Case numbers.
    pub code: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Judge {
    pub id: JudgeId,
    pub court_id: CourtId,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    pub id: ViolationId,
    pub code: String,
    pub description: String,
    /// Serious enough for police to open a FIR without a court order.
    pub cognizable: bool,
}

/// Accused person; the registered owner of one or more vehicles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Accused {
    pub id: AccusedId,
    pub name: String,
    /// National identity number, `#####-#######-#`.
    pub cnic: String,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vehicle {
    pub id: VehicleId,
    pub registration_no: String,
    pub owner_id: AccusedId,
}
