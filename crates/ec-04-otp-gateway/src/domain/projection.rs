//! # Case-Status Projection
//!
//! Read-only view of the evidence chain for one vehicle/CNIC identity:
//! challan → FIR → case → verdict.

use serde::{Deserialize, Serialize};
use shared_types::{CaseStatus, ChallanId, ChallanStatus, FirStatus, Timestamp};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseStatusProjection {
    pub vehicle_no: String,
    /// Oldest challan first.
    pub challans: Vec<ChallanStatusView>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChallanStatusView {
    pub challan_id: ChallanId,
    pub issued_at: Timestamp,
    pub due_at: Timestamp,
    pub status: ChallanStatus,
    pub fir: Option<FirStatusView>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FirStatusView {
    pub fir_number: String,
    pub status: FirStatus,
    pub filed_at: Timestamp,
    pub case: Option<CaseStatusView>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseStatusView {
    pub case_number: String,
    pub status: CaseStatus,
    pub hearing_date: Timestamp,
    pub verdict: Option<String>,
}

impl CaseStatusProjection {
    pub fn empty(vehicle_no: impl Into<String>) -> Self {
        Self {
            vehicle_no: vehicle_no.into(),
            challans: Vec::new(),
        }
    }
}
