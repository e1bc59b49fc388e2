//! # Issuance Requests

use shared_types::{ChallanId, FirId, JudgeId, OfficerId, StationId, Timestamp};

/// Input to `IssueFir`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FirRequest {
    pub challan_id: ChallanId,
    pub station_id: StationId,
    pub informant_id: OfficerId,
    pub description: String,
}

/// Input to `IssueCase`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaseRequest {
    pub fir_id: FirId,
    pub judge_id: JudgeId,
    pub case_type: String,
    pub hearing_date: Timestamp,
}
