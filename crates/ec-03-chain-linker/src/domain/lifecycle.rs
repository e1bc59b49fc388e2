//! # Lifecycle Rules
//!
//! Pure transition checks for records already in the chain. Each returns the
//! updated record; the service persists it.

use crate::domain::errors::ChainError;
use shared_types::{
    Case, CaseStatus, Challan, ChallanStatus, Fir, FirStatus, InvestigationNote, Timestamp,
    Verdict,
};

/// Unpaid → Paid | Disputed, Disputed → Paid | Unpaid. Paid is final.
pub fn change_challan_status(challan: &Challan, to: ChallanStatus) -> Result<Challan, ChainError> {
    let from = challan.status;
    let allowed = match (from, to) {
        (ChallanStatus::Paid, _) => return Err(ChainError::ChallanSettled { challan: challan.id }),
        (ChallanStatus::Unpaid, ChallanStatus::Paid | ChallanStatus::Disputed) => true,
        (ChallanStatus::Disputed, ChallanStatus::Paid | ChallanStatus::Unpaid) => true,
        _ => false,
    };
    if !allowed {
        return Err(ChainError::InvalidChallanTransition { from, to });
    }
    Ok(Challan {
        status: to,
        ..challan.clone()
    })
}

/// Append a report section. The first section moves the FIR under investigation.
pub fn append_investigation_note(
    fir: &Fir,
    text: &str,
    recorded_at: Timestamp,
) -> Result<Fir, ChainError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(ChainError::EmptyField("investigation_report"));
    }
    if fir.status == FirStatus::Closed {
        return Err(ChainError::FirClosed { fir: fir.id });
    }

    let mut updated = fir.clone();
    updated.investigation_report.push(InvestigationNote {
        recorded_at,
        text: text.to_string(),
    });
    updated.status = FirStatus::UnderInvestigation;
    Ok(updated)
}

pub fn close_fir(fir: &Fir) -> Result<Fir, ChainError> {
    if fir.status == FirStatus::Closed {
        return Err(ChainError::FirClosed { fir: fir.id });
    }
    Ok(Fir {
        status: FirStatus::Closed,
        ..fir.clone()
    })
}

/// Open → Hearing | Adjourned, Hearing ↔ Adjourned.
pub fn change_case_status(
    case: &Case,
    to: CaseStatus,
    hearing_date: Option<Timestamp>,
) -> Result<Case, ChainError> {
    let from = case.status;
    if from.is_terminal() {
        return Err(ChainError::CaseTerminal {
            case: case.id,
            status: from,
        });
    }
    let allowed = matches!(
        (from, to),
        (CaseStatus::Open, CaseStatus::Hearing | CaseStatus::Adjourned)
            | (CaseStatus::Hearing, CaseStatus::Adjourned)
            | (CaseStatus::Adjourned, CaseStatus::Hearing)
    );
    if !allowed {
        return Err(ChainError::InvalidCaseTransition { from, to });
    }

    Ok(Case {
        status: to,
        hearing_date: hearing_date.unwrap_or(case.hearing_date),
        ..case.clone()
    })
}

/// Set the verdict once and close the case.
pub fn record_verdict(
    case: &Case,
    text: &str,
    outcome: CaseStatus,
    recorded_at: Timestamp,
) -> Result<Case, ChainError> {
    if case.verdict.is_some() {
        return Err(ChainError::VerdictAlreadyRecorded { case: case.id });
    }
    if case.status.is_terminal() {
        return Err(ChainError::CaseTerminal {
            case: case.id,
            status: case.status,
        });
    }
    if !outcome.is_terminal() {
        return Err(ChainError::InvalidCaseTransition {
            from: case.status,
            to: outcome,
        });
    }
    let text = text.trim();
    if text.is_empty() {
        return Err(ChainError::EmptyField("verdict"));
    }

    Ok(Case {
        status: outcome,
        verdict: Some(Verdict {
            text: text.to_string(),
            recorded_at,
        }),
        ..case.clone()
    })
}
