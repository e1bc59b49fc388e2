//! # Evidence Chain Flows
//!
//! FIR and Case issuance through the wired runtime:
//!
//! 1. **Uniqueness**: concurrent issuance in one scope yields distinct, gapless numbers
//! 2. **1:1 linkage**: a reading, challan or FIR never gains a second child
//!    and stored evidence is never replaced
//! 3. **Scoping**: stations and years number independently
//! 4. **Lifecycle**: report, close, hearing, verdict

use super::fixture::{fixture, Fixture};
use case_runtime::IngestError;
use chrono::{Duration, TimeZone, Utc};
use ec_01_signature_engine::IntegrityReport;
use ec_02_sequence_allocator::{IdentifierFormat, IssuedIdentifier, ScopeKind};
use ec_03_chain_linker::ChainError;
use shared_types::{
    CaseStatus, ChallanId, ChallanStatus, Classify, ConflictCode, ErrorKind, FirId, FirStatus,
    ReadingId, Station, StationId,
};
use std::collections::HashSet;

fn sequence_of(number: &str) -> u32 {
    IdentifierFormat::default()
        .parse(number)
        .expect("issued numbers parse")
        .sequence
        .value()
}

fn issue_fir(f: &Fixture) -> FirId {
    let challan = f.challan(f.cognizable);
    f.runtime
        .issue_fir(f.fir_request(challan, f.station_s1))
        .unwrap()
        .id
}

// =============================================================================
// UNIQUENESS
// =============================================================================

#[test]
fn test_two_concurrent_firs_at_one_station() {
    let f = fixture();
    let challans = [f.challan(f.cognizable), f.challan(f.cognizable)];

    let numbers: Vec<String> = std::thread::scope(|s| {
        let f = &f;
        let handles: Vec<_> = challans
            .iter()
            .map(|&challan| {
                s.spawn(move || {
                    f.runtime
                        .issue_fir(f.fir_request(challan, f.station_s1))
                        .unwrap()
                        .fir_number
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    let numbers: HashSet<String> = numbers.into_iter().collect();
    let expected: HashSet<String> = ["FIR-S1-2025-0001", "FIR-S1-2025-0002"]
        .into_iter()
        .map(String::from)
        .collect();
    assert_eq!(numbers, expected);
}

#[test]
fn test_concurrent_issuance_is_gapless_and_unique() {
    let f = fixture();
    let challans: Vec<ChallanId> = (0..10).map(|_| f.challan(f.cognizable)).collect();

    let firs: Vec<_> = std::thread::scope(|s| {
        let f = &f;
        let handles: Vec<_> = challans
            .iter()
            .map(|&challan| {
                s.spawn(move || f.runtime.issue_fir(f.fir_request(challan, f.station_s1)))
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    let mut sequences: Vec<u32> = firs
        .into_iter()
        .map(|fir| sequence_of(&fir.unwrap().fir_number))
        .collect();
    sequences.sort_unstable();
    assert_eq!(sequences, (1..=10).collect::<Vec<u32>>());
}

#[test]
fn test_numbers_increase_in_issue_order() {
    let f = fixture();
    let mut previous = 0;
    for _ in 0..5 {
        let challan = f.challan(f.cognizable);
        let fir = f
            .runtime
            .issue_fir(f.fir_request(challan, f.station_s1))
            .unwrap();
        assert!(fir.sequence > previous);
        previous = fir.sequence;
    }
}

#[test]
fn test_concurrent_cases_in_one_court() {
    let f = fixture();
    let firs: Vec<FirId> = (0..6).map(|_| issue_fir(&f)).collect();

    let numbers: HashSet<String> = std::thread::scope(|s| {
        let f = &f;
        let handles: Vec<_> = firs
            .iter()
            .map(|&fir| s.spawn(move || f.runtime.issue_case(f.case_request(fir)).unwrap()))
            .collect();
        handles
            .into_iter()
            .map(|h| h.join().unwrap().case_number)
            .collect()
    });

    assert_eq!(numbers.len(), 6);
    for number in &numbers {
        let parsed: IssuedIdentifier = IdentifierFormat::default().parse(number).unwrap();
        assert_eq!(parsed.kind, ScopeKind::Case);
        assert_eq!(parsed.org_code, "LHR3");
        assert!((1..=6).contains(&parsed.sequence.value()));
    }
}

// =============================================================================
// SCOPING
// =============================================================================

#[test]
fn test_stations_number_independently() {
    let f = fixture();
    let a = f.challan(f.cognizable);
    let b = f.challan(f.cognizable);

    let s1 = f.runtime.issue_fir(f.fir_request(a, f.station_s1)).unwrap();
    let s2 = f.runtime.issue_fir(f.fir_request(b, f.station_s2)).unwrap();
    assert_eq!(s1.fir_number, "FIR-S1-2025-0001");
    assert_eq!(s2.fir_number, "FIR-S2-2025-0001");
}

#[test]
fn test_year_rollover_restarts_sequence() {
    let f = fixture();
    issue_fir(&f);
    issue_fir(&f);

    f.clock.set(Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 5).unwrap());
    let challan = f.challan(f.cognizable);
    let fir = f
        .runtime
        .issue_fir(f.fir_request(challan, f.station_s1))
        .unwrap();
    assert_eq!(fir.fir_number, "FIR-S1-2026-0001");
    assert_eq!(fir.year, 2026);
}

// =============================================================================
// 1:1 LINKAGE
// =============================================================================

#[test]
fn test_second_fir_for_challan_conflicts() {
    let f = fixture();
    let challan = f.challan(f.cognizable);
    let first = f
        .runtime
        .issue_fir(f.fir_request(challan, f.station_s1))
        .unwrap();

    let err = f
        .runtime
        .issue_fir(f.fir_request(challan, f.station_s2))
        .unwrap_err();
    assert_eq!(err, ChainError::ChallanAlreadyLinked { challan });
    assert_eq!(err.kind(), ErrorKind::Conflict);
    assert_eq!(err.conflict_code(), Some(ConflictCode::AlreadyLinked));

    assert_eq!(f.runtime.store().chain().fir_count(), 1);
    assert_eq!(f.runtime.store().chain().fir_for_challan(challan), Some(first));
}

#[test]
fn test_second_challan_for_reading_conflicts() {
    let f = fixture();
    let reading = f.runtime.capture_reading(f.reading()).unwrap();
    let first = f
        .runtime
        .file_challan(f.unfiled_challan(f.cognizable, Some(reading.id)))
        .unwrap();

    let err = f
        .runtime
        .file_challan(f.unfiled_challan(f.minor, Some(reading.id)))
        .unwrap_err();
    assert_eq!(
        err,
        IngestError::Chain(ChainError::ReadingAlreadyCited {
            reading: reading.id,
            challan: first.id,
        })
    );
    assert_eq!(err.kind(), ErrorKind::Conflict);
    assert_eq!(err.conflict_code(), Some(ConflictCode::AlreadyLinked));
    assert_eq!(
        f.runtime.store().chain().challan_for_reading(reading.id),
        Some(first)
    );
    assert_eq!(f.runtime.store().chain().challan_count(), 1);
}

#[test]
fn test_challan_citing_unknown_reading_is_rejected() {
    let f = fixture();
    let dangling = ReadingId::new();

    let err = f
        .runtime
        .file_challan(f.unfiled_challan(f.cognizable, Some(dangling)))
        .unwrap_err();
    assert_eq!(err, IngestError::Chain(ChainError::ReadingNotFound(dangling)));
    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert_eq!(f.runtime.store().chain().challan_count(), 0);
}

#[test]
fn test_refiling_paid_challan_is_rejected() {
    let f = fixture();
    let id = f.challan(f.minor);
    f.runtime
        .update_challan_status(id, ChallanStatus::Paid)
        .unwrap();

    let mut refiled = f.runtime.store().chain().challan(id).unwrap();
    refiled.status = ChallanStatus::Unpaid;
    refiled.signature = None;
    let err = f.runtime.file_challan(refiled).unwrap_err();

    assert_eq!(err, IngestError::Chain(ChainError::ChallanExists { challan: id }));
    assert_eq!(err.conflict_code(), Some(ConflictCode::Immutable));
    let stored = f.runtime.store().chain().challan(id).unwrap();
    assert_eq!(stored.status, ChallanStatus::Paid);
    assert_eq!(
        f.runtime.check_challan_integrity(id),
        Some(IntegrityReport::Intact)
    );
}

#[test]
fn test_station_code_cannot_be_shared() {
    let f = fixture();
    let err = f
        .runtime
        .seed_station(Station {
            id: StationId::new(),
            code: "S1".into(),
            name: "Model Town Police Station".into(),
        })
        .unwrap_err();
    assert_eq!(err, ChainError::DuplicateOrgCode { code: "S1".into() });
    assert_eq!(err.conflict_code(), Some(ConflictCode::DuplicateIdentifier));

    let challan = f.challan(f.cognizable);
    let fir = f
        .runtime
        .issue_fir(f.fir_request(challan, f.station_s1))
        .unwrap();
    assert_eq!(fir.fir_number, "FIR-S1-2025-0001");
}

#[test]
fn test_racing_firs_for_one_challan_have_one_winner() {
    let f = fixture();
    let challan = f.challan(f.cognizable);

    let outcomes: Vec<_> = std::thread::scope(|s| {
        let f = &f;
        let handles: Vec<_> = (0..8)
            .map(|_| s.spawn(move || f.runtime.issue_fir(f.fir_request(challan, f.station_s1))))
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    let winners = outcomes.iter().filter(|o| o.is_ok()).count();
    assert_eq!(winners, 1);
    for outcome in outcomes.iter().filter_map(|o| o.as_ref().err()) {
        assert_eq!(outcome.conflict_code(), Some(ConflictCode::AlreadyLinked));
    }
    assert_eq!(f.runtime.store().chain().fir_count(), 1);
}

#[test]
fn test_second_case_for_fir_conflicts() {
    let f = fixture();
    let fir = issue_fir(&f);
    f.runtime.issue_case(f.case_request(fir)).unwrap();

    let err = f.runtime.issue_case(f.case_request(fir)).unwrap_err();
    assert_eq!(err, ChainError::FirAlreadyLinked { fir });
    assert_eq!(err.conflict_code(), Some(ConflictCode::AlreadyLinked));
    assert_eq!(f.runtime.store().chain().case_count(), 1);
}

#[test]
fn test_rejections_are_classified() {
    let f = fixture();
    let minor = f.challan(f.minor);

    let not_cognizable = f
        .runtime
        .issue_fir(f.fir_request(minor, f.station_s1))
        .unwrap_err();
    assert_eq!(not_cognizable.kind(), ErrorKind::Validation);

    let unknown = f
        .runtime
        .issue_fir(f.fir_request(ChallanId::new(), f.station_s1))
        .unwrap_err();
    assert_eq!(unknown.kind(), ErrorKind::NotFound);

    let no_fir = f.runtime.issue_case(f.case_request(FirId::new())).unwrap_err();
    assert_eq!(no_fir.kind(), ErrorKind::NotFound);

    assert_eq!(f.runtime.store().chain().fir_count(), 0);
}

// =============================================================================
// LIFECYCLE
// =============================================================================

#[test]
fn test_fir_report_and_close() {
    let f = fixture();
    let fir = issue_fir(&f);

    f.clock.advance(Duration::days(2));
    let updated = f
        .runtime
        .file_investigation_report(fir, "Exhaust modification confirmed at workshop")
        .unwrap();
    assert_eq!(updated.status, FirStatus::UnderInvestigation);
    assert_eq!(updated.investigation_report.len(), 1);

    let closed = f.runtime.close_fir(fir).unwrap();
    assert_eq!(closed.status, FirStatus::Closed);
    assert_eq!(closed.investigation_report, updated.investigation_report);

    let err = f
        .runtime
        .file_investigation_report(fir, "Late addendum")
        .unwrap_err();
    assert_eq!(err.conflict_code(), Some(ConflictCode::Immutable));
}

#[test]
fn test_case_hearing_and_single_verdict() {
    let f = fixture();
    let fir = issue_fir(&f);
    let case = f.runtime.issue_case(f.case_request(fir)).unwrap();
    assert_eq!(case.status, CaseStatus::Open);

    let rescheduled = case.hearing_date + Duration::days(7);
    let adjourned = f
        .runtime
        .update_case_status(case.id, CaseStatus::Adjourned, Some(rescheduled))
        .unwrap();
    assert_eq!(adjourned.hearing_date, rescheduled);

    let decided = f
        .runtime
        .record_verdict(case.id, "Fined PKR 10,000", CaseStatus::Decided)
        .unwrap();
    assert_eq!(decided.status, CaseStatus::Decided);
    assert_eq!(decided.case_number, case.case_number);

    let err = f
        .runtime
        .record_verdict(case.id, "Acquitted", CaseStatus::Dismissed)
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Conflict);
    assert_eq!(err.conflict_code(), Some(ConflictCode::Immutable));

    let stored = f.runtime.store().chain().case(case.id).unwrap();
    assert_eq!(stored.verdict.unwrap().text, "Fined PKR 10,000");
}

#[test]
fn test_paid_challan_is_final() {
    let f = fixture();
    let challan = f.challan(f.cognizable);

    f.runtime
        .update_challan_status(challan, ChallanStatus::Disputed)
        .unwrap();
    f.runtime
        .update_challan_status(challan, ChallanStatus::Paid)
        .unwrap();
    let err = f
        .runtime
        .update_challan_status(challan, ChallanStatus::Unpaid)
        .unwrap_err();
    assert_eq!(err, ChainError::ChallanSettled { challan });
}
