//! # Public Status Channel Flows
//!
//! Request → verify → token → projection against the wired runtime, with
//! time driven by the fixture clock.

use super::fixture::{config, fixture, fixture_with, CNIC, EMAIL, VEHICLE};
use chrono::Duration;
use ec_04_otp_gateway::OwnerKey;
use shared_types::{
    CaseStatus, ChallanStatus, Classify, ConflictCode, ErrorKind, FirStatus, TimeSource,
};

const TTL_SECS: i64 = 600;

fn wrong(code: &str) -> String {
    if code.starts_with('1') {
        "2".repeat(code.len())
    } else {
        "1".repeat(code.len())
    }
}

#[tokio::test]
async fn test_mismatched_cnic_creates_nothing() {
    let f = fixture();

    let err = f
        .runtime
        .request_status_otp(VEHICLE, "35202-7654321-9", EMAIL)
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Validation);
    assert_eq!(f.runtime.otp_store().total_records(), 0);
    assert!(f.mailer.sent().is_empty());
}

#[tokio::test]
async fn test_mismatch_reasons_are_indistinguishable() {
    let f = fixture();

    let wrong_cnic = f
        .runtime
        .request_status_otp(VEHICLE, "35202-7654321-9", EMAIL)
        .await
        .unwrap_err();
    let wrong_email = f
        .runtime
        .request_status_otp(VEHICLE, CNIC, "someone@example.com")
        .await
        .unwrap_err();
    let unknown_vehicle = f
        .runtime
        .request_status_otp("ZZZ-9999", CNIC, EMAIL)
        .await
        .unwrap_err();

    assert_eq!(wrong_cnic, wrong_email);
    assert_eq!(wrong_email, unknown_vehicle);
    assert_eq!(wrong_cnic.to_string(), unknown_vehicle.to_string());
}

#[tokio::test]
async fn test_code_valid_until_ttl_boundary() {
    let f = fixture();

    f.runtime.request_status_otp(VEHICLE, CNIC, EMAIL).await.unwrap();
    f.clock.advance(Duration::seconds(TTL_SECS - 1));
    let grant = f
        .runtime
        .verify_status_otp(VEHICLE, CNIC, &f.mailed_code())
        .await
        .unwrap();
    assert_eq!(grant.expires_at, f.clock.now() + Duration::seconds(3600));

    f.runtime.request_status_otp(VEHICLE, CNIC, EMAIL).await.unwrap();
    f.clock.advance(Duration::seconds(TTL_SECS + 1));
    let err = f
        .runtime
        .verify_status_otp(VEHICLE, CNIC, &f.mailed_code())
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Expired);
}

#[tokio::test]
async fn test_input_is_normalized() {
    let f = fixture();

    f.runtime
        .request_status_otp("  lea-1234 ", "3520212345671", " Owner@Example.COM ")
        .await
        .unwrap();
    let grant = f
        .runtime
        .verify_status_otp("LEA-1234", CNIC, &f.mailed_code())
        .await;
    assert!(grant.is_ok());
}

#[tokio::test]
async fn test_code_is_single_use() {
    let f = fixture();
    f.runtime.request_status_otp(VEHICLE, CNIC, EMAIL).await.unwrap();
    let code = f.mailed_code();

    f.runtime.verify_status_otp(VEHICLE, CNIC, &code).await.unwrap();
    let err = f
        .runtime
        .verify_status_otp(VEHICLE, CNIC, &code)
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Conflict);
    assert_eq!(err.conflict_code(), Some(ConflictCode::AlreadyVerified));
}

#[tokio::test]
async fn test_wrong_codes_exhaust_the_otp() {
    let mut cfg = config();
    cfg.otp.max_failed_attempts = 2;
    let f = fixture_with(cfg);
    f.runtime.request_status_otp(VEHICLE, CNIC, EMAIL).await.unwrap();
    let code = f.mailed_code();

    let first = f
        .runtime
        .verify_status_otp(VEHICLE, CNIC, &wrong(&code))
        .await
        .unwrap_err();
    assert_eq!(first.kind(), ErrorKind::Validation);

    let second = f
        .runtime
        .verify_status_otp(VEHICLE, CNIC, &wrong(&code))
        .await
        .unwrap_err();
    assert_eq!(second.kind(), ErrorKind::Expired);

    // The right code no longer helps.
    let late = f
        .runtime
        .verify_status_otp(VEHICLE, CNIC, &code)
        .await
        .unwrap_err();
    assert_eq!(late.kind(), ErrorKind::Expired);
}

#[tokio::test]
async fn test_new_request_supersedes_previous_code() {
    let f = fixture();
    f.runtime.request_status_otp(VEHICLE, CNIC, EMAIL).await.unwrap();
    let first = f.mailed_code();
    f.runtime.request_status_otp(VEHICLE, CNIC, EMAIL).await.unwrap();
    let second = f.mailed_code();

    let key = OwnerKey::parse(VEHICLE, CNIC).unwrap();
    assert_eq!(f.runtime.otp_store().record_count(&key), 2);
    assert_eq!(f.mailer.sent().len(), 2);

    if first != second {
        assert!(f
            .runtime
            .verify_status_otp(VEHICLE, CNIC, &first)
            .await
            .is_err());
    }
    assert!(f
        .runtime
        .verify_status_otp(VEHICLE, CNIC, &second)
        .await
        .is_ok());
}

#[tokio::test]
async fn test_verify_without_request_is_not_found() {
    let f = fixture();
    let err = f
        .runtime
        .verify_status_otp(VEHICLE, CNIC, "123456")
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[tokio::test]
async fn test_token_lifetime() {
    let f = fixture();
    f.runtime.request_status_otp(VEHICLE, CNIC, EMAIL).await.unwrap();
    let grant = f
        .runtime
        .verify_status_otp(VEHICLE, CNIC, &f.mailed_code())
        .await
        .unwrap();
    let token = grant.token.expose().to_string();

    f.clock.advance(Duration::minutes(59));
    assert!(f.runtime.get_case_status(&token).await.is_ok());

    f.clock.advance(Duration::minutes(2));
    let err = f.runtime.get_case_status(&token).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Expired);

    let unknown = f
        .runtime
        .get_case_status("not-a-real-token")
        .await
        .unwrap_err();
    assert_eq!(unknown.kind(), ErrorKind::NotFound);
}

#[tokio::test]
async fn test_projection_tracks_live_chain() {
    let f = fixture();
    let paid = f.challan(f.minor);
    let escalated = f.challan(f.cognizable);
    let fir = f
        .runtime
        .issue_fir(f.fir_request(escalated, f.station_s1))
        .unwrap();

    f.runtime.request_status_otp(VEHICLE, CNIC, EMAIL).await.unwrap();
    let grant = f
        .runtime
        .verify_status_otp(VEHICLE, CNIC, &f.mailed_code())
        .await
        .unwrap();
    let token = grant.token.expose().to_string();

    let before = f.runtime.get_case_status(&token).await.unwrap();
    assert_eq!(before.challans.len(), 2);
    assert!(before
        .challans
        .iter()
        .all(|c| c.status == ChallanStatus::Unpaid));

    f.runtime
        .update_challan_status(paid, ChallanStatus::Paid)
        .unwrap();
    let case = f.runtime.issue_case(f.case_request(fir.id)).unwrap();
    f.runtime
        .update_case_status(case.id, CaseStatus::Hearing, None)
        .unwrap();

    let after = f.runtime.get_case_status(&token).await.unwrap();
    let paid_view = after
        .challans
        .iter()
        .find(|c| c.challan_id == paid)
        .unwrap();
    assert_eq!(paid_view.status, ChallanStatus::Paid);
    assert!(paid_view.fir.is_none());

    let fir_view = after
        .challans
        .iter()
        .find(|c| c.challan_id == escalated)
        .and_then(|c| c.fir.as_ref())
        .unwrap();
    assert_eq!(fir_view.fir_number, fir.fir_number);
    assert_eq!(fir_view.status, FirStatus::Filed);
    let case_view = fir_view.case.as_ref().unwrap();
    assert_eq!(case_view.case_number, case.case_number);
    assert_eq!(case_view.status, CaseStatus::Hearing);
    assert!(case_view.verdict.is_none());
}

#[tokio::test]
async fn test_concurrent_verifications_have_one_winner() {
    let f = std::sync::Arc::new(fixture());
    f.runtime.request_status_otp(VEHICLE, CNIC, EMAIL).await.unwrap();
    let code = f.mailed_code();

    let mut handles = Vec::new();
    for _ in 0..8 {
        let f = std::sync::Arc::clone(&f);
        let code = code.clone();
        handles.push(tokio::spawn(async move {
            f.runtime.verify_status_otp(VEHICLE, CNIC, &code).await
        }));
    }

    let mut winners = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => winners += 1,
            Err(e) => assert_eq!(e.conflict_code(), Some(ConflictCode::AlreadyVerified)),
        }
    }
    assert_eq!(winners, 1);
}
