//! # Integrity Flows
//!
//! Tamper evidence for readings and challans: every signed field is
//! covered, rotated keys keep verifying, and violations reach the review
//! queue without blocking reads.

use super::fixture::{config, fixture, fixture_with, SECRET};
use case_runtime::RetiredKey;
use chrono::Duration;
use ec_01_signature_engine::{IntegrityFailure, IntegrityReport, RecordKind};
use shared_types::{
    ChallanStatus, Classify, ConflictCode, EmissionReading, ErrorKind, SignatureValue, TimeSource,
};

#[test]
fn test_signed_reading_verifies() {
    let f = fixture();
    let reading = f.reading();
    let signature = f.runtime.sign_emission_reading(&reading).unwrap();

    assert!(signature.as_str().contains(":k1:"));
    assert!(f.runtime.verify_signature(&reading, &signature));
    // Deterministic over the same fields.
    assert_eq!(f.runtime.sign_emission_reading(&reading).unwrap(), signature);
}

#[test]
fn test_every_signed_field_is_covered() {
    let f = fixture();
    let original = f.reading();
    let signature = f.runtime.sign_emission_reading(&original).unwrap();

    let mutations: [(&str, fn(&mut EmissionReading)); 7] = [
        ("device_id", |r| r.device_id.push('X')),
        ("co_ppm", |r| r.gases.co_ppm += 0.1),
        ("co2_percent", |r| r.gases.co2_percent -= 0.1),
        ("hc_ppm", |r| r.gases.hc_ppm = 0.0),
        ("nox_ppm", |r| r.gases.nox_ppm *= 2.0),
        ("sound_level_db", |r| r.sound_level_db = 79.9),
        ("captured_at", |r| r.captured_at += Duration::seconds(1)),
    ];

    for (field, mutate) in mutations {
        let mut tampered = original.clone();
        mutate(&mut tampered);
        assert!(
            !f.runtime.verify_signature(&tampered, &signature),
            "mutating {field} must break verification"
        );
    }
}

#[test]
fn test_reclassification_keeps_signature_valid() {
    let f = fixture();
    let mut reading = f.reading();
    let signature = f.runtime.sign_emission_reading(&reading).unwrap();

    reading.classification = "pressure_horn".into();
    assert!(f.runtime.verify_signature(&reading, &signature));
}

#[test]
fn test_foreign_or_garbled_signatures_fail() {
    let f = fixture();
    let reading = f.reading();
    let genuine = f.runtime.sign_emission_reading(&reading).unwrap();

    let foreign = genuine.as_str().replacen(":k1:", ":k9:", 1);
    assert!(!f.runtime.verify_signature(&reading, &SignatureValue::new(foreign)));
    assert!(!f
        .runtime
        .verify_signature(&reading, &SignatureValue::new("not-a-signature")));
    assert!(!f.runtime.verify_signature(&reading, &SignatureValue::new("")));
}

#[test]
fn test_other_secret_cannot_verify() {
    let f = fixture();
    let other = fixture_with(config().with_signing_secret("k1", &[0x13; 32]));
    let reading = f.reading();
    let signature = f.runtime.sign_emission_reading(&reading).unwrap();

    assert!(!other.runtime.verify_signature(&reading, &signature));
}

#[test]
fn test_rotated_key_still_verifies_old_records() {
    let before = fixture();
    let reading = before.runtime.capture_reading(before.reading()).unwrap();

    let mut rotated = config().with_signing_secret("k2", &[0x77; 32]);
    rotated.signing.retired.push(RetiredKey {
        key_id: "k1".into(),
        secret_hex: hex_secret(),
    });
    let after = fixture_with(rotated);
    after.runtime.store().chain().restore_reading(reading.clone());

    let old_signature = reading.signature.clone().unwrap();
    assert!(after.runtime.verify_signature(&reading, &old_signature));
    assert_eq!(
        after.runtime.check_reading_integrity(reading.id),
        Some(IntegrityReport::Intact)
    );

    // New signatures use the active key.
    let fresh = after.runtime.sign_emission_reading(&after.reading()).unwrap();
    assert!(fresh.as_str().contains(":k2:"));
}

#[test]
fn test_tampered_challan_reaches_review_queue() {
    let f = fixture();
    let challan_id = f.challan(f.cognizable);

    let mut challan = f.runtime.store().chain().challan(challan_id).unwrap();
    challan.due_at += Duration::days(60);
    f.runtime.store().chain().restore_challan(challan);

    assert_eq!(
        f.runtime.check_challan_integrity(challan_id),
        Some(IntegrityReport::Violated(IntegrityFailure::Mismatch))
    );
    // Reads are not blocked.
    assert!(f.runtime.store().chain().challan(challan_id).is_some());

    let queue = f.runtime.store().review_queue();
    assert_eq!(queue.len(), 1);
    assert_eq!(queue[0].record.kind, RecordKind::Challan);
    assert_eq!(queue[0].failure, IntegrityFailure::Mismatch);
}

#[test]
fn test_settled_challan_stays_intact() {
    let f = fixture();
    let challan = f.challan(f.cognizable);
    f.runtime
        .update_challan_status(challan, ChallanStatus::Paid)
        .unwrap();

    assert_eq!(
        f.runtime.check_challan_integrity(challan),
        Some(IntegrityReport::Intact)
    );
    assert!(f.runtime.store().review_queue().is_empty());
}

#[test]
fn test_unsigned_reading_is_flagged() {
    let f = fixture();
    let reading = f.reading();
    f.runtime.store().chain().restore_reading(reading.clone());
    f.clock.advance(Duration::minutes(7));

    assert_eq!(
        f.runtime.check_reading_integrity(reading.id),
        Some(IntegrityReport::Violated(IntegrityFailure::Unsigned))
    );
    let queue = f.runtime.store().review_queue();
    assert_eq!(queue.len(), 1);
    assert_eq!(queue[0].flagged_at, f.clock.now());
}

#[test]
fn test_recapture_cannot_resign_altered_reading() {
    let f = fixture();
    let original = f.runtime.capture_reading(f.reading()).unwrap();

    let mut altered = original.clone();
    altered.sound_level_db = 60.0;
    altered.signature = None;
    let err = f.runtime.capture_reading(altered).unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Conflict);
    assert_eq!(err.conflict_code(), Some(ConflictCode::Immutable));
    assert_eq!(f.runtime.store().reading(original.id), Some(original.clone()));
    assert_eq!(
        f.runtime.check_reading_integrity(original.id),
        Some(IntegrityReport::Intact)
    );
}

fn hex_secret() -> String {
    SECRET.iter().map(|b| format!("{b:02x}")).collect()
}
