//! # Signature Service
//!
//! Application service implementing [`SignatureEngineApi`].
//!
//! Holds the key ring and forwards failed integrity checks to the
//! [`IntegrityFlagSink`]. Verification failures are outcomes, not faults:
//! they are logged at `warn`, flagged, and returned to the caller.

use crate::domain::canonical::{canonical_bytes, Canonical};
use crate::domain::entities::{IntegrityFailure, IntegrityReport, KeyRing};
use crate::domain::errors::SignatureError;
use crate::domain::signer;
use crate::ports::inbound::SignatureEngineApi;
use crate::ports::outbound::IntegrityFlagSink;
use shared_types::{Challan, EmissionReading, SignatureValue};
use tracing::{debug, error, warn};

/// Signature Engine service.
pub struct SignatureService<F: IntegrityFlagSink> {
    keys: KeyRing,
    flags: F,
}

impl<F: IntegrityFlagSink> SignatureService<F> {
    pub fn new(keys: KeyRing, flags: F) -> Self {
        Self { keys, flags }
    }

    /// Sign any canonical record under the active key.
    pub fn sign<R: Canonical>(&self, record: &R) -> Result<SignatureValue, SignatureError> {
        let message = canonical_bytes(record)?;
        let key = self.keys.active();
        let tag = signer::compute_tag(key, &message)?;
        debug!(record = %record.record_ref(), key_id = key.key_id(), "Record signed");
        Ok(signer::encode(key.key_id(), &tag))
    }

    /// Check `signature` against the record's current fields.
    pub fn verify<R: Canonical>(&self, record: &R, signature: &SignatureValue) -> bool {
        self.diagnose(record, signature).is_ok()
    }

    /// Verify against the stored signature; flag and report on failure.
    pub fn check_integrity<R: Canonical>(&self, record: &R) -> IntegrityReport {
        let outcome = match record.stored_signature() {
            Some(signature) => self.diagnose(record, signature),
            None => Err(IntegrityFailure::Unsigned),
        };

        match outcome {
            Ok(()) => IntegrityReport::Intact,
            Err(failure) => {
                let record_ref = record.record_ref();
                warn!(record = %record_ref, %failure, "Integrity violation detected");
                if let Err(e) = self.flags.flag(record_ref, failure) {
                    error!(record = %record_ref, error = %e, "Failed to flag record for review");
                }
                IntegrityReport::Violated(failure)
            }
        }
    }

    /// Like [`check_integrity`](Self::check_integrity) but as a `Result`, for
    /// callers that must not proceed on tampered evidence.
    pub fn ensure_intact<R: Canonical>(&self, record: &R) -> Result<(), SignatureError> {
        match self.check_integrity(record) {
            IntegrityReport::Intact => Ok(()),
            IntegrityReport::Violated(failure) => Err(SignatureError::IntegrityViolation {
                record: record.record_ref(),
                failure,
            }),
        }
    }

    fn diagnose<R: Canonical>(
        &self,
        record: &R,
        signature: &SignatureValue,
    ) -> Result<(), IntegrityFailure> {
        let parsed =
            signer::parse(signature).map_err(|_| IntegrityFailure::MalformedSignature)?;
        let key = self
            .keys
            .find(&parsed.key_id)
            .ok_or(IntegrityFailure::UnknownKey)?;
        let message = canonical_bytes(record).map_err(|_| IntegrityFailure::Unencodable)?;

        if signer::verify_tag(key, &message, &parsed.tag) {
            Ok(())
        } else {
            Err(IntegrityFailure::Mismatch)
        }
    }
}

impl<F: IntegrityFlagSink> SignatureEngineApi for SignatureService<F> {
    fn sign_emission_reading(
        &self,
        reading: &EmissionReading,
    ) -> Result<SignatureValue, SignatureError> {
        self.sign(reading)
    }

    fn verify_emission_reading(
        &self,
        reading: &EmissionReading,
        signature: &SignatureValue,
    ) -> bool {
        self.verify(reading, signature)
    }

    fn sign_challan(&self, challan: &Challan) -> Result<SignatureValue, SignatureError> {
        self.sign(challan)
    }

    fn verify_challan(&self, challan: &Challan, signature: &SignatureValue) -> bool {
        self.verify(challan, signature)
    }

    fn check_reading_integrity(&self, reading: &EmissionReading) -> IntegrityReport {
        self.check_integrity(reading)
    }

    fn check_challan_integrity(&self, challan: &Challan) -> IntegrityReport {
        self.check_integrity(challan)
    }
}
