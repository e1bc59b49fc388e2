//! # Inbound Ports (Driving Ports / API)
//!
//! The signing API exposed to device ingestion and challan issuance.

use crate::domain::entities::IntegrityReport;
use crate::domain::errors::SignatureError;
use shared_types::{Challan, EmissionReading, SignatureValue};

/// Primary Signature Engine API.
///
/// Implementations must be thread-safe (`Send + Sync`) and must never block:
/// signing is pure CPU work over the record plus the service secret.
pub trait SignatureEngineApi: Send + Sync {
    /// Sign a freshly captured reading.
    ///
    /// # Errors
    /// - `NonFiniteValue` / `EmptyField`: the reading has no canonical form
    fn sign_emission_reading(
        &self,
        reading: &EmissionReading,
    ) -> Result<SignatureValue, SignatureError>;

    /// `true` iff `signature` was produced over exactly these stored fields.
    fn verify_emission_reading(&self, reading: &EmissionReading, signature: &SignatureValue)
        -> bool;

    /// Sign a challan's immutable fields.
    fn sign_challan(&self, challan: &Challan) -> Result<SignatureValue, SignatureError>;

    fn verify_challan(&self, challan: &Challan, signature: &SignatureValue) -> bool;

    /// Verify a reading against its stored signature, flagging it on failure.
    fn check_reading_integrity(&self, reading: &EmissionReading) -> IntegrityReport;

    /// Verify a challan against its stored signature, flagging it on failure.
    fn check_challan_integrity(&self, challan: &Challan) -> IntegrityReport;
}
