//! # Inbound Ports (Driving Ports / API)

use crate::domain::errors::OtpError;
use crate::domain::otp::AccessGrant;
use crate::domain::projection::CaseStatusProjection;
use async_trait::async_trait;
use shared_types::{OtpId, Timestamp};

/// Acknowledgement of an OTP request. Carries no code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OtpConfirmation {
    pub request_id: OtpId,
    pub expires_at: Timestamp,
}

/// Public status-check API.
#[async_trait]
pub trait OtpGatewayApi: Send + Sync {
    /// Send a code to the owner's email if all three details match.
    ///
    /// # Errors
    /// - `InvalidVehicleNo` / `InvalidCnic` / `InvalidEmail`: malformed input
    /// - `OwnerMismatch`: unknown vehicle or any mismatching field
    async fn request_status_otp(
        &self,
        vehicle_no: &str,
        cnic: &str,
        email: &str,
    ) -> Result<OtpConfirmation, OtpError>;

    /// Exchange a correct, unexpired code for an access token. Single use.
    ///
    /// # Errors
    /// - `NoPendingOtp`: nothing requested for this pair
    /// - `CodeExpired` / `AttemptsExhausted`: restart the flow
    /// - `CodeMismatch`: wrong code, attempts remain
    /// - `AlreadyVerified`: the OTP was already used
    async fn verify_status_otp(
        &self,
        vehicle_no: &str,
        cnic: &str,
        code: &str,
    ) -> Result<AccessGrant, OtpError>;

    /// Case status for the identity behind `token`.
    ///
    /// # Errors
    /// - `TokenUnknown`
    /// - `TokenExpired`
    async fn get_case_status(&self, token: &str) -> Result<CaseStatusProjection, OtpError>;
}
