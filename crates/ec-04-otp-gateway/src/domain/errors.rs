//! # OTP Gateway Errors
//!
//! Messages never contain codes, tokens, or which owner field failed to match.

use shared_types::{Classify, ConflictCode, ErrorKind, StoreError};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OtpError {
    #[error("Invalid vehicle number")]
    InvalidVehicleNo,

    /// Expected `#####-#######-#` or 13 digits.
    #[error("Invalid CNIC format")]
    InvalidCnic,

    #[error("Invalid email address")]
    InvalidEmail,

    /// Unknown vehicle or any mismatching owner field. Deliberately uniform.
    #[error("The supplied details do not match our records")]
    OwnerMismatch,

    #[error("Incorrect code ({remaining_attempts} attempts remaining)")]
    CodeMismatch { remaining_attempts: u32 },

    #[error("No status OTP has been requested for these details")]
    NoPendingOtp,

    #[error("This OTP has already been used")]
    AlreadyVerified,

    #[error("The OTP has expired; request a new one")]
    CodeExpired,

    #[error("Too many incorrect codes; request a new OTP")]
    AttemptsExhausted,

    #[error("Unknown access token")]
    TokenUnknown,

    #[error("The access token has expired; verify again")]
    TokenExpired,

    /// An event that the current state does not accept.
    #[error("OTP cannot apply '{event}' while {state}")]
    InvalidTransition {
        state: &'static str,
        event: &'static str,
    },

    #[error("OTP record kept changing during verification")]
    ConcurrentVerification,

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl Classify for OtpError {
    fn kind(&self) -> ErrorKind {
        match self {
            OtpError::InvalidVehicleNo
            | OtpError::InvalidCnic
            | OtpError::InvalidEmail
            | OtpError::OwnerMismatch
            | OtpError::CodeMismatch { .. } => ErrorKind::Validation,
            OtpError::NoPendingOtp | OtpError::TokenUnknown => ErrorKind::NotFound,
            OtpError::AlreadyVerified
            | OtpError::InvalidTransition { .. }
            | OtpError::ConcurrentVerification => ErrorKind::Conflict,
            OtpError::CodeExpired | OtpError::AttemptsExhausted | OtpError::TokenExpired => {
                ErrorKind::Expired
            }
            OtpError::Store(_) => ErrorKind::Storage,
        }
    }

    fn conflict_code(&self) -> Option<ConflictCode> {
        match self {
            OtpError::AlreadyVerified => Some(ConflictCode::AlreadyVerified),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_owner_mismatch_is_generic() {
        let msg = OtpError::OwnerMismatch.to_string();
        assert!(!msg.to_lowercase().contains("cnic"));
        assert!(!msg.to_lowercase().contains("email"));
        assert_eq!(OtpError::OwnerMismatch.kind(), ErrorKind::Validation);
    }

    #[test]
    fn test_single_use_conflict_code() {
        assert_eq!(OtpError::AlreadyVerified.kind(), ErrorKind::Conflict);
        assert_eq!(
            OtpError::AlreadyVerified.conflict_code(),
            Some(ConflictCode::AlreadyVerified)
        );
        assert_eq!(OtpError::TokenExpired.kind(), ErrorKind::Expired);
    }
}
