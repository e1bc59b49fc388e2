//! # OTP Gateway (EC-04)
//!
//! Lets an unauthenticated citizen prove ownership of a vehicle/CNIC pair by
//! email OTP and read the case status behind it with a time-boxed token.
//!
//! ## State Machine
//!
//! ```text
//! Requested --(correct code, not expired)--> Verified --(issue token)--> TokenIssued --(token expiry)--> Expired
//! Requested --(expired or exhausted attempts)--> Expired
//! ```
//!
//! ## Domain Invariants
//!
//! | ID | Invariant | Enforcement |
//! |----|-----------|-------------|
//! | 1 | One live OTP per (vehicle, CNIC) | `OtpStore::replace_live` supersedes the previous record |
//! | 2 | Single use | Verification is a compare-and-swap on the record state |
//! | 3 | Expiry is inclusive of `expires_at` | `now >= expires_at` is expired |
//! | 4 | No field disclosure | Every owner mismatch returns the same error |
//! | 5 | Read path is read-only | `get_case_status` never writes the OTP record |

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

pub use adapters::{InMemoryOtpStore, RecordingMailer, SentMail};
pub use domain::config::OtpConfig;
pub use domain::errors::OtpError;
pub use domain::identity::{normalize_email, OwnerKey, RegisteredOwner};
pub use domain::otp::{
    AccessGrant, AccessToken, ExpiryCause, OtpCode, OtpEvent, OtpPhase, OtpState,
    PublicStatusOtp,
};
pub use domain::projection::{
    CaseStatusProjection, CaseStatusView, ChallanStatusView, FirStatusView,
};
pub use ports::inbound::{OtpConfirmation, OtpGatewayApi};
pub use ports::outbound::{CaseStatusReader, DispatchError, Mailer, OtpStore, OwnerDirectory};
pub use service::{OtpGateway, OtpGatewayDependencies};
