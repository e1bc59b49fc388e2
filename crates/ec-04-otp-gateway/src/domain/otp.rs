//! # Public Status OTP
//!
//! The record and its state machine. Every rule about single use, expiry
//! and attempt counting lives here as pure functions of `(record, now)`.

use crate::domain::errors::OtpError;
use crate::domain::identity::OwnerKey;
use rand::rngs::OsRng;
use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use shared_types::{OtpId, Timestamp};
use std::fmt;
use subtle::ConstantTimeEq;

/// Numeric one-time code.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OtpCode(String);

impl OtpCode {
    /// Uniform decimal digits from the OS RNG.
    pub fn generate(length: usize) -> Self {
        let mut rng = OsRng;
        let code = (0..length)
            .map(|_| char::from(b'0' + rng.gen_range(0..10u8)))
            .collect();
        Self(code)
    }

    /// For codes received out of band or in tests.
    pub fn from_digits(digits: impl Into<String>) -> Self {
        Self(digits.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }

    /// Constant-time comparison with a submitted code.
    pub fn matches(&self, candidate: &str) -> bool {
        self.0.as_bytes().ct_eq(candidate.trim().as_bytes()).into()
    }
}

impl fmt::Debug for OtpCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("OtpCode(<redacted>)")
    }
}

/// Opaque bearer token for the case-status read path.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(String);

impl AccessToken {
    /// 32 random bytes, hex-encoded.
    pub fn generate() -> Self {
        let mut bytes = [0u8; 32];
        OsRng.fill_bytes(&mut bytes);
        Self(hex::encode(bytes))
    }

    pub fn from_string(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }

    /// SHA-256 of the token. Stores index tokens by fingerprint only.
    pub fn fingerprint(&self) -> String {
        fingerprint(&self.0)
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken(<redacted>)")
    }
}

pub(crate) fn fingerprint(token: &str) -> String {
    hex::encode(Sha256::digest(token.as_bytes()))
}

/// Returned to the citizen after a successful verification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessGrant {
    pub token: AccessToken,
    pub expires_at: Timestamp,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExpiryCause {
    CodeElapsed,
    AttemptsExhausted,
    TokenElapsed,
    /// A newer request for the same pair replaced this one.
    Superseded,
}

/// Stored state of an OTP record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum OtpState {
    Requested {
        failed_attempts: u32,
    },
    Verified {
        verified_at: Timestamp,
    },
    TokenIssued {
        verified_at: Timestamp,
        token_fingerprint: String,
        token_expires_at: Timestamp,
    },
    Expired {
        cause: ExpiryCause,
    },
}

/// Inputs to the state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OtpEvent {
    CodeAccepted {
        at: Timestamp,
    },
    CodeRejected {
        max_failed_attempts: u32,
    },
    TokenMinted {
        token_fingerprint: String,
        expires_at: Timestamp,
    },
    Elapsed(ExpiryCause),
}

impl OtpEvent {
    fn name(&self) -> &'static str {
        match self {
            OtpEvent::CodeAccepted { .. } => "code accepted",
            OtpEvent::CodeRejected { .. } => "code rejected",
            OtpEvent::TokenMinted { .. } => "token minted",
            OtpEvent::Elapsed(_) => "elapsed",
        }
    }
}

impl OtpState {
    fn name(&self) -> &'static str {
        match self {
            OtpState::Requested { .. } => "requested",
            OtpState::Verified { .. } => "verified",
            OtpState::TokenIssued { .. } => "token issued",
            OtpState::Expired { .. } => "expired",
        }
    }

    /// The transition table. Events a state does not accept are errors.
    pub fn apply(&self, event: OtpEvent) -> Result<OtpState, OtpError> {
        match (self, event) {
            (OtpState::Requested { .. }, OtpEvent::CodeAccepted { at }) => {
                Ok(OtpState::Verified { verified_at: at })
            }
            (
                OtpState::Requested { failed_attempts },
                OtpEvent::CodeRejected {
                    max_failed_attempts,
                },
            ) => {
                let failed = failed_attempts.saturating_add(1);
                if failed >= max_failed_attempts {
                    Ok(OtpState::Expired {
                        cause: ExpiryCause::AttemptsExhausted,
                    })
                } else {
                    Ok(OtpState::Requested {
                        failed_attempts: failed,
                    })
                }
            }
            (
                OtpState::Verified { verified_at },
                OtpEvent::TokenMinted {
                    token_fingerprint,
                    expires_at,
                },
            ) => Ok(OtpState::TokenIssued {
                verified_at: *verified_at,
                token_fingerprint,
                token_expires_at: expires_at,
            }),
            (
                OtpState::Requested { .. } | OtpState::Verified { .. } | OtpState::TokenIssued { .. },
                OtpEvent::Elapsed(cause),
            ) => Ok(OtpState::Expired { cause }),

            (OtpState::Verified { .. } | OtpState::TokenIssued { .. }, _) => {
                Err(OtpError::AlreadyVerified)
            }
            (OtpState::Expired { .. }, _) => Err(OtpError::CodeExpired),
            (state, event) => Err(OtpError::InvalidTransition {
                state: state.name(),
                event: event.name(),
            }),
        }
    }
}

/// Logical phase at a given instant, with passive expiry applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OtpPhase {
    Requested,
    Verified,
    TokenIssued,
    Expired(ExpiryCause),
}

/// One OTP request for a `(vehicle, CNIC)` pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicStatusOtp {
    pub id: OtpId,
    pub key: OwnerKey,
    pub email: String,
    pub code: OtpCode,
    pub created_at: Timestamp,
    pub expires_at: Timestamp,
    pub state: OtpState,
}

/// What a verification attempt decided.
#[derive(Debug)]
pub struct VerifyStep {
    /// Record to persist, if the attempt changed it.
    pub next: Option<PublicStatusOtp>,
    pub outcome: Result<AccessGrant, OtpError>,
}

impl PublicStatusOtp {
    pub fn new(
        key: OwnerKey,
        email: String,
        code: OtpCode,
        created_at: Timestamp,
        ttl: chrono::Duration,
    ) -> Self {
        Self {
            id: OtpId::new(),
            key,
            email,
            code,
            created_at,
            expires_at: created_at + ttl,
            state: OtpState::Requested { failed_attempts: 0 },
        }
    }

    pub fn is_verified(&self) -> bool {
        matches!(
            self.state,
            OtpState::Verified { .. } | OtpState::TokenIssued { .. }
        )
    }

    pub fn token_expires_at(&self) -> Option<Timestamp> {
        match &self.state {
            OtpState::TokenIssued {
                token_expires_at, ..
            } => Some(*token_expires_at),
            _ => None,
        }
    }

    /// The phase at `now`. Expiry is inclusive: at `expires_at` the code is dead.
    pub fn phase_at(&self, now: Timestamp) -> OtpPhase {
        match &self.state {
            OtpState::Requested { .. } if now >= self.expires_at => {
                OtpPhase::Expired(ExpiryCause::CodeElapsed)
            }
            OtpState::Requested { .. } => OtpPhase::Requested,
            OtpState::Verified { .. } => OtpPhase::Verified,
            OtpState::TokenIssued {
                token_expires_at, ..
            } if now >= *token_expires_at => OtpPhase::Expired(ExpiryCause::TokenElapsed),
            OtpState::TokenIssued { .. } => OtpPhase::TokenIssued,
            OtpState::Expired { cause } => OtpPhase::Expired(*cause),
        }
    }

    /// Live means a code could still be verified.
    pub fn is_live(&self, now: Timestamp) -> bool {
        self.phase_at(now) == OtpPhase::Requested
    }

    /// Decide a verification attempt with `code` at `now`.
    pub fn verify(
        &self,
        code: &str,
        now: Timestamp,
        max_failed_attempts: u32,
        token_ttl: chrono::Duration,
    ) -> VerifyStep {
        match self.phase_at(now) {
            OtpPhase::Verified | OtpPhase::TokenIssued => return refuse(OtpError::AlreadyVerified),
            OtpPhase::Expired(ExpiryCause::TokenElapsed) => {
                return refuse(OtpError::AlreadyVerified)
            }
            OtpPhase::Expired(ExpiryCause::AttemptsExhausted) => {
                return refuse(OtpError::AttemptsExhausted)
            }
            OtpPhase::Expired(ExpiryCause::CodeElapsed) if !self.is_stored_expired() => {
                return self.step(
                    OtpEvent::Elapsed(ExpiryCause::CodeElapsed),
                    Err(OtpError::CodeExpired),
                );
            }
            OtpPhase::Expired(_) => return refuse(OtpError::CodeExpired),
            OtpPhase::Requested => {}
        }

        if !self.code.matches(code) {
            let rejected = OtpEvent::CodeRejected {
                max_failed_attempts,
            };
            let next_state = match self.state.apply(rejected) {
                Ok(state) => state,
                Err(e) => return refuse(e),
            };
            let outcome = match &next_state {
                OtpState::Requested { failed_attempts } => Err(OtpError::CodeMismatch {
                    remaining_attempts: max_failed_attempts.saturating_sub(*failed_attempts),
                }),
                _ => Err(OtpError::AttemptsExhausted),
            };
            return VerifyStep {
                next: Some(self.with_state(next_state)),
                outcome,
            };
        }

        let token = AccessToken::generate();
        let expires_at = now + token_ttl;
        let issued = self
            .state
            .apply(OtpEvent::CodeAccepted { at: now })
            .and_then(|verified| {
                verified.apply(OtpEvent::TokenMinted {
                    token_fingerprint: token.fingerprint(),
                    expires_at,
                })
            });

        match issued {
            Ok(state) => VerifyStep {
                next: Some(self.with_state(state)),
                outcome: Ok(AccessGrant { token, expires_at }),
            },
            Err(e) => refuse(e),
        }
    }

    fn is_stored_expired(&self) -> bool {
        matches!(self.state, OtpState::Expired { .. })
    }

    fn step(&self, event: OtpEvent, outcome: Result<AccessGrant, OtpError>) -> VerifyStep {
        match self.state.apply(event) {
            Ok(state) => VerifyStep {
                next: Some(self.with_state(state)),
                outcome,
            },
            Err(e) => refuse(e),
        }
    }

    fn with_state(&self, state: OtpState) -> Self {
        Self {
            state,
            ..self.clone()
        }
    }
}

fn refuse(error: OtpError) -> VerifyStep {
    VerifyStep {
        next: None,
        outcome: Err(error),
    }
}
