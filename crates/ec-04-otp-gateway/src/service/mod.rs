//! # OTP Gateway Service
//!
//! Implements [`OtpGatewayApi`]. Verification runs as a compare-and-swap
//! loop over the current record, so two concurrent submissions of the same
//! correct code cannot both obtain a token.


use crate::domain::config::OtpConfig;
use crate::domain::errors::OtpError;
use crate::domain::identity::{normalize_email, OwnerKey};
use crate::domain::otp::{fingerprint, AccessGrant, OtpCode, OtpState, PublicStatusOtp};
use crate::domain::projection::CaseStatusProjection;
use crate::ports::inbound::{OtpConfirmation, OtpGatewayApi};
use crate::ports::outbound::{CaseStatusReader, Mailer, OtpStore, OwnerDirectory};
use async_trait::async_trait;
use shared_types::TimeSource;
use tracing::{debug, info, warn};

/// The OTP Gateway service.
pub struct OtpGateway<D, S, M, R, T>
where
    D: OwnerDirectory,
    S: OtpStore,
    M: Mailer,
    R: CaseStatusReader,
    T: TimeSource,
{
    owners: D,
    store: S,
    mailer: M,
    cases: R,
    time_source: T,
    config: OtpConfig,
}

/// Dependencies for OtpGateway
pub struct OtpGatewayDependencies<D, S, M, R, T> {
    pub owners: D,
    pub store: S,
    pub mailer: M,
    pub cases: R,
    pub time_source: T,
}

impl<D, S, M, R, T> OtpGateway<D, S, M, R, T>
where
    D: OwnerDirectory,
    S: OtpStore,
    M: Mailer,
    R: CaseStatusReader,
    T: TimeSource,
{
    pub fn new(deps: OtpGatewayDependencies<D, S, M, R, T>, config: OtpConfig) -> Self {
        Self {
            owners: deps.owners,
            store: deps.store,
            mailer: deps.mailer,
            cases: deps.cases,
            time_source: deps.time_source,
            config,
        }
    }

    pub fn config(&self) -> &OtpConfig {
        &self.config
    }

    async fn request(
        &self,
        vehicle_no: &str,
        cnic: &str,
        email: &str,
    ) -> Result<OtpConfirmation, OtpError> {
        let key = OwnerKey::parse(vehicle_no, cnic)?;
        let email = normalize_email(email)?;

        let owner_matches = self
            .owners
            .registered_owner(&key.vehicle_no)?
            .is_some_and(|owner| owner.matches(&key.cnic, &email));
        if !owner_matches {
            info!(vehicle_no = %key, "Status OTP refused: owner details do not match");
            return Err(OtpError::OwnerMismatch);
        }

        let record = PublicStatusOtp::new(
            key,
            email,
            OtpCode::generate(self.config.effective_code_length()),
            self.time_source.now(),
            self.config.code_ttl(),
        );

        if let Some(previous) = self.store.replace_live(record.clone())? {
            debug!(vehicle_no = %record.key, superseded = %previous, "Previous OTP superseded");
        }

        // Dispatch failure leaves the record in place; the citizen can re-request.
        if let Err(e) = self
            .mailer
            .send_otp(&record.email, &record.key.vehicle_no, &record.code, record.expires_at)
            .await
        {
            warn!(vehicle_no = %record.key, otp = %record.id, error = %e, "OTP dispatch failed");
        }

        info!(vehicle_no = %record.key, otp = %record.id, "Status OTP issued");
        Ok(OtpConfirmation {
            request_id: record.id,
            expires_at: record.expires_at,
        })
    }

    fn verify(&self, vehicle_no: &str, cnic: &str, code: &str) -> Result<AccessGrant, OtpError> {
        let key = OwnerKey::parse(vehicle_no, cnic)?;
        let max_failed = self.config.effective_max_failed_attempts();

        // Every lost swap means the record moved one step closer to a terminal state.
        for _ in 0..max_failed.saturating_add(2) {
            let current = self.store.current(&key)?.ok_or(OtpError::NoPendingOtp)?;
            let now = self.time_source.now();
            let step = current.verify(code, now, max_failed, self.config.token_ttl());

            if let Some(next) = step.next {
                if !self.store.compare_and_swap(&current, next)? {
                    debug!(vehicle_no = %key, otp = %current.id, "OTP changed during verification, re-reading");
                    continue;
                }
            }

            match &step.outcome {
                Ok(grant) => info!(
                    vehicle_no = %key,
                    otp = %current.id,
                    token_expires_at = %grant.expires_at,
                    "Status OTP verified"
                ),
                Err(e) => info!(vehicle_no = %key, otp = %current.id, error = %e, "Status OTP rejected"),
            }
            return step.outcome;
        }

        warn!(vehicle_no = %key, "OTP verification kept losing to concurrent writers");
        Err(OtpError::ConcurrentVerification)
    }

    fn case_status(&self, token: &str) -> Result<CaseStatusProjection, OtpError> {
        let token = token.trim();
        if token.is_empty() {
            return Err(OtpError::TokenUnknown);
        }

        let record = self
            .store
            .find_by_token(&fingerprint(token))?
            .ok_or(OtpError::TokenUnknown)?;

        let now = self.time_source.now();
        match &record.state {
            OtpState::TokenIssued {
                token_expires_at, ..
            } if now < *token_expires_at => {}
            OtpState::TokenIssued { .. } => {
                debug!(vehicle_no = %record.key, "Expired access token presented");
                return Err(OtpError::TokenExpired);
            }
            _ => return Err(OtpError::TokenUnknown),
        }

        Ok(self.cases.case_status(&record.key)?)
    }
}

#[async_trait]
impl<D, S, M, R, T> OtpGatewayApi for OtpGateway<D, S, M, R, T>
where
    D: OwnerDirectory,
    S: OtpStore,
    M: Mailer,
    R: CaseStatusReader,
    T: TimeSource,
{
    async fn request_status_otp(
        &self,
        vehicle_no: &str,
        cnic: &str,
        email: &str,
    ) -> Result<OtpConfirmation, OtpError> {
        self.request(vehicle_no, cnic, email).await
    }

    async fn verify_status_otp(
        &self,
        vehicle_no: &str,
        cnic: &str,
        code: &str,
    ) -> Result<AccessGrant, OtpError> {
        self.verify(vehicle_no, cnic, code)
    }

    async fn get_case_status(&self, token: &str) -> Result<CaseStatusProjection, OtpError> {
        self.case_status(token)
    }
}
