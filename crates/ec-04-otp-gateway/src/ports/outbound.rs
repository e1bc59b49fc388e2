//! # Outbound Ports (Driven Ports / SPI)

use crate::domain::identity::{OwnerKey, RegisteredOwner};
use crate::domain::otp::{OtpCode, PublicStatusOtp};
use crate::domain::projection::CaseStatusProjection;
use async_trait::async_trait;
use shared_types::{OtpId, StoreError, Timestamp};
use std::sync::Arc;
use thiserror::Error;

/// Vehicle registry lookup. Feeds the owner match check.
pub trait OwnerDirectory: Send + Sync {
    /// Owner on file for a normalized vehicle number.
    fn registered_owner(&self, vehicle_no: &str) -> Result<Option<RegisteredOwner>, StoreError>;
}

/// Persistence for OTP records.
pub trait OtpStore: Send + Sync {
    /// Store `record` as the current OTP for its key, atomically moving any
    /// previous still-`Requested` record to `Expired(Superseded)`.
    ///
    /// Returns the id of the superseded record, if any.
    fn replace_live(&self, record: PublicStatusOtp) -> Result<Option<OtpId>, StoreError>;

    /// The most recent record for `key`.
    fn current(&self, key: &OwnerKey) -> Result<Option<PublicStatusOtp>, StoreError>;

    /// Replace `current` with `next` only if the stored record still equals
    /// `current`. `Ok(false)` means another writer got there first.
    fn compare_and_swap(
        &self,
        current: &PublicStatusOtp,
        next: PublicStatusOtp,
    ) -> Result<bool, StoreError>;

    /// The record holding a token with this SHA-256 fingerprint.
    fn find_by_token(&self, fingerprint: &str) -> Result<Option<PublicStatusOtp>, StoreError>;
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Mail dispatch failed: {0}")]
pub struct DispatchError(pub String);

/// Out-of-band code delivery. Fire-and-forget from the gateway's view.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send_otp(
        &self,
        email: &str,
        vehicle_no: &str,
        code: &OtpCode,
        expires_at: Timestamp,
    ) -> Result<(), DispatchError>;
}

/// Read side of the evidence chain.
pub trait CaseStatusReader: Send + Sync {
    fn case_status(&self, key: &OwnerKey) -> Result<CaseStatusProjection, StoreError>;
}

impl<T: OwnerDirectory + ?Sized> OwnerDirectory for Arc<T> {
    fn registered_owner(&self, vehicle_no: &str) -> Result<Option<RegisteredOwner>, StoreError> {
        (**self).registered_owner(vehicle_no)
    }
}

impl<T: OtpStore + ?Sized> OtpStore for Arc<T> {
    fn replace_live(&self, record: PublicStatusOtp) -> Result<Option<OtpId>, StoreError> {
        (**self).replace_live(record)
    }

    fn current(&self, key: &OwnerKey) -> Result<Option<PublicStatusOtp>, StoreError> {
        (**self).current(key)
    }

    fn compare_and_swap(
        &self,
        current: &PublicStatusOtp,
        next: PublicStatusOtp,
    ) -> Result<bool, StoreError> {
        (**self).compare_and_swap(current, next)
    }

    fn find_by_token(&self, fingerprint: &str) -> Result<Option<PublicStatusOtp>, StoreError> {
        (**self).find_by_token(fingerprint)
    }
}

#[async_trait]
impl<T: Mailer + ?Sized> Mailer for Arc<T> {
    async fn send_otp(
        &self,
        email: &str,
        vehicle_no: &str,
        code: &OtpCode,
        expires_at: Timestamp,
    ) -> Result<(), DispatchError> {
        (**self).send_otp(email, vehicle_no, code, expires_at).await
    }
}

impl<T: CaseStatusReader + ?Sized> CaseStatusReader for Arc<T> {
    fn case_status(&self, key: &OwnerKey) -> Result<CaseStatusProjection, StoreError> {
        (**self).case_status(key)
    }
}
