//! Mailer for deployments without a mail relay.

use async_trait::async_trait;
use ec_04_otp_gateway::{DispatchError, Mailer, OtpCode};
use shared_types::Timestamp;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::info;

/// Logs each dispatch (recipient masked, code never logged) and counts it.
#[derive(Debug, Default)]
pub struct LoggingMailer {
    dispatched: AtomicU64,
}

impl LoggingMailer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn dispatched(&self) -> u64 {
        self.dispatched.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl Mailer for LoggingMailer {
    async fn send_otp(
        &self,
        email: &str,
        vehicle_no: &str,
        _code: &OtpCode,
        expires_at: Timestamp,
    ) -> Result<(), DispatchError> {
        self.dispatched.fetch_add(1, Ordering::Relaxed);
        info!(
            recipient = %mask_email(email),
            vehicle_no,
            expires_at = %expires_at,
            "OTP mail dispatched"
        );
        Ok(())
    }
}

/// `owner@example.com` becomes `o****@example.com`.
fn mask_email(email: &str) -> String {
    match email.split_once('@') {
        Some((local, domain)) => {
            let first = local.chars().next().unwrap_or('*');
            format!("{}****@{}", first, domain)
        }
        None => "****".to_string(),
    }
}
