use crate::domain::otp::OtpCode;
use crate::ports::outbound::{DispatchError, Mailer};
use async_trait::async_trait;
use parking_lot::Mutex;
use shared_types::Timestamp;
use tracing::debug;

/// A dispatched OTP mail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentMail {
    pub email: String,
    pub vehicle_no: String,
    pub code: OtpCode,
    pub expires_at: Timestamp,
}

/// Mailer that records instead of sending. Can be told to fail.
#[derive(Debug, Default)]
pub struct RecordingMailer {
    sent: Mutex<Vec<SentMail>>,
    fail: bool,
}

impl RecordingMailer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every send returns an error (nothing is recorded).
    pub fn failing() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    pub fn sent(&self) -> Vec<SentMail> {
        self.sent.lock().clone()
    }

    /// Code from the most recent mail to `email`.
    pub fn last_code_for(&self, email: &str) -> Option<OtpCode> {
        self.sent
            .lock()
            .iter()
            .rev()
            .find(|m| m.email == email)
            .map(|m| m.code.clone())
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send_otp(
        &self,
        email: &str,
        vehicle_no: &str,
        code: &OtpCode,
        expires_at: Timestamp,
    ) -> Result<(), DispatchError> {
        if self.fail {
            return Err(DispatchError("smtp relay unreachable".into()));
        }
        debug!(vehicle_no, "OTP mail recorded");
        self.sent.lock().push(SentMail {
            email: email.to_string(),
            vehicle_no: vehicle_no.to_string(),
            code: code.clone(),
            expires_at,
        });
        Ok(())
    }
}
