//! # Adapters

mod mailer;
mod memory;

pub use mailer::{RecordingMailer, SentMail};
pub use memory::InMemoryOtpStore;
