//! # Owner Identity
//!
//! Input normalization for the `(vehicle, CNIC, email)` triple.

use crate::domain::errors::OtpError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The `(vehicle, CNIC)` pair an OTP is keyed by, normalized.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OwnerKey {
    pub vehicle_no: String,
    pub cnic: String,
}

impl OwnerKey {
    pub fn parse(vehicle_no: &str, cnic: &str) -> Result<Self, OtpError> {
        Ok(Self {
            vehicle_no: normalize_vehicle_no(vehicle_no)?,
            cnic: normalize_cnic(cnic)?,
        })
    }
}

impl fmt::Display for OwnerKey {
    /// Vehicle number only; the CNIC is not logged.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.vehicle_no)
    }
}

/// Owner details on file for a vehicle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisteredOwner {
    pub cnic: String,
    pub email: String,
}

impl RegisteredOwner {
    /// Both fields must match. Stored values are normalized leniently.
    pub fn matches(&self, cnic: &str, email: &str) -> bool {
        let cnic_ok = normalize_cnic(&self.cnic).is_ok_and(|c| c == cnic);
        let email_ok = self.email.trim().eq_ignore_ascii_case(email);
        cnic_ok && email_ok
    }
}

/// Uppercase, trimmed; letters, digits and hyphens only.
pub fn normalize_vehicle_no(raw: &str) -> Result<String, OtpError> {
    let value = raw.trim().to_ascii_uppercase();
    let valid = !value.is_empty()
        && value.len() <= 16
        && value.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'-');
    if valid {
        Ok(value)
    } else {
        Err(OtpError::InvalidVehicleNo)
    }
}

/// `#####-#######-#`; thirteen bare digits are accepted and dashed.
pub fn normalize_cnic(raw: &str) -> Result<String, OtpError> {
    let value = raw.trim();
    let bytes = value.as_bytes();

    if bytes.len() == 13 && bytes.iter().all(u8::is_ascii_digit) {
        return Ok(format!("{}-{}-{}", &value[..5], &value[5..12], &value[12..]));
    }

    let dashed = bytes.len() == 15
        && bytes.iter().enumerate().all(|(i, b)| match i {
            5 | 13 => *b == b'-',
            _ => b.is_ascii_digit(),
        });
    if dashed {
        Ok(value.to_string())
    } else {
        Err(OtpError::InvalidCnic)
    }
}

/// Lowercased, trimmed, with a plausible `local@domain.tld` shape.
pub fn normalize_email(raw: &str) -> Result<String, OtpError> {
    let value = raw.trim().to_ascii_lowercase();
    let valid = match value.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && !value.contains(char::is_whitespace)
        }
        None => false,
    };
    if valid {
        Ok(value)
    } else {
        Err(OtpError::InvalidEmail)
    }
}
