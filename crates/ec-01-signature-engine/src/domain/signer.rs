//! # HMAC-SHA256 Signatures
//!
//! Signature values are rendered as `hmac-sha256:<key_id>:<hex tag>` so a
//! stored record names the key it was signed under.

use crate::domain::entities::SigningKey;
use crate::domain::errors::SignatureError;
use hmac::{Hmac, Mac};
use sha2::Sha256;
use shared_types::SignatureValue;

type HmacSha256 = Hmac<Sha256>;

/// Scheme prefix of every signature value.
pub const SCHEME: &str = "hmac-sha256";

/// Tag length in bytes.
pub const TAG_LEN: usize = 32;

/// A signature value split into its parts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedSignature {
    pub key_id: String,
    pub tag: Vec<u8>,
}

/// Compute the HMAC tag of `message` under `key`.
pub fn compute_tag(key: &SigningKey, message: &[u8]) -> Result<[u8; TAG_LEN], SignatureError> {
    let mut mac = HmacSha256::new_from_slice(key.secret())
        .map_err(|_| SignatureError::InvalidKey("secret rejected by HMAC"))?;
    mac.update(message);
    Ok(mac.finalize().into_bytes().into())
}

/// Constant-time check of `tag` against `message` under `key`.
pub fn verify_tag(key: &SigningKey, message: &[u8], tag: &[u8]) -> bool {
    let mut mac = match HmacSha256::new_from_slice(key.secret()) {
        Ok(m) => m,
        Err(_) => return false,
    };
    mac.update(message);
    mac.verify_slice(tag).is_ok()
}

/// Render a signature value.
pub fn encode(key_id: &str, tag: &[u8; TAG_LEN]) -> SignatureValue {
    SignatureValue::new(format!("{}:{}:{}", SCHEME, key_id, hex::encode(tag)))
}

/// Split a stored signature value into key id and raw tag.
pub fn parse(value: &SignatureValue) -> Result<ParsedSignature, SignatureError> {
    let mut parts = value.as_str().splitn(3, ':');
    let scheme = parts.next().unwrap_or_default();
    let key_id = parts.next().unwrap_or_default();
    let tag_hex = parts.next().unwrap_or_default();

    if scheme != SCHEME {
        return Err(SignatureError::MalformedSignature("unknown scheme"));
    }
    if key_id.is_empty() {
        return Err(SignatureError::MalformedSignature("missing key id"));
    }
    let tag = hex::decode(tag_hex)
        .map_err(|_| SignatureError::MalformedSignature("tag is not hex"))?;
    if tag.len() != TAG_LEN {
        return Err(SignatureError::MalformedSignature("tag has wrong length"));
    }

    Ok(ParsedSignature {
        key_id: key_id.to_string(),
        tag,
    })
}
