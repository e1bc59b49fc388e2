//! # Canonical Encoding
//!
//! Deterministic byte serialization of a record's immutable fields.
//!
//! ## Layout
//!
//! ```text
//! [tag_len: u32 BE][tag][version: u8]
//! repeated, in fixed order per record kind:
//!   [name_len: u32 BE][name][type: u8][value]
//! ```
//!
//! - strings: `u32 BE` length + UTF-8 bytes
//! - floats: IEEE-754 bit pattern, big endian; `-0.0` is written as `0.0`;
//!   NaN and infinities are rejected
//! - timestamps: microseconds since the UNIX epoch, `i64 BE`
//! - ids: 16 raw UUID bytes; optional ids carry a presence byte
//!
//! Field names are part of the encoding so two record kinds can never
//! produce the same bytes. Mutable fields (challan status) and the signature
//! itself are excluded.

use crate::domain::entities::{RecordKind, RecordRef};
use crate::domain::errors::SignatureError;
use shared_types::{Challan, EmissionReading, SignatureValue, Timestamp};

/// Bumped whenever the layout of any record changes.
pub const CANONICAL_VERSION: u8 = 1;

const TYPE_STR: u8 = 0x01;
const TYPE_F64: u8 = 0x02;
const TYPE_TIME: u8 = 0x03;
const TYPE_ID: u8 = 0x04;
const TYPE_OPT_ID: u8 = 0x05;

/// A record with a canonical, signable form.
pub trait Canonical {
    /// Domain-separation tag written first.
    const RECORD_TAG: &'static str;

    fn record_ref(&self) -> RecordRef;

    /// Write the immutable fields in their fixed order.
    fn write_canonical(&self, w: &mut CanonicalWriter) -> Result<(), SignatureError>;

    /// The signature stored alongside the record, if any.
    fn stored_signature(&self) -> Option<&SignatureValue>;
}

/// Encode a record to its canonical bytes.
pub fn canonical_bytes<R: Canonical + ?Sized>(record: &R) -> Result<Vec<u8>, SignatureError> {
    let mut writer = CanonicalWriter::new(R::RECORD_TAG);
    record.write_canonical(&mut writer)?;
    Ok(writer.finish())
}

/// Append-only writer producing the canonical layout.
#[derive(Debug)]
pub struct CanonicalWriter {
    buf: Vec<u8>,
}

impl CanonicalWriter {
    fn new(tag: &str) -> Self {
        let mut writer = Self {
            buf: Vec::with_capacity(256),
        };
        writer.put_bytes(tag.as_bytes());
        writer.buf.push(CANONICAL_VERSION);
        writer
    }

    fn put_bytes(&mut self, bytes: &[u8]) {
        // Field values are bounded by row sizes; u32 lengths never truncate in practice.
        self.buf
            .extend_from_slice(&(bytes.len() as u32).to_be_bytes());
        self.buf.extend_from_slice(bytes);
    }

    fn field(&mut self, name: &str, ty: u8) {
        self.put_bytes(name.as_bytes());
        self.buf.push(ty);
    }

    /// A required, non-empty string.
    pub fn text(&mut self, name: &'static str, value: &str) -> Result<(), SignatureError> {
        if value.is_empty() {
            return Err(SignatureError::EmptyField { field: name });
        }
        self.field(name, TYPE_STR);
        self.put_bytes(value.as_bytes());
        Ok(())
    }

    pub fn number(&mut self, name: &'static str, value: f64) -> Result<(), SignatureError> {
        if !value.is_finite() {
            return Err(SignatureError::NonFiniteValue { field: name });
        }
        // Collapse -0.0 onto 0.0 so equal readings encode equally.
        let normalized = if value == 0.0 { 0.0f64 } else { value };
        self.field(name, TYPE_F64);
        self.buf
            .extend_from_slice(&normalized.to_bits().to_be_bytes());
        Ok(())
    }

    pub fn timestamp(&mut self, name: &'static str, value: &Timestamp) {
        self.field(name, TYPE_TIME);
        self.buf
            .extend_from_slice(&value.timestamp_micros().to_be_bytes());
    }

    pub fn id(&mut self, name: &'static str, id: &[u8; 16]) {
        self.field(name, TYPE_ID);
        self.buf.extend_from_slice(id);
    }

    pub fn optional_id(&mut self, name: &'static str, id: Option<&[u8; 16]>) {
        self.field(name, TYPE_OPT_ID);
        match id {
            Some(bytes) => {
                self.buf.push(1);
                self.buf.extend_from_slice(bytes);
            }
            None => self.buf.push(0),
        }
    }

    fn finish(self) -> Vec<u8> {
        self.buf
    }
}

impl Canonical for EmissionReading {
    const RECORD_TAG: &'static str = "evidence-chain/emission-reading";

    fn record_ref(&self) -> RecordRef {
        RecordRef::new(RecordKind::EmissionReading, self.id.as_uuid())
    }

    fn write_canonical(&self, w: &mut CanonicalWriter) -> Result<(), SignatureError> {
        w.text("device_id", &self.device_id)?;
        w.number("co_ppm", self.gases.co_ppm)?;
        w.number("co2_percent", self.gases.co2_percent)?;
        w.number("hc_ppm", self.gases.hc_ppm)?;
        w.number("nox_ppm", self.gases.nox_ppm)?;
        w.number("sound_level_db", self.sound_level_db)?;
        w.timestamp("captured_at", &self.captured_at);
        Ok(())
    }

    fn stored_signature(&self) -> Option<&SignatureValue> {
        self.signature.as_ref()
    }
}

impl Canonical for Challan {
    const RECORD_TAG: &'static str = "evidence-chain/challan";

    fn record_ref(&self) -> RecordRef {
        RecordRef::new(RecordKind::Challan, self.id.as_uuid())
    }

    fn write_canonical(&self, w: &mut CanonicalWriter) -> Result<(), SignatureError> {
        w.id("officer_id", self.officer_id.as_bytes());
        w.id("accused_id", self.accused_id.as_bytes());
        w.id("vehicle_id", self.vehicle_id.as_bytes());
        w.id("violation_id", self.violation_id.as_bytes());
        w.optional_id(
            "emission_reading_id",
            self.emission_reading_id.as_ref().map(|id| id.as_bytes()),
        );
        w.timestamp("issued_at", &self.issued_at);
        w.timestamp("due_at", &self.due_at);
        Ok(())
    }

    fn stored_signature(&self) -> Option<&SignatureValue> {
        self.signature.as_ref()
    }
}
