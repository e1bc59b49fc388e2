//! # Identifier Formatting
//!
//! `FIR-{stationCode}-{year}-{seq:04}` and `CASE-{courtCode}-{year}-{seq:04}`.
//! Sequences beyond the padding width simply widen (`FIR-S1-2025-10000`).

use crate::domain::errors::IdentifierError;
use crate::domain::scope::{ScopeKind, SequenceNumber};
use serde::{Deserialize, Serialize};

/// Prefixes and zero-padding of rendered identifiers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IdentifierFormat {
    pub fir_prefix: String,
    pub case_prefix: String,
    /// Minimum digits of the sequence part.
    pub width: usize,
}

impl Default for IdentifierFormat {
    fn default() -> Self {
        Self {
            fir_prefix: "FIR".to_string(),
            case_prefix: "CASE".to_string(),
            width: 4,
        }
    }
}

impl IdentifierFormat {
    pub fn prefix(&self, kind: ScopeKind) -> &str {
        match kind {
            ScopeKind::Fir => &self.fir_prefix,
            ScopeKind::Case => &self.case_prefix,
        }
    }

    /// Render an identifier.
    pub fn render(
        &self,
        kind: ScopeKind,
        org_code: &str,
        year: i32,
        sequence: SequenceNumber,
    ) -> Result<String, IdentifierError> {
        validate_org_code(org_code)?;
        if !(0..=9999).contains(&year) {
            return Err(IdentifierError::InvalidYear(year));
        }
        Ok(format!(
            "{}-{}-{:04}-{:0width$}",
            self.prefix(kind),
            org_code,
            year,
            sequence.value(),
            width = self.width
        ))
    }

    /// Split a rendered identifier back into its parts.
    pub fn parse(&self, raw: &str) -> Result<IssuedIdentifier, IdentifierError> {
        let unparseable = || IdentifierError::Unparseable(raw.to_string());

        let parts: Vec<&str> = raw.split('-').collect();
        let [prefix, org_code, year, seq] = parts.as_slice() else {
            return Err(unparseable());
        };

        let kind = if *prefix == self.fir_prefix {
            ScopeKind::Fir
        } else if *prefix == self.case_prefix {
            ScopeKind::Case
        } else {
            return Err(unparseable());
        };

        validate_org_code(org_code).map_err(|_| unparseable())?;
        if year.len() != 4 || !year.bytes().all(|b| b.is_ascii_digit()) {
            return Err(unparseable());
        }
        if seq.len() < self.width || !seq.bytes().all(|b| b.is_ascii_digit()) {
            return Err(unparseable());
        }
        let year: i32 = year.parse().map_err(|_| unparseable())?;
        let sequence = seq
            .parse::<u32>()
            .ok()
            .and_then(SequenceNumber::new)
            .ok_or_else(unparseable)?;

        Ok(IssuedIdentifier {
            kind,
            org_code: org_code.to_string(),
            year,
            sequence,
        })
    }
}

/// A parsed identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedIdentifier {
    pub kind: ScopeKind,
    pub org_code: String,
    pub year: i32,
    pub sequence: SequenceNumber,
}

/// Hyphens would make parsing ambiguous, so codes are alphanumeric only.
fn validate_org_code(code: &str) -> Result<(), IdentifierError> {
    if code.is_empty() || !code.bytes().all(|b| b.is_ascii_alphanumeric()) {
        return Err(IdentifierError::InvalidOrgCode(code.to_string()));
    }
    Ok(())
}
