//! # Sequence Scopes
//!
//! A scope is the `(kind, organization, year)` tuple within which a number
//! must be unique. Year rollover opens a new scope; nothing carries over.

use serde::{Deserialize, Serialize};
use shared_types::{CourtId, StationId};
use std::fmt;
use uuid::Uuid;

/// The entity kind a number is issued for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ScopeKind {
    /// FIR numbers, scoped by police station.
    Fir,
    /// Case numbers, scoped by court.
    Case,
}

impl fmt::Display for ScopeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScopeKind::Fir => f.write_str("fir"),
            ScopeKind::Case => f.write_str("case"),
        }
    }
}

/// `(kind, owning organization, year)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SequenceScope {
    pub kind: ScopeKind,
    pub scope_id: Uuid,
    pub year: i32,
}

impl SequenceScope {
    pub fn new(kind: ScopeKind, scope_id: Uuid, year: i32) -> Self {
        Self {
            kind,
            scope_id,
            year,
        }
    }

    pub fn fir(station: StationId, year: i32) -> Self {
        Self::new(ScopeKind::Fir, station.as_uuid(), year)
    }

    pub fn case(court: CourtId, year: i32) -> Self {
        Self::new(ScopeKind::Case, court.as_uuid(), year)
    }
}

impl fmt::Display for SequenceScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.kind, self.scope_id, self.year)
    }
}

/// A number issued within a scope. Starts at 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SequenceNumber(u32);

impl SequenceNumber {
    /// First number of every fresh scope.
    pub const FIRST: SequenceNumber = SequenceNumber(1);

    /// Wrap a raw value. Zero is not a valid sequence number.
    pub fn new(value: u32) -> Option<Self> {
        (value > 0).then_some(Self(value))
    }

    pub const fn value(&self) -> u32 {
        self.0
    }

    /// The successor, or `None` when the scope's number space is exhausted.
    pub fn checked_next(&self) -> Option<Self> {
        self.0.checked_add(1).map(Self)
    }
}

impl fmt::Display for SequenceNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
