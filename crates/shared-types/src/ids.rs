//! # Identifiers
//!
//! Strongly typed row identifiers. Each wraps a v4 UUID so that a
//! `ChallanId` can never be passed where a `FirId` is expected.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Generate a fresh random identifier.
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            /// Wrap an existing UUID.
            pub const fn from_uuid(id: Uuid) -> Self {
                Self(id)
            }

            /// The underlying UUID.
            pub const fn as_uuid(&self) -> Uuid {
                self.0
            }

            /// Raw bytes, used by canonical encodings.
            pub fn as_bytes(&self) -> &[u8; 16] {
                self.0.as_bytes()
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<Uuid> for $name {
            fn from(id: Uuid) -> Self {
                Self(id)
            }
        }
    };
}

define_id!(
    /// Emission reading row.
    ReadingId
);
define_id!(
    /// Challan (violation citation) row.
    ChallanId
);
define_id!(
    /// First Information Report row.
    FirId
);
define_id!(
    /// Judicial case row.
    CaseId
);
define_id!(
    /// Police station (FIR numbering scope).
    StationId
);
define_id!(
    /// Court (Case numbering scope).
    CourtId
);
define_id!(JudgeId);
define_id!(OfficerId);
define_id!(
    /// Accused person; also the registered owner of a vehicle.
    AccusedId
);
define_id!(VehicleId);
define_id!(ViolationId);
define_id!(
    /// Public status OTP record.
    OtpId
);
