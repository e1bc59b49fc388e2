//! # Shared Types Crate
//!
//! This crate contains the identifiers, evidentiary entities, and the
//! error taxonomy shared by every Evidence-Chain subsystem.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: All cross-subsystem types are defined here.
//! - **Relationships are looked up, not traversed**: entities carry foreign-key
//!   identifiers only. No entity holds a back-reference to its parent.
//! - **Typed outcomes**: every subsystem error classifies itself into one
//!   [`ErrorKind`] so callers never match on crate-specific variants.

pub mod entities;
pub mod errors;
pub mod ids;
pub mod time;

pub use entities::*;
pub use errors::*;
pub use ids::*;
pub use time::{ManualClock, SystemTimeSource, TimeSource, Timestamp};
