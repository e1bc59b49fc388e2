//! # Domain Layer
//!
//! Pure signing logic. No I/O.

pub mod canonical;
pub mod entities;
pub mod errors;
pub mod signer;
