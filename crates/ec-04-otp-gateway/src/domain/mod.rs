//! # Domain Layer

pub mod config;
pub mod errors;
pub mod identity;
pub mod otp;
pub mod projection;
