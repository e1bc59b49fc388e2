//! # Domain Layer
//!
//! Scopes, identifier formatting, and the retry policy.

pub mod config;
pub mod errors;
pub mod identifier;
pub mod scope;
