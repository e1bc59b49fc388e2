//! # Domain Layer

pub mod config;
pub mod errors;
pub mod lifecycle;
pub mod requests;
