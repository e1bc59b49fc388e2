//! # Adapters

mod memory;

pub use memory::{InMemoryChainStore, InMemoryChainTransaction};
