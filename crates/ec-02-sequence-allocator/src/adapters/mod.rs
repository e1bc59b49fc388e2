//! # Adapters

mod memory;

pub use memory::InMemoryCounterStore;
