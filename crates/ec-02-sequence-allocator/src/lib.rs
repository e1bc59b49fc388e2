//! # Sequence Allocator (EC-02)
//!
//! Issues the numbers behind FIR and Case identifiers.
//!
//! ## Domain Invariants
//!
//! | ID | Invariant | Description |
//! |----|-----------|-------------|
//! | 1 | Uniqueness | Two callers never receive the same number within one scope |
//! | 2 | Monotonicity | Numbers strictly increase within a scope (gaps tolerated) |
//! | 3 | Fresh scopes | The first number of a new (kind, org, year) scope is 1 |
//! | 4 | Bounded contention | Retries stop after `max_attempts`; exhaustion is a distinct conflict |
//!
//! ## Two allocation paths
//!
//! - [`SequenceAllocator::allocate_with`]: optimistic insert-detect-retry. The
//!   caller's unit of work reads the scope's highest issued number, inserts
//!   its row with the candidate, and reports a uniqueness collision so the
//!   allocator can retry with a fresh candidate. Used by the chain linker so
//!   the number and the FIR/Case row commit together.
//! - [`SequenceAllocatorApi::next`]: a dedicated counter row advanced with
//!   compare-and-set, for callers that only need a number.

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

pub use adapters::InMemoryCounterStore;
pub use domain::config::AllocatorConfig;
pub use domain::errors::{AllocationError, AttemptError, IdentifierError};
pub use domain::identifier::{IdentifierFormat, IssuedIdentifier};
pub use domain::scope::{ScopeKind, SequenceNumber, SequenceScope};
pub use ports::inbound::SequenceAllocatorApi;
pub use ports::outbound::{SequenceCounterStore, SequenceLedger};
pub use service::{CounterSequenceService, SequenceAllocator};
