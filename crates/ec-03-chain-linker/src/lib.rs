//! # Chain Linker (EC-03)
//!
//! Stores readings and challans, mints FIRs from challans and Cases from
//! FIRs, and owns the post-creation lifecycle of all three records.
//!
//! ## Domain Invariants
//!
//! | ID | Invariant | Enforcement |
//! |----|-----------|-------------|
//! | 1 | A reading backs at most one challan, which must cite a stored reading | Pre-check in the unit of work, unique constraint at commit |
//! | 2 | A challan has at most one FIR | Pre-check in the unit of work, unique constraint at commit |
//! | 3 | A FIR has at most one Case | Pre-check in the unit of work, unique constraint at commit |
//! | 4 | FIR/Case numbers unique per (org, year) | Number allocated inside the same unit of work as the row insert |
//! | 5 | Only cognizable challans escalate | Violation lookup before staging the FIR |
//! | 6 | Challan status is its only mutable field | `update_challan_status` rewrites status alone; readings and challans are insert-only |
//! | 7 | A verdict is set once | `record_verdict` rejects a second verdict or a terminal case |
//! | 8 | Station and court codes are unique per kind | `seed_station` / `seed_court` reject a code held by another record |
//!
//! ## Atomicity
//!
//! `issue_fir` opens a [`ChainTransaction`], reads the challan's existing
//! link and the scope's highest number, stages the FIR and commits. Two
//! concurrent requests for the same challan both pass the read, but only one
//! commit survives the store's `(challan)` constraint; the loser surfaces
//! [`ChainError::ChallanAlreadyLinked`]. A collision on the number alone is
//! retried with the next candidate.

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

pub use adapters::{InMemoryChainStore, InMemoryChainTransaction};
pub use domain::config::LinkerConfig;
pub use domain::errors::ChainError;
pub use domain::requests::{CaseRequest, FirRequest};
pub use ports::inbound::ChainLinkerApi;
pub use ports::outbound::{ChainStore, ChainTransaction, CommitError, UniqueConstraint};
pub use service::{ChainLinker, ChainLinkerDependencies};
