//! # Evidence-Chain Test Suite
//!
//! ## Structure
//!
//! ```text
//! tests/
//! ├── benches/          # Signing and issuance throughput
//! └── src/integration/  # Cross-crate scenarios over the wired runtime
//!     ├── chain_flows.rs      # FIR/Case issuance under concurrency, lifecycle
//!     ├── otp_flows.rs        # Public status channel
//!     └── integrity_flows.rs  # Signatures, tampering, key rotation
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p ec-tests
//! cargo test -p ec-tests integration::chain_flows
//! cargo bench -p ec-tests
//! ```

pub mod integration;
