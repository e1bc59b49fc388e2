//! # Linker Configuration

use ec_02_sequence_allocator::{AllocatorConfig, IdentifierFormat};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LinkerConfig {
    /// Retry policy for number allocation and optimistic lifecycle updates.
    pub allocator: AllocatorConfig,
    pub identifiers: IdentifierFormat,
}
