use crate::domain::scope::{SequenceNumber, SequenceScope};
use crate::ports::outbound::SequenceCounterStore;
use parking_lot::Mutex;
use shared_types::StoreError;
use std::collections::HashMap;

/// Counter rows held in memory.
#[derive(Debug, Default)]
pub struct InMemoryCounterStore {
    counters: Mutex<HashMap<SequenceScope, SequenceNumber>>,
}

impl InMemoryCounterStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SequenceCounterStore for InMemoryCounterStore {
    fn load(&self, scope: &SequenceScope) -> Result<Option<SequenceNumber>, StoreError> {
        Ok(self.counters.lock().get(scope).copied())
    }

    fn compare_and_set(
        &self,
        scope: &SequenceScope,
        expected: Option<SequenceNumber>,
        next: SequenceNumber,
    ) -> Result<bool, StoreError> {
        let mut counters = self.counters.lock();
        if counters.get(scope).copied() != expected {
            return Ok(false);
        }
        counters.insert(*scope, next);
        Ok(true)
    }
}
