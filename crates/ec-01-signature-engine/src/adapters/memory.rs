use crate::domain::entities::{IntegrityFailure, RecordRef};
use crate::ports::outbound::IntegrityFlagSink;
use parking_lot::Mutex;
use shared_types::StoreError;

/// Review queue held in memory.
#[derive(Debug, Default)]
pub struct InMemoryFlagSink {
    flagged: Mutex<Vec<(RecordRef, IntegrityFailure)>>,
}

impl InMemoryFlagSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything flagged so far, oldest first.
    pub fn flagged(&self) -> Vec<(RecordRef, IntegrityFailure)> {
        self.flagged.lock().clone()
    }
}

impl IntegrityFlagSink for InMemoryFlagSink {
    fn flag(&self, record: RecordRef, failure: IntegrityFailure) -> Result<(), StoreError> {
        self.flagged.lock().push((record, failure));
        Ok(())
    }
}
