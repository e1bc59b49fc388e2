use crate::domain::identity::OwnerKey;
use crate::domain::otp::{ExpiryCause, OtpState, PublicStatusOtp};
use crate::ports::outbound::OtpStore;
use parking_lot::Mutex;
use shared_types::{OtpId, StoreError};
use std::collections::HashMap;

#[derive(Debug, Default)]
struct OtpTables {
    /// Every record per key, oldest first. The last one is current.
    history: HashMap<OwnerKey, Vec<PublicStatusOtp>>,
    by_token: HashMap<String, (OwnerKey, OtpId)>,
}

impl OtpTables {
    fn find_mut(&mut self, key: &OwnerKey, id: OtpId) -> Option<&mut PublicStatusOtp> {
        self.history
            .get_mut(key)
            .and_then(|records| records.iter_mut().find(|r| r.id == id))
    }
}

/// OTP records held in memory. Expired records are kept; expiry is logical.
#[derive(Debug, Default)]
pub struct InMemoryOtpStore {
    tables: Mutex<OtpTables>,
}

impl InMemoryOtpStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of records ever stored for `key`.
    pub fn record_count(&self, key: &OwnerKey) -> usize {
        self.tables
            .lock()
            .history
            .get(key)
            .map_or(0, Vec::len)
    }

    pub fn total_records(&self) -> usize {
        self.tables.lock().history.values().map(Vec::len).sum()
    }
}

impl OtpStore for InMemoryOtpStore {
    fn replace_live(&self, record: PublicStatusOtp) -> Result<Option<OtpId>, StoreError> {
        let mut tables = self.tables.lock();
        let records = tables.history.entry(record.key.clone()).or_default();

        let superseded = match records.last_mut() {
            Some(previous) if matches!(previous.state, OtpState::Requested { .. }) => {
                previous.state = OtpState::Expired {
                    cause: ExpiryCause::Superseded,
                };
                Some(previous.id)
            }
            _ => None,
        };

        records.push(record);
        Ok(superseded)
    }

    fn current(&self, key: &OwnerKey) -> Result<Option<PublicStatusOtp>, StoreError> {
        Ok(self
            .tables
            .lock()
            .history
            .get(key)
            .and_then(|records| records.last().cloned()))
    }

    fn compare_and_swap(
        &self,
        current: &PublicStatusOtp,
        next: PublicStatusOtp,
    ) -> Result<bool, StoreError> {
        let mut tables = self.tables.lock();
        let Some(stored) = tables.find_mut(&current.key, current.id) else {
            return Ok(false);
        };
        if stored != current {
            return Ok(false);
        }

        let token = match &next.state {
            OtpState::TokenIssued {
                token_fingerprint, ..
            } => Some(token_fingerprint.clone()),
            _ => None,
        };
        *stored = next;

        if let Some(fingerprint) = token {
            tables
                .by_token
                .insert(fingerprint, (current.key.clone(), current.id));
        }
        Ok(true)
    }

    fn find_by_token(&self, fingerprint: &str) -> Result<Option<PublicStatusOtp>, StoreError> {
        let mut tables = self.tables.lock();
        let Some((key, id)) = tables.by_token.get(fingerprint).cloned() else {
            return Ok(None);
        };
        Ok(tables.find_mut(&key, id).map(|r| r.clone()))
    }
}
