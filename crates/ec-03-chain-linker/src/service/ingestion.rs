//! Insert-only filing of readings and challans, the roots of the chain.

use super::ChainLinker;
use crate::domain::errors::ChainError;
use crate::ports::outbound::{ChainStore, ChainTransaction, CommitError, UniqueConstraint};
use shared_types::{Challan, EmissionReading, StoreError, TimeSource};
use tracing::{info, warn};

impl<S: ChainStore, T: TimeSource> ChainLinker<S, T> {
    pub(crate) fn insert_reading(
        &self,
        reading: EmissionReading,
    ) -> Result<EmissionReading, ChainError> {
        if reading.device_id.trim().is_empty() {
            return Err(ChainError::EmptyField("device_id"));
        }

        let mut tx = self.store.begin()?;
        if tx.reading(reading.id)?.is_some() {
            warn!(reading = %reading.id, "Re-submitted reading rejected");
            return Err(ChainError::ReadingExists {
                reading: reading.id,
            });
        }
        tx.insert_reading(reading.clone());

        match tx.commit() {
            Ok(()) => {}
            Err(CommitError::UniqueViolation(UniqueConstraint::ReadingId)) => {
                return Err(ChainError::ReadingExists {
                    reading: reading.id,
                })
            }
            Err(CommitError::Store(e)) => return Err(e.into()),
            Err(e) => return Err(unexpected(e)),
        }

        info!(reading = %reading.id, device = %reading.device_id, "Emission reading recorded");
        Ok(reading)
    }

    pub(crate) fn insert_challan(&self, challan: Challan) -> Result<Challan, ChainError> {
        let mut tx = self.store.begin()?;
        if tx.challan(challan.id)?.is_some() {
            warn!(challan = %challan.id, "Re-filed challan rejected");
            return Err(ChainError::ChallanExists {
                challan: challan.id,
            });
        }

        if let Some(reading) = challan.emission_reading_id {
            tx.reading(reading)?
                .ok_or(ChainError::ReadingNotFound(reading))?;
            if let Some(existing) = tx.challan_for_reading(reading)? {
                warn!(%reading, existing = %existing.id, "Reading already backs a challan");
                return Err(ChainError::ReadingAlreadyCited {
                    reading,
                    challan: existing.id,
                });
            }
        }
        tx.insert_challan(challan.clone());

        match (tx.commit(), challan.emission_reading_id) {
            (Ok(()), _) => {}
            (Err(CommitError::UniqueViolation(UniqueConstraint::ChallanId)), _) => {
                return Err(ChainError::ChallanExists {
                    challan: challan.id,
                })
            }
            (
                Err(CommitError::UniqueViolation(UniqueConstraint::ChallanReading)),
                Some(reading),
            ) => {
                warn!(%reading, challan = %challan.id, "Lost race to cite reading");
                let winner = self
                    .store
                    .begin()?
                    .challan_for_reading(reading)?
                    .map_or(challan.id, |c| c.id);
                return Err(ChainError::ReadingAlreadyCited {
                    reading,
                    challan: winner,
                });
            }
            (Err(CommitError::Store(e)), _) => return Err(e.into()),
            (Err(e), _) => return Err(unexpected(e)),
        }

        info!(
            challan = %challan.id,
            reading = ?challan.emission_reading_id,
            "Challan filed"
        );
        Ok(challan)
    }
}

/// A plain insert can only trip its own constraints.
fn unexpected(e: CommitError) -> ChainError {
    ChainError::Store(StoreError::Corrupted(format!(
        "unexpected commit failure on insert: {e}"
    )))
}
