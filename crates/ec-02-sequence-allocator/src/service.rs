//! # Sequence Allocator Service
//!
//! Optimistic allocation: read the highest issued number, propose the next,
//! let the store's uniqueness check arbitrate, retry on collision.

use crate::domain::config::AllocatorConfig;
use crate::domain::errors::{AllocationError, AttemptError};
use crate::domain::scope::{SequenceNumber, SequenceScope};
use crate::ports::inbound::SequenceAllocatorApi;
use crate::ports::outbound::{SequenceCounterStore, SequenceLedger};
use tracing::{debug, warn};

/// Bounded optimistic retry around a caller-supplied unit of work.
#[derive(Debug, Clone, Default)]
pub struct SequenceAllocator {
    config: AllocatorConfig,
}

impl SequenceAllocator {
    pub fn new(config: AllocatorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AllocatorConfig {
        &self.config
    }

    /// Run `attempt` with successive candidate numbers until it commits.
    ///
    /// Each round calls `open` for a fresh unit of work, reads the scope's
    /// highest issued number through it, and hands the unit plus the
    /// candidate to `attempt`. The attempt inserts its row and commits; a
    /// uniqueness collision is reported as [`AttemptError::Collision`] and
    /// triggers another round after backoff. Any other error ends the loop.
    pub fn allocate_with<U, T, E, O, A>(
        &self,
        scope: &SequenceScope,
        mut open: O,
        mut attempt: A,
    ) -> Result<T, E>
    where
        U: SequenceLedger,
        E: From<AllocationError>,
        O: FnMut() -> Result<U, E>,
        A: FnMut(U, SequenceNumber) -> Result<T, AttemptError<E>>,
    {
        let max_attempts = self.config.effective_max_attempts();

        for round in 1..=max_attempts {
            let unit = open()?;
            let highest = unit
                .highest_issued(scope)
                .map_err(AllocationError::from)?;
            let candidate = successor(scope, highest)?;

            match attempt(unit, candidate) {
                Ok(value) => {
                    debug!(%scope, sequence = candidate.value(), round, "Sequence allocated");
                    return Ok(value);
                }
                Err(AttemptError::Abort(e)) => return Err(e),
                Err(AttemptError::Collision) => {
                    debug!(%scope, sequence = candidate.value(), round, "Sequence collision, retrying");
                    if round < max_attempts {
                        self.pause(round);
                    }
                }
            }
        }

        warn!(%scope, attempts = max_attempts, "Allocator contention: retry budget exhausted");
        Err(AllocationError::Contention {
            scope: *scope,
            attempts: max_attempts,
        }
        .into())
    }

    /// Advance a dedicated counter with compare-and-set.
    pub fn next_from<C: SequenceCounterStore + ?Sized>(
        &self,
        counters: &C,
        scope: &SequenceScope,
    ) -> Result<SequenceNumber, AllocationError> {
        let max_attempts = self.config.effective_max_attempts();

        for round in 1..=max_attempts {
            let current = counters.load(scope)?;
            let candidate = successor(scope, current)?;

            if counters.compare_and_set(scope, current, candidate)? {
                debug!(%scope, sequence = candidate.value(), round, "Counter advanced");
                return Ok(candidate);
            }

            debug!(%scope, round, "Counter moved underneath us, retrying");
            if round < max_attempts {
                self.pause(round);
            }
        }

        warn!(%scope, attempts = max_attempts, "Allocator contention: retry budget exhausted");
        Err(AllocationError::Contention {
            scope: *scope,
            attempts: max_attempts,
        })
    }

    fn pause(&self, round: u32) {
        let delay = self.config.backoff(round);
        if !delay.is_zero() {
            std::thread::sleep(delay);
        }
    }
}

fn successor(
    scope: &SequenceScope,
    highest: Option<SequenceNumber>,
) -> Result<SequenceNumber, AllocationError> {
    match highest {
        None => Ok(SequenceNumber::FIRST),
        Some(n) => n
            .checked_next()
            .ok_or(AllocationError::Exhausted { scope: *scope }),
    }
}

/// [`SequenceAllocatorApi`] backed by a counter store.
pub struct CounterSequenceService<C: SequenceCounterStore> {
    allocator: SequenceAllocator,
    counters: C,
}

impl<C: SequenceCounterStore> CounterSequenceService<C> {
    pub fn new(config: AllocatorConfig, counters: C) -> Self {
        Self {
            allocator: SequenceAllocator::new(config),
            counters,
        }
    }
}

impl<C: SequenceCounterStore> SequenceAllocatorApi for CounterSequenceService<C> {
    fn next(&self, scope: &SequenceScope) -> Result<SequenceNumber, AllocationError> {
        self.allocator.next_from(&self.counters, scope)
    }
}
