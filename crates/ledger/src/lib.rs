//! Ledger verifier: the only writer of the committed counter.
//!
//! An update is accepted when the batch proof verifies and its public output
//! is not below the committed value. Equal values are accepted, so replaying a
//! stale but non-regressive proof is harmless.

pub mod store;

use attest::{FrVesta, RecursionBackend};
use pcd::{public_output, BatchError, BatchProcessor, BatchProof};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

pub use store::{CounterStore, MemoryCounterStore};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LedgerError {
    #[error("ledger counter is not initialized")]
    NotInitialized,
    #[error("ledger counter is already initialized")]
    AlreadyInitialized,
    #[error("proof rejected: {0}")]
    InvalidProof(#[source] BatchError),
    #[error("claimed counter {claimed} is below committed counter {current}")]
    Regression { current: u64, claimed: u64 },
    #[error("counter store lock poisoned")]
    Poisoned,
}

/// Outcome of a committed update.
#[derive(Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Debug)]
pub struct LedgerUpdate {
    pub previous: u64,
    pub current: u64,
}

impl LedgerUpdate {
    pub fn advanced(&self) -> bool {
        self.current > self.previous
    }
}

pub struct Ledger<B, S = MemoryCounterStore> {
    verifier: BatchProcessor<B>,
    store: S,
}

impl<B: RecursionBackend<FrVesta>> Ledger<B, MemoryCounterStore> {
    pub fn in_memory(verifier: BatchProcessor<B>) -> Self {
        Self::new(verifier, MemoryCounterStore::new())
    }
}

impl<B: RecursionBackend<FrVesta>, S: CounterStore> Ledger<B, S> {
    pub fn new(verifier: BatchProcessor<B>, store: S) -> Self {
        Self { verifier, store }
    }

    /// One-time initialization of the counter to 0.
    pub fn init_state(&self) -> Result<(), LedgerError> {
        self.store.initialize()?;
        info!(program = %self.verifier.program_id(), "ledger counter initialized");
        Ok(())
    }

    pub fn max_message_number(&self) -> Result<u64, LedgerError> {
        self.store.read()?.ok_or(LedgerError::NotInitialized)
    }

    /// Verify `proof` and commit its public output.
    pub fn update(&self, proof: &BatchProof<B::Proof>) -> Result<LedgerUpdate, LedgerError> {
        if let Err(e) = self.verifier.verify(proof) {
            warn!(err = %e, "rejecting update: proof does not verify");
            return Err(LedgerError::InvalidProof(e));
        }
        let claimed = public_output(proof).map_err(LedgerError::InvalidProof)?;

        let previous = self
            .store
            .update_with(&mut |current| {
                if current > claimed {
                    return Err(LedgerError::Regression { current, claimed });
                }
                Ok(claimed)
            })
            .map_err(|e| {
                warn!(claimed, err = %e, "rejecting update");
                e
            })?;

        info!(previous, current = claimed, depth = proof.depth, "counter updated");
        Ok(LedgerUpdate { previous, current: claimed })
    }
}
