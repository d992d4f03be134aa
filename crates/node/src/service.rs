//! Prover-side service: folds incoming batches onto the chain head and submits
//! each resulting proof to the ledger.

use std::sync::Arc;

use anyhow::{Context, Result};
use attest::{FrVesta, RecursionBackend};
use ledger::{CounterStore, Ledger, LedgerUpdate, MemoryCounterStore};
use pcd::{BatchProcessor, ChainHead};
use primitives::Message;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

pub struct RollupService<B: RecursionBackend<FrVesta>, S = MemoryCounterStore> {
    processor: Arc<BatchProcessor<B>>,
    ledger: Arc<Ledger<B, S>>,
    head: Mutex<ChainHead<B::Proof>>,
}

impl<B, S> RollupService<B, S>
where
    B: RecursionBackend<FrVesta> + Send + Sync + 'static,
    S: CounterStore + 'static,
{
    /// Initialize the ledger counter and prove the genesis head.
    pub async fn start(processor: BatchProcessor<B>, ledger: Ledger<B, S>) -> Result<Self> {
        ledger.init_state().context("initializing ledger")?;
        let processor = Arc::new(processor);
        let genesis = {
            let processor = Arc::clone(&processor);
            tokio::task::spawn_blocking(move || processor.genesis()).await??
        };
        info!(program = %processor.program_id(), "rollup service started");
        Ok(Self { processor, ledger: Arc::new(ledger), head: Mutex::new(genesis) })
    }

    /// Prove `messages` on top of the current head and commit the result.
    ///
    /// The head only moves once the ledger accepts the proof.
    pub async fn ingest(&self, messages: Vec<Message>) -> Result<LedgerUpdate> {
        let mut head = self.head.lock().await;
        let count = messages.len();

        let processor = Arc::clone(&self.processor);
        let start = head.clone();
        let next = tokio::task::spawn_blocking(move || processor.prove_batch(start, &messages))
            .await?
            .context("proving batch")?;
        debug!(count, state = %next.state, depth = next.depth(), "batch proved");

        let ledger = Arc::clone(&self.ledger);
        let proof = next.proof.clone();
        let update = tokio::task::spawn_blocking(move || ledger.update(&proof)).await?;
        match update {
            Ok(update) => {
                *head = next;
                Ok(update)
            }
            Err(e) => {
                warn!(count, err = %e, "ledger refused batch");
                Err(e).context("submitting batch to ledger")
            }
        }
    }

    pub async fn head(&self) -> ChainHead<B::Proof> {
        self.head.lock().await.clone()
    }

    pub fn ledger(&self) -> &Ledger<B, S> {
        &self.ledger
    }

    pub fn processor(&self) -> &BatchProcessor<B> {
        &self.processor
    }
}
