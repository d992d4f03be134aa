//! spymaster node: generates agent traffic, proves it in batches and keeps a
//! ledger counter of the highest accepted message number.

pub mod config;
pub mod generator;
pub mod logging;
pub mod service;

use anyhow::Result;
use attest::{ProgramId, TranscriptBackend};
use ledger::Ledger;
use pcd::BatchProcessor;
use rand::{rngs::StdRng, SeedableRng};
use serde::Serialize;
use tracing::info;

pub use config::NodeConfig;
pub use generator::{Corruption, MessageGenerator};
pub use service::RollupService;

/// What a run did, printed by the binary when it finishes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub messages: u64,
    pub batches: usize,
    pub advanced: usize,
    pub max_message_number: u64,
    pub depth: u64,
}

pub fn build_service_parts(
    config: &NodeConfig,
) -> Result<(BatchProcessor<TranscriptBackend>, Ledger<TranscriptBackend>)> {
    let backend = TranscriptBackend::with_key(config.backend_key()?);
    let processor =
        BatchProcessor::with_program(backend, ProgramId::from_label(&config.program_label));
    let ledger = Ledger::in_memory(processor.clone());
    Ok((processor, ledger))
}

pub async fn run(config: &NodeConfig) -> Result<RunSummary> {
    config.validate()?;
    let (processor, ledger) = build_service_parts(config)?;
    let service = RollupService::start(processor, ledger).await?;

    let mut source = MessageGenerator::new(StdRng::seed_from_u64(config.seed));
    let messages = source.stream(config.message_count, config.corrupt_every);

    let mut batches = 0;
    let mut advanced = 0;
    for chunk in messages.chunks(config.batch_size) {
        let update = service.ingest(chunk.to_vec()).await?;
        batches += 1;
        if update.advanced() {
            advanced += 1;
        }
    }

    let head = service.head().await;
    let summary = RunSummary {
        messages: config.message_count,
        batches,
        advanced,
        max_message_number: service.ledger().max_message_number()?,
        depth: head.depth(),
    };
    info!(?summary, "run finished");
    Ok(summary)
}
