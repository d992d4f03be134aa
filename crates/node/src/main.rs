use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use node::{logging, run, NodeConfig};

#[derive(Debug, Parser)]
#[command(name = "spymaster", about = "Prove an agent message stream and track its highest valid number")]
struct Args {
    /// Path to a TOML config file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the number of generated messages.
    #[arg(long)]
    messages: Option<u64>,

    /// Override the generator seed.
    #[arg(long)]
    seed: Option<u64>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let mut config = match &args.config {
        Some(path) => NodeConfig::load(path)?,
        None => NodeConfig::default(),
    };
    if let Some(n) = args.messages {
        config.message_count = n;
    }
    if let Some(seed) = args.seed {
        config.seed = seed;
    }

    logging::init(&config.log_filter)?;
    let summary = run(&config).await?;
    println!(
        "max_message_number={} batches={} advanced={} depth={}",
        summary.max_message_number, summary.batches, summary.advanced, summary.depth
    );
    Ok(())
}
