//! Batch processor for the agent message accumulator.
//!
//! A chain starts with [`BatchProcessor::init`] over the genesis state and
//! grows one message at a time with [`BatchProcessor::step`]. Each step
//! verifies the previous proof while producing the next, so the final proof
//! attests to the whole history and costs the same to check however long the
//! chain is.

pub mod batch;
pub mod circuit;

pub use batch::{public_input, public_output, BatchError, BatchProcessor, BatchProof, ChainHead};
pub use circuit::{InitCircuit, StepCircuit, StepWitness, BATCH_PROGRAM_LABEL};
