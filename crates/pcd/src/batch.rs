//! Batch processor: a recursive proof chain over rollup state transitions.

use accum::RollupState;
use attest::{
    prove_step, verify_step, FrVesta, Pcd, ProgramId, RecursionBackend, SynthesisError, U64Field,
};
use primitives::{batch_digest, message_digest, Message};
use thiserror::Error;
use tracing::{debug, warn};

use crate::circuit::{
    InitCircuit, StepCircuit, StepWitness, BATCH_PROGRAM_LABEL, INPUT_INDEX, INSTANCE_LEN,
    OUTPUT_INDEX,
};

/// A proof produced by the batch-processor program.
pub type BatchProof<P> = Pcd<FrVesta, P>;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BatchError {
    #[error("proof construction aborted: {0}")]
    Synthesis(#[from] SynthesisError),
    #[error("batch proof rejected: {0}")]
    Verification(SynthesisError),
    #[error("malformed batch proof instance")]
    MalformedInstance,
}

/// Public input of a batch proof: the state its last step started from.
pub fn public_input<P>(proof: &BatchProof<P>) -> Result<RollupState, BatchError> {
    read_instance(proof, INPUT_INDEX).map(RollupState::new)
}

/// Public output (resulting `max_sequence_number`) of a batch proof.
pub fn public_output<P>(proof: &BatchProof<P>) -> Result<u64, BatchError> {
    read_instance(proof, OUTPUT_INDEX)
}

fn read_instance<P>(proof: &BatchProof<P>, idx: usize) -> Result<u64, BatchError> {
    if proof.instance.inputs.len() != INSTANCE_LEN {
        return Err(BatchError::MalformedInstance);
    }
    proof.instance.inputs[idx].as_u64().ok_or(BatchError::MalformedInstance)
}

/// Latest state of a chain together with the proof that ends at it.
#[derive(Clone, Debug)]
pub struct ChainHead<P> {
    pub state: RollupState,
    pub proof: BatchProof<P>,
}

impl<P> ChainHead<P> {
    pub fn public_output(&self) -> Result<u64, BatchError> {
        public_output(&self.proof)
    }

    pub fn depth(&self) -> u64 {
        self.proof.depth
    }
}

/// Proves `init` and `step` of the batch-processor program with an injected backend.
#[derive(Clone, Debug)]
pub struct BatchProcessor<B> {
    backend: B,
    program: ProgramId,
}

impl<B: RecursionBackend<FrVesta>> BatchProcessor<B> {
    pub fn new(backend: B) -> Self {
        Self::with_program(backend, ProgramId::from_label(BATCH_PROGRAM_LABEL))
    }

    pub fn with_program(backend: B, program: ProgramId) -> Self {
        Self { backend, program }
    }

    pub fn program_id(&self) -> &ProgramId {
        &self.program
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Start a chain. Aborts unless `state` is the genesis state.
    pub fn init(&self, state: &RollupState) -> Result<BatchProof<B::Proof>, BatchError> {
        let proof = prove_step(&self.backend, &self.program, &InitCircuit, None, state, &())
            .map_err(|e| {
                warn!(%state, err = %e, "init aborted");
                e
            })?;
        debug!(program = %self.program, "genesis proof created");
        Ok(proof)
    }

    /// Fold `message` on top of `prior_proof`.
    ///
    /// `prior_proof` is verified while the new proof is built and must end at
    /// `prior_state`; `new_state` must be exactly
    /// `prior_state.process_new_message(message)`. Any violation aborts and no
    /// proof is returned.
    pub fn step(
        &self,
        prior_state: &RollupState,
        prior_proof: &BatchProof<B::Proof>,
        new_state: &RollupState,
        message: &Message,
    ) -> Result<BatchProof<B::Proof>, BatchError> {
        let witness = StepWitness { new_state: *new_state, message: *message };
        match prove_step(&self.backend, &self.program, &StepCircuit, Some(prior_proof), prior_state, &witness) {
            Ok(proof) => {
                debug!(
                    seq = message.sequence_number,
                    msg = %message_digest(message),
                    prior = prior_state.max_sequence_number,
                    new = new_state.max_sequence_number,
                    depth = proof.depth,
                    "step proved"
                );
                Ok(proof)
            }
            Err(e) => {
                warn!(seq = message.sequence_number, %prior_state, claimed = %new_state, err = %e, "step aborted");
                Err(e.into())
            }
        }
    }

    pub fn verify(&self, proof: &BatchProof<B::Proof>) -> Result<(), BatchError> {
        verify_step(&self.backend, &self.program, proof).map_err(BatchError::Verification)
    }

    /// Genesis head: state 0 and its init proof.
    pub fn genesis(&self) -> Result<ChainHead<B::Proof>, BatchError> {
        let state = RollupState::genesis();
        let proof = self.init(&state)?;
        Ok(ChainHead { state, proof })
    }

    /// Compute the next state and prove the step that reaches it.
    pub fn advance(
        &self,
        head: &ChainHead<B::Proof>,
        message: &Message,
    ) -> Result<ChainHead<B::Proof>, BatchError> {
        let state = head.state.process_new_message(message);
        let proof = self.step(&head.state, &head.proof, &state, message)?;
        Ok(ChainHead { state, proof })
    }

    /// Fold every message in order. Only the final head is returned; its proof
    /// covers the whole batch.
    pub fn prove_batch(
        &self,
        head: ChainHead<B::Proof>,
        messages: &[Message],
    ) -> Result<ChainHead<B::Proof>, BatchError> {
        let start = head.state;
        let head = messages.iter().try_fold(head, |head, m| self.advance(&head, m))?;
        debug!(
            batch = %batch_digest(messages),
            count = messages.len(),
            from = %start,
            to = %head.state,
            depth = head.proof.depth,
            "batch proved"
        );
        Ok(head)
    }
}
