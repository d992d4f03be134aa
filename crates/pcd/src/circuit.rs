//! Circuits of the batch-processor program.
//!
//! Both methods share one program id and the public instance layout
//! `[prior_max, output_max]`, so an init proof and any step proof are
//! interchangeable wherever a batch proof is expected.

use accum::{AccumError, RollupState};
use attest::{Circuit, FrVesta, Instance, SynthesisError, U64Field};
use primitives::Message;

pub const BATCH_PROGRAM_LABEL: &str = "spymaster/batch-processor/v1";

/// Position of the public input (`max_sequence_number` of the prior state).
pub const INPUT_INDEX: usize = 0;
/// Position of the public output (resulting `max_sequence_number`).
pub const OUTPUT_INDEX: usize = 1;
pub const INSTANCE_LEN: usize = 2;

pub fn batch_instance(input: &RollupState, output: u64) -> Instance<FrVesta> {
    Instance::new(vec![
        FrVesta::embed_u64(input.max_sequence_number),
        FrVesta::embed_u64(output),
    ])
}

fn unsatisfied(e: AccumError) -> SynthesisError {
    SynthesisError::Unsatisfied(e.to_string())
}

/// Genesis method: the state must be the initial state; output is 0.
#[derive(Clone, Copy, Debug, Default)]
pub struct InitCircuit;

impl Circuit<FrVesta> for InitCircuit {
    type PublicInput = RollupState;
    type Witness = ();

    fn synthesize(
        &self,
        _prev: Option<&Instance<FrVesta>>,
        state: &RollupState,
        _witness: &(),
    ) -> Result<Instance<FrVesta>, SynthesisError> {
        state.assert_initial_state().map_err(unsatisfied)?;
        Ok(batch_instance(state, 0))
    }
}

/// Private inputs of a step besides the previous proof.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StepWitness {
    /// The caller's claimed result of the transition.
    pub new_state: RollupState,
    pub message: Message,
}

/// Folds one message on top of a previous batch proof.
#[derive(Clone, Copy, Debug, Default)]
pub struct StepCircuit;

impl Circuit<FrVesta> for StepCircuit {
    type PublicInput = RollupState;
    type Witness = StepWitness;

    fn synthesize(
        &self,
        prev: Option<&Instance<FrVesta>>,
        prior_state: &RollupState,
        witness: &StepWitness,
    ) -> Result<Instance<FrVesta>, SynthesisError> {
        let prev = prev.ok_or(SynthesisError::MissingPrevious)?;
        if prev.inputs.len() != INSTANCE_LEN {
            return Err(SynthesisError::Unsatisfied("malformed previous instance".into()));
        }
        // The previous proof must end exactly where this step starts.
        if prev.inputs[OUTPUT_INDEX] != FrVesta::embed_u64(prior_state.max_sequence_number) {
            return Err(SynthesisError::Unsatisfied(
                "previous proof does not end at the prior state".into(),
            ));
        }

        let computed = prior_state.process_new_message(&witness.message);
        computed.assert_equals(&witness.new_state).map_err(unsatisfied)?;

        Ok(batch_instance(prior_state, computed.max_sequence_number))
    }
}
