//! PCD container and step proving.

use ff::PrimeField;

use crate::backend::{ProgramId, RecursionBackend};
use crate::error::SynthesisError;

/// Public instance of a proof, in circuit-defined order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Instance<F: PrimeField> {
    pub inputs: Vec<F>,
}

impl<F: PrimeField> Instance<F> {
    pub fn new(inputs: Vec<F>) -> Self {
        Self { inputs }
    }
}

/// Proof-carrying data: a public instance plus the backend proof for it.
/// `depth` is 1 for a base proof and grows by one per composed step.
#[derive(Clone, Debug)]
pub struct Pcd<F: PrimeField, Inner> {
    pub program: ProgramId,
    pub instance: Instance<F>,
    pub inner: Inner,
    pub depth: u64,
}

/// One method of a program. `synthesize` checks its constraints and returns
/// the public instance; any violation aborts with an error.
pub trait Circuit<F: PrimeField> {
    type PublicInput;
    type Witness;

    fn synthesize(
        &self,
        prev: Option<&Instance<F>>,
        public: &Self::PublicInput,
        witness: &Self::Witness,
    ) -> Result<Instance<F>, SynthesisError>;
}

/// Synthesize `circuit` and wrap the result as PCD. When `prev` is given it is
/// verified as part of producing the new proof.
pub fn prove_step<F, C, B>(
    backend: &B,
    program: &ProgramId,
    circuit: &C,
    prev: Option<&Pcd<F, B::Proof>>,
    public: &C::PublicInput,
    witness: &C::Witness,
) -> Result<Pcd<F, B::Proof>, SynthesisError>
where
    F: PrimeField,
    C: Circuit<F>,
    B: RecursionBackend<F>,
{
    let instance = circuit.synthesize(prev.map(|p| &p.instance), public, witness)?;

    let (inner, depth) = match prev {
        Some(p) => (backend.compose_and_prove(program, p, &instance)?, p.depth + 1),
        None => (backend.prove(program, &instance, 1)?, 1),
    };

    Ok(Pcd { program: *program, instance, inner, depth })
}

/// Verify `p` as a proof of `program`.
pub fn verify_step<F, B: RecursionBackend<F>>(
    backend: &B,
    program: &ProgramId,
    p: &Pcd<F, B::Proof>,
) -> Result<(), SynthesisError>
where
    F: PrimeField,
{
    if p.program != *program {
        return Err(SynthesisError::ProgramMismatch { expected: *program, found: p.program });
    }
    if backend.verify_pcd(p) { Ok(()) } else { Err(SynthesisError::Verification) }
}
