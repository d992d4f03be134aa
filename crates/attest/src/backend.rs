//! Recursion backend interface and a transcript-only stand-in.

use ff::PrimeField;
use serde::{Deserialize, Serialize};

use crate::error::SynthesisError;
use crate::pcd::{Instance, Pcd};
use crate::transcript::FsTranscript;

/// Identifies the program a proof was produced for; plays the role of a
/// verification key digest.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProgramId(pub [u8; 32]);

impl ProgramId {
    pub fn from_label(label: &str) -> Self {
        Self(*blake3::hash(label.as_bytes()).as_bytes())
    }
}

impl core::fmt::Debug for ProgramId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "ProgramId({})", hex::encode(&self.0[..8]))
    }
}

impl core::fmt::Display for ProgramId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

pub trait RecursionBackend<F: PrimeField> {
    type Proof: Clone + core::fmt::Debug + Send + Sync + 'static;

    /// Produce a proof for `instance` at the given chain depth.
    fn prove(
        &self,
        program: &ProgramId,
        instance: &Instance<F>,
        depth: u64,
    ) -> Result<Self::Proof, SynthesisError>;

    /// Verify a proof against an instance.
    fn verify(&self, program: &ProgramId, instance: &Instance<F>, depth: u64, proof: &Self::Proof) -> bool;

    fn verify_pcd(&self, pcd: &Pcd<F, Self::Proof>) -> bool {
        self.verify(&pcd.program, &pcd.instance, pcd.depth, &pcd.inner)
    }

    /// Check `prev` as a sub-step of the proof being built, then prove
    /// `instance` one level deeper.
    fn compose_and_prove(
        &self,
        program: &ProgramId,
        prev: &Pcd<F, Self::Proof>,
        instance: &Instance<F>,
    ) -> Result<Self::Proof, SynthesisError> {
        if prev.program != *program {
            return Err(SynthesisError::ProgramMismatch { expected: *program, found: prev.program });
        }
        if !self.verify_pcd(prev) {
            return Err(SynthesisError::PriorProofRejected);
        }
        let depth = prev
            .depth
            .checked_add(1)
            .ok_or_else(|| SynthesisError::Backend("chain depth overflow".into()))?;
        self.prove(program, instance, depth)
    }
}

/// Opaque 32-byte proof emitted by [`TranscriptBackend`].
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Attestation(pub [u8; 32]);

impl core::fmt::Debug for Attestation {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "Attestation({})", hex::encode(&self.0[..8]))
    }
}

/// A keyed transcript backend. Not a SNARK: prover and verifier share the
/// key, and the "proof" is a BLAKE3 MAC over (program, depth, instance).
/// Useful to exercise chaining and boundary verification end to end.
#[derive(Clone, Default)]
pub struct TranscriptBackend {
    key: [u8; 32],
}

impl TranscriptBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_key(key: [u8; 32]) -> Self {
        Self { key }
    }

    fn attest<F: PrimeField>(&self, program: &ProgramId, instance: &Instance<F>, depth: u64) -> [u8; 32] {
        let mut t = FsTranscript::new(b"attest/transcript-backend/v1");
        t.absorb(&program.0);
        t.absorb_u64(depth);
        t.absorb_u64(instance.inputs.len() as u64);
        for x in &instance.inputs {
            t.absorb_field(x);
        }
        t.keyed_challenge(&self.key, b"proof")
    }
}

impl core::fmt::Debug for TranscriptBackend {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "TranscriptBackend(..)")
    }
}

impl<F: PrimeField> RecursionBackend<F> for TranscriptBackend {
    type Proof = Attestation;

    fn prove(
        &self,
        program: &ProgramId,
        instance: &Instance<F>,
        depth: u64,
    ) -> Result<Self::Proof, SynthesisError> {
        if depth == 0 {
            return Err(SynthesisError::Backend("depth starts at 1".into()));
        }
        Ok(Attestation(self.attest(program, instance, depth)))
    }

    fn verify(&self, program: &ProgramId, instance: &Instance<F>, depth: u64, proof: &Self::Proof) -> bool {
        // blake3::Hash equality is constant time.
        blake3::Hash::from(self.attest(program, instance, depth)) == blake3::Hash::from(proof.0)
    }
}
