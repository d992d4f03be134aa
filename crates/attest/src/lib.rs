//! attest: proof-carrying data over the Pasta fields with an injected
//! recursion backend.
//!
//! The backend is the only piece that knows how proofs are made. Everything
//! above it (circuits, chaining, verification at a boundary) is written
//! against [`RecursionBackend`], and [`TranscriptBackend`] stands in for a
//! real proving system in tests and local runs.

pub mod backend;
pub mod error;
pub mod pasta;
pub mod pcd;
pub mod transcript;

pub use backend::{Attestation, ProgramId, RecursionBackend, TranscriptBackend};
pub use error::SynthesisError;
pub use pasta::{FrPallas, FrVesta, U64Field};
pub use pcd::{prove_step, verify_step, Circuit, Instance, Pcd};
pub use transcript::FsTranscript;
