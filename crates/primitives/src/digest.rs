//! Domain-separated digests over canonical message encodings.

use blake2b_simd::Params as Blake2bParams;

use crate::types::*;

/// Domain separators for BLAKE2b-256 derivations.
const DS_MESSAGE_V1: &[u8; 16] = b"spymaster.msg.v1"; // exactly 16
const DS_BATCH_V1: &[u8; 16] = b"spymaster.batch\0"; // 15 + 1 = 16

/// Stable identifier of a single message.
pub fn message_digest(message: &Message) -> MessageDigest {
    let hash = Blake2bParams::new()
        .hash_length(32)
        .personal(DS_MESSAGE_V1)
        .hash(&message.to_canonical_bytes());
    let mut out = [0u8; 32];
    out.copy_from_slice(hash.as_bytes());
    MessageDigest(out)
}

/// Order-sensitive digest of a batch of messages. The count is bound first so
/// that batches sharing a prefix never collide.
pub fn batch_digest(messages: &[Message]) -> MessageDigest {
    let mut state = Blake2bParams::new().hash_length(32).personal(DS_BATCH_V1).to_state();
    state.update(&(messages.len() as u64).to_be_bytes());
    for m in messages {
        state.update(&message_digest(m).0);
    }
    let mut out = [0u8; 32];
    out.copy_from_slice(state.finalize().as_bytes());
    MessageDigest(out)
}
