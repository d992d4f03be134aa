//! Fiat–Shamir transcript over BLAKE3.

use blake3::Hasher;
use ff::PrimeField;

/// Append-only transcript. Every absorbed item is length-framed, so
/// `absorb(b"ab"); absorb(b"c")` and `absorb(b"a"); absorb(b"bc")` differ.
#[derive(Default, Clone)]
pub struct FsTranscript {
    state: Vec<u8>,
}

impl FsTranscript {
    pub fn new(label: &[u8]) -> Self {
        let mut t = Self { state: Vec::new() };
        t.absorb(label);
        t
    }

    pub fn absorb(&mut self, bytes: &[u8]) {
        self.state.extend_from_slice(&(bytes.len() as u64).to_le_bytes());
        self.state.extend_from_slice(bytes);
    }

    pub fn absorb_u64(&mut self, v: u64) {
        self.absorb(&v.to_le_bytes());
    }

    pub fn absorb_field<F: PrimeField>(&mut self, f: &F) {
        self.absorb(PrimeField::to_repr(f).as_ref());
    }

    pub fn challenge_bytes(&self, label: &[u8]) -> [u8; 32] {
        let mut h = Hasher::new();
        h.update(&self.state);
        h.update(label);
        *h.finalize().as_bytes()
    }

    /// Challenge under a secret key; only holders of `key` can reproduce it.
    pub fn keyed_challenge(&self, key: &[u8; 32], label: &[u8]) -> [u8; 32] {
        let mut h = Hasher::new_keyed(key);
        h.update(&self.state);
        h.update(label);
        *h.finalize().as_bytes()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn framing_separates_absorptions() {
        let mut a = FsTranscript::new(b"t");
        a.absorb(b"ab");
        a.absorb(b"c");
        let mut b = FsTranscript::new(b"t");
        b.absorb(b"a");
        b.absorb(b"bc");
        assert_ne!(a.challenge_bytes(b"x"), b.challenge_bytes(b"x"));
    }

    #[test]
    fn keyed_challenge_depends_on_key() {
        let t = FsTranscript::new(b"t");
        assert_ne!(t.keyed_challenge(&[0u8; 32], b"x"), t.keyed_challenge(&[1u8; 32], b"x"));
        assert_eq!(t.keyed_challenge(&[7u8; 32], b"x"), t.keyed_challenge(&[7u8; 32], b"x"));
    }
}
