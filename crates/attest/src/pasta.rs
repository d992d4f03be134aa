//! Pasta cycle aliases and helpers.

use pasta_curves::{pallas, vesta};
use ff::PrimeField;

/// Scalar field of Vesta = base field of Pallas. Public instances live here.
pub type FrVesta = vesta::Scalar;

/// Scalar field of Pallas = base field of Vesta.
pub type FrPallas = pallas::Scalar;

/// Canonical embedding of `u64` values into a prime field and back.
pub trait U64Field: PrimeField {
    #[inline]
    fn embed_u64(v: u64) -> Self {
        Self::from(v)
    }

    /// `None` if the element is not the image of some `u64`.
    fn as_u64(&self) -> Option<u64>;
}

impl U64Field for FrVesta {
    #[inline]
    fn as_u64(&self) -> Option<u64> {
        le_repr_to_u64(self.to_repr().as_ref())
    }
}

impl U64Field for FrPallas {
    #[inline]
    fn as_u64(&self) -> Option<u64> {
        le_repr_to_u64(self.to_repr().as_ref())
    }
}

// Pasta reprs are 32 little-endian bytes.
fn le_repr_to_u64(repr: &[u8]) -> Option<u64> {
    let (lo, hi) = repr.split_at(8);
    if hi.iter().any(|&b| b != 0) {
        return None;
    }
    let mut buf = [0u8; 8];
    buf.copy_from_slice(lo);
    Some(u64::from_le_bytes(buf))
}
