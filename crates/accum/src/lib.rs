//! Running accumulator over the agent message stream.
//!
//! The accumulator is the highest sequence number seen among valid messages.
//! [`RollupState::process_new_message`] is the single transition function; it
//! is total and pure so the same code can run inside a proof circuit and
//! outside it.

pub mod validity;

use primitives::{encode_u64, encode_u8, read_u64, read_u8, Message, ENC_V1};
use serde::{Deserialize, Serialize};
use subtle::{ConditionallySelectable, ConstantTimeGreater};
use thiserror::Error;

pub use validity::is_valid;

/// Protocol violations raised by accumulator assertions.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AccumError {
    #[error("state is not the genesis state: max sequence number is {found}")]
    NotGenesis { found: u64 },
    #[error("claimed state {claimed} does not match computed state {computed}")]
    StateMismatch { computed: u64, claimed: u64 },
}

/// Accumulator state: the greatest accepted sequence number.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Debug, Default)]
pub struct RollupState {
    pub max_sequence_number: u64,
}

impl RollupState {
    pub const GENESIS: RollupState = RollupState { max_sequence_number: 0 };

    pub const fn new(max_sequence_number: u64) -> Self {
        Self { max_sequence_number }
    }

    pub const fn genesis() -> Self {
        Self::GENESIS
    }

    pub fn assert_initial_state(&self) -> Result<(), AccumError> {
        if self.max_sequence_number != 0 {
            return Err(AccumError::NotGenesis { found: self.max_sequence_number });
        }
        Ok(())
    }

    /// Whether `message` would advance this state.
    pub fn accepts(&self, message: &Message) -> bool {
        let valid = validity::check_conditions(&message.details);
        let fresh = message.sequence_number.ct_gt(&self.max_sequence_number);
        (valid & fresh).into()
    }

    /// Fold one message. Invalid or stale messages leave the state unchanged.
    pub fn process_new_message(&self, message: &Message) -> RollupState {
        let valid = validity::check_conditions(&message.details);
        let fresh = message.sequence_number.ct_gt(&self.max_sequence_number);
        let max = u64::conditional_select(
            &self.max_sequence_number,
            &message.sequence_number,
            valid & fresh,
        );
        RollupState { max_sequence_number: max }
    }

    /// Equality assertion between a recomputed state (`self`) and a caller's claim.
    pub fn assert_equals(&self, claimed: &RollupState) -> Result<(), AccumError> {
        if self != claimed {
            return Err(AccumError::StateMismatch {
                computed: self.max_sequence_number,
                claimed: claimed.max_sequence_number,
            });
        }
        Ok(())
    }

    pub fn fold<'a, I>(self, messages: I) -> RollupState
    where
        I: IntoIterator<Item = &'a Message>,
    {
        messages.into_iter().fold(self, |state, m| state.process_new_message(m))
    }

    pub fn to_canonical_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(1 + 8);
        encode_u8(ENC_V1, &mut out);
        encode_u64(self.max_sequence_number, &mut out);
        out
    }

    pub fn from_canonical_bytes(mut data: &[u8]) -> anyhow::Result<Self> {
        let ver = read_u8(&mut data)?;
        if ver != ENC_V1 { anyhow::bail!("unsupported encoding version: {}", ver); }
        let max_sequence_number = read_u64(&mut data)?;
        if !data.is_empty() { anyhow::bail!("trailing bytes in RollupState"); }
        Ok(RollupState { max_sequence_number })
    }
}

impl core::fmt::Display for RollupState {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "max={}", self.max_sequence_number)
    }
}
