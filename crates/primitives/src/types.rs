//! Core message types carried by the agent stream.

use serde::{Deserialize, Serialize};

/// Self-describing payload of an agent message.
///
/// Nothing here is checked at construction time; the validity rules live in
/// the accumulator's validator so that malformed messages can still be folded
/// (and ignored) by the state transition.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Debug, Default)]
pub struct MessageDetails {
    pub agent_id: u64,
    pub agent_x: u64,
    pub agent_y: u64,
    pub checksum: u64,
}

impl MessageDetails {
    pub const fn new(agent_id: u64, agent_x: u64, agent_y: u64, checksum: u64) -> Self {
        Self { agent_id, agent_x, agent_y, checksum }
    }

    /// Build details whose checksum is `agent_id + agent_x + agent_y`.
    /// Returns `None` if the sum does not fit in a `u64`.
    pub fn with_checksum(agent_id: u64, agent_x: u64, agent_y: u64) -> Option<Self> {
        let checksum = agent_id.checked_add(agent_x)?.checked_add(agent_y)?;
        Some(Self::new(agent_id, agent_x, agent_y, checksum))
    }

    /// The all-zero "no agent" message.
    pub const fn sentinel() -> Self {
        Self::new(0, 0, 0, 0)
    }

    pub const fn is_sentinel(&self) -> bool {
        self.agent_id == 0
    }
}

/// A numbered message. Sequence numbers are arbitrary and need not be contiguous.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Debug, Default)]
pub struct Message {
    pub sequence_number: u64,
    pub details: MessageDetails,
}

impl Message {
    pub const fn new(sequence_number: u64, details: MessageDetails) -> Self {
        Self { sequence_number, details }
    }
}

/// BLAKE2b-256 identifier of a message's canonical encoding.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct MessageDigest(pub [u8; 32]);

impl core::fmt::Debug for MessageDigest {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "MessageDigest({})", hex::encode(self.0))
    }
}

impl core::fmt::Display for MessageDigest {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn checksum_is_sum_of_fields() {
        let d = MessageDetails::with_checksum(10, 100, 6000).unwrap();
        assert_eq!(d.checksum, 6110);
        assert!(!d.is_sentinel());
    }

    #[test]
    fn checksum_overflow_is_refused() {
        assert!(MessageDetails::with_checksum(1, u64::MAX, 0).is_none());
        assert!(MessageDetails::with_checksum(0, u64::MAX - 1, 2).is_none());
    }

    #[test]
    fn sentinel_is_all_zero() {
        let s = MessageDetails::sentinel();
        assert!(s.is_sentinel());
        assert_eq!(s, MessageDetails::default());
    }

    #[test]
    fn serde_json_shape() {
        let m = Message::new(7, MessageDetails::new(1, 2, 3, 6));
        let json = serde_json::to_value(m).unwrap();
        assert_eq!(json["sequence_number"], 7);
        assert_eq!(json["details"]["agent_y"], 3);
        let back: Message = serde_json::from_value(json).unwrap();
        assert_eq!(back, m);
    }
}
