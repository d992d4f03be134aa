//! Synthetic agent traffic for local runs.

use accum::validity::{AGENT_ID_BOUNDS, AGENT_X_BOUNDS, AGENT_Y_BOUNDS};
use primitives::{Message, MessageDetails};
use rand::Rng;
use rand_core::RngCore;

/// Ways a generated message can be made invalid.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Corruption {
    AgentIdOutOfRange,
    AgentXOutOfRange,
    AgentYOutOfRange,
    CoordinatesEqual,
    ChecksumMismatch,
}

impl Corruption {
    pub const ALL: [Corruption; 5] = [
        Corruption::AgentIdOutOfRange,
        Corruption::AgentXOutOfRange,
        Corruption::AgentYOutOfRange,
        Corruption::CoordinatesEqual,
        Corruption::ChecksumMismatch,
    ];

    /// Break exactly one rule. The checksum is resealed afterwards unless the
    /// checksum itself is the broken rule.
    pub fn apply(self, d: MessageDetails) -> MessageDetails {
        let (mut id, mut x, mut y) = (d.agent_id, d.agent_x, d.agent_y);
        match self {
            Corruption::AgentIdOutOfRange => id = AGENT_ID_BOUNDS.1 + 1,
            Corruption::AgentXOutOfRange => x = AGENT_X_BOUNDS.1 + 1,
            Corruption::AgentYOutOfRange => y = AGENT_Y_BOUNDS.1 + 1,
            Corruption::CoordinatesEqual => {
                x = AGENT_Y_BOUNDS.0;
                y = AGENT_Y_BOUNDS.0;
            }
            Corruption::ChecksumMismatch => {
                return MessageDetails { checksum: d.checksum.wrapping_add(1), ..d };
            }
        }
        // All fields are bounded well below u64::MAX here.
        MessageDetails::with_checksum(id, x, y).unwrap_or(MessageDetails::new(id, x, y, 0))
    }
}

pub struct MessageGenerator<R> {
    rng: R,
    next_sequence: u64,
}

impl<R: RngCore> MessageGenerator<R> {
    pub fn new(rng: R) -> Self {
        Self { rng, next_sequence: 1 }
    }

    /// Details satisfying every validity rule, never the sentinel.
    pub fn random_details(&mut self) -> MessageDetails {
        let id = self.rng.gen_range(AGENT_ID_BOUNDS.0 + 1..=AGENT_ID_BOUNDS.1);
        let x = self.rng.gen_range(AGENT_X_BOUNDS.0..=AGENT_X_BOUNDS.1);
        let y = self.rng.gen_range(AGENT_Y_BOUNDS.0.max(x + 1)..=AGENT_Y_BOUNDS.1);
        MessageDetails::new(id, x, y, id + x + y)
    }

    /// Next message in a strictly increasing sequence, with a random gap.
    pub fn random_message(&mut self) -> Message {
        let seq = self.next_sequence;
        self.next_sequence += self.rng.gen_range(1..=3);
        Message::new(seq, self.random_details())
    }

    /// `count` messages where every `corrupt_every`-th one is made invalid.
    pub fn stream(&mut self, count: u64, corrupt_every: Option<u64>) -> Vec<Message> {
        (1..=count)
            .map(|i| {
                let mut m = self.random_message();
                if let Some(n) = corrupt_every.filter(|n| *n > 0 && i % n == 0) {
                    let kind = Corruption::ALL[((i / n) as usize) % Corruption::ALL.len()];
                    m.details = kind.apply(m.details);
                }
                m
            })
            .collect()
    }
}
