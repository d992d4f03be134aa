//! Canonical encoding and decoding for message types.

use anyhow::{anyhow, Result};

use crate::types::*;

// ——— Canonical encoding version ———

pub const ENC_V1: u8 = 1; // version tag for canonical encodings

/// Version byte plus five big-endian `u64` fields.
pub const MESSAGE_ENCODED_LEN: usize = 1 + 5 * 8;

impl MessageDetails {
    pub fn encode_into(&self, out: &mut Vec<u8>) {
        encode_u64(self.agent_id, out);
        encode_u64(self.agent_x, out);
        encode_u64(self.agent_y, out);
        encode_u64(self.checksum, out);
    }

    pub fn decode_from(data: &mut &[u8]) -> Result<Self> {
        let agent_id = read_u64(data)?;
        let agent_x = read_u64(data)?;
        let agent_y = read_u64(data)?;
        let checksum = read_u64(data)?;
        Ok(Self { agent_id, agent_x, agent_y, checksum })
    }
}

impl Message {
    pub fn to_canonical_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(MESSAGE_ENCODED_LEN);
        encode_u8(ENC_V1, &mut out);
        encode_u64(self.sequence_number, &mut out);
        self.details.encode_into(&mut out);
        out
    }

    pub fn from_canonical_bytes(mut data: &[u8]) -> Result<Self> {
        let ver = read_u8(&mut data)?;
        if ver != ENC_V1 { return Err(anyhow!("unsupported encoding version: {}", ver)); }
        let sequence_number = read_u64(&mut data)?;
        let details = MessageDetails::decode_from(&mut data)?;
        if !data.is_empty() { return Err(anyhow!("trailing bytes in Message")); }
        Ok(Message { sequence_number, details })
    }
}

// ——— Encoding primitives ———

pub fn encode_u8(v: u8, out: &mut Vec<u8>) { out.push(v); }
pub fn encode_u64(v: u64, out: &mut Vec<u8>) { out.extend_from_slice(&v.to_be_bytes()); }

pub fn read_u8(data: &mut &[u8]) -> Result<u8> {
    let [v] = read_fixed::<1>(data)?;
    Ok(v)
}

pub fn read_u64(data: &mut &[u8]) -> Result<u64> {
    Ok(u64::from_be_bytes(read_fixed::<8>(data)?))
}

pub fn read_fixed<const N: usize>(data: &mut &[u8]) -> Result<[u8; N]> {
    if data.len() < N { return Err(anyhow!("unexpected EOF")); }
    let mut out = [0u8; N];
    out.copy_from_slice(&data[..N]);
    *data = &data[N..];
    Ok(out)
}
