use crate::foundation::{Hash32, QuorumError, Result};

pub fn parse_hex_32(s: &str) -> Result<Hash32> {
    let trimmed = s.trim();
    let stripped = trimmed.strip_prefix("0x").or_else(|| trimmed.strip_prefix("0X")).unwrap_or(trimmed);
    let bytes = hex::decode(stripped).map_err(|e| QuorumError::EncodingMismatch(format!("invalid hex '{trimmed}': {e}")))?;
    bytes
        .as_slice()
        .try_into()
        .map_err(|_| QuorumError::EncodingMismatch(format!("expected 32 bytes, got {}", bytes.len())))
}

/// Strict cursor over a canonical byte buffer. Every read is bounds-checked
/// and [`ByteReader::finish`] rejects trailing bytes, so a value has exactly
/// one accepted encoding.
pub struct ByteReader<'a> {
    bytes: &'a [u8],
    offset: usize,
}

impl<'a> ByteReader<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, offset: 0 }
    }

    pub fn remaining(&self) -> usize {
        self.bytes.len() - self.offset
    }

    pub fn read_slice(&mut self, len: usize) -> Result<&'a [u8]> {
        if self.remaining() < len {
            return Err(QuorumError::EncodingMismatch(format!(
                "truncated input: need {len} bytes at offset {}, have {}",
                self.offset,
                self.remaining()
            )));
        }
        let slice = &self.bytes[self.offset..self.offset + len];
        self.offset += len;
        Ok(slice)
    }

    pub fn read_array<const N: usize>(&mut self) -> Result<[u8; N]> {
        let slice = self.read_slice(N)?;
        let mut out = [0u8; N];
        out.copy_from_slice(slice);
        Ok(out)
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        Ok(self.read_array::<1>()?[0])
    }

    pub fn read_u32(&mut self) -> Result<u32> {
        Ok(u32::from_le_bytes(self.read_array::<4>()?))
    }

    pub fn read_u64(&mut self) -> Result<u64> {
        Ok(u64::from_le_bytes(self.read_array::<8>()?))
    }

    pub fn finish(self) -> Result<()> {
        if self.remaining() != 0 {
            return Err(QuorumError::EncodingMismatch(format!("{} trailing bytes after canonical value", self.remaining())));
        }
        Ok(())
    }
}
