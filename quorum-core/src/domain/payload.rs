use crate::foundation::util::encoding::ByteReader;
use crate::foundation::{AccountId, QuorumError, Result, HASH_SIZE};

/// Payload tag for a coin transfer call - append only.
const PAYLOAD_TRANSFER_V1: u8 = 1;

/// A coin transfer carried opaquely in [`crate::domain::RawTransaction::payload`].
///
/// The authorization core never interprets payload bytes; this codec exists for
/// the parties at either end of the submission boundary.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TransferCall {
    pub recipient: AccountId,
    pub amount: u64,
}

impl TransferCall {
    /// Tag byte, recipient (32 bytes), amount (8 bytes little-endian).
    pub fn to_payload_bytes(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(1 + HASH_SIZE + 8);
        buf.push(PAYLOAD_TRANSFER_V1);
        buf.extend_from_slice(self.recipient.as_bytes());
        buf.extend_from_slice(&self.amount.to_le_bytes());
        buf
    }

    pub fn from_payload_bytes(bytes: &[u8]) -> Result<Self> {
        let mut reader = ByteReader::new(bytes);
        let tag = reader.read_u8()?;
        if tag != PAYLOAD_TRANSFER_V1 {
            return Err(QuorumError::EncodingMismatch(format!("unknown payload tag {tag}")));
        }
        let recipient = AccountId::new(reader.read_array::<HASH_SIZE>()?);
        let amount = reader.read_u64()?;
        reader.finish()?;
        Ok(Self { recipient, amount })
    }
}
