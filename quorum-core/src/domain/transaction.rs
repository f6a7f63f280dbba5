use crate::domain::authenticator::Authenticator;
use crate::foundation::util::encoding::ByteReader;
use crate::foundation::{AccountId, QuorumError, RejectReason, Result, TransactionId, HASH_SIZE, MAX_PAYLOAD_SIZE};

/// Domain-separation tag for transaction signing messages.
///
/// Distinct from every other message class this system signs; a signature over
/// a transaction can never double as authorization for a differently-tagged
/// payload. Changing the canonical field layout requires a new version tag.
const TRANSACTION_SIGNING_DOMAIN_V1: &[u8] = b"quorum:txn:v1:";

const TRANSACTION_ID_DOMAIN_V1: &[u8] = b"quorum:txn-id:v1:";

/// The structured transaction - deterministic across all signers.
///
/// Immutable once built; created once per submission attempt. `expiration_secs`
/// is an absolute unix timestamp; validity at submission time is checked by the
/// submission pipeline, not baked into the encoding.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RawTransaction {
    pub sender: AccountId,
    pub sequence_number: u64,
    /// Opaque encoded call; see [`crate::domain::payload`].
    pub payload: Vec<u8>,
    pub max_gas: u64,
    pub gas_price: u64,
    /// Absolute unix timestamp in seconds.
    pub expiration_secs: u64,
    pub chain_id: u8,
}

impl RawTransaction {
    /// Canonical v1 encoding: fixed field order, little-endian fixed-width
    /// integers, u32 length prefix on the payload, no padding.
    ///
    /// Signatures are computed over these bytes; two encoders given identical
    /// field values must emit byte-identical output.
    pub fn canonical_bytes(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(HASH_SIZE + 8 * 4 + 4 + self.payload.len() + 1);
        buf.extend_from_slice(self.sender.as_bytes());
        buf.extend_from_slice(&self.sequence_number.to_le_bytes());
        buf.extend_from_slice(&(self.payload.len() as u32).to_le_bytes());
        buf.extend_from_slice(&self.payload);
        buf.extend_from_slice(&self.max_gas.to_le_bytes());
        buf.extend_from_slice(&self.gas_price.to_le_bytes());
        buf.extend_from_slice(&self.expiration_secs.to_le_bytes());
        buf.push(self.chain_id);
        buf
    }

    /// Strict inverse of [`RawTransaction::canonical_bytes`]. Truncation,
    /// oversize length prefixes, and trailing bytes all fail with
    /// `EncodingMismatch`.
    pub fn decode_canonical(bytes: &[u8]) -> Result<Self> {
        let mut reader = ByteReader::new(bytes);
        let sender = AccountId::new(reader.read_array::<HASH_SIZE>()?);
        let sequence_number = reader.read_u64()?;
        let payload_len = reader.read_u32()? as usize;
        if payload_len > MAX_PAYLOAD_SIZE {
            return Err(QuorumError::EncodingMismatch(format!("payload length {payload_len} exceeds maximum {MAX_PAYLOAD_SIZE}")));
        }
        let payload = reader.read_slice(payload_len)?.to_vec();
        let max_gas = reader.read_u64()?;
        let gas_price = reader.read_u64()?;
        let expiration_secs = reader.read_u64()?;
        let chain_id = reader.read_u8()?;
        reader.finish()?;
        Ok(Self { sender, sequence_number, payload, max_gas, gas_price, expiration_secs, chain_id })
    }

    /// The exact byte sequence key holders sign: domain tag, then canonical
    /// bytes. Never stored; recomputed whenever verification is needed so it
    /// always matches the transaction being authorized.
    pub fn signing_message(&self) -> Vec<u8> {
        let canonical = self.canonical_bytes();
        let mut buf = Vec::with_capacity(TRANSACTION_SIGNING_DOMAIN_V1.len() + canonical.len());
        buf.extend_from_slice(TRANSACTION_SIGNING_DOMAIN_V1);
        buf.extend_from_slice(&canonical);
        buf
    }

    pub fn is_expired(&self, now_secs: u64) -> bool {
        self.expiration_secs <= now_secs
    }
}

/// Terminal artifact of the authorization flow, consumed by submission.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SignedTransaction {
    pub raw_transaction: RawTransaction,
    pub authenticator: Authenticator,
}

impl SignedTransaction {
    pub fn new(raw_transaction: RawTransaction, authenticator: Authenticator) -> Self {
        Self { raw_transaction, authenticator }
    }

    /// Full relying-party verification: the authenticator must satisfy its
    /// policy over the recomputed signing message, and the policy must derive
    /// exactly the transaction's sender address.
    pub fn verify(&self) -> Result<()> {
        self.authenticator.verify(&self.raw_transaction.signing_message())?;
        let derived = self.authenticator.account_id();
        if derived != self.raw_transaction.sender {
            return Err(QuorumError::LedgerRejected(RejectReason::SenderMismatch { sender: self.raw_transaction.sender, derived }));
        }
        Ok(())
    }

    /// Deterministic transaction identifier over the signed artifact.
    pub fn transaction_id(&self) -> TransactionId {
        let mut hasher = blake3::Hasher::new();
        hasher.update(TRANSACTION_ID_DOMAIN_V1);
        hasher.update(&self.raw_transaction.canonical_bytes());
        hasher.update(&self.authenticator.to_bytes());
        TransactionId::new(*hasher.finalize().as_bytes())
    }
}
