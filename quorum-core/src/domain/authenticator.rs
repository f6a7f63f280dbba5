use crate::domain::collector::{AggregateSignature, SignerBitmap};
use crate::domain::policy::MultisigPolicy;
use crate::foundation::keys::public_key_from_bytes;
use crate::foundation::util::encoding::ByteReader;
use crate::foundation::{AccountId, QuorumError, Result, BITMAP_SIZE, PUBLIC_KEY_SIZE, SCHEME_MULTI_ED25519, SIGNATURE_SIZE};
use ed25519_dalek::Signature;

/// A policy together with an aggregate signature claiming to satisfy it.
///
/// Construction checks structure only; authorization is decided by
/// [`Authenticator::verify`], which every relying party must re-run against
/// the exact signing message - the collector's per-add checks are a
/// convenience, not a substitute.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Authenticator {
    policy: MultisigPolicy,
    aggregate: AggregateSignature,
}

impl Authenticator {
    pub fn new(policy: MultisigPolicy, aggregate: AggregateSignature) -> Result<Self> {
        if let Some(index) = aggregate.bitmap().indices().find(|index| *index >= policy.key_count()) {
            return Err(QuorumError::EncodingMismatch(format!(
                "bitmap index {index} out of range for policy with {} keys",
                policy.key_count()
            )));
        }
        Ok(Self { policy, aggregate })
    }

    pub fn policy(&self) -> &MultisigPolicy {
        &self.policy
    }

    pub fn aggregate(&self) -> &AggregateSignature {
        &self.aggregate
    }

    /// Re-derives the account address this authenticator speaks for.
    pub fn account_id(&self) -> AccountId {
        self.policy.account_id()
    }

    /// Fails closed: `ThresholdNotMet` when the bitmap carries fewer entries
    /// than the policy threshold, `SignatureMismatch` on the first entry whose
    /// signature does not verify over `signing_message`. A single invalid
    /// signature invalidates the whole authenticator.
    pub fn verify(&self, signing_message: &[u8]) -> Result<()> {
        let received = self.aggregate.signer_count();
        if received < usize::from(self.policy.threshold()) {
            return Err(QuorumError::ThresholdNotMet { required: u16::from(self.policy.threshold()), received: received as u16 });
        }
        for (signer_index, signature) in self.aggregate.entries() {
            let key = self.policy.key_at(signer_index).ok_or_else(|| {
                QuorumError::EncodingMismatch(format!("bitmap index {signer_index} out of range for policy"))
            })?;
            key.verify_strict(signing_message, signature).map_err(|_| QuorumError::SignatureMismatch { signer_index })?;
        }
        Ok(())
    }

    /// Wire format v1: scheme tag, key count (u32 LE), keys (32 bytes each),
    /// threshold, bitmap (4 bytes), signature count (u32 LE), signatures
    /// (64 bytes each, ascending index order).
    pub fn to_bytes(&self) -> Vec<u8> {
        let keys = self.policy.public_keys();
        let signatures = self.aggregate.signatures();
        let mut buf =
            Vec::with_capacity(2 + 8 + BITMAP_SIZE + keys.len() * PUBLIC_KEY_SIZE + signatures.len() * SIGNATURE_SIZE);
        buf.push(SCHEME_MULTI_ED25519);
        buf.extend_from_slice(&(keys.len() as u32).to_le_bytes());
        for key in keys {
            buf.extend_from_slice(key.as_bytes());
        }
        buf.push(self.policy.threshold());
        buf.extend_from_slice(self.aggregate.bitmap().as_bytes());
        buf.extend_from_slice(&(signatures.len() as u32).to_le_bytes());
        for signature in signatures {
            buf.extend_from_slice(&signature.to_bytes());
        }
        buf
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let mut reader = ByteReader::new(bytes);
        let scheme = reader.read_u8()?;
        if scheme != SCHEME_MULTI_ED25519 {
            return Err(QuorumError::EncodingMismatch(format!("unknown authenticator scheme tag {scheme}")));
        }
        let key_count = reader.read_u32()? as usize;
        if key_count == 0 || key_count > crate::foundation::MAX_POLICY_KEYS {
            return Err(QuorumError::EncodingMismatch(format!("authenticator declares {key_count} keys")));
        }
        let mut keys = Vec::with_capacity(key_count);
        for _ in 0..key_count {
            keys.push(public_key_from_bytes(reader.read_slice(PUBLIC_KEY_SIZE)?)?);
        }
        let threshold = reader.read_u8()?;
        let policy = MultisigPolicy::new(keys, threshold)?;

        let bitmap = SignerBitmap::from_bytes(reader.read_array::<BITMAP_SIZE>()?);
        let signature_count = reader.read_u32()? as usize;
        if signature_count != bitmap.count() {
            return Err(QuorumError::EncodingMismatch(format!(
                "bitmap marks {} signers but {signature_count} signatures declared",
                bitmap.count()
            )));
        }
        let mut signatures = Vec::with_capacity(signature_count);
        for _ in 0..signature_count {
            signatures.push(Signature::from_bytes(&reader.read_array::<SIGNATURE_SIZE>()?));
        }
        reader.finish()?;

        let aggregate = AggregateSignature::new(bitmap, signatures)?;
        Self::new(policy, aggregate)
    }
}
