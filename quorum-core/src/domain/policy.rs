use crate::foundation::{AccountId, QuorumError, Result, MAX_POLICY_KEYS, PUBLIC_KEY_SIZE, SCHEME_MULTI_ED25519};
use ed25519_dalek::VerifyingKey;

/// An immutable K-of-N signing policy.
///
/// Key order is semantically significant: the index of a key in the list *is*
/// the signer identity carried by signatures and the aggregate bitmap, and it
/// feeds the account-id derivation. Reordering the same key set produces a
/// different account.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MultisigPolicy {
    public_keys: Vec<VerifyingKey>,
    threshold: u8,
}

impl MultisigPolicy {
    /// Builds a policy preserving the caller's key order.
    pub fn new(public_keys: Vec<VerifyingKey>, threshold: u8) -> Result<Self> {
        let key_count = public_keys.len();
        if key_count == 0 || key_count > MAX_POLICY_KEYS || threshold == 0 || usize::from(threshold) > key_count {
            return Err(QuorumError::InvalidPolicy { threshold: usize::from(threshold), key_count });
        }
        Ok(Self { public_keys, threshold })
    }

    /// Builds a policy after sorting the keys ascending by their 32-byte
    /// encoding.
    ///
    /// This is the canonical ordering convention: parties that assemble the
    /// "same" key set independently derive the same [`AccountId`] through this
    /// constructor without coordinating an order out of band.
    pub fn new_canonical(mut public_keys: Vec<VerifyingKey>, threshold: u8) -> Result<Self> {
        public_keys.sort_by(|a, b| a.as_bytes().cmp(b.as_bytes()));
        Self::new(public_keys, threshold)
    }

    /// Derives the deterministic account identifier for this policy.
    ///
    /// Preimage: scheme tag byte, the concatenated public keys in policy
    /// order, the threshold byte. Anyone holding the policy can recompute the
    /// address offline.
    pub fn account_id(&self) -> AccountId {
        let mut buf = Vec::with_capacity(2 + self.public_keys.len() * PUBLIC_KEY_SIZE);
        buf.push(SCHEME_MULTI_ED25519);
        for key in &self.public_keys {
            buf.extend_from_slice(key.as_bytes());
        }
        buf.push(self.threshold);
        AccountId::new(*blake3::hash(&buf).as_bytes())
    }

    pub fn key_at(&self, index: u8) -> Option<&VerifyingKey> {
        self.public_keys.get(usize::from(index))
    }

    pub fn key_count(&self) -> u8 {
        self.public_keys.len() as u8
    }

    pub fn threshold(&self) -> u8 {
        self.threshold
    }

    pub fn public_keys(&self) -> &[VerifyingKey] {
        &self.public_keys
    }
}
