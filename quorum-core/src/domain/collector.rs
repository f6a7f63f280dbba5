use crate::domain::authenticator::Authenticator;
use crate::domain::policy::MultisigPolicy;
use crate::domain::transaction::RawTransaction;
use crate::foundation::{QuorumError, Result, BITMAP_SIZE, MAX_POLICY_KEYS};
use ed25519_dalek::Signature;
use std::sync::Mutex;

/// Fixed-size set of signer indices, one bit per index, MSB-first within each
/// byte (bit `i` lives at byte `i / 8`, mask `0x80 >> (i % 8)`).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SignerBitmap([u8; BITMAP_SIZE]);

impl SignerBitmap {
    pub const fn new() -> Self {
        Self([0; BITMAP_SIZE])
    }

    pub const fn from_bytes(bytes: [u8; BITMAP_SIZE]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; BITMAP_SIZE] {
        &self.0
    }

    pub fn contains(&self, index: u8) -> bool {
        if usize::from(index) >= MAX_POLICY_KEYS {
            return false;
        }
        self.0[usize::from(index) / 8] & (0x80 >> (index % 8)) != 0
    }

    /// Sets the bit for `index`; returns false if it was already set.
    pub fn insert(&mut self, index: u8) -> bool {
        debug_assert!(usize::from(index) < MAX_POLICY_KEYS);
        let mask = 0x80 >> (index % 8);
        let byte = &mut self.0[usize::from(index) / 8];
        if *byte & mask != 0 {
            return false;
        }
        *byte |= mask;
        true
    }

    pub fn count(&self) -> usize {
        self.0.iter().map(|byte| byte.count_ones() as usize).sum()
    }

    /// Set indices in ascending order.
    pub fn indices(&self) -> impl Iterator<Item = u8> + '_ {
        (0..MAX_POLICY_KEYS as u8).filter(move |index| self.contains(*index))
    }
}

/// A single holder's signature tagged with its policy index. Transient: held
/// only until folded into the aggregate.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct IndexedSignature {
    pub signer_index: u8,
    pub signature: Signature,
}

/// Bitmap-indexed collection of signatures, aligned 1:1 with the bitmap's
/// indices in ascending order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AggregateSignature {
    bitmap: SignerBitmap,
    signatures: Vec<Signature>,
}

impl AggregateSignature {
    pub fn new(bitmap: SignerBitmap, signatures: Vec<Signature>) -> Result<Self> {
        if bitmap.count() != signatures.len() {
            return Err(QuorumError::EncodingMismatch(format!(
                "bitmap marks {} signers but {} signatures supplied",
                bitmap.count(),
                signatures.len()
            )));
        }
        Ok(Self { bitmap, signatures })
    }

    pub fn empty() -> Self {
        Self { bitmap: SignerBitmap::new(), signatures: Vec::new() }
    }

    pub fn bitmap(&self) -> &SignerBitmap {
        &self.bitmap
    }

    pub fn signatures(&self) -> &[Signature] {
        &self.signatures
    }

    pub fn signer_count(&self) -> usize {
        self.signatures.len()
    }

    /// `(signer_index, signature)` pairs in ascending index order.
    pub fn entries(&self) -> impl Iterator<Item = (u8, &Signature)> {
        self.bitmap.indices().zip(self.signatures.iter())
    }
}

#[derive(Default)]
struct CollectorState {
    bitmap: SignerBitmap,
    entries: Vec<IndexedSignature>,
}

/// Gathers per-holder signatures over one transaction's signing message.
///
/// Verification happens on add, so a bad signature is rejected immediately
/// rather than silently poisoning the aggregate; relying parties still re-run
/// full verification on the assembled [`Authenticator`]. Mutation is
/// serialized behind a lock, so concurrent adds from independent holders never
/// expose partially-applied state.
pub struct SignatureCollector {
    policy: MultisigPolicy,
    signing_message: Vec<u8>,
    state: Mutex<CollectorState>,
}

impl SignatureCollector {
    pub fn new(policy: MultisigPolicy, transaction: &RawTransaction) -> Self {
        Self { signing_message: transaction.signing_message(), policy, state: Mutex::new(CollectorState::default()) }
    }

    pub fn policy(&self) -> &MultisigPolicy {
        &self.policy
    }

    pub fn signing_message(&self) -> &[u8] {
        &self.signing_message
    }

    /// Admits one signature for `signer_index` and returns the collected count.
    ///
    /// Fails with `SignerIndexOutOfRange` for an index outside the policy,
    /// `SignatureMismatch` if the signature does not verify against the key at
    /// that index, and `DuplicateSigner` if the index was already admitted -
    /// one physical holder's approval counts once regardless of resubmission.
    pub fn add_signature(&self, signer_index: u8, signature: Signature) -> Result<usize> {
        let key = self
            .policy
            .key_at(signer_index)
            .ok_or(QuorumError::SignerIndexOutOfRange { index: signer_index, key_count: self.policy.key_count() })?;
        key.verify_strict(&self.signing_message, &signature)
            .map_err(|_| QuorumError::SignatureMismatch { signer_index })?;

        let mut state = self.state.lock().map_err(|_| QuorumError::Message("signature collector lock poisoned".to_string()))?;
        if !state.bitmap.insert(signer_index) {
            return Err(QuorumError::DuplicateSigner { signer_index });
        }
        let position = state.entries.partition_point(|entry| entry.signer_index < signer_index);
        state.entries.insert(position, IndexedSignature { signer_index, signature });
        Ok(state.entries.len())
    }

    pub fn collected(&self) -> usize {
        self.state.lock().map(|state| state.entries.len()).unwrap_or(0)
    }

    pub fn has_threshold(&self) -> bool {
        self.collected() >= usize::from(self.policy.threshold())
    }

    /// Snapshot of the current aggregate.
    pub fn aggregate(&self) -> AggregateSignature {
        self.state
            .lock()
            .map(|state| AggregateSignature {
                bitmap: state.bitmap,
                signatures: state.entries.iter().map(|entry| entry.signature).collect(),
            })
            .unwrap_or_else(|_| AggregateSignature::empty())
    }

    /// Consumes the collector into a verifiable [`Authenticator`].
    ///
    /// Fails closed with `ThresholdNotMet` below the policy threshold: an
    /// under-authorized authenticator is never constructed here.
    pub fn into_authenticator(self) -> Result<Authenticator> {
        let state = self.state.into_inner().map_err(|_| QuorumError::Message("signature collector lock poisoned".to_string()))?;
        if state.entries.len() < usize::from(self.policy.threshold()) {
            return Err(QuorumError::ThresholdNotMet {
                required: u16::from(self.policy.threshold()),
                received: state.entries.len() as u16,
            });
        }
        let aggregate =
            AggregateSignature { bitmap: state.bitmap, signatures: state.entries.iter().map(|entry| entry.signature).collect() };
        Authenticator::new(self.policy, aggregate)
    }
}
