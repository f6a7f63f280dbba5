use crate::foundation::{QuorumError, Result};
use ed25519_dalek::{Signature, Signer, SigningKey, VerifyingKey, SECRET_KEY_LENGTH};
use rand::rngs::OsRng;
use std::fmt;
use zeroize::Zeroizing;

/// A key holder's ed25519 keypair. The secret half never leaves this type
/// except through [`SigningKeypair::secret_bytes`] (devnet tooling only).
pub struct SigningKeypair {
    signing_key: SigningKey,
}

impl SigningKeypair {
    pub fn generate() -> Self {
        Self { signing_key: SigningKey::generate(&mut OsRng) }
    }

    pub fn from_secret_bytes(bytes: &[u8]) -> Result<Self> {
        let secret: [u8; SECRET_KEY_LENGTH] = bytes
            .try_into()
            .map_err(|_| QuorumError::InvalidKey(format!("expected {} secret bytes, got {}", SECRET_KEY_LENGTH, bytes.len())))?;
        let secret = Zeroizing::new(secret);
        Ok(Self { signing_key: SigningKey::from_bytes(&secret) })
    }

    pub fn public_key(&self) -> VerifyingKey {
        self.signing_key.verifying_key()
    }

    /// Signs an arbitrary byte message. Pure and side-effect free; independent
    /// holders may sign the same message concurrently without contention.
    pub fn sign(&self, message: &[u8]) -> Signature {
        self.signing_key.sign(message)
    }

    /// Secret key bytes, zeroized when the returned guard drops.
    pub fn secret_bytes(&self) -> Zeroizing<[u8; SECRET_KEY_LENGTH]> {
        Zeroizing::new(self.signing_key.to_bytes())
    }
}

impl fmt::Debug for SigningKeypair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SigningKeypair(public_key={})", hex::encode(self.public_key().as_bytes()))
    }
}

/// Parses a 32-byte ed25519 public key from its canonical encoding.
pub fn public_key_from_bytes(bytes: &[u8]) -> Result<VerifyingKey> {
    let array: [u8; 32] =
        bytes.try_into().map_err(|_| QuorumError::InvalidKey(format!("expected 32 public key bytes, got {}", bytes.len())))?;
    VerifyingKey::from_bytes(&array).map_err(|err| QuorumError::InvalidKey(err.to_string()))
}
