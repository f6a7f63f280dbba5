//! System-wide constants for quorum threshold authorization.

/// Ed25519 public key size in bytes.
pub const PUBLIC_KEY_SIZE: usize = 32;

/// Ed25519 signature size in bytes.
pub const SIGNATURE_SIZE: usize = 64;

/// Blake3 hash size in bytes (account and transaction identifiers).
pub const HASH_SIZE: usize = 32;

/// Maximum number of public keys in a policy.
///
/// The signer bitmap is fixed at [`BITMAP_SIZE`] bytes, one bit per index.
pub const MAX_POLICY_KEYS: usize = 32;

/// Signer bitmap size in bytes (1 bit per possible signer index).
pub const BITMAP_SIZE: usize = 4;

/// Scheme tag identifying the multi-ed25519 authenticator scheme.
///
/// Prefixed to the account-id preimage and to the authenticator wire format.
pub const SCHEME_MULTI_ED25519: u8 = 0x01;

/// Maximum transaction payload size in bytes (64 KB).
///
/// Bounds the length prefix accepted by the canonical decoder.
pub const MAX_PAYLOAD_SIZE: usize = 64 * 1024;

/// Environment variable overriding the wall clock, for test determinism.
pub const TEST_NOW_SECS_ENV_VAR: &str = "QUORUM_TEST_NOW_SECS";
