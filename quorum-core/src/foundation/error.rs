use crate::foundation::types::{AccountId, TransactionId};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, QuorumError>;

/// Stable error codes for logging, metrics, and API surfaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    InvalidPolicy,
    SignerIndexOutOfRange,
    SignatureMismatch,
    DuplicateSigner,
    ThresholdNotMet,
    EncodingMismatch,
    InvalidKey,
    ConfirmationTimeout,
    LedgerRejected,
    RpcError,
    ConfigError,
    Message,
}

/// Structured rejection from the ledger boundary.
///
/// A rejection is terminal for the submitted transaction, but never mutates
/// authorization state: the caller may rebuild and resubmit.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RejectReason {
    #[error("unknown sender account {0}")]
    UnknownAccount(AccountId),

    #[error("invalid sequence number: expected {expected}, got {got}")]
    InvalidSequenceNumber { expected: u64, got: u64 },

    #[error("insufficient balance: available {balance}, required {required}")]
    InsufficientBalance { balance: u64, required: u64 },

    #[error("transaction expired at {expiration_secs}, current time {now_secs}")]
    Expired { expiration_secs: u64, now_secs: u64 },

    #[error("chain id mismatch: expected {expected}, got {got}")]
    ChainIdMismatch { expected: u8, got: u8 },

    #[error("sender {sender} does not match authenticator address {derived}")]
    SenderMismatch { sender: AccountId, derived: AccountId },

    #[error("authentication failed: {0}")]
    AuthenticationFailed(String),
}

#[derive(Debug, Error)]
pub enum QuorumError {
    #[error("invalid policy: threshold {threshold} of {key_count} keys")]
    InvalidPolicy { threshold: usize, key_count: usize },

    #[error("signer index {index} out of range (policy has {key_count} keys)")]
    SignerIndexOutOfRange { index: u8, key_count: u8 },

    #[error("signature for signer index {signer_index} does not verify")]
    SignatureMismatch { signer_index: u8 },

    #[error("duplicate signer index {signer_index}")]
    DuplicateSigner { signer_index: u8 },

    #[error("threshold not met: required {required}, received {received}")]
    ThresholdNotMet { required: u16, received: u16 },

    #[error("encoding mismatch: {0}")]
    EncodingMismatch(String),

    #[error("invalid public key: {0}")]
    InvalidKey(String),

    #[error("confirmation timed out after {waited_millis}ms for transaction {transaction_id}")]
    ConfirmationTimeout { transaction_id: TransactionId, waited_millis: u64 },

    #[error("ledger rejected transaction: {0}")]
    LedgerRejected(RejectReason),

    #[error("ledger rpc error: {0}")]
    RpcError(String),

    #[error("configuration error: {0}")]
    ConfigError(String),

    #[error("{0}")]
    Message(String),
}

impl QuorumError {
    pub fn code(&self) -> ErrorCode {
        match self {
            QuorumError::InvalidPolicy { .. } => ErrorCode::InvalidPolicy,
            QuorumError::SignerIndexOutOfRange { .. } => ErrorCode::SignerIndexOutOfRange,
            QuorumError::SignatureMismatch { .. } => ErrorCode::SignatureMismatch,
            QuorumError::DuplicateSigner { .. } => ErrorCode::DuplicateSigner,
            QuorumError::ThresholdNotMet { .. } => ErrorCode::ThresholdNotMet,
            QuorumError::EncodingMismatch(_) => ErrorCode::EncodingMismatch,
            QuorumError::InvalidKey(_) => ErrorCode::InvalidKey,
            QuorumError::ConfirmationTimeout { .. } => ErrorCode::ConfirmationTimeout,
            QuorumError::LedgerRejected(_) => ErrorCode::LedgerRejected,
            QuorumError::RpcError(_) => ErrorCode::RpcError,
            QuorumError::ConfigError(_) => ErrorCode::ConfigError,
            QuorumError::Message(_) => ErrorCode::Message,
        }
    }

    /// Transient failures may be retried or re-polled with the same inputs.
    ///
    /// Policy and encoding failures are final: the authorization attempt must
    /// be aborted rather than resubmitted.
    pub fn is_transient(&self) -> bool {
        matches!(self, QuorumError::RpcError(_) | QuorumError::ConfirmationTimeout { .. })
    }
}
