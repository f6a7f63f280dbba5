use crate::domain::{SignedTransaction, TransferCall};
use crate::foundation::util::time::now_secs;
use crate::foundation::{AccountId, QuorumError, RejectReason, Result, TransactionId};
use async_trait::async_trait;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

pub mod retry;

/// Current state of an account at the ledger: the next expected sequence
/// number and the spendable balance.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountState {
    pub sequence_number: u64,
    pub balance: u64,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TransactionStatus {
    Pending,
    Confirmed,
    Rejected(RejectReason),
}

impl TransactionStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, TransactionStatus::Pending)
    }
}

/// The external ledger boundary: submit an encoded transaction and fetch
/// current state for an address. This component never inspects or mutates
/// authorization state.
#[async_trait]
pub trait LedgerRpc: Send + Sync {
    async fn chain_id(&self) -> Result<u8>;
    async fn account_state(&self, account: &AccountId) -> Result<AccountState>;
    async fn submit_transaction(&self, transaction: &SignedTransaction) -> Result<TransactionId>;
    async fn transaction_status(&self, transaction_id: &TransactionId) -> Result<TransactionStatus>;
}

/// In-memory ledger used by tests and devnet tooling.
///
/// Behaves as an independent relying party: it re-derives the sender address
/// from the authenticator and re-runs full signature verification, so a
/// transaction the local pipeline waved through still fails here unless it is
/// genuinely authorized.
pub struct InMemoryLedger {
    chain_id: u8,
    accounts: Mutex<HashMap<AccountId, AccountState>>,
    statuses: Mutex<HashMap<TransactionId, TransactionStatus>>,
    submitted: Mutex<Vec<TransactionId>>,
    hold_confirmations: AtomicBool,
}

impl InMemoryLedger {
    pub fn new(chain_id: u8) -> Self {
        Self {
            chain_id,
            accounts: Mutex::new(HashMap::new()),
            statuses: Mutex::new(HashMap::new()),
            submitted: Mutex::new(Vec::new()),
            hold_confirmations: AtomicBool::new(false),
        }
    }

    /// Faucet boundary: credits an account, creating it when missing.
    pub fn fund(&self, account: AccountId, amount: u64) {
        if let Ok(mut accounts) = self.accounts.lock() {
            let state = accounts.entry(account).or_default();
            state.balance = state.balance.saturating_add(amount);
        }
    }

    /// Keeps accepted transactions in `Pending` until released, for
    /// confirmation-timeout scenarios.
    pub fn hold_confirmations(&self, hold: bool) {
        self.hold_confirmations.store(hold, Ordering::Relaxed);
    }

    /// Stops holding and confirms everything currently pending.
    pub fn release_confirmations(&self) {
        self.hold_confirmations.store(false, Ordering::Relaxed);
        if let Ok(mut statuses) = self.statuses.lock() {
            for status in statuses.values_mut() {
                if *status == TransactionStatus::Pending {
                    *status = TransactionStatus::Confirmed;
                }
            }
        }
    }

    /// Identifiers of transactions accepted so far, in submission order.
    pub fn submitted_transactions(&self) -> Vec<TransactionId> {
        self.submitted.lock().map(|ids| ids.clone()).unwrap_or_default()
    }

    fn reject(&self, transaction_id: TransactionId, reason: RejectReason) -> QuorumError {
        warn!("ledger rejected transaction {transaction_id}: {reason}");
        if let Ok(mut statuses) = self.statuses.lock() {
            // A terminal status already recorded for this id (e.g. a confirmed
            // duplicate submission) is never overwritten.
            statuses.entry(transaction_id).or_insert(TransactionStatus::Rejected(reason.clone()));
        }
        QuorumError::LedgerRejected(reason)
    }

    fn lock_error(what: &str) -> QuorumError {
        QuorumError::RpcError(format!("in-memory ledger {what} lock poisoned"))
    }
}

#[async_trait]
impl LedgerRpc for InMemoryLedger {
    async fn chain_id(&self) -> Result<u8> {
        Ok(self.chain_id)
    }

    async fn account_state(&self, account: &AccountId) -> Result<AccountState> {
        let accounts = self.accounts.lock().map_err(|_| Self::lock_error("accounts"))?;
        accounts.get(account).copied().ok_or_else(|| QuorumError::RpcError(format!("unknown account {account}")))
    }

    async fn submit_transaction(&self, transaction: &SignedTransaction) -> Result<TransactionId> {
        let raw = &transaction.raw_transaction;
        let transaction_id = transaction.transaction_id();

        if raw.chain_id != self.chain_id {
            return Err(self.reject(transaction_id, RejectReason::ChainIdMismatch { expected: self.chain_id, got: raw.chain_id }));
        }
        let now = now_secs();
        if raw.is_expired(now) {
            return Err(self.reject(transaction_id, RejectReason::Expired { expiration_secs: raw.expiration_secs, now_secs: now }));
        }

        let derived = transaction.authenticator.account_id();
        if derived != raw.sender {
            return Err(self.reject(transaction_id, RejectReason::SenderMismatch { sender: raw.sender, derived }));
        }
        if let Err(err) = transaction.authenticator.verify(&raw.signing_message()) {
            return Err(self.reject(transaction_id, RejectReason::AuthenticationFailed(err.to_string())));
        }

        let mut accounts = self.accounts.lock().map_err(|_| Self::lock_error("accounts"))?;
        let sender_state = match accounts.get(&raw.sender) {
            Some(state) => *state,
            None => return Err(self.reject(transaction_id, RejectReason::UnknownAccount(raw.sender))),
        };
        if sender_state.sequence_number != raw.sequence_number {
            return Err(self.reject(
                transaction_id,
                RejectReason::InvalidSequenceNumber { expected: sender_state.sequence_number, got: raw.sequence_number },
            ));
        }

        // Payloads the ledger does not understand are carried opaquely and
        // confirmed without a state transfer.
        if let Ok(transfer) = TransferCall::from_payload_bytes(&raw.payload) {
            if sender_state.balance < transfer.amount {
                return Err(self.reject(
                    transaction_id,
                    RejectReason::InsufficientBalance { balance: sender_state.balance, required: transfer.amount },
                ));
            }
            accounts.entry(transfer.recipient).or_default().balance += transfer.amount;
            let sender_entry = accounts.entry(raw.sender).or_default();
            sender_entry.balance -= transfer.amount;
        }
        accounts.entry(raw.sender).or_default().sequence_number += 1;
        drop(accounts);

        let status =
            if self.hold_confirmations.load(Ordering::Relaxed) { TransactionStatus::Pending } else { TransactionStatus::Confirmed };
        self.statuses.lock().map_err(|_| Self::lock_error("statuses"))?.insert(transaction_id, status);
        self.submitted.lock().map_err(|_| Self::lock_error("submitted"))?.push(transaction_id);
        debug!("ledger accepted transaction {transaction_id} from {}", raw.sender);
        Ok(transaction_id)
    }

    async fn transaction_status(&self, transaction_id: &TransactionId) -> Result<TransactionStatus> {
        let statuses = self.statuses.lock().map_err(|_| Self::lock_error("statuses"))?;
        statuses.get(transaction_id).cloned().ok_or_else(|| QuorumError::RpcError(format!("unknown transaction {transaction_id}")))
    }
}
