use crate::domain::SignedTransaction;
use crate::foundation::util::time::now_secs;
use crate::foundation::{QuorumError, RejectReason, Result, TransactionId};
use crate::infrastructure::config::SubmissionConfig;
use crate::infrastructure::rpc::retry::retry_transient;
use crate::infrastructure::rpc::{LedgerRpc, TransactionStatus};
use log::{debug, info, warn};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{sleep, Instant};

/// Hands fully-authenticated transactions to the ledger and polls for
/// confirmation.
///
/// Preflight re-verifies the authenticator before anything leaves the
/// process: an under-authorized transaction never reaches the submission
/// boundary. Dropping an in-flight confirmation poll only stops local
/// waiting; it never retracts the submitted transaction.
pub struct SubmissionPipeline {
    rpc: Arc<dyn LedgerRpc>,
    config: SubmissionConfig,
}

impl SubmissionPipeline {
    pub fn new(rpc: Arc<dyn LedgerRpc>, config: SubmissionConfig) -> Self {
        Self { rpc, config }
    }

    /// Submits after local preflight; returns the ledger's transaction id.
    pub async fn submit(&self, transaction: &SignedTransaction) -> Result<TransactionId> {
        transaction.verify()?;

        let raw = &transaction.raw_transaction;
        let now = now_secs();
        if raw.is_expired(now) {
            warn!("refusing to dispatch expired transaction (expiration {} <= now {})", raw.expiration_secs, now);
            return Err(QuorumError::LedgerRejected(RejectReason::Expired { expiration_secs: raw.expiration_secs, now_secs: now }));
        }

        let delay = Duration::from_millis(self.config.retry_delay_millis);
        let transaction_id =
            retry_transient(self.config.submit_attempts, delay, || self.rpc.submit_transaction(transaction)).await?;
        info!("submitted transaction {transaction_id} for sender {}", raw.sender);
        Ok(transaction_id)
    }

    /// Polls until the transaction reaches a terminal status or `timeout`
    /// elapses.
    ///
    /// A `ConfirmationTimeout` is not proof of ledger-side failure - the
    /// ledger may confirm later, and the same id can be re-polled.
    pub async fn await_confirmation(&self, transaction_id: &TransactionId, timeout: Duration) -> Result<TransactionStatus> {
        let interval = Duration::from_millis(self.config.poll_interval_millis);
        let deadline = Instant::now() + timeout;
        loop {
            match self.rpc.transaction_status(transaction_id).await {
                Ok(TransactionStatus::Pending) => {}
                Ok(status) => {
                    debug!("transaction {transaction_id} reached terminal status");
                    return Ok(status);
                }
                Err(err) if err.is_transient() => debug!("status poll for {transaction_id} failed transiently: {err}"),
                Err(err) => return Err(err),
            }
            if Instant::now() + interval > deadline {
                return Err(QuorumError::ConfirmationTimeout {
                    transaction_id: *transaction_id,
                    waited_millis: timeout.as_millis() as u64,
                });
            }
            sleep(interval).await;
        }
    }

    /// Submit, then wait up to the configured confirmation timeout.
    pub async fn submit_and_wait(&self, transaction: &SignedTransaction) -> Result<(TransactionId, TransactionStatus)> {
        let transaction_id = self.submit(transaction).await?;
        let timeout = Duration::from_secs(self.config.confirmation_timeout_secs);
        let status = self.await_confirmation(&transaction_id, timeout).await?;
        Ok((transaction_id, status))
    }
}
