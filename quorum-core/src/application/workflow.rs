use crate::domain::{MultisigPolicy, RawTransaction, TransferCall};
use crate::foundation::util::time::now_secs;
use crate::foundation::{AccountId, Result};
use crate::infrastructure::config::TransactionDefaults;
use crate::infrastructure::rpc::{AccountState, LedgerRpc};
use futures_util::future::try_join_all;
use log::debug;

/// Next sequence number to use for `account`, read from the query boundary.
/// Never part of the signing or verification core.
pub async fn next_sequence_number(rpc: &dyn LedgerRpc, account: &AccountId) -> Result<u64> {
    Ok(rpc.account_state(account).await?.sequence_number)
}

/// Fetches the state of several accounts concurrently (fan-out/gather).
///
/// The queries share no mutable state, so they run in parallel outright and
/// results come back in input order.
pub async fn gather_account_states(rpc: &dyn LedgerRpc, accounts: &[AccountId]) -> Result<Vec<AccountState>> {
    try_join_all(accounts.iter().map(|account| rpc.account_state(account))).await
}

/// Assembles a transfer transaction for a policy-held account: chain id and
/// sequence number come from the ledger, expiration is the configured TTL
/// from now, expressed as an absolute timestamp.
pub async fn build_transfer(
    rpc: &dyn LedgerRpc,
    policy: &MultisigPolicy,
    recipient: AccountId,
    amount: u64,
    defaults: &TransactionDefaults,
) -> Result<RawTransaction> {
    let sender = policy.account_id();
    let chain_id = rpc.chain_id().await?;
    let sequence_number = next_sequence_number(rpc, &sender).await?;
    debug!("building transfer of {amount} from {sender} (seq {sequence_number}, chain {chain_id})");
    Ok(RawTransaction {
        sender,
        sequence_number,
        payload: TransferCall { recipient, amount }.to_payload_bytes(),
        max_gas: defaults.max_gas,
        gas_price: defaults.gas_price,
        expiration_secs: now_secs().saturating_add(defaults.expiration_ttl_secs),
        chain_id,
    })
}
