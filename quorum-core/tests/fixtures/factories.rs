#![allow(dead_code)]

use crate::fixtures::{TEST_CHAIN_ID, TEST_FAR_EXPIRATION_SECS, TEST_GAS_PRICE, TEST_MAX_GAS, TEST_TRANSFER_AMOUNT};
use quorum_core::domain::{Authenticator, MultisigPolicy, RawTransaction, SignatureCollector, SignedTransaction, TransferCall};
use quorum_core::foundation::{AccountId, SigningKeypair};

pub fn keypair(seed: u8) -> SigningKeypair {
    SigningKeypair::from_secret_bytes(&[seed; 32]).expect("test keypair")
}

/// Alice, Bob, and Chad - policy indices 0, 1, 2.
pub fn three_holders() -> Vec<SigningKeypair> {
    vec![keypair(1), keypair(2), keypair(3)]
}

pub fn policy_2_of_3(holders: &[SigningKeypair]) -> MultisigPolicy {
    MultisigPolicy::new(holders.iter().map(|holder| holder.public_key()).collect(), 2).expect("2-of-3 policy")
}

pub fn recipient_account() -> AccountId {
    AccountId::new([0x7c; 32])
}

pub fn transfer_transaction(sender: AccountId, recipient: AccountId) -> RawTransaction {
    RawTransaction {
        sender,
        sequence_number: 0,
        payload: TransferCall { recipient, amount: TEST_TRANSFER_AMOUNT }.to_payload_bytes(),
        max_gas: TEST_MAX_GAS,
        gas_price: TEST_GAS_PRICE,
        expiration_secs: TEST_FAR_EXPIRATION_SECS,
        chain_id: TEST_CHAIN_ID,
    }
}

/// Collects signatures from the given `(signer_index, holder)` pairs and
/// assembles the authenticator.
pub fn authenticator_from(
    policy: &MultisigPolicy,
    transaction: &RawTransaction,
    signers: &[(u8, &SigningKeypair)],
) -> Authenticator {
    let collector = SignatureCollector::new(policy.clone(), transaction);
    for (signer_index, holder) in signers {
        let signature = holder.sign(collector.signing_message());
        collector.add_signature(*signer_index, signature).expect("add signature");
    }
    collector.into_authenticator().expect("assemble authenticator")
}

pub fn signed_transfer(
    policy: &MultisigPolicy,
    transaction: RawTransaction,
    signers: &[(u8, &SigningKeypair)],
) -> SignedTransaction {
    let authenticator = authenticator_from(policy, &transaction, signers);
    SignedTransaction::new(transaction, authenticator)
}
