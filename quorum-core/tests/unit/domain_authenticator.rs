use crate::fixtures::{authenticator_from, policy_2_of_3, recipient_account, three_holders, transfer_transaction, TEST_TRANSFER_AMOUNT};
use quorum_core::domain::{AggregateSignature, Authenticator, SignerBitmap, TransferCall};
use quorum_core::foundation::ErrorCode;

#[test]
fn two_of_three_verifies_with_alice_and_bob() {
    let holders = three_holders();
    let policy = policy_2_of_3(&holders);
    let transaction = transfer_transaction(policy.account_id(), recipient_account());
    let authenticator = authenticator_from(&policy, &transaction, &[(0, &holders[0]), (1, &holders[1])]);
    authenticator.verify(&transaction.signing_message()).expect("alice + bob");
}

#[test]
fn two_of_three_verifies_with_alice_and_chad() {
    let holders = three_holders();
    let policy = policy_2_of_3(&holders);
    let transaction = transfer_transaction(policy.account_id(), recipient_account());
    let authenticator = authenticator_from(&policy, &transaction, &[(0, &holders[0]), (2, &holders[2])]);
    authenticator.verify(&transaction.signing_message()).expect("alice + chad");
}

#[test]
fn test_verify_when_only_one_signer_then_threshold_not_met() {
    let holders = three_holders();
    let policy = policy_2_of_3(&holders);
    let transaction = transfer_transaction(policy.account_id(), recipient_account());

    let message = transaction.signing_message();
    let bitmap = {
        let mut bitmap = SignerBitmap::new();
        bitmap.insert(0);
        bitmap
    };
    let aggregate = AggregateSignature::new(bitmap, vec![holders[0].sign(&message)]).expect("aggregate");
    let authenticator = Authenticator::new(policy, aggregate).expect("authenticator");

    let err = authenticator.verify(&message).expect_err("1 of 2 required");
    assert_eq!(err.code(), ErrorCode::ThresholdNotMet);
}

#[test]
fn test_verify_when_any_signature_bit_flipped_then_rejected() {
    let holders = three_holders();
    let policy = policy_2_of_3(&holders);
    let transaction = transfer_transaction(policy.account_id(), recipient_account());
    let message = transaction.signing_message();

    // Deterministic sweep of single-bit corruptions across both signatures.
    let mut state = 0xdead_beef_cafe_f00du64;
    let mut next = move || {
        state = state.wrapping_mul(6364136223846793005).wrapping_add(1);
        state
    };
    for _ in 0..40 {
        let mut signatures = vec![holders[0].sign(&message), holders[1].sign(&message)];
        let victim = (next() % 2) as usize;
        let mut bytes = signatures[victim].to_bytes();
        let byte = (next() % bytes.len() as u64) as usize;
        bytes[byte] ^= 1 << (next() % 8);
        signatures[victim] = ed25519_dalek::Signature::from_bytes(&bytes);

        let mut bitmap = SignerBitmap::new();
        bitmap.insert(0);
        bitmap.insert(1);
        let aggregate = AggregateSignature::new(bitmap, signatures).expect("aggregate");
        let authenticator = Authenticator::new(policy.clone(), aggregate).expect("authenticator");
        let err = authenticator.verify(&message).expect_err("corrupted signature");
        assert_eq!(err.code(), ErrorCode::SignatureMismatch);
    }
}

#[test]
fn test_verify_when_transaction_tampered_after_signing_then_rejected() {
    let holders = three_holders();
    let policy = policy_2_of_3(&holders);
    let original = transfer_transaction(policy.account_id(), recipient_account());
    let authenticator = authenticator_from(&policy, &original, &[(0, &holders[0]), (1, &holders[1])]);

    // Same structure, different amount: authorization is bound to exact bytes.
    let mut tampered = original.clone();
    tampered.payload = TransferCall { recipient: recipient_account(), amount: TEST_TRANSFER_AMOUNT * 1_000 }.to_payload_bytes();

    authenticator.verify(&original.signing_message()).expect("original authorizes");
    let err = authenticator.verify(&tampered.signing_message()).expect_err("tampered payload");
    assert_eq!(err.code(), ErrorCode::SignatureMismatch);
}

#[test]
fn authenticator_rederives_the_policy_account() {
    let holders = three_holders();
    let policy = policy_2_of_3(&holders);
    let transaction = transfer_transaction(policy.account_id(), recipient_account());
    let authenticator = authenticator_from(&policy, &transaction, &[(0, &holders[0]), (1, &holders[1])]);
    assert_eq!(authenticator.account_id(), policy.account_id());
}

#[test]
fn wire_format_round_trips_and_still_verifies() {
    let holders = three_holders();
    let policy = policy_2_of_3(&holders);
    let transaction = transfer_transaction(policy.account_id(), recipient_account());
    let authenticator = authenticator_from(&policy, &transaction, &[(0, &holders[0]), (2, &holders[2])]);

    let bytes = authenticator.to_bytes();
    let decoded = Authenticator::from_bytes(&bytes).expect("decode");
    assert_eq!(decoded, authenticator);
    decoded.verify(&transaction.signing_message()).expect("decoded authenticator verifies");
}

#[test]
fn test_wire_decode_when_structure_is_inconsistent_then_encoding_mismatch() {
    let holders = three_holders();
    let policy = policy_2_of_3(&holders);
    let transaction = transfer_transaction(policy.account_id(), recipient_account());
    let authenticator = authenticator_from(&policy, &transaction, &[(0, &holders[0]), (1, &holders[1])]);
    let bytes = authenticator.to_bytes();

    // Unknown scheme tag.
    let mut bad_scheme = bytes.clone();
    bad_scheme[0] = 0x7f;
    assert_eq!(Authenticator::from_bytes(&bad_scheme).expect_err("scheme").code(), ErrorCode::EncodingMismatch);

    // Extra bitmap bit without a matching signature. The bitmap starts after
    // scheme (1) + key count (4) + keys (3 * 32) + threshold (1).
    let bitmap_offset = 1 + 4 + 3 * 32 + 1;
    let mut extra_bit = bytes.clone();
    extra_bit[bitmap_offset] |= 0b0010_0000;
    assert_eq!(Authenticator::from_bytes(&extra_bit).expect_err("count divergence").code(), ErrorCode::EncodingMismatch);

    // Bitmap index beyond the declared key list.
    let mut foreign_index = bytes.clone();
    foreign_index[bitmap_offset] = 0b1001_0000;
    assert_eq!(Authenticator::from_bytes(&foreign_index).expect_err("index out of range").code(), ErrorCode::EncodingMismatch);

    // Truncation and trailing garbage.
    assert_eq!(Authenticator::from_bytes(&bytes[..bytes.len() - 3]).expect_err("truncated").code(), ErrorCode::EncodingMismatch);
    let mut trailing = bytes.clone();
    trailing.push(0);
    assert_eq!(Authenticator::from_bytes(&trailing).expect_err("trailing").code(), ErrorCode::EncodingMismatch);
}
