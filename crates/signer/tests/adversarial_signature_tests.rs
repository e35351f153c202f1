//! Adversarial tests for the swap signature scheme.
//!
//! These simulate the ways a signature could be misused around the escrow's
//! authorization checks:
//! - reusing a signature for different swap terms
//! - reusing a signature with the sides reversed
//! - submitting a third party's signature as someone else's
//! - bit-level tampering with r, s, or the recovery byte

use alloy_primitives::{Address, B256, U256};
use swaplab_signer::{recover, LocalWallet, Signature, Signer};
use swaplab_types::{swap_digest, SwapInfo, SwapOrder};

fn order_for(wallet: &LocalWallet) -> SwapOrder {
    SwapOrder::new(
        SwapInfo::new(wallet.address(), Address::repeat_byte(0xaa), U256::from(100u64)),
        SwapInfo::new(Address::repeat_byte(0x22), Address::repeat_byte(0xbb), U256::from(50u64)),
    )
}

// ═══════════════════════════════════════════════════════════════════════════
// SIGNATURE REUSE ACROSS TERMS
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn signature_does_not_transfer_to_other_terms() {
    let wallet = LocalWallet::random();
    let order = order_for(&wallet);
    let signature = wallet.sign_order(&order).unwrap();

    // Same side B, different side A terms: different digest, so recovery
    // yields some other address (or fails), never the signer.
    let mut other_side_a = order.side_a;
    other_side_a.token_amount = U256::from(1u64);
    let foreign_digest = swap_digest(&other_side_a, &order.side_b);

    match recover(foreign_digest, &signature) {
        Ok(recovered) => assert_ne!(recovered, wallet.address()),
        Err(_) => {}
    }
}

#[test]
fn signature_does_not_transfer_to_reversed_order() {
    let wallet = LocalWallet::random();
    let order = order_for(&wallet);
    let signature = wallet.sign_order(&order).unwrap();

    match recover(order.reversed().digest(), &signature) {
        Ok(recovered) => assert_ne!(recovered, wallet.address()),
        Err(_) => {}
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// IMPERSONATION
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn third_party_signature_recovers_to_third_party() {
    let initiator = LocalWallet::random();
    let impostor = LocalWallet::random();
    let order = order_for(&initiator);

    let forged = impostor.sign_order(&order).unwrap();
    let recovered = recover(order.digest(), &forged).unwrap();
    assert_eq!(recovered, impostor.address());
    assert_ne!(recovered, initiator.address());
}

// ═══════════════════════════════════════════════════════════════════════════
// BIT-LEVEL TAMPERING
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn tampered_signature_bytes_do_not_recover_to_signer() {
    let wallet = LocalWallet::random();
    let order = order_for(&wallet);
    let signature = wallet.sign_order(&order).unwrap();

    for index in [0usize, 31, 32, 63] {
        let mut bytes = signature.to_vec();
        bytes[index] ^= 0x01;
        let Ok(tampered) = Signature::from_bytes(&bytes) else {
            continue;
        };
        match recover(order.digest(), &tampered) {
            Ok(recovered) => assert_ne!(recovered, wallet.address()),
            Err(_) => {}
        }
    }
}

#[test]
fn flipped_recovery_byte_changes_the_recovered_address() {
    let wallet = LocalWallet::random();
    let digest = B256::repeat_byte(0x3c);
    let signature = wallet.sign_digest(digest).unwrap();

    let mut bytes = signature.to_vec();
    bytes[64] = if bytes[64] == 27 { 28 } else { 27 };
    let flipped = Signature::from_bytes(&bytes).unwrap();

    match recover(digest, &flipped) {
        Ok(recovered) => assert_ne!(recovered, wallet.address()),
        Err(_) => {}
    }
}

#[test]
fn malformed_wire_signatures_are_rejected_up_front() {
    assert!(Signature::from_bytes(&[]).is_err());
    assert!(Signature::from_bytes(&[0u8; 65]).is_err());
    assert!(Signature::from_bytes(&[0x11; 70]).is_err());
}
