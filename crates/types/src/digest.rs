//! Canonical digest over swap terms.

use alloy_primitives::B256;
use sha3::{Digest, Keccak256};

use crate::abi::{address_word, u256_word};
use crate::swap::SwapInfo;

/// Keccak-256 over the four swap scalars `(tokenA, amountA, tokenB, amountB)`,
/// each encoded as one 32-byte word, concatenated in exactly that order.
///
/// The escrow recomputes this hash on-chain from the submitted sides, so the
/// byte layout here is load-bearing: field order and word width must never
/// change independently of the contract.
pub fn swap_digest(side_a: &SwapInfo, side_b: &SwapInfo) -> B256 {
    let mut hasher = Keccak256::new();
    hasher.update(address_word(side_a.token));
    hasher.update(u256_word(side_a.token_amount));
    hasher.update(address_word(side_b.token));
    hasher.update(u256_word(side_b.token_amount));
    let hash: [u8; 32] = hasher.finalize().into();
    B256::from(hash)
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::{Address, U256};

    fn side(party: u8, token: u8, amount: u64) -> SwapInfo {
        SwapInfo::new(
            Address::repeat_byte(party),
            Address::repeat_byte(token),
            U256::from(amount),
        )
    }

    #[test]
    fn digest_is_deterministic() {
        let a = side(0x11, 0xaa, 100);
        let b = side(0x22, 0xbb, 50);
        assert_eq!(swap_digest(&a, &b), swap_digest(&a, &b));
    }

    #[test]
    fn digest_depends_on_side_order() {
        let a = side(0x11, 0xaa, 100);
        let b = side(0x22, 0xbb, 50);
        assert_ne!(swap_digest(&a, &b), swap_digest(&b, &a));
    }

    #[test]
    fn digest_ignores_party_but_not_terms() {
        let a = side(0x11, 0xaa, 100);
        let b = side(0x22, 0xbb, 50);

        // The party is authenticated by sender or signature, not hashed.
        let mut a_other_party = a;
        a_other_party.party = Address::repeat_byte(0x33);
        assert_eq!(swap_digest(&a, &b), swap_digest(&a_other_party, &b));

        let mut a_other_amount = a;
        a_other_amount.token_amount = U256::from(101u64);
        assert_ne!(swap_digest(&a, &b), swap_digest(&a_other_amount, &b));

        let mut b_other_token = b;
        b_other_token.token = Address::repeat_byte(0xcc);
        assert_ne!(swap_digest(&a, &b), swap_digest(&a, &b_other_token));
    }

    #[test]
    fn digest_matches_manual_encoding() {
        let a = side(0x11, 0xaa, 100);
        let b = side(0x22, 0xbb, 50);

        let mut buf = Vec::with_capacity(128);
        buf.extend_from_slice(&address_word(a.token));
        buf.extend_from_slice(&u256_word(a.token_amount));
        buf.extend_from_slice(&address_word(b.token));
        buf.extend_from_slice(&u256_word(b.token_amount));
        assert_eq!(buf.len(), 128);

        let mut hasher = Keccak256::new();
        hasher.update(&buf);
        let expected: [u8; 32] = hasher.finalize().into();
        assert_eq!(swap_digest(&a, &b), B256::from(expected));
    }
}
