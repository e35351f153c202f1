//! Fixed-width call encoding: 32-byte words and 4-byte function selectors.
//!
//! Every scalar crossing the contract boundary travels as one 32-byte word:
//! addresses left-padded with zeroes, unsigned integers big-endian. The
//! helpers here are shared by the calldata builders and by the in-memory
//! ledger double that decodes them back.

use alloy_primitives::{Address, B256, U256};
use sha3::{Digest, Keccak256};

/// Width of one encoded word in bytes.
pub const WORD: usize = 32;

/// Keccak-256 hash of an arbitrary byte string.
pub fn keccak256(data: &[u8]) -> B256 {
    let mut hasher = Keccak256::new();
    hasher.update(data);
    B256::from_slice(&hasher.finalize())
}

/// Encode an address as a left-padded 32-byte word.
pub fn address_word(addr: Address) -> [u8; WORD] {
    let mut word = [0u8; WORD];
    word[12..].copy_from_slice(addr.as_slice());
    word
}

/// Encode a 256-bit unsigned integer as a big-endian 32-byte word.
pub fn u256_word(value: U256) -> [u8; WORD] {
    value.to_be_bytes::<WORD>()
}

/// First four bytes of the keccak-256 hash of a function signature string.
pub fn selector(signature: &str) -> [u8; 4] {
    let hash = keccak256(signature.as_bytes());
    [hash[0], hash[1], hash[2], hash[3]]
}

/// Decode the trailing 20 bytes of a word as an address.
pub fn word_to_address(word: &[u8]) -> Option<Address> {
    if word.len() < WORD {
        return None;
    }
    Some(Address::from_slice(&word[12..WORD]))
}

/// Decode a big-endian word as a 256-bit unsigned integer.
pub fn word_to_u256(word: &[u8]) -> Option<U256> {
    if word.len() < WORD {
        return None;
    }
    Some(U256::from_be_slice(&word[..WORD]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keccak256_matches_known_vector() {
        let empty = keccak256(b"");
        assert_eq!(
            hex::encode(empty),
            "c5d2460186f7233c927e7db2dcc703c0e500b653ca82273b7bfad8045d85a470"
        );
    }

    #[test]
    fn selector_matches_known_erc20_values() {
        assert_eq!(selector("transfer(address,uint256)"), [0xa9, 0x05, 0x9c, 0xbb]);
        assert_eq!(selector("approve(address,uint256)"), [0x09, 0x5e, 0xa7, 0xb3]);
        assert_eq!(selector("balanceOf(address)"), [0x70, 0xa0, 0x82, 0x31]);
    }

    #[test]
    fn address_word_left_pads() {
        let addr = Address::repeat_byte(0xab);
        let word = address_word(addr);
        assert_eq!(&word[..12], &[0u8; 12]);
        assert_eq!(&word[12..], addr.as_slice());
        assert_eq!(word_to_address(&word), Some(addr));
    }

    #[test]
    fn u256_word_round_trips() {
        let value = U256::from(1_000_000u64);
        let word = u256_word(value);
        assert_eq!(word_to_u256(&word), Some(value));
        assert_eq!(u256_word(U256::ZERO), [0u8; 32]);
        assert_eq!(u256_word(U256::MAX), [0xff; 32]);
    }
}
