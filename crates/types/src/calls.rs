//! Calldata vocabulary for the exercise's token and escrow contracts.
//!
//! Encoders build the exact byte strings submitted on-chain; the matching
//! decoders exist so a ledger double can dispatch on the same layout. Both
//! directions live here to keep them from drifting apart.

use alloy_primitives::U256;

use crate::abi::{self, WORD};
use crate::swap::SwapInfo;

fn encode_call(signature: &str, words: &[[u8; WORD]]) -> Vec<u8> {
    let mut data = Vec::with_capacity(4 + words.len() * WORD);
    data.extend_from_slice(&abi::selector(signature));
    for word in words {
        data.extend_from_slice(word);
    }
    data
}

/// Append a dynamic `bytes` tail: length word, payload, zero padding to a
/// word boundary.
fn push_bytes_tail(out: &mut Vec<u8>, payload: &[u8]) {
    out.extend_from_slice(&abi::u256_word(U256::from(payload.len())));
    out.extend_from_slice(payload);
    let rem = payload.len() % WORD;
    if rem != 0 {
        out.resize(out.len() + WORD - rem, 0);
    }
}

fn swap_info_words(side: &SwapInfo) -> [[u8; WORD]; 3] {
    [
        abi::address_word(side.party),
        abi::address_word(side.token),
        abi::u256_word(side.token_amount),
    ]
}

fn decode_swap_info(data: &[u8]) -> Option<SwapInfo> {
    if data.len() < 3 * WORD {
        return None;
    }
    Some(SwapInfo {
        party: abi::word_to_address(&data[..WORD])?,
        token: abi::word_to_address(&data[WORD..2 * WORD])?,
        token_amount: abi::word_to_u256(&data[2 * WORD..3 * WORD])?,
    })
}

/// Read a dynamic `bytes` argument given the offset word's position.
fn decode_bytes_arg(args: &[u8], offset_slot: usize) -> Option<Vec<u8>> {
    let offset_word = args.get(offset_slot * WORD..(offset_slot + 1) * WORD)?;
    let offset = usize::try_from(abi::word_to_u256(offset_word)?).ok()?;
    let len_word = args.get(offset..offset.checked_add(WORD)?)?;
    let len = usize::try_from(abi::word_to_u256(len_word)?).ok()?;
    let start = offset + WORD;
    args.get(start..start.checked_add(len)?).map(<[u8]>::to_vec)
}

/// Standard token interface: transfers, allowances, balance queries.
pub mod erc20 {
    use alloy_primitives::{Address, U256};

    use super::{encode_call, WORD};
    use crate::abi;

    pub const TRANSFER: &str = "transfer(address,uint256)";
    pub const APPROVE: &str = "approve(address,uint256)";
    pub const TRANSFER_FROM: &str = "transferFrom(address,address,uint256)";
    pub const BALANCE_OF: &str = "balanceOf(address)";

    pub fn transfer(to: Address, amount: U256) -> Vec<u8> {
        encode_call(TRANSFER, &[abi::address_word(to), abi::u256_word(amount)])
    }

    pub fn approve(spender: Address, amount: U256) -> Vec<u8> {
        encode_call(APPROVE, &[abi::address_word(spender), abi::u256_word(amount)])
    }

    pub fn transfer_from(from: Address, to: Address, amount: U256) -> Vec<u8> {
        encode_call(
            TRANSFER_FROM,
            &[
                abi::address_word(from),
                abi::address_word(to),
                abi::u256_word(amount),
            ],
        )
    }

    pub fn balance_of(owner: Address) -> Vec<u8> {
        encode_call(BALANCE_OF, &[abi::address_word(owner)])
    }

    /// A decoded token call, for ledger doubles dispatching on calldata.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum TokenCall {
        Transfer { to: Address, amount: U256 },
        Approve { spender: Address, amount: U256 },
        TransferFrom { from: Address, to: Address, amount: U256 },
        BalanceOf { owner: Address },
    }

    impl TokenCall {
        pub fn decode(data: &[u8]) -> Option<Self> {
            let (sel, args) = data.split_at_checked(4)?;
            let word = |slot: usize| args.get(slot * WORD..(slot + 1) * WORD);

            if sel == abi::selector(TRANSFER) {
                Some(Self::Transfer {
                    to: abi::word_to_address(word(0)?)?,
                    amount: abi::word_to_u256(word(1)?)?,
                })
            } else if sel == abi::selector(APPROVE) {
                Some(Self::Approve {
                    spender: abi::word_to_address(word(0)?)?,
                    amount: abi::word_to_u256(word(1)?)?,
                })
            } else if sel == abi::selector(TRANSFER_FROM) {
                Some(Self::TransferFrom {
                    from: abi::word_to_address(word(0)?)?,
                    to: abi::word_to_address(word(1)?)?,
                    amount: abi::word_to_u256(word(2)?)?,
                })
            } else if sel == abi::selector(BALANCE_OF) {
                Some(Self::BalanceOf {
                    owner: abi::word_to_address(word(0)?)?,
                })
            } else {
                None
            }
        }
    }
}

/// The escrow's four authorization entry points plus its one read query.
pub mod escrow {
    use alloy_primitives::B256;

    use super::{
        decode_bytes_arg, decode_swap_info, encode_call, push_bytes_tail, swap_info_words, WORD,
    };
    use crate::abi;
    use crate::swap::{SwapInfo, SwapOrder};

    pub const INITIATE_SWAP: &str =
        "initiateSwap((address,address,uint256),(address,address,uint256))";
    pub const INITIATE_SWAP_WITH_SIG: &str =
        "initiateSwapWithSig((address,address,uint256),(address,address,uint256),bytes)";
    pub const COMPLETE_SWAP: &str = "completeSwap((address,address,uint256))";
    pub const COMPLETE_SWAP_BY_SIG: &str = "completeSwapBySig((address,address,uint256),bytes)";
    pub const GET_SECRET_KEY_HASH: &str = "getSecretKeyHash()";

    pub fn initiate_swap(order: &SwapOrder) -> Vec<u8> {
        let mut words = Vec::with_capacity(6);
        words.extend_from_slice(&swap_info_words(&order.side_a));
        words.extend_from_slice(&swap_info_words(&order.side_b));
        encode_call(INITIATE_SWAP, &words)
    }

    pub fn initiate_swap_with_sig(order: &SwapOrder, signature: &[u8]) -> Vec<u8> {
        let mut words = Vec::with_capacity(7);
        words.extend_from_slice(&swap_info_words(&order.side_a));
        words.extend_from_slice(&swap_info_words(&order.side_b));
        // Two inline tuples plus this offset word make up the head.
        words.push(abi::u256_word(alloy_primitives::U256::from(7 * WORD)));
        let mut data = encode_call(INITIATE_SWAP_WITH_SIG, &words);
        push_bytes_tail(&mut data, signature);
        data
    }

    pub fn complete_swap(side_a: &SwapInfo) -> Vec<u8> {
        encode_call(COMPLETE_SWAP, &swap_info_words(side_a))
    }

    pub fn complete_swap_by_sig(side_a: &SwapInfo, signature: &[u8]) -> Vec<u8> {
        let mut words = Vec::with_capacity(4);
        words.extend_from_slice(&swap_info_words(side_a));
        words.push(abi::u256_word(alloy_primitives::U256::from(4 * WORD)));
        let mut data = encode_call(COMPLETE_SWAP_BY_SIG, &words);
        push_bytes_tail(&mut data, signature);
        data
    }

    pub fn get_secret_key_hash() -> Vec<u8> {
        abi::selector(GET_SECRET_KEY_HASH).to_vec()
    }

    /// Constructor arguments `(string secret, bytes32 secretHash)`, encoded
    /// for appending to the creation bytecode (and for source verification).
    pub fn constructor_args(secret: &str, secret_hash: B256) -> Vec<u8> {
        let mut data = Vec::new();
        data.extend_from_slice(&abi::u256_word(alloy_primitives::U256::from(2 * WORD)));
        data.extend_from_slice(secret_hash.as_slice());
        push_bytes_tail(&mut data, secret.as_bytes());
        data
    }

    /// Inverse of [`constructor_args`], for doubles that parse deployments.
    pub fn decode_constructor_args(data: &[u8]) -> Option<(String, B256)> {
        let hash_word = data.get(WORD..2 * WORD)?;
        let secret_hash = B256::from_slice(hash_word);
        let secret_bytes = super::decode_bytes_arg(data, 0)?;
        let secret = String::from_utf8(secret_bytes).ok()?;
        Some((secret, secret_hash))
    }

    /// A decoded escrow call, for ledger doubles dispatching on calldata.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum EscrowCall {
        Initiate(SwapOrder),
        InitiateWithSig(SwapOrder, Vec<u8>),
        Complete(SwapInfo),
        CompleteBySig(SwapInfo, Vec<u8>),
        SecretKeyHash,
    }

    impl EscrowCall {
        pub fn decode(data: &[u8]) -> Option<Self> {
            let (sel, args) = data.split_at_checked(4)?;

            if sel == abi::selector(INITIATE_SWAP) {
                let order = decode_order(args)?;
                Some(Self::Initiate(order))
            } else if sel == abi::selector(INITIATE_SWAP_WITH_SIG) {
                let order = decode_order(args)?;
                let sig = decode_bytes_arg(args, 6)?;
                Some(Self::InitiateWithSig(order, sig))
            } else if sel == abi::selector(COMPLETE_SWAP) {
                Some(Self::Complete(decode_swap_info(args)?))
            } else if sel == abi::selector(COMPLETE_SWAP_BY_SIG) {
                let side_a = decode_swap_info(args)?;
                let sig = decode_bytes_arg(args, 3)?;
                Some(Self::CompleteBySig(side_a, sig))
            } else if sel == abi::selector(GET_SECRET_KEY_HASH) {
                Some(Self::SecretKeyHash)
            } else {
                None
            }
        }
    }

    fn decode_order(args: &[u8]) -> Option<SwapOrder> {
        let side_a = decode_swap_info(args)?;
        let side_b = decode_swap_info(args.get(3 * WORD..)?)?;
        Some(SwapOrder::new(side_a, side_b))
    }
}
