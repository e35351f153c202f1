use alloy_primitives::{Address, B256, U256};
use serde::{Deserialize, Serialize};

use crate::digest::swap_digest;

/// One side of a bilateral swap offer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwapInfo {
    /// Account that owns this side of the trade.
    pub party: Address,

    /// Token contract this side is offering.
    pub token: Address,

    /// Amount of `token` on offer.
    pub token_amount: U256,
}

impl SwapInfo {
    pub fn new(party: Address, token: Address, token_amount: U256) -> Self {
        Self {
            party,
            token,
            token_amount,
        }
    }
}

/// Ordered pair of swap sides.
///
/// Side order is part of the contract: it fixes the digest layout and which
/// party may initiate. Exchanging the sides yields a different order with a
/// different digest, not an equivalent one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwapOrder {
    pub side_a: SwapInfo,
    pub side_b: SwapInfo,
}

impl SwapOrder {
    pub fn new(side_a: SwapInfo, side_b: SwapInfo) -> Self {
        Self { side_a, side_b }
    }

    /// Digest both parties sign and the escrow recomputes on-chain.
    pub fn digest(&self) -> B256 {
        swap_digest(&self.side_a, &self.side_b)
    }

    /// The same terms with the sides exchanged.
    pub fn reversed(&self) -> Self {
        Self {
            side_a: self.side_b,
            side_b: self.side_a,
        }
    }
}

/// Escrow-side lifecycle of one recorded order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SwapPhase {
    /// Side A's funds are escrowed; waiting on side B.
    Initiated,

    /// Both legs settled. Terminal.
    Completed,
}
