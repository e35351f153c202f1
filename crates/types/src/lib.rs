pub mod abi;
pub mod calls;
pub mod digest;
pub mod swap;

pub use digest::*;
pub use swap::*;

pub use alloy_primitives::{Address, B256, U256};
