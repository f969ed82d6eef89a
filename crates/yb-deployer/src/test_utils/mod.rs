//! Test utilities for driving the sequencer without a node.

mod chain;
pub use chain::*;

use alloy_primitives::{address, bytes, Address, Bytes};

use crate::ContractFactory;

/// Hardhat account #0, the default mock deployer.
pub const TEST_DEPLOYER: Address = address!("f39fd6e51aad88f6f4ce6ab8827279cfffb92266");

/// Chain id reported by [`MockChain`] unless overridden (Blast Sepolia).
pub const TEST_CHAIN_ID: u64 = 168587773;

/// Stand-in creation code; never executed by the mock.
pub const TEST_BYTECODE: Bytes = bytes!("6080604052348015600f57600080fd5b50603f80601d6000396000f3fe");

/// A factory over [`TEST_BYTECODE`].
pub fn test_factory() -> ContractFactory {
    ContractFactory::new(TEST_BYTECODE).expect("test bytecode is not empty")
}
