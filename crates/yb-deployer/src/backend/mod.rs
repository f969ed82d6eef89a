//! The signer/provider capabilities the sequencer consumes.

use std::{future::Future, time::Duration};

use alloy_primitives::{Address, Bytes, TxHash};
use serde::Serialize;

use crate::Result;

mod rpc;
pub use rpc::*;

/// A transaction from the deployer, before signing.
///
/// The nonce is always explicit: the sequencer decides which nonce each transaction consumes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnsignedTx {
    /// Call target, `None` for contract creation
    pub to: Option<Address>,
    /// Calldata or init code
    pub input: Bytes,
    /// Nonce the transaction consumes
    pub nonce: u64,
}

impl UnsignedTx {
    /// A message call to `to`.
    pub const fn call(to: Address, input: Bytes, nonce: u64) -> Self {
        Self { to: Some(to), input, nonce }
    }

    /// A contract creation with the given init code.
    pub const fn create(init_code: Bytes, nonce: u64) -> Self {
        Self { to: None, input: init_code, nonce }
    }

    /// Whether this transaction creates a contract.
    pub const fn is_create(&self) -> bool {
        self.to.is_none()
    }
}

/// The parts of a transaction receipt the sequencer cares about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TxReceipt {
    /// Transaction hash
    pub tx_hash: TxHash,
    /// Block the transaction was included in
    pub block_number: Option<u64>,
    /// Whether execution succeeded
    pub success: bool,
    /// Address of the created contract, for creations
    pub contract_address: Option<Address>,
}

/// Capabilities of a connected deployer account.
///
/// Implementations surface unreachable nodes as
/// [`DeployError::Provider`](crate::DeployError::Provider), network-level rejections as
/// [`DeployError::TransactionRejected`](crate::DeployError::TransactionRejected) and expired
/// waits as [`DeployError::ConfirmationTimeout`](crate::DeployError::ConfirmationTimeout).
pub trait ChainBackend: Send + Sync {
    /// Address of the signing account.
    fn deployer(&self) -> Address;

    /// Chain id reported by the node.
    fn chain_id(&self) -> impl Future<Output = Result<u64>> + Send;

    /// The deployer's pending transaction count, i.e. the nonce its next transaction consumes.
    fn transaction_count(&self) -> impl Future<Output = Result<u64>> + Send;

    /// Signs and submits `tx`, returning its hash once the node accepted it.
    fn send_transaction(&self, tx: UnsignedTx) -> impl Future<Output = Result<TxHash>> + Send;

    /// Blocks until `tx_hash` is included and buried under `confirmations - 1` further blocks,
    /// or `timeout` elapses.
    fn wait_for_confirmations(
        &self,
        tx_hash: TxHash,
        confirmations: u64,
        timeout: Duration,
    ) -> impl Future<Output = Result<TxReceipt>> + Send;
}
