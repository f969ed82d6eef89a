use std::{str::FromStr, time::Duration};

use alloy_network::{EthereumWallet, ReceiptResponse, TransactionBuilder};
use alloy_primitives::{Address, TxHash};
use alloy_provider::{
    PendingTransactionBuilder, PendingTransactionError, Provider, ProviderBuilder, WatchTxError,
};
use alloy_rpc_types_eth::TransactionRequest;
use alloy_signer_local::PrivateKeySigner;
use alloy_transport::{RpcError, TransportError};
use tracing::{debug, trace};

use super::{ChainBackend, TxReceipt, UnsignedTx};
use crate::{DeployError, Result};

/// [`ChainBackend`] over a JSON-RPC node through an alloy provider with a signing wallet.
#[derive(Debug, Clone)]
pub struct RpcBackend<P> {
    provider: P,
    deployer: Address,
}

impl<P: Provider> RpcBackend<P> {
    /// Wraps a provider whose wallet signs for `deployer`.
    pub const fn new(provider: P, deployer: Address) -> Self {
        Self { provider, deployer }
    }

    /// The underlying provider.
    pub const fn provider(&self) -> &P {
        &self.provider
    }
}

/// Connects to `rpc` over HTTP, signing with the hex-encoded `private_key`.
pub fn connect_http(rpc: &str, private_key: &str) -> Result<RpcBackend<impl Provider + Clone>> {
    let signer = PrivateKeySigner::from_str(private_key.trim())
        .map_err(|e| DeployError::config(format!("invalid deployer private key: {e}")))?;
    let deployer = signer.address();
    let url = rpc.parse().map_err(|e| DeployError::config(format!("invalid RPC URL '{rpc}': {e}")))?;

    let provider = ProviderBuilder::new().wallet(EthereumWallet::from(signer)).on_http(url);
    debug!(%deployer, rpc, "Connected deployer wallet");
    Ok(RpcBackend::new(provider, deployer))
}

/// Maps a failed read to [`DeployError::Provider`].
fn read_error(what: &str, err: TransportError) -> DeployError {
    DeployError::Provider(format!("{what}: {err}"))
}

/// A JSON-RPC error response to a submission means the node refused the transaction; anything
/// else means the node could not be reached.
fn submit_error(err: TransportError) -> DeployError {
    match err {
        RpcError::ErrorResp(payload) => DeployError::TransactionRejected(payload.message.to_string()),
        other => DeployError::Provider(format!("failed to submit transaction: {other}")),
    }
}

fn watch_error(tx_hash: TxHash, confirmations: u64, err: PendingTransactionError) -> DeployError {
    match err {
        PendingTransactionError::TxWatcher(WatchTxError::Timeout) => {
            DeployError::ConfirmationTimeout { tx_hash, confirmations }
        }
        other => DeployError::Provider(format!("failed to watch transaction {tx_hash}: {other}")),
    }
}

impl<P: Provider> ChainBackend for RpcBackend<P> {
    fn deployer(&self) -> Address {
        self.deployer
    }

    async fn chain_id(&self) -> Result<u64> {
        self.provider.get_chain_id().await.map_err(|e| read_error("failed to read chain id", e))
    }

    async fn transaction_count(&self) -> Result<u64> {
        self.provider
            .get_transaction_count(self.deployer)
            .pending()
            .await
            .map_err(|e| read_error("failed to read deployer nonce", e))
    }

    async fn send_transaction(&self, tx: UnsignedTx) -> Result<TxHash> {
        let request = TransactionRequest::default().with_from(self.deployer).with_nonce(tx.nonce);
        let request = match tx.to {
            Some(to) => request.with_to(to).with_input(tx.input),
            None => request.with_deploy_code(tx.input),
        };
        trace!(?request, "Submitting transaction");

        let pending = self.provider.send_transaction(request).await.map_err(submit_error)?;
        Ok(*pending.tx_hash())
    }

    async fn wait_for_confirmations(
        &self,
        tx_hash: TxHash,
        confirmations: u64,
        timeout: Duration,
    ) -> Result<TxReceipt> {
        let receipt = PendingTransactionBuilder::new(self.provider.root().clone(), tx_hash)
            .with_required_confirmations(confirmations)
            .with_timeout(Some(timeout))
            .get_receipt()
            .await
            .map_err(|e| watch_error(tx_hash, confirmations, e))?;

        Ok(TxReceipt {
            tx_hash: receipt.transaction_hash(),
            block_number: receipt.block_number(),
            success: receipt.status(),
            contract_address: receipt.contract_address(),
        })
    }
}
