//! The approve-then-deploy sequence.
//!
//! Each run walks a fixed path:
//!
//! ```text
//! Start -> PredictTarget -> [Approve] -> Deploy -> AwaitConfirmation -> Done
//! ```
//!
//! `Approve` only runs when the configuration carries a token to pre-approve. The first failure
//! aborts the run; nothing already submitted is undone.

use alloy_primitives::{Address, TxHash, U256};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::{
    approve_tx, Approval, ChainBackend, ConstructorArgs, ContractFactory, ContractVersion,
    DeployError, DeploymentConfig, Prediction, PredictionMode, SequenceError, TxReceipt,
};

/// Confirmations awaited for the approval before the creation nonce is re-checked.
pub const APPROVAL_CONFIRMATIONS: u64 = 1;

/// Stages of a deployment run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, derive_more::Display)]
pub enum Step {
    /// Validate the configuration and read the deployer nonce
    #[display("start")]
    Start,
    /// Predict the address of the contract to create
    #[display("predict-target")]
    PredictTarget,
    /// Pre-approve the predicted address on the token
    #[display("approve")]
    Approve,
    /// Submit the creation transaction
    #[display("deploy")]
    Deploy,
    /// Wait for the creation transaction to reach the configured depth
    #[display("await-confirmation")]
    AwaitConfirmation,
    /// Terminal state
    #[display("done")]
    Done,
}

/// The pre-approval submitted during a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ApprovalRecord {
    /// Token whose allowance was set
    pub token: Address,
    /// Predicted contract address granted the allowance
    pub spender: Address,
    /// Allowance ceiling
    pub amount: U256,
    /// Nonce the approval consumed
    pub nonce: u64,
    /// Approval transaction hash
    pub tx_hash: TxHash,
}

/// A contract created by a completed run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DeployedInstance {
    /// Account the contract was created from
    pub deployer: Address,
    /// Version of the wrapper deployed
    pub version: ContractVersion,
    /// Constructor arguments used
    pub args: ConstructorArgs,
    /// Prediction the run was based on
    pub prediction: Prediction,
    /// Address the contract was created at
    pub address: Address,
    /// Creation transaction hash
    pub tx_hash: TxHash,
    /// Block the creation was included in
    pub block_number: Option<u64>,
    /// Confirmation depth reached
    pub confirmations: u64,
    /// Pre-approval, if one ran
    pub approval: Option<ApprovalRecord>,
}

/// Runs single-shot deployments against a [`ChainBackend`].
///
/// Runs against the same deployer must be serialized by the caller: concurrent runs race on the
/// nonce and invalidate each other's predictions.
#[derive(Debug)]
pub struct DeploymentSequencer<B> {
    backend: B,
    factory: ContractFactory,
}

impl<B: ChainBackend> DeploymentSequencer<B> {
    /// Creates a sequencer deploying `factory`'s bytecode through `backend`.
    pub const fn new(backend: B, factory: ContractFactory) -> Self {
        Self { backend, factory }
    }

    /// The backend transactions are submitted through.
    pub const fn backend(&self) -> &B {
        &self.backend
    }

    /// Consumes the sequencer, returning its backend.
    pub fn into_backend(self) -> B {
        self.backend
    }

    /// Predicts the address a run of `config` would deploy to, without submitting anything.
    pub async fn predict(&self, config: &DeploymentConfig) -> Result<Prediction, SequenceError> {
        predict_deployment(&self.backend, config).await
    }

    /// Runs the whole sequence and returns the confirmed instance.
    ///
    /// Every call starts from the current on-chain nonce; running the same configuration twice
    /// deploys two distinct contracts.
    pub async fn deploy(&self, config: &DeploymentConfig) -> Result<DeployedInstance, SequenceError> {
        let deployer = self.backend.deployer();
        let mode = config.mode();
        info!(%deployer, version = %config.args.version(), %mode, "Starting deployment");

        // Start
        preflight(&self.backend, config).await?;
        let nonce = self.backend.transaction_count().await.map_err(|e| e.at(Step::Start))?;
        debug!(nonce, "Read deployer nonce");

        // PredictTarget
        let prediction =
            Prediction::new(deployer, nonce, mode).map_err(|e| e.at(Step::PredictTarget))?;
        info!(
            address = %prediction.address,
            creation_nonce = prediction.creation_nonce,
            "Predicted contract address"
        );

        // Approve
        let approval = match &config.approval {
            Some(approval) => Some(
                self.approve(approval, &prediction, config)
                    .await
                    .map_err(|e| e.at(Step::Approve))?,
            ),
            None => None,
        };

        // Deploy
        let tx_hash = self.submit_creation(config, &prediction).await.map_err(|e| e.at(Step::Deploy))?;

        // AwaitConfirmation
        let receipt = self
            .await_creation(tx_hash, &prediction, config)
            .await
            .map_err(|e| e.at(Step::AwaitConfirmation))?;

        // Done
        let instance = DeployedInstance {
            deployer,
            version: config.args.version(),
            args: config.args,
            prediction,
            address: prediction.address,
            tx_hash,
            block_number: receipt.block_number,
            confirmations: config.confirmations,
            approval,
        };
        info!(address = %instance.address, %tx_hash, block = ?instance.block_number, "Deployed");
        Ok(instance)
    }

    /// Authorizes the predicted address to spend the deployer's tokens and waits for the
    /// approval to land, so the creation nonce can be checked against settled state.
    async fn approve(
        &self,
        approval: &Approval,
        prediction: &Prediction,
        config: &DeploymentConfig,
    ) -> crate::Result<ApprovalRecord> {
        debug_assert_eq!(prediction.mode, PredictionMode::Deferred);

        let amount = approval.amount.value();
        let nonce = prediction.current_nonce;
        info!(token = %approval.token, spender = %prediction.address, %amount, "Approving predicted address");

        let tx = approve_tx(approval.token, prediction.address, amount, nonce);
        let tx_hash = self.backend.send_transaction(tx).await?;
        debug!(%tx_hash, nonce, "Approval submitted");

        let receipt = self
            .backend
            .wait_for_confirmations(tx_hash, APPROVAL_CONFIRMATIONS, config.confirmation_timeout)
            .await?;
        if !receipt.success {
            warn!(%tx_hash, "Approval reverted");
            return Err(DeployError::TransactionRejected(format!("approval {tx_hash} reverted")));
        }
        info!(%tx_hash, "Approval confirmed");

        Ok(ApprovalRecord { token: approval.token, spender: prediction.address, amount, nonce, tx_hash })
    }

    /// Re-reads the nonce and submits the creation transaction if it still matches the
    /// prediction.
    async fn submit_creation(
        &self,
        config: &DeploymentConfig,
        prediction: &Prediction,
    ) -> crate::Result<TxHash> {
        let actual = self.backend.transaction_count().await?;
        if actual != prediction.creation_nonce {
            return Err(DeployError::NonceMismatch { expected: prediction.creation_nonce, actual });
        }

        let (address, tx_hash) =
            self.factory.deploy(&self.backend, &config.args, prediction.creation_nonce).await?;
        debug_assert_eq!(address, prediction.address);
        info!(%tx_hash, nonce = prediction.creation_nonce, "Creation submitted");
        Ok(tx_hash)
    }

    async fn await_creation(
        &self,
        tx_hash: TxHash,
        prediction: &Prediction,
        config: &DeploymentConfig,
    ) -> crate::Result<TxReceipt> {
        let receipt = self
            .backend
            .wait_for_confirmations(tx_hash, config.confirmations, config.confirmation_timeout)
            .await
            .inspect_err(|e| {
                if matches!(e, DeployError::ConfirmationTimeout { .. }) {
                    warn!(%tx_hash, "Creation not confirmed in time, it may still be included");
                }
            })?;

        if !receipt.success {
            warn!(%tx_hash, "Creation reverted");
            return Err(DeployError::TransactionRejected(format!("creation {tx_hash} reverted")));
        }
        match receipt.contract_address {
            Some(actual) if actual != prediction.address => {
                Err(DeployError::AddressMismatch { predicted: prediction.address, actual })
            }
            _ => Ok(receipt),
        }
    }
}

/// Validates `config` and checks the connected chain against it.
pub async fn preflight<B: ChainBackend>(
    backend: &B,
    config: &DeploymentConfig,
) -> Result<(), SequenceError> {
    config.validate().map_err(|e| e.at(Step::Start))?;

    if let Some(expected) = config.expected_chain_id {
        let actual = backend.chain_id().await.map_err(|e| e.at(Step::Start))?;
        if actual != expected {
            return Err(DeployError::config(format!(
                "provider is on chain {actual}, expected chain {expected}"
            ))
            .at(Step::Start));
        }
    }
    Ok(())
}

/// Dry run: checks `config`, reads the deployer nonce once and predicts where a deployment
/// would land. Nothing is submitted.
pub async fn predict_deployment<B: ChainBackend>(
    backend: &B,
    config: &DeploymentConfig,
) -> Result<Prediction, SequenceError> {
    preflight(backend, config).await?;
    Prediction::from_chain(backend, config.mode()).await.map_err(|e| e.at(Step::PredictTarget))
}
