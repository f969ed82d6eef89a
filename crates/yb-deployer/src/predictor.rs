//! Address prediction for `CREATE` deployments.
//!
//! A contract created by an externally owned account lands at
//! `keccak256(rlp([sender, nonce]))[12:]`, so the address is known as soon as the nonce the
//! creation transaction will consume is known.

use alloy_primitives::Address;
use serde::Serialize;
use tracing::debug;

use crate::{ChainBackend, Result};

/// Computes the address a `CREATE` transaction from `deployer` consuming `nonce` will produce.
#[inline]
pub fn predict(deployer: Address, nonce: u64) -> Address {
    deployer.create(nonce)
}

/// Selects which nonce the creation transaction is expected to consume.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, derive_more::Display)]
#[serde(rename_all = "lowercase")]
pub enum PredictionMode {
    /// Creation is the next transaction from the deployer.
    #[display("immediate")]
    Immediate,
    /// Exactly one transaction (the approval) is submitted before creation.
    #[display("deferred")]
    Deferred,
}

impl PredictionMode {
    /// Number of transactions submitted ahead of the creation.
    pub const fn offset(self) -> u64 {
        match self {
            Self::Immediate => 0,
            Self::Deferred => 1,
        }
    }

    /// Mode matching whether a pre-approval runs before creation.
    pub const fn for_approval(approves: bool) -> Self {
        if approves {
            Self::Deferred
        } else {
            Self::Immediate
        }
    }
}

/// Outcome of a prediction against live chain state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Prediction {
    /// Account the contract will be created from
    pub deployer: Address,
    /// Mode the prediction was made in
    pub mode: PredictionMode,
    /// Pending nonce read from the chain
    pub current_nonce: u64,
    /// Nonce the creation transaction must consume
    pub creation_nonce: u64,
    /// Address the creation transaction will produce
    pub address: Address,
}

impl Prediction {
    /// Builds a prediction from an already known nonce.
    pub fn new(deployer: Address, current_nonce: u64, mode: PredictionMode) -> Result<Self> {
        let creation_nonce = current_nonce.checked_add(mode.offset()).ok_or_else(|| {
            crate::DeployError::Provider(format!("nonce {current_nonce} cannot be advanced"))
        })?;
        Ok(Self {
            deployer,
            mode,
            current_nonce,
            creation_nonce,
            address: predict(deployer, creation_nonce),
        })
    }

    /// Reads the deployer's pending nonce once and predicts the creation address.
    ///
    /// Fails with [`DeployError::Provider`](crate::DeployError::Provider) when the nonce cannot
    /// be read. Nothing is submitted.
    pub async fn from_chain<B: ChainBackend>(backend: &B, mode: PredictionMode) -> Result<Self> {
        let deployer = backend.deployer();
        let nonce = backend.transaction_count().await?;
        let prediction = Self::new(deployer, nonce, mode)?;
        debug!(
            %deployer,
            nonce,
            creation_nonce = prediction.creation_nonce,
            address = %prediction.address,
            %mode,
            "Predicted creation address"
        );
        Ok(prediction)
    }
}
