use alloy_primitives::{Address, TxHash};

use crate::Step;

/// Failure conditions raised while predicting or deploying.
#[derive(Debug, thiserror::Error)]
pub enum DeployError {
    /// The node is unreachable or rejected a read (nonce query, chain id).
    #[error("provider error: {0}")]
    Provider(String),

    /// A submitted transaction was rejected by the network or reverted on-chain.
    #[error("transaction rejected: {0}")]
    TransactionRejected(String),

    /// A transaction was accepted but did not reach the requested depth in time. It may still
    /// land later.
    #[error("transaction {tx_hash} did not reach {confirmations} confirmation(s) in time")]
    ConfirmationTimeout {
        /// Hash of the submitted transaction
        tx_hash: TxHash,
        /// Requested confirmation depth
        confirmations: u64,
    },

    /// Constructor arguments or addresses are missing or malformed.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The deployer nonce moved away from the value the prediction was made for.
    #[error("nonce mismatch: expected {expected}, chain reports {actual}")]
    NonceMismatch {
        /// Nonce the contract creation was predicted against
        expected: u64,
        /// Nonce reported by the chain right before creation
        actual: u64,
    },

    /// The creation receipt reports a contract address other than the predicted one.
    #[error("deployed address {actual} differs from predicted {predicted}")]
    AddressMismatch {
        /// Address the approval was granted to
        predicted: Address,
        /// Address reported by the creation receipt
        actual: Address,
    },
}

impl DeployError {
    /// Shorthand for a [`DeployError::Configuration`].
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    /// Attaches the step at which the error occurred.
    pub fn at(self, step: Step) -> SequenceError {
        SequenceError { step, source: self }
    }
}

/// A [`DeployError`] tagged with the sequencer step that produced it.
#[derive(Debug, thiserror::Error)]
#[error("{step} failed: {source}")]
pub struct SequenceError {
    /// Step at which the sequence aborted
    pub step: Step,
    /// Underlying cause
    #[source]
    pub source: DeployError,
}

impl SequenceError {
    /// Returns the underlying cause.
    pub const fn kind(&self) -> &DeployError {
        &self.source
    }
}

/// Result type for the deployer crate.
pub type Result<T, E = DeployError> = std::result::Result<T, E>;
