//! Typed deployment configuration.

use std::time::Duration;

use alloy_primitives::{Address, Bytes, U256};
use alloy_sol_types::SolValue;
use serde::Serialize;

use crate::{DeployError, PredictionMode, Result};

/// Default confirmation depth for the creation transaction.
pub const DEFAULT_CONFIRMATIONS: u64 = 1;

/// Default time to wait for a transaction to reach its confirmation depth.
pub const DEFAULT_CONFIRMATION_TIMEOUT: Duration = Duration::from_secs(120);

/// Wrapper contract versions, distinguished by constructor arity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, derive_more::Display)]
#[serde(rename_all = "lowercase")]
pub enum ContractVersion {
    /// `constructor(token, blast)`
    #[display("v1")]
    V1,
    /// `constructor(token, blast, blastPoints, pointsOperator)`
    #[display("v2")]
    V2,
}

impl ContractVersion {
    /// Number of constructor arguments the version expects.
    pub const fn arity(self) -> usize {
        match self {
            Self::V1 => 2,
            Self::V2 => 4,
        }
    }
}

/// Constructor arguments, in the order the contract expects them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "version", rename_all = "lowercase")]
pub enum ConstructorArgs {
    /// Arguments of a [`ContractVersion::V1`] wrapper.
    V1 {
        /// Wrapped ERC20 token
        token: Address,
        /// Chain-native yield contract
        chain_native: Address,
    },
    /// Arguments of a [`ContractVersion::V2`] wrapper.
    V2 {
        /// Wrapped ERC20 token
        token: Address,
        /// Chain-native yield contract
        chain_native: Address,
        /// Chain-native points contract
        points: Address,
        /// Operator allowed to manage points
        points_operator: Address,
    },
}

impl ConstructorArgs {
    /// Validates a raw ordered argument list against `version`.
    ///
    /// Wrong arity and zero addresses are rejected.
    pub fn from_ordered(version: ContractVersion, args: &[Address]) -> Result<Self> {
        if args.len() != version.arity() {
            return Err(DeployError::config(format!(
                "contract {version} takes {} constructor arguments, got {}",
                version.arity(),
                args.len()
            )));
        }
        if let Some(idx) = args.iter().position(|arg| arg.is_zero()) {
            return Err(DeployError::config(format!("constructor argument {idx} is the zero address")));
        }
        Ok(match *args {
            [token, chain_native] => Self::V1 { token, chain_native },
            [token, chain_native, points, points_operator] => {
                Self::V2 { token, chain_native, points, points_operator }
            }
            _ => unreachable!("arity checked above"),
        })
    }

    /// Version the arguments belong to.
    pub const fn version(&self) -> ContractVersion {
        match self {
            Self::V1 { .. } => ContractVersion::V1,
            Self::V2 { .. } => ContractVersion::V2,
        }
    }

    /// The wrapped token.
    pub const fn token(&self) -> Address {
        match *self {
            Self::V1 { token, .. } | Self::V2 { token, .. } => token,
        }
    }

    /// Arguments as an ordered list.
    pub fn to_vec(&self) -> Vec<Address> {
        match *self {
            Self::V1 { token, chain_native } => vec![token, chain_native],
            Self::V2 { token, chain_native, points, points_operator } => {
                vec![token, chain_native, points, points_operator]
            }
        }
    }

    /// ABI-encoded constructor parameters, appended to the init code.
    pub fn abi_encode(&self) -> Bytes {
        match *self {
            Self::V1 { token, chain_native } => (token, chain_native).abi_encode_params(),
            Self::V2 { token, chain_native, points, points_operator } => {
                (token, chain_native, points, points_operator).abi_encode_params()
            }
        }
        .into()
    }
}

/// Allowance granted to the predicted contract.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ApprovalAmount {
    /// `type(uint256).max`
    #[default]
    Unlimited,
    /// A finite ceiling.
    Limited(U256),
}

impl ApprovalAmount {
    /// The on-chain amount.
    pub const fn value(self) -> U256 {
        match self {
            Self::Unlimited => U256::MAX,
            Self::Limited(amount) => amount,
        }
    }
}

/// Pre-approval of the predicted contract on an existing token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Approval {
    /// Token whose `approve` is called
    pub token: Address,
    /// Allowance ceiling
    pub amount: ApprovalAmount,
}

/// Everything a single deployment run needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeploymentConfig {
    /// Constructor arguments
    pub args: ConstructorArgs,
    /// Optional pre-approval; selects [`PredictionMode::Deferred`] when set
    pub approval: Option<Approval>,
    /// Confirmation depth awaited for the creation transaction
    pub confirmations: u64,
    /// Patience window for each confirmation wait
    pub confirmation_timeout: Duration,
    /// Chain id the provider must report, if pinned
    pub expected_chain_id: Option<u64>,
}

impl DeploymentConfig {
    /// Creates a configuration without pre-approval and with default confirmation settings.
    pub const fn new(args: ConstructorArgs) -> Self {
        Self {
            args,
            approval: None,
            confirmations: DEFAULT_CONFIRMATIONS,
            confirmation_timeout: DEFAULT_CONFIRMATION_TIMEOUT,
            expected_chain_id: None,
        }
    }

    /// Pre-approves the predicted address for unlimited spend of `token`.
    pub const fn with_approval(self, token: Address) -> Self {
        self.with_limited_approval(token, ApprovalAmount::Unlimited)
    }

    /// Pre-approves the predicted address for `amount` of `token`.
    pub const fn with_limited_approval(mut self, token: Address, amount: ApprovalAmount) -> Self {
        self.approval = Some(Approval { token, amount });
        self
    }

    /// Sets the confirmation depth for the creation transaction.
    pub const fn with_confirmations(mut self, confirmations: u64) -> Self {
        self.confirmations = confirmations;
        self
    }

    /// Sets the confirmation timeout.
    pub const fn with_confirmation_timeout(mut self, timeout: Duration) -> Self {
        self.confirmation_timeout = timeout;
        self
    }

    /// Pins the chain id the provider must report.
    pub const fn with_expected_chain_id(mut self, chain_id: u64) -> Self {
        self.expected_chain_id = Some(chain_id);
        self
    }

    /// Prediction mode implied by the approval setting.
    pub const fn mode(&self) -> PredictionMode {
        PredictionMode::for_approval(self.approval.is_some())
    }

    /// Checks the configuration before anything touches the chain.
    pub fn validate(&self) -> Result<()> {
        // Re-run the ordered check so hand-built variants go through the same rules.
        ConstructorArgs::from_ordered(self.args.version(), &self.args.to_vec())?;

        if self.confirmations == 0 {
            return Err(DeployError::config("confirmation depth must be at least 1"));
        }
        if self.confirmation_timeout.is_zero() {
            return Err(DeployError::config("confirmation timeout must be non-zero"));
        }
        if let Some(approval) = &self.approval {
            if approval.token.is_zero() {
                return Err(DeployError::config("approval token is the zero address"));
            }
            if approval.amount.value().is_zero() {
                return Err(DeployError::config("approval ceiling must be non-zero"));
            }
        }
        Ok(())
    }
}
