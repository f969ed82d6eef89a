//! Shared argument groups for the deploy and predict commands.

use std::{str::FromStr, time::Duration};

use alloy_primitives::{Address, U256};
use clap::{Args, ValueEnum};
use yb_deployer::{
    connect_http,
    network::{KnownToken, Network},
    ApprovalAmount, ChainBackend, ConstructorArgs, ContractVersion, DeploymentConfig,
    DEFAULT_CONFIRMATIONS,
};

use super::{CliError, Result};

/// Node connection and deployer key
#[derive(Args, Debug, Clone)]
#[command(next_help_heading = "Connection Options")]
pub struct ConnectionArgs {
    /// JSON-RPC endpoint of the target chain
    #[arg(long = "rpc", env = "RPC_URL", default_value = "http://localhost:8545")]
    pub rpc: String,

    /// Hex-encoded private key of the deployer
    #[arg(long = "private-key", env = "DEPLOYER_PRIVATE_KEY", hide_env_values = true)]
    pub private_key: String,
}

impl ConnectionArgs {
    /// Connects the deployer wallet to the node.
    pub fn connect(&self) -> Result<impl ChainBackend> {
        Ok(connect_http(&self.rpc, &self.private_key)?)
    }
}

/// Target network
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum NetworkArg {
    /// Blast mainnet (chain id 81457)
    BlastMainnet,
    /// Blast Sepolia (chain id 168587773)
    BlastSepolia,
}

impl From<NetworkArg> for Network {
    fn from(arg: NetworkArg) -> Self {
        match arg {
            NetworkArg::BlastMainnet => Self::BlastMainnet,
            NetworkArg::BlastSepolia => Self::BlastSepolia,
        }
    }
}

/// Wrapper contract version
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum VersionArg {
    /// `constructor(token, blast)`
    V1,
    /// `constructor(token, blast, blastPoints, pointsOperator)`
    V2,
}

impl From<VersionArg> for ContractVersion {
    fn from(arg: VersionArg) -> Self {
        match arg {
            VersionArg::V1 => Self::V1,
            VersionArg::V2 => Self::V2,
        }
    }
}

/// Token to wrap: a known symbol or an explicit address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenArg {
    /// A token with a network preset
    Known(KnownToken),
    /// Any ERC20 address
    Address(Address),
}

impl TokenArg {
    /// Resolves the token address on `network`.
    pub const fn address(self, network: Network) -> Address {
        match self {
            Self::Known(token) => network.token(token),
            Self::Address(address) => address,
        }
    }
}

impl FromStr for TokenArg {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "weth" => Ok(Self::Known(KnownToken::Weth)),
            "usdb" => Ok(Self::Known(KnownToken::Usdb)),
            _ => s
                .parse()
                .map(Self::Address)
                .map_err(|e| format!("expected weth, usdb or an address: {e}")),
        }
    }
}

/// Parses `max` or a decimal/hex amount into an approval ceiling.
fn parse_approval_amount(s: &str) -> std::result::Result<ApprovalAmount, String> {
    if s.eq_ignore_ascii_case("max") {
        return Ok(ApprovalAmount::Unlimited);
    }
    let amount = U256::from_str(s).map_err(|e| format!("invalid approval amount '{s}': {e}"))?;
    Ok(if amount == U256::MAX { ApprovalAmount::Unlimited } else { ApprovalAmount::Limited(amount) })
}

/// What to deploy and how
#[derive(Args, Debug, Clone)]
#[command(next_help_heading = "Contract Options")]
pub struct ContractArgs {
    /// Target network; selects chain-native constants and the expected chain id
    #[arg(long = "network", value_enum, default_value = "blast-sepolia")]
    pub network: NetworkArg,

    /// Wrapper contract version
    #[arg(long = "contract-version", value_enum, default_value = "v1")]
    pub version: VersionArg,

    /// Token to wrap: `weth`, `usdb` or an address
    #[arg(long = "token")]
    pub token: TokenArg,

    /// Points contract override (v2) [default: network preset]
    #[arg(long = "points")]
    pub points: Option<Address>,

    /// Points operator (required for v2)
    #[arg(long = "points-operator")]
    pub points_operator: Option<Address>,

    /// Skip pre-approving the wrapper on the token
    #[arg(long = "no-approval")]
    pub no_approval: bool,

    /// Allowance granted to the wrapper: `max` or an amount in base units
    #[arg(long = "approval-amount", value_parser = parse_approval_amount, default_value = "max")]
    pub approval_amount: ApprovalAmount,

    /// Confirmation depth awaited for the creation transaction
    #[arg(long = "confirmations", default_value_t = DEFAULT_CONFIRMATIONS)]
    pub confirmations: u64,

    /// Seconds to wait for each confirmation before giving up
    #[arg(long = "confirmation-timeout", default_value_t = 120)]
    pub confirmation_timeout: u64,

    /// Skip the chain id check against the network preset
    #[arg(long = "skip-chain-id-check")]
    pub skip_chain_id_check: bool,
}

impl ContractArgs {
    /// Constructor arguments in the order the selected version takes them.
    ///
    /// The points pair is only appended when an operator is given, so a mismatch between the
    /// version and the supplied arguments surfaces as an arity error.
    pub fn ordered_args(&self) -> Vec<Address> {
        let network = Network::from(self.network);
        let mut args = vec![self.token.address(network), network.chain_native()];
        if let Some(operator) = self.points_operator {
            args.push(self.points.unwrap_or_else(|| network.points()));
            args.push(operator);
        }
        args
    }

    /// Builds and validates the deployment configuration.
    pub fn deployment_config(&self) -> Result<DeploymentConfig> {
        let network = Network::from(self.network);
        if self.points.is_some() && self.points_operator.is_none() {
            return Err(CliError::InvalidInput("--points requires --points-operator".to_string()));
        }

        let args = ConstructorArgs::from_ordered(self.version.into(), &self.ordered_args())?;
        let mut config = DeploymentConfig::new(args)
            .with_confirmations(self.confirmations)
            .with_confirmation_timeout(Duration::from_secs(self.confirmation_timeout));
        if !self.no_approval {
            config = config.with_limited_approval(args.token(), self.approval_amount);
        }
        if !self.skip_chain_id_check {
            config = config.with_expected_chain_id(network.chain_id());
        }
        config.validate()?;
        Ok(config)
    }
}
