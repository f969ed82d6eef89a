//! On-chain constants of the supported networks.

use alloy_primitives::{address, Address};
use serde::Serialize;

/// Blast rebasing WETH predeploy.
pub const WETH: Address = address!("4200000000000000000000000000000000000023");

/// Blast rebasing USDB predeploy.
pub const USDB: Address = address!("4200000000000000000000000000000000000022");

/// Blast yield configuration predeploy.
pub const BLAST: Address = address!("4300000000000000000000000000000000000002");

/// Blast points contract on mainnet.
pub const BLAST_POINTS_MAINNET: Address = address!("2536fe9ab3f511540f2f9e2ec2a805005c3dd800");

/// Blast points contract on Sepolia.
pub const BLAST_POINTS_SEPOLIA: Address = address!("2fc95838c71e76ec69ff817983bff17c710f34e0");

/// Networks the wrappers are deployed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, derive_more::Display)]
#[serde(rename_all = "kebab-case")]
pub enum Network {
    /// Blast mainnet
    #[display("blast-mainnet")]
    BlastMainnet,
    /// Blast Sepolia testnet
    #[display("blast-sepolia")]
    BlastSepolia,
}

impl Network {
    /// Chain id the node must report.
    pub const fn chain_id(self) -> u64 {
        match self {
            Self::BlastMainnet => 81457,
            Self::BlastSepolia => 168587773,
        }
    }

    /// Chain-native yield contract passed to every wrapper.
    pub const fn chain_native(self) -> Address {
        BLAST
    }

    /// Chain-native points contract passed to newer wrappers.
    pub const fn points(self) -> Address {
        match self {
            Self::BlastMainnet => BLAST_POINTS_MAINNET,
            Self::BlastSepolia => BLAST_POINTS_SEPOLIA,
        }
    }

    /// Address of a well-known token on this network.
    pub const fn token(self, token: KnownToken) -> Address {
        // Both tokens are predeploys at the same address on every Blast network.
        match token {
            KnownToken::Weth => WETH,
            KnownToken::Usdb => USDB,
        }
    }
}

/// Tokens with a wrapper.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, derive_more::Display)]
#[serde(rename_all = "lowercase")]
pub enum KnownToken {
    /// Wrapped ether, wrapped as `ybETH`
    #[display("weth")]
    Weth,
    /// USDB, wrapped as `ybUSDB`
    #[display("usdb")]
    Usdb,
}

impl KnownToken {
    /// Symbol of the wrapper deployed for this token.
    pub const fn wrapper_symbol(self) -> &'static str {
        match self {
            Self::Weth => "ybETH",
            Self::Usdb => "ybUSDB",
        }
    }
}
