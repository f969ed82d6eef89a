//! Deployment sequencer for yield-bearing ERC20 wrappers.
//!
//! A wrapper must be allowed to pull the deployer's tokens during its own initialization, but it
//! cannot be approved before it exists. The sequencer predicts the `CREATE` address from the
//! deployer nonce, approves that address on the token, deploys the wrapper at exactly the
//! predicted nonce and waits for the creation to be confirmed.
#![cfg_attr(not(test), warn(unused_crate_dependencies))]

pub use alloy_primitives::{Address, TxHash, U256};

mod artifact;
pub use artifact::*;

mod backend;
pub use backend::*;

mod config;
pub use config::*;

mod contracts;
pub use contracts::*;

mod error;
pub use error::*;

pub mod network;

mod predictor;
pub use predictor::*;

mod sequencer;
pub use sequencer::*;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
