//! `yb-deploy` CLI tool for deploying yield-bearing ERC20 wrappers.
//!
//! The deploy command predicts the wrapper's `CREATE` address, approves it on the wrapped token
//! and deploys it at exactly that address.

mod cmd;
pub use cmd::*;

/// Shared argument groups, errors and logging
pub mod common;

/// Deploy command
pub mod deploy;

/// Predict command
pub mod predict;
