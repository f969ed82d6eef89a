use clap::{Parser, Subcommand};

use crate::common::{LogArgs, Result};

/// Deploys yield-bearing ERC20 wrappers, pre-approving each one on its token at the address it
/// is about to be created at.
#[derive(Parser, Debug)]
#[command(name = "yb-deploy", version, infer_subcommands = true)]
pub struct Cli {
    /// Command to run
    #[command(subcommand)]
    pub cmd: MainCmd,

    /// Logging configuration
    #[command(flatten)]
    pub log: LogArgs,

    /// Process exit status reported when the command fails
    #[arg(long = "failure-exit-code", default_value_t = 1, global = true)]
    pub failure_exit_code: u8,
}

/// Main command enumeration for the yb-deploy CLI tool
#[derive(Subcommand, Debug)]
pub enum MainCmd {
    /// Approve the predicted address and deploy a wrapper
    Deploy(crate::deploy::Cmd),
    /// Predict the address of the next deployment
    Predict(crate::predict::Cmd),
}

impl MainCmd {
    /// Execute the main command
    pub async fn run(&self) -> Result<()> {
        match self {
            Self::Deploy(cmd) => cmd.run().await,
            Self::Predict(cmd) => cmd.run().await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

    #[test]
    fn test_parse_deploy() {
        let cli = Cli::try_parse_from([
            "yb-deploy",
            "-vvv",
            "deploy",
            "--artifact",
            "artifacts/YbETH.json",
            "--private-key",
            KEY,
            "--token",
            "weth",
            "--failure-exit-code",
            "3",
        ])
        .unwrap();

        assert_eq!(cli.log.verbose, 3);
        assert_eq!(cli.failure_exit_code, 3);
        let MainCmd::Deploy(cmd) = cli.cmd else { panic!("expected deploy") };
        assert_eq!(cmd.artifact.to_str(), Some("artifacts/YbETH.json"));
        assert_eq!(cmd.connection.private_key, KEY);
    }

    #[test]
    fn test_parse_predict_defaults() {
        let cli = Cli::try_parse_from(["yb-deploy", "predict", "--private-key", KEY, "--token", "usdb"])
            .unwrap();

        assert_eq!(cli.failure_exit_code, 1);
        let MainCmd::Predict(cmd) = cli.cmd else { panic!("expected predict") };
        assert!(!cmd.contract.no_approval);
    }

    #[test]
    fn test_deploy_requires_artifact() {
        assert!(Cli::try_parse_from(["yb-deploy", "deploy", "--private-key", KEY, "--token", "weth"])
            .is_err());
    }
}
