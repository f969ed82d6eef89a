use clap::Parser;
use tracing::info;
use yb_deployer::predict_deployment;

use crate::common::{ConnectionArgs, ContractArgs};

use super::Result;

/// Print the address a deployment would land at, without submitting anything
#[derive(Parser, Debug)]
pub struct Cmd {
    // Shared argument groups
    /// Connection configuration
    #[command(flatten)]
    pub connection: ConnectionArgs,

    /// Contract configuration
    #[command(flatten)]
    pub contract: ContractArgs,
}

impl Cmd {
    /// Execute the predict command
    pub async fn run(&self) -> Result<()> {
        let config = self.contract.deployment_config()?;
        let backend = self.connection.connect()?;

        let prediction = predict_deployment(&backend, &config).await?;
        info!(
            deployer = %prediction.deployer,
            nonce = prediction.current_nonce,
            creation_nonce = prediction.creation_nonce,
            "Predicted {}",
            prediction.address
        );
        println!("{}", serde_json::to_string_pretty(&prediction)?);

        Ok(())
    }
}
