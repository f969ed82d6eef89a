use std::path::PathBuf;

use clap::Parser;
use serde::Serialize;
use tracing::{debug, info};
use yb_deployer::{network::Network, ContractArtifact, DeployedInstance, DeploymentSequencer};

use crate::common::{ConnectionArgs, ContractArgs};

use super::Result;

/// Deploy a wrapper, pre-approving it on its token
#[derive(Parser, Debug)]
pub struct Cmd {
    /// Compiled contract artifact (Hardhat or Foundry JSON)
    #[arg(long = "artifact", value_name = "PATH")]
    pub artifact: PathBuf,

    // Shared argument groups
    /// Connection configuration
    #[command(flatten)]
    pub connection: ConnectionArgs,

    /// Contract configuration
    #[command(flatten)]
    pub contract: ContractArgs,
}

/// Report printed on success
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct DeploymentReport<'a> {
    network: Network,
    contract_name: Option<&'a str>,
    #[serde(flatten)]
    instance: &'a DeployedInstance,
}

impl Cmd {
    /// Execute the deploy command
    pub async fn run(&self) -> Result<()> {
        // Step 1: Build and validate everything before touching the chain
        let config = self.contract.deployment_config()?;
        let artifact = ContractArtifact::load(&self.artifact)?;
        let name = artifact.name.as_deref().unwrap_or("contract");
        debug!(artifact = %self.artifact.display(), bytes = artifact.bytecode.len(), "Artifact loaded");

        // Step 2: Connect and run the sequence
        let backend = self.connection.connect()?;
        let sequencer = DeploymentSequencer::new(backend, artifact.factory()?);
        info!("Deploying {name}...");
        let instance = sequencer.deploy(&config).await?;
        info!("Deployed {name} to: {}", instance.address);

        // Step 3: Output results
        let report = DeploymentReport {
            network: self.contract.network.into(),
            contract_name: artifact.name.as_deref(),
            instance: &instance,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);

        Ok(())
    }
}
