use std::process::ExitCode;

use clap::Parser;
use tracing::error;
use yb_deploy::Cli;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    if let Err(e) = cli.log.init() {
        eprintln!("Failed to initialize logging: {e}");
        return ExitCode::from(cli.failure_exit_code);
    }

    match cli.cmd.run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "Command failed");
            eprintln!("Error: {e}");
            ExitCode::from(cli.failure_exit_code)
        }
    }
}
