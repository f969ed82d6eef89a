use yb_deployer::{DeployError, SequenceError};

/// Error types for the yb-deploy commands
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// The deployment sequence aborted
    #[error("{0}")]
    Sequence(#[from] SequenceError),

    /// Deployment setup failed before the sequence started
    #[error("{0}")]
    Deploy(#[from] DeployError),

    /// Invalid command-line input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Failed to serialize the report
    #[error("Failed to serialize report: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O failure (log file, stdout)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for the yb-deploy commands
pub type Result<T> = std::result::Result<T, CliError>;
