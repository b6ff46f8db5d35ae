use async_trait::async_trait;
use thiserror::Error;

use super::types::Credentials;

#[derive(Debug, Error)]
pub enum CredentialError {
    #[error("Failed to read password: {0}")]
    Prompt(String),

    #[error("Environment variable {0} is not set")]
    MissingVariable(String),

    #[error("Empty password")]
    Empty,

    #[error("Credential task failed: {0}")]
    Task(String),
}

#[async_trait]
pub trait CredentialProvider: Send + Sync {
    /// Produce credentials for one batch run
    async fn credentials(&self) -> Result<Credentials, CredentialError>;

    /// Name of this credential method
    fn method_name(&self) -> &'static str;
}
