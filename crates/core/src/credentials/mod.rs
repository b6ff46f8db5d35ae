mod env;
mod fixed;
mod prompt;
mod traits;
mod types;

pub use env::*;
pub use fixed::*;
pub use prompt::*;
pub use traits::*;
pub use types::*;

use crate::config::{CredentialMethod, CredentialsConfig};

/// Factory function to create a credential provider from config
pub fn create_credential_provider(
    config: &CredentialsConfig,
    username: &str,
) -> Box<dyn CredentialProvider> {
    match config.method {
        CredentialMethod::Prompt => Box::new(PromptCredentialProvider::new(username.to_string())),
        CredentialMethod::Env => Box::new(EnvCredentialProvider::new(
            username.to_string(),
            config.env_var.clone(),
        )),
    }
}
