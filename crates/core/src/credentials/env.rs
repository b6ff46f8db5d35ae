//! Password from an environment variable.

use async_trait::async_trait;

use super::{CredentialError, CredentialProvider, Credentials};

/// Reads the password from a named variable at call time.
pub struct EnvCredentialProvider {
    username: String,
    variable: String,
}

impl EnvCredentialProvider {
    pub fn new(username: String, variable: String) -> Self {
        Self { username, variable }
    }
}

#[async_trait]
impl CredentialProvider for EnvCredentialProvider {
    async fn credentials(&self) -> Result<Credentials, CredentialError> {
        let password = std::env::var(&self.variable)
            .map_err(|_| CredentialError::MissingVariable(self.variable.clone()))?;

        if password.is_empty() {
            return Err(CredentialError::Empty);
        }
        Ok(Credentials::new(self.username.clone(), password))
    }

    fn method_name(&self) -> &'static str {
        "env"
    }
}
