//! Fixed credentials.

use async_trait::async_trait;

use super::{CredentialError, CredentialProvider, Credentials};

/// Always yields the same credentials.
pub struct StaticCredentialProvider {
    credentials: Credentials,
}

impl StaticCredentialProvider {
    pub fn new(credentials: Credentials) -> Self {
        Self { credentials }
    }
}

#[async_trait]
impl CredentialProvider for StaticCredentialProvider {
    async fn credentials(&self) -> Result<Credentials, CredentialError> {
        Ok(self.credentials.clone())
    }

    fn method_name(&self) -> &'static str {
        "static"
    }
}
