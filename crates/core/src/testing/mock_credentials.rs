//! Mock credential provider for testing.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::credentials::{CredentialError, CredentialProvider, Credentials};

/// Credential provider that counts requests and can be made to fail.
#[derive(Debug)]
pub struct MockCredentialProvider {
    credentials: Credentials,
    requests: Arc<RwLock<usize>>,
    next_error: Arc<RwLock<Option<CredentialError>>>,
}

impl Default for MockCredentialProvider {
    fn default() -> Self {
        Self::new(Credentials::new("tickets@example.org", "app-password"))
    }
}

impl MockCredentialProvider {
    pub fn new(credentials: Credentials) -> Self {
        Self {
            credentials,
            requests: Arc::new(RwLock::new(0)),
            next_error: Arc::new(RwLock::new(None)),
        }
    }

    /// Number of times credentials were requested.
    pub async fn request_count(&self) -> usize {
        *self.requests.read().await
    }

    /// Configure the next request to fail with the given error.
    pub async fn set_next_error(&self, error: CredentialError) {
        *self.next_error.write().await = Some(error);
    }
}

#[async_trait]
impl CredentialProvider for MockCredentialProvider {
    async fn credentials(&self) -> Result<Credentials, CredentialError> {
        *self.requests.write().await += 1;
        match self.next_error.write().await.take() {
            Some(err) => Err(err),
            None => Ok(self.credentials.clone()),
        }
    }

    fn method_name(&self) -> &'static str {
        "mock"
    }
}
