//! Interactive password prompt.

use async_trait::async_trait;

use super::{CredentialError, CredentialProvider, Credentials};

/// Reads the password from the terminal without echo.
pub struct PromptCredentialProvider {
    username: String,
}

impl PromptCredentialProvider {
    pub fn new(username: String) -> Self {
        Self { username }
    }

    fn prompt(&self) -> String {
        format!("Password for {}: ", self.username)
    }
}

#[async_trait]
impl CredentialProvider for PromptCredentialProvider {
    async fn credentials(&self) -> Result<Credentials, CredentialError> {
        let prompt = self.prompt();
        let password = tokio::task::spawn_blocking(move || rpassword::prompt_password(prompt))
            .await
            .map_err(|e| CredentialError::Task(e.to_string()))?
            .map_err(|e| CredentialError::Prompt(e.to_string()))?;

        if password.is_empty() {
            return Err(CredentialError::Empty);
        }
        Ok(Credentials::new(self.username.clone(), password))
    }

    fn method_name(&self) -> &'static str {
        "prompt"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_names_user() {
        let provider = PromptCredentialProvider::new("tickets@example.org".to_string());
        assert_eq!(provider.prompt(), "Password for tickets@example.org: ");
        assert_eq!(provider.method_name(), "prompt");
    }
}
