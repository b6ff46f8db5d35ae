//! Error types for the mailer module.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while opening a session or sending mail.
#[derive(Debug, Error)]
pub enum MailError {
    /// Could not reach or negotiate with the mail server.
    #[error("Connection failed: {0}")]
    Connection(String),

    /// The server rejected the credentials.
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// A sender or recipient address did not parse.
    #[error("Invalid address '{address}': {reason}")]
    InvalidAddress { address: String, reason: String },

    /// An attachment could not be read.
    #[error("Failed to read attachment {path}: {source}")]
    Attachment {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The message could not be assembled.
    #[error("Failed to build message: {0}")]
    Build(String),

    /// The transport refused or failed to deliver the message.
    #[error("Delivery failed: {0}")]
    Delivery(String),

    /// The session was already closed.
    #[error("Mail session is closed")]
    SessionClosed,
}

impl MailError {
    /// Creates an invalid address error.
    pub fn invalid_address(address: impl Into<String>, reason: impl ToString) -> Self {
        Self::InvalidAddress {
            address: address.into(),
            reason: reason.to_string(),
        }
    }
}
