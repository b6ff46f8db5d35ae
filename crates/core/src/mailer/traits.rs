//! Trait definitions for the mailer module.

use async_trait::async_trait;

use crate::credentials::Credentials;

use super::error::MailError;
use super::types::{DeliveryReceipt, OutgoingMessage};

/// A mail transport that can open authenticated sessions.
#[async_trait]
pub trait Mailer: Send + Sync {
    /// Returns the name of this mailer implementation.
    fn name(&self) -> &str;

    /// Connects and authenticates. The returned session is used for every
    /// message of a batch and closed once at the end.
    async fn open(&self, credentials: &Credentials) -> Result<Box<dyn MailSession>, MailError>;
}

/// One authenticated channel, owned by a single caller.
#[async_trait]
pub trait MailSession: Send {
    /// Sends one message.
    async fn send(&mut self, message: &OutgoingMessage) -> Result<DeliveryReceipt, MailError>;

    /// Ends the session. Sending afterwards fails with [`MailError::SessionClosed`].
    async fn close(&mut self) -> Result<(), MailError>;
}
