//! Mock mailer for testing.

use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::credentials::Credentials;
use crate::mailer::{DeliveryReceipt, MailError, MailSession, Mailer, OutgoingMessage};

/// Mock implementation of the Mailer trait.
///
/// Sessions share state with the mailer, so tests can assert on opens,
/// sends and closes after the session has been dropped.
///
/// # Example
///
/// ```rust,ignore
/// use admit_core::testing::MockMailer;
///
/// let mailer = MockMailer::new();
/// mailer.fail_for_recipient("bounce@example.org").await;
///
/// // Run a batch...
///
/// assert_eq!(mailer.open_count().await, 1);
/// assert_eq!(mailer.close_count().await, 1);
/// let sent = mailer.sent_messages().await;
/// ```
#[derive(Debug, Default)]
pub struct MockMailer {
    /// Usernames of every open attempt.
    opens: Arc<RwLock<Vec<String>>>,
    /// Messages accepted by any session.
    sent: Arc<RwLock<Vec<OutgoingMessage>>>,
    /// Number of send attempts, including failures.
    attempts: Arc<RwLock<usize>>,
    /// Number of close calls.
    closes: Arc<RwLock<usize>>,
    /// If set, the next open will fail with this error.
    next_open_error: Arc<RwLock<Option<MailError>>>,
    /// If set, the next send will fail with this error.
    next_send_error: Arc<RwLock<Option<MailError>>>,
    /// If set, the next close will fail with this error.
    next_close_error: Arc<RwLock<Option<MailError>>>,
    /// Recipients whose messages are always refused.
    failing_recipients: Arc<RwLock<HashSet<String>>>,
}

impl MockMailer {
    /// Create a new mock mailer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Usernames passed to `open`, in order.
    pub async fn recorded_opens(&self) -> Vec<String> {
        self.opens.read().await.clone()
    }

    pub async fn open_count(&self) -> usize {
        self.opens.read().await.len()
    }

    /// Messages that were delivered, in order.
    pub async fn sent_messages(&self) -> Vec<OutgoingMessage> {
        self.sent.read().await.clone()
    }

    pub async fn send_attempts(&self) -> usize {
        *self.attempts.read().await
    }

    pub async fn close_count(&self) -> usize {
        *self.closes.read().await
    }

    /// Configure the next open to fail with the given error.
    pub async fn set_next_open_error(&self, error: MailError) {
        *self.next_open_error.write().await = Some(error);
    }

    /// Configure the next send to fail with the given error.
    pub async fn set_next_send_error(&self, error: MailError) {
        *self.next_send_error.write().await = Some(error);
    }

    /// Configure the next close to fail with the given error.
    pub async fn set_next_close_error(&self, error: MailError) {
        *self.next_close_error.write().await = Some(error);
    }

    /// Refuse every message addressed to `recipient`.
    pub async fn fail_for_recipient(&self, recipient: &str) {
        self.failing_recipients
            .write()
            .await
            .insert(recipient.to_string());
    }
}

#[async_trait]
impl Mailer for MockMailer {
    fn name(&self) -> &str {
        "mock"
    }

    async fn open(&self, credentials: &Credentials) -> Result<Box<dyn MailSession>, MailError> {
        self.opens.write().await.push(credentials.username.clone());

        if let Some(err) = self.next_open_error.write().await.take() {
            return Err(err);
        }

        Ok(Box::new(MockSession {
            sent: Arc::clone(&self.sent),
            attempts: Arc::clone(&self.attempts),
            closes: Arc::clone(&self.closes),
            next_send_error: Arc::clone(&self.next_send_error),
            next_close_error: Arc::clone(&self.next_close_error),
            failing_recipients: Arc::clone(&self.failing_recipients),
            closed: false,
        }))
    }
}

/// Session handed out by [`MockMailer`].
#[derive(Debug)]
pub struct MockSession {
    sent: Arc<RwLock<Vec<OutgoingMessage>>>,
    attempts: Arc<RwLock<usize>>,
    closes: Arc<RwLock<usize>>,
    next_send_error: Arc<RwLock<Option<MailError>>>,
    next_close_error: Arc<RwLock<Option<MailError>>>,
    failing_recipients: Arc<RwLock<HashSet<String>>>,
    closed: bool,
}

#[async_trait]
impl MailSession for MockSession {
    async fn send(&mut self, message: &OutgoingMessage) -> Result<DeliveryReceipt, MailError> {
        *self.attempts.write().await += 1;

        if self.closed {
            return Err(MailError::SessionClosed);
        }
        if let Some(err) = self.next_send_error.write().await.take() {
            return Err(err);
        }
        if self.failing_recipients.read().await.contains(&message.to) {
            return Err(MailError::Delivery(format!(
                "550 mailbox unavailable: {}",
                message.to
            )));
        }

        self.sent.write().await.push(message.clone());
        Ok(DeliveryReceipt {
            recipient: message.to.clone(),
            response: "250".to_string(),
        })
    }

    async fn close(&mut self) -> Result<(), MailError> {
        *self.closes.write().await += 1;

        if self.closed {
            return Err(MailError::SessionClosed);
        }
        self.closed = true;

        match self.next_close_error.write().await.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message(to: &str) -> OutgoingMessage {
        OutgoingMessage {
            from: "tickets@example.org".to_string(),
            to: to.to_string(),
            subject: "Ticket".to_string(),
            body: "Hi".to_string(),
            attachments: vec![],
        }
    }

    #[tokio::test]
    async fn test_session_records_sends_and_close() {
        let mailer = MockMailer::new();
        let mut session = mailer.open(&Credentials::new("me", "pw")).await.unwrap();

        session.send(&message("a@x.com")).await.unwrap();
        session.close().await.unwrap();

        assert_eq!(mailer.recorded_opens().await, vec!["me".to_string()]);
        assert_eq!(mailer.sent_messages().await.len(), 1);
        assert_eq!(mailer.close_count().await, 1);
        assert!(matches!(
            session.send(&message("a@x.com")).await,
            Err(MailError::SessionClosed)
        ));
    }

    #[tokio::test]
    async fn test_failing_recipient() {
        let mailer = MockMailer::new();
        mailer.fail_for_recipient("bounce@x.com").await;
        let mut session = mailer.open(&Credentials::new("me", "pw")).await.unwrap();

        assert!(session.send(&message("bounce@x.com")).await.is_err());
        assert!(session.send(&message("ok@x.com")).await.is_ok());
        assert_eq!(mailer.send_attempts().await, 2);
        assert_eq!(mailer.sent_messages().await.len(), 1);
    }

    #[tokio::test]
    async fn test_open_error() {
        let mailer = MockMailer::new();
        mailer
            .set_next_open_error(MailError::Authentication("535".to_string()))
            .await;

        assert!(mailer.open(&Credentials::new("me", "pw")).await.is_err());
        assert_eq!(mailer.open_count().await, 1);
    }
}
