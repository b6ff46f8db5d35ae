//! SMTP mailer backed by lettre.

use std::time::Duration;

use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::{Attachment, Mailbox, MultiPart, SinglePart};
use lettre::transport::smtp::authentication::{Credentials as SmtpCredentials, DEFAULT_MECHANISMS};
use lettre::transport::smtp::client::{AsyncSmtpConnection, TlsParameters};
use lettre::transport::smtp::extension::ClientId;
use lettre::transport::smtp::Error as SmtpError;
use lettre::Message;
use tracing::{debug, info, warn};

use crate::credentials::Credentials;

use super::config::{MailConfig, TlsMode};
use super::error::MailError;
use super::traits::{MailSession, Mailer};
use super::types::{DeliveryReceipt, OutgoingMessage};

const CONNECT_TIMEOUT: Duration = Duration::from_secs(60);

/// Mailer that submits every message of a batch over one SMTP connection.
pub struct SmtpMailer {
    config: MailConfig,
}

impl SmtpMailer {
    pub fn new(config: MailConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &MailConfig {
        &self.config
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    fn name(&self) -> &str {
        "smtp"
    }

    async fn open(&self, credentials: &Credentials) -> Result<Box<dyn MailSession>, MailError> {
        info!(
            "Connecting to {}:{} as {}",
            self.config.host, self.config.port, credentials.username
        );

        let credentials = SmtpCredentials::new(
            credentials.username.clone(),
            credentials.password().to_string(),
        );
        let connection = connect(&self.config, &credentials).await?;

        Ok(Box::new(SmtpSession {
            config: self.config.clone(),
            credentials,
            connection: Some(connection),
        }))
    }
}

/// Connects, secures and logs in.
async fn connect(
    config: &MailConfig,
    credentials: &SmtpCredentials,
) -> Result<AsyncSmtpConnection, MailError> {
    let hello = ClientId::default();
    let server = (config.host.as_str(), config.port);
    let unreachable = |e: SmtpError| {
        MailError::Connection(format!("{}:{}: {}", config.host, config.port, e))
    };

    let mut connection = match config.tls {
        TlsMode::Implicit => {
            let tls = tls_parameters(&config.host)?;
            AsyncSmtpConnection::connect_tokio1(server, Some(CONNECT_TIMEOUT), &hello, Some(tls), None)
                .await
                .map_err(unreachable)?
        }
        TlsMode::Starttls => {
            let mut connection =
                AsyncSmtpConnection::connect_tokio1(server, Some(CONNECT_TIMEOUT), &hello, None, None)
                    .await
                    .map_err(unreachable)?;
            connection
                .starttls(tls_parameters(&config.host)?, &hello)
                .await
                .map_err(|e| MailError::Connection(format!("STARTTLS: {}", e)))?;
            connection
        }
    };

    if let Err(e) = connection.auth(DEFAULT_MECHANISMS, credentials).await {
        connection.abort().await;
        return Err(if e.is_permanent() || e.is_client() {
            MailError::Authentication(e.to_string())
        } else {
            MailError::Connection(e.to_string())
        });
    }

    Ok(connection)
}

fn tls_parameters(host: &str) -> Result<TlsParameters, MailError> {
    TlsParameters::new(host.to_string())
        .map_err(|e| MailError::Connection(format!("TLS setup for {}: {}", host, e)))
}

/// An open SMTP session holding one authenticated connection.
///
/// A failed delivery can leave the connection broken; the next send logs in
/// again on a fresh connection.
pub struct SmtpSession {
    config: MailConfig,
    credentials: SmtpCredentials,
    connection: Option<AsyncSmtpConnection>,
}

impl SmtpSession {
    async fn connection(&mut self) -> Result<&mut AsyncSmtpConnection, MailError> {
        let connection = self.connection.as_mut().ok_or(MailError::SessionClosed)?;
        if connection.has_broken() {
            warn!(
                "Connection to {} was dropped, reconnecting",
                self.config.host
            );
            *connection = connect(&self.config, &self.credentials).await?;
        }
        Ok(connection)
    }
}

#[async_trait]
impl MailSession for SmtpSession {
    async fn send(&mut self, message: &OutgoingMessage) -> Result<DeliveryReceipt, MailError> {
        if self.connection.is_none() {
            return Err(MailError::SessionClosed);
        }

        let mut contents = Vec::with_capacity(message.attachments.len());
        for attachment in &message.attachments {
            let bytes =
                tokio::fs::read(&attachment.path)
                    .await
                    .map_err(|source| MailError::Attachment {
                        path: attachment.path.clone(),
                        source,
                    })?;
            contents.push(bytes);
        }

        let email = build_message(message, contents)?;
        let connection = self.connection().await?;
        let response = connection
            .send(email.envelope(), &email.formatted())
            .await
            .map_err(|e| MailError::Delivery(e.to_string()))?;

        debug!("Delivered to {}: {}", message.to, response.code());

        Ok(DeliveryReceipt {
            recipient: message.to.clone(),
            response: response.code().to_string(),
        })
    }

    async fn close(&mut self) -> Result<(), MailError> {
        let mut connection = self.connection.take().ok_or(MailError::SessionClosed)?;
        if connection.has_broken() {
            return Err(MailError::Connection(
                "connection was already dropped".to_string(),
            ));
        }
        connection
            .quit()
            .await
            .map(|response| debug!("Session closed: {}", response.code()))
            .map_err(|e| MailError::Connection(e.to_string()))
    }
}

/// Assembles a multipart message: the plain-text body followed by one part
/// per attachment, in order. `contents` pairs with `message.attachments`.
pub fn build_message(message: &OutgoingMessage, contents: Vec<Vec<u8>>) -> Result<Message, MailError> {
    let from: Mailbox = message
        .from
        .parse()
        .map_err(|e| MailError::invalid_address(&message.from, e))?;
    let to: Mailbox = message
        .to
        .parse()
        .map_err(|e| MailError::invalid_address(&message.to, e))?;

    let mut parts = MultiPart::mixed().singlepart(SinglePart::plain(message.body.clone()));
    for (attachment, bytes) in message.attachments.iter().zip(contents) {
        let content_type = ContentType::parse(&attachment.content_type)
            .map_err(|e| MailError::Build(format!("{}: {}", attachment.content_type, e)))?;
        parts = parts.singlepart(Attachment::new(attachment.filename.clone()).body(bytes, content_type));
    }

    Message::builder()
        .from(from)
        .to(to)
        .subject(message.subject.clone())
        .multipart(parts)
        .map_err(|e| MailError::Build(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mailer::AttachmentFile;

    fn message() -> OutgoingMessage {
        OutgoingMessage {
            from: "Ticket Desk <tickets@example.org>".to_string(),
            to: "alice@x.com".to_string(),
            subject: "Your Ticket - PR-GR-0001-C2A835".to_string(),
            body: "Dear Alice".to_string(),
            attachments: vec![
                AttachmentFile::new("out/ticket_PR-GR-0001-C2A835.jpeg", "ticket_PR-GR-0001-C2A835.jpeg"),
                AttachmentFile::new("rules.pdf", "Rules.pdf"),
            ],
        }
    }

    #[test]
    fn test_build_message_includes_parts() {
        let email = build_message(&message(), vec![vec![0xFF, 0xD8], b"%PDF".to_vec()]).unwrap();
        let raw = String::from_utf8_lossy(&email.formatted()).to_string();

        assert!(raw.contains("Subject: Your Ticket - PR-GR-0001-C2A835"));
        assert!(raw.contains("ticket_PR-GR-0001-C2A835.jpeg"));
        assert!(raw.contains("Rules.pdf"));
        assert!(raw.contains("image/jpeg"));
        assert!(raw.contains("application/pdf"));
    }

    #[test]
    fn test_build_message_rejects_bad_recipient() {
        let mut bad = message();
        bad.to = "not an address".to_string();
        let err = build_message(&bad, vec![vec![], vec![]]).unwrap_err();
        assert!(matches!(err, MailError::InvalidAddress { .. }));
    }

    fn config(port: u16) -> MailConfig {
        MailConfig {
            host: "127.0.0.1".to_string(),
            port,
            tls: TlsMode::Starttls,
            sender: "tickets@example.org".to_string(),
            sender_name: None,
            username: None,
        }
    }

    #[tokio::test]
    async fn test_closed_session_refuses_send() {
        let mut session = SmtpSession {
            config: config(587),
            credentials: SmtpCredentials::new("tickets@example.org".to_string(), "secret".to_string()),
            connection: None,
        };
        let err = session.send(&message()).await.unwrap_err();
        assert!(matches!(err, MailError::SessionClosed));
        assert!(matches!(session.close().await, Err(MailError::SessionClosed)));
    }

    #[tokio::test]
    async fn test_open_unreachable_server_fails() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let mailer = SmtpMailer::new(config(port));
        let result = mailer
            .open(&Credentials::new("tickets@example.org", "secret"))
            .await;

        assert!(matches!(result, Err(MailError::Connection(_))));
    }
}
