//! Mailer module for delivering tickets.
//!
//! A [`Mailer`] opens one authenticated [`MailSession`] per batch. The
//! session is reused for every message and closed once when the batch ends.
//!
//! # Example
//!
//! ```ignore
//! use admit_core::mailer::{Mailer, MessageTemplate, SmtpMailer};
//!
//! let mailer = SmtpMailer::new(config.mail.clone());
//! let mut session = mailer.open(&credentials).await?;
//! let message = template.compose(&attendee, &ticket, attachments);
//! let receipt = session.send(&message).await?;
//! session.close().await?;
//! ```

mod compose;
mod config;
mod error;
mod smtp;
mod traits;
mod types;

pub use compose::MessageTemplate;
pub use config::{EventConfig, MailConfig, MessageConfig, TlsMode};
pub use error::MailError;
pub use smtp::{build_message, SmtpMailer, SmtpSession};
pub use traits::{MailSession, Mailer};
pub use types::{content_type_for, AttachmentFile, DeliveryReceipt, OutgoingMessage};
