//! Message composition from templates.

use crate::codec::TicketIdentifier;
use crate::roster::ValidRecord;

use super::config::{EventConfig, MailConfig, MessageConfig};
use super::types::{AttachmentFile, OutgoingMessage};

/// Builds the ticket mail for one attendee.
#[derive(Debug, Clone)]
pub struct MessageTemplate {
    from: String,
    message: MessageConfig,
    event: EventConfig,
}

impl MessageTemplate {
    pub fn new(from: impl Into<String>, message: MessageConfig, event: EventConfig) -> Self {
        Self {
            from: from.into(),
            message,
            event,
        }
    }

    pub fn from_config(mail: &MailConfig, message: &MessageConfig, event: &EventConfig) -> Self {
        Self::new(mail.from_header(), message.clone(), event.clone())
    }

    /// Fills subject and body for the attendee and ticket.
    pub fn compose(
        &self,
        attendee: &ValidRecord,
        ticket: &TicketIdentifier,
        attachments: Vec<AttachmentFile>,
    ) -> OutgoingMessage {
        let full_name = attendee.full_name();
        let values = [
            ("first_name", attendee.first_name.as_str()),
            ("last_name", attendee.last_name.as_str()),
            ("full_name", full_name.as_str()),
            ("ticket", ticket.as_str()),
            ("event_name", self.event.name.as_str()),
            ("event_host", self.event.host.as_str()),
            ("event_date", self.event.date.as_str()),
            ("venue", self.event.venue.as_str()),
            ("team", self.event.team.as_str()),
        ];

        OutgoingMessage {
            from: self.from.clone(),
            to: attendee.email.clone(),
            subject: fill(&self.message.subject, &values),
            body: fill(&self.message.body, &values),
            attachments,
        }
    }
}

/// Replaces `{key}` placeholders in one pass. Unknown keys are left as-is,
/// and substituted values are never re-scanned.
fn fill(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        match after.find('}') {
            Some(close) => {
                let key = &after[..close];
                match values.iter().find(|(k, _)| *k == key) {
                    Some((_, value)) => out.push_str(value),
                    None => {
                        out.push('{');
                        out.push_str(key);
                        out.push('}');
                    }
                }
                rest = &after[close + 1..];
            }
            None => {
                out.push_str(&rest[open..]);
                rest = "";
            }
        }
    }
    out.push_str(rest);
    out
}
