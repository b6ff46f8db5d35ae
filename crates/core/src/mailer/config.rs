//! Mail transport, message and event configuration.

use serde::{Deserialize, Serialize};

/// SMTP submission settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MailConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default)]
    pub tls: TlsMode,
    /// Envelope and header sender address.
    pub sender: String,
    /// Display name shown next to the sender address.
    #[serde(default)]
    pub sender_name: Option<String>,
    /// Login name; defaults to the sender address.
    #[serde(default)]
    pub username: Option<String>,
}

impl MailConfig {
    pub fn login(&self) -> &str {
        self.username.as_deref().unwrap_or(&self.sender)
    }

    /// `Name <address>` or the bare address.
    pub fn from_header(&self) -> String {
        match &self.sender_name {
            Some(name) => format!("{} <{}>", name, self.sender),
            None => self.sender.clone(),
        }
    }
}

fn default_host() -> String {
    "smtp.gmail.com".to_string()
}

fn default_port() -> u16 {
    465
}

/// How the SMTP connection is secured.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TlsMode {
    /// TLS from the first byte (SMTPS, usually port 465).
    #[default]
    Implicit,
    /// Plain connection upgraded with STARTTLS (usually port 587).
    Starttls,
}

/// Subject and body templates.
///
/// Placeholders: `{first_name}`, `{last_name}`, `{full_name}`, `{ticket}`,
/// `{event_name}`, `{event_host}`, `{event_date}`, `{venue}`, `{team}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageConfig {
    #[serde(default = "default_subject")]
    pub subject: String,
    #[serde(default = "default_body")]
    pub body: String,
}

impl Default for MessageConfig {
    fn default() -> Self {
        Self {
            subject: default_subject(),
            body: default_body(),
        }
    }
}

fn default_subject() -> String {
    "Your {event_name} Ticket - {ticket}".to_string()
}

fn default_body() -> String {
    "\
Dear {full_name},

Thank you for booking your {event_name} ticket!

Event Details:
{event_host}
Date: {event_date}
Venue: {venue}

Your Ticket Number: {ticket}

Please find your ticket attached along with the Rules for Attendees.
Kindly carry your ticket (print or digital) and arrive 15 minutes early.
Your phones will be collected at entry, and please avoid bringing any food and drink in the auditorium.
Also please read the rule book before attending the event.
Looking forward to having you!

Regards,
{team}
"
    .to_string()
}

/// Details of the event quoted in messages.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventConfig {
    #[serde(default = "default_event_name")]
    pub name: String,
    #[serde(default = "default_event_host")]
    pub host: String,
    #[serde(default = "default_event_date")]
    pub date: String,
    #[serde(default = "default_venue")]
    pub venue: String,
    #[serde(default = "default_team")]
    pub team: String,
}

impl Default for EventConfig {
    fn default() -> Self {
        Self {
            name: default_event_name(),
            host: default_event_host(),
            date: default_event_date(),
            venue: default_venue(),
            team: default_team(),
        }
    }
}

fn default_event_name() -> String {
    "TEDx Krea 2025".to_string()
}

fn default_event_host() -> String {
    "TEDx KREA University".to_string()
}

fn default_event_date() -> String {
    "6th Sept 2025".to_string()
}

fn default_venue() -> String {
    "NAB Auditorium".to_string()
}

fn default_team() -> String {
    "Team TEDx Krea".to_string()
}
