//! Types for the batch runner.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

use crate::codec::TicketIdentifier;
use crate::credentials::CredentialError;
use crate::mailer::{DeliveryReceipt, MailError};
use crate::renderer::Artifact;
use crate::roster::{IssuanceLog, MissingFields, RosterError};

/// Errors that end a batch before or after row processing.
#[derive(Debug, Error)]
pub enum BatchError {
    /// The roster lacks required columns.
    #[error("roster error: {0}")]
    Roster(#[from] RosterError),

    /// No credentials could be obtained.
    #[error("credentials error: {0}")]
    Credentials(#[from] CredentialError),

    /// The mail session could not be opened.
    #[error("authentication failed: {0}")]
    Authentication(#[source] MailError),

    /// The output directory could not be created.
    #[error("failed to create output directory {path}: {source}")]
    OutputDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The issuance log could not be written.
    #[error("failed to write issuance log: {0}")]
    Log(#[source] RosterError),
}

/// Where a batch run currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "phase", rename_all = "snake_case")]
pub enum BatchPhase {
    Start,
    Authenticating,
    /// Working on the given sheet row.
    Processing { row: usize },
    Closing,
    Done,
    Fatal,
}

impl fmt::Display for BatchPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Start => write!(f, "start"),
            Self::Authenticating => write!(f, "authenticating"),
            Self::Processing { row } => write!(f, "processing row {}", row),
            Self::Closing => write!(f, "closing"),
            Self::Done => write!(f, "done"),
            Self::Fatal => write!(f, "fatal"),
        }
    }
}

/// Number of sequence values handed out so far in a run.
///
/// Starts at zero; the first accepted row gets 1.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SequenceCounter {
    issued: u32,
}

impl SequenceCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Consumes and returns the next sequence value.
    pub fn advance(&mut self) -> u32 {
        self.issued += 1;
        self.issued
    }

    pub fn issued(&self) -> u32 {
        self.issued
    }
}

/// Why a row produced no delivered ticket.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum SkipReason {
    /// Rejected before a sequence value was assigned.
    MissingFields(MissingFields),
    /// The resolved template does not exist.
    ResourceNotFound {
        identifier: TicketIdentifier,
        template: PathBuf,
    },
    RenderFailed {
        identifier: TicketIdentifier,
        error: String,
    },
    DeliveryFailed {
        identifier: TicketIdentifier,
        error: String,
    },
}

impl SkipReason {
    /// True when the row was accepted and used up a sequence value.
    pub fn consumed_sequence(&self) -> bool {
        !matches!(self, Self::MissingFields(_))
    }

    /// The identifier that was allocated, if any.
    pub fn identifier(&self) -> Option<&TicketIdentifier> {
        match self {
            Self::MissingFields(_) => None,
            Self::ResourceNotFound { identifier, .. }
            | Self::RenderFailed { identifier, .. }
            | Self::DeliveryFailed { identifier, .. } => Some(identifier),
        }
    }

    /// Metric label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::MissingFields(_) => "missing_fields",
            Self::ResourceNotFound { .. } => "resource_not_found",
            Self::RenderFailed { .. } => "render_failed",
            Self::DeliveryFailed { .. } => "delivery_failed",
        }
    }
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingFields(missing) => write!(f, "{}", missing),
            Self::ResourceNotFound {
                identifier,
                template,
            } => write!(f, "{}: template not found at {:?}", identifier, template),
            Self::RenderFailed { identifier, error } => {
                write!(f, "{}: render failed: {}", identifier, error)
            }
            Self::DeliveryFailed { identifier, error } => {
                write!(f, "{}: delivery failed: {}", identifier, error)
            }
        }
    }
}

/// Result of processing one roster row.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RowOutcome {
    Issued {
        identifier: TicketIdentifier,
        artifact: Artifact,
        receipt: DeliveryReceipt,
    },
    Skipped(SkipReason),
}

impl RowOutcome {
    pub fn is_issued(&self) -> bool {
        matches!(self, Self::Issued { .. })
    }

    /// Whether the inter-row pause applies after this row.
    pub fn consumed_sequence(&self) -> bool {
        match self {
            Self::Issued { .. } => true,
            Self::Skipped(reason) => reason.consumed_sequence(),
        }
    }

    /// Identifier of a delivered ticket.
    pub fn issued_identifier(&self) -> Option<&TicketIdentifier> {
        match self {
            Self::Issued { identifier, .. } => Some(identifier),
            Self::Skipped(_) => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Issued { .. } => "issued",
            Self::Skipped(reason) => reason.label(),
        }
    }
}

/// Outcome of one row with its position in the sheet.
#[derive(Debug, Clone, Serialize)]
pub struct RowResult {
    /// 0-based index into the roster's data rows.
    pub index: usize,
    /// Spreadsheet row number (header is row 1).
    pub row: usize,
    pub name: String,
    pub outcome: RowOutcome,
}

/// Summary of a completed batch.
#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    pub run_id: String,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub rows: Vec<RowResult>,
    pub log_path: PathBuf,
    #[serde(skip)]
    pub log: IssuanceLog,
}

impl BatchReport {
    pub fn issued(&self) -> usize {
        self.rows.iter().filter(|r| r.outcome.is_issued()).count()
    }

    pub fn skipped(&self) -> usize {
        self.rows.len() - self.issued()
    }

    /// Rows with the given outcome label.
    pub fn count(&self, label: &str) -> usize {
        self.rows
            .iter()
            .filter(|r| r.outcome.label() == label)
            .count()
    }

    /// Sequence values consumed by the run.
    pub fn sequences_used(&self) -> usize {
        self.rows
            .iter()
            .filter(|r| r.outcome.consumed_sequence())
            .count()
    }
}
