//! Attendee roster: CSV input, row validation and the issuance log.

mod log;
mod table;
mod types;
mod validate;

pub use log::IssuanceLog;
pub use table::Roster;
pub use types::{
    sheet_row, AttendeeRecord, EMAIL, FIRST_NAME, LAST_NAME, REQUIRED_COLUMNS, SPEAKER,
    TICKET_COLUMN, TICKET_TIER, TICKET_TYPE,
};
pub use validate::{validate, MissingFields, ValidRecord};

use std::path::PathBuf;
use thiserror::Error;

/// Errors reading the roster or writing the issuance log.
#[derive(Debug, Error)]
pub enum RosterError {
    #[error("Failed to open roster {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Roster is missing required columns {missing:?}. Found: {found:?}")]
    MissingColumns {
        missing: Vec<String>,
        found: Vec<String>,
    },

    #[error("Failed to write issuance log {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}
