//! Attendee record types.

use serde::{Deserialize, Serialize};

pub const FIRST_NAME: &str = "First Name";
pub const LAST_NAME: &str = "Last Name";
pub const EMAIL: &str = "Email ID";
pub const SPEAKER: &str = "Speaker";
pub const TICKET_TYPE: &str = "Ticket Type";
pub const TICKET_TIER: &str = "Ticket Tier";

/// Columns a roster must carry for a run to start.
pub const REQUIRED_COLUMNS: [&str; 5] = [FIRST_NAME, EMAIL, SPEAKER, TICKET_TYPE, TICKET_TIER];

/// Column appended to the issuance log.
pub const TICKET_COLUMN: &str = "Ticket Number";

/// Number of lines before the first data row in the source sheet.
const HEADER_OFFSET: usize = 2;

/// One row of the roster. Blank cells are `None`, present cells are trimmed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendeeRecord {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub speaker: Option<String>,
    pub ticket_tier: Option<String>,
    pub ticket_type: Option<String>,
}

impl AttendeeRecord {
    /// Name for log lines, whatever parts are present.
    pub fn display_name(&self) -> String {
        let first = self.first_name.as_deref().unwrap_or_default();
        let last = self.last_name.as_deref().unwrap_or_default();
        format!("{first} {last}").trim().to_string()
    }
}

/// Spreadsheet line number of a zero-based data row (header is line 1).
pub fn sheet_row(index: usize) -> usize {
    index + HEADER_OFFSET
}
