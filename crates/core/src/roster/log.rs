//! Issuance log: the roster plus one identifier column.

use std::io::Write;
use std::path::Path;

use crate::codec::TicketIdentifier;

use super::table::Roster;
use super::types::TICKET_COLUMN;
use super::RosterError;

/// Copy of the roster with a `Ticket Number` column, in input row order.
///
/// Rows without an issued ticket keep an empty cell. An existing
/// `Ticket Number` column is blanked and reused rather than duplicated.
#[derive(Debug, Clone)]
pub struct IssuanceLog {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
    ticket_column: usize,
}

impl IssuanceLog {
    pub fn from_roster(roster: &Roster) -> Self {
        let mut headers = roster.headers().to_vec();
        let ticket_column = match roster.column_index(TICKET_COLUMN) {
            Some(index) => index,
            None => {
                headers.push(TICKET_COLUMN.to_string());
                headers.len() - 1
            }
        };

        let rows = roster
            .rows()
            .iter()
            .map(|row| {
                let mut row = row.clone();
                if row.len() <= ticket_column {
                    row.resize(ticket_column + 1, String::new());
                }
                row[ticket_column].clear();
                row
            })
            .collect();

        Self {
            headers,
            rows,
            ticket_column,
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Stores the identifier for a row. Out-of-range rows are ignored.
    pub fn record(&mut self, row: usize, identifier: &TicketIdentifier) {
        if let Some(cells) = self.rows.get_mut(row) {
            cells[self.ticket_column] = identifier.to_string();
        }
    }

    /// Identifier of a row, `None` when it was not issued.
    pub fn identifier(&self, row: usize) -> Option<&str> {
        self.rows
            .get(row)
            .map(|cells| cells[self.ticket_column].as_str())
            .filter(|id| !id.is_empty())
    }

    /// Every row's identifier cell in order, empty for skipped rows.
    pub fn identifiers(&self) -> impl Iterator<Item = &str> {
        self.rows
            .iter()
            .map(move |cells| cells[self.ticket_column].as_str())
    }

    pub fn write<W: Write>(&self, writer: W) -> Result<(), RosterError> {
        let mut csv_writer = csv::WriterBuilder::new()
            .flexible(true)
            .from_writer(writer);
        csv_writer.write_record(&self.headers)?;
        for row in &self.rows {
            csv_writer.write_record(row)?;
        }
        csv_writer.flush().map_err(csv::Error::from)?;
        Ok(())
    }

    /// Writes the log, creating parent directories as needed.
    pub fn write_to_path(&self, path: &Path) -> Result<(), RosterError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|source| RosterError::Write {
                path: path.to_path_buf(),
                source,
            })?;
        }
        let file = std::fs::File::create(path).map_err(|source| RosterError::Write {
            path: path.to_path_buf(),
            source,
        })?;
        self.write(file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::{CategoryCodes, IdentifierCodec};
    use crate::config::CodesConfig;
    use tempfile::TempDir;

    fn identifier(seq: u32) -> TicketIdentifier {
        IdentifierCodec::new(CategoryCodes::from_config(&CodesConfig::default()).unwrap())
            .encode("Pankaj Rai", "gold", "regular", seq)
    }

    fn written(log: &IssuanceLog) -> String {
        let mut out = Vec::new();
        log.write(&mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_appends_ticket_column_in_row_order() {
        let csv = "First Name,Email ID\nAlice,a@x.com\nBob,\nCarol,c@x.com\n";
        let roster = Roster::from_reader(csv.as_bytes()).unwrap();
        let mut log = IssuanceLog::from_roster(&roster);

        log.record(0, &identifier(1));
        log.record(2, &identifier(2));

        assert_eq!(log.identifier(1), None);
        assert_eq!(
            written(&log),
            "First Name,Email ID,Ticket Number\n\
             Alice,a@x.com,PR-GR-0001-C2A835\n\
             Bob,,\n\
             Carol,c@x.com,PR-GR-0002-AD030B\n"
        );
    }

    #[test]
    fn test_existing_ticket_column_is_reset() {
        let csv = "Ticket Number,First Name\nOLD-1,Alice\nOLD-2,Bob\n";
        let roster = Roster::from_reader(csv.as_bytes()).unwrap();
        let mut log = IssuanceLog::from_roster(&roster);
        log.record(1, &identifier(1));

        let ids: Vec<&str> = log.identifiers().collect();
        assert_eq!(ids, vec!["", "PR-GR-0001-C2A835"]);
        assert!(written(&log).starts_with("Ticket Number,First Name\n,Alice\n"));
    }

    #[test]
    fn test_write_to_path_creates_parent() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("logs/issued.csv");
        let roster = Roster::from_reader("First Name\nAlice\n".as_bytes()).unwrap();
        IssuanceLog::from_roster(&roster).write_to_path(&path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, "First Name,Ticket Number\nAlice,\n");
    }
}
