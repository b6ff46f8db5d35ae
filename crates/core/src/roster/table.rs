//! CSV roster reader.

use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use super::types::{
    AttendeeRecord, EMAIL, FIRST_NAME, LAST_NAME, SPEAKER, TICKET_TIER, TICKET_TYPE,
};
use super::RosterError;

/// The attendee table as read from disk: header names plus raw cells.
///
/// Rows are padded to the header width so every column lookup is in range.
#[derive(Debug, Clone)]
pub struct Roster {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
    columns: HashMap<String, usize>,
}

impl Roster {
    /// Reads a CSV file with a header row.
    pub fn from_path(path: &Path) -> Result<Self, RosterError> {
        let file = std::fs::File::open(path).map_err(|source| RosterError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_reader(file)
    }

    /// Reads CSV from any reader (useful for testing).
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, RosterError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .flexible(true)
            .trim(csv::Trim::Headers)
            .from_reader(reader);

        let headers: Vec<String> = csv_reader.headers()?.iter().map(str::to_string).collect();

        let mut rows = Vec::new();
        for record in csv_reader.records() {
            let record = record?;
            let mut row: Vec<String> = record.iter().map(str::to_string).collect();
            if row.len() < headers.len() {
                row.resize(headers.len(), String::new());
            }
            rows.push(row);
        }

        Ok(Self::new(headers, rows))
    }

    /// Builds a roster from already-split cells.
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        let columns = headers
            .iter()
            .enumerate()
            .map(|(i, h)| (h.clone(), i))
            .collect();
        Self {
            headers,
            rows,
            columns,
        }
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.get(name).copied()
    }

    /// Required columns the header row lacks, in the order given.
    pub fn missing_columns(&self, required: &[&str]) -> Vec<String> {
        required
            .iter()
            .filter(|c| !self.columns.contains_key(**c))
            .map(|c| c.to_string())
            .collect()
    }

    /// Fails with [`RosterError::MissingColumns`] if any required column is absent.
    pub fn require_columns(&self, required: &[&str]) -> Result<(), RosterError> {
        let missing = self.missing_columns(required);
        if missing.is_empty() {
            Ok(())
        } else {
            Err(RosterError::MissingColumns {
                missing,
                found: self.headers.clone(),
            })
        }
    }

    /// The trimmed cell, or `None` when the column is absent or the cell blank.
    pub fn cell(&self, row: usize, column: &str) -> Option<String> {
        let index = self.column_index(column)?;
        let value = self.rows.get(row)?.get(index)?.trim();
        if value.is_empty() {
            None
        } else {
            Some(value.to_string())
        }
    }

    pub fn record(&self, row: usize) -> Option<AttendeeRecord> {
        if row >= self.rows.len() {
            return None;
        }
        Some(AttendeeRecord {
            first_name: self.cell(row, FIRST_NAME),
            last_name: self.cell(row, LAST_NAME),
            email: self.cell(row, EMAIL),
            speaker: self.cell(row, SPEAKER),
            ticket_tier: self.cell(row, TICKET_TIER),
            ticket_type: self.cell(row, TICKET_TYPE),
        })
    }

    /// Records in file order.
    pub fn records(&self) -> impl Iterator<Item = AttendeeRecord> + '_ {
        (0..self.rows.len()).filter_map(move |i| self.record(i))
    }
}
