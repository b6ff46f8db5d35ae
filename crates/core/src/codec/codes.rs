//! Category code tables.

use std::collections::HashMap;
use thiserror::Error;

use crate::config::CodesConfig;

/// Code substituted for a speaker that is not in the table.
pub const SPEAKER_SENTINEL: &str = "XX";

/// Code substituted for an unknown tier or ticket type.
pub const CATEGORY_SENTINEL: &str = "X";

/// Errors raised while building code tables.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CodeTableError {
    /// A label maps to an empty code.
    #[error("{table} label '{label}' has an empty code")]
    EmptyCode { table: &'static str, label: String },

    /// A label maps to the sentinel reserved for unknown labels.
    #[error("{table} label '{label}' uses reserved code '{code}'")]
    ReservedCode {
        table: &'static str,
        label: String,
        code: String,
    },
}

/// The three lookup tables used to build identifiers.
///
/// Speaker lookups are exact. Tier and ticket type lookups ignore case.
/// All lookups ignore surrounding whitespace.
#[derive(Debug, Clone, Default)]
pub struct CategoryCodes {
    speakers: HashMap<String, String>,
    tiers: HashMap<String, String>,
    ticket_types: HashMap<String, String>,
}

impl CategoryCodes {
    /// Builds the tables from configuration, rejecting empty or reserved codes.
    pub fn from_config(config: &CodesConfig) -> Result<Self, CodeTableError> {
        let speakers = build_table(
            "speaker",
            config.speakers.iter().map(|(k, v)| (k.trim().to_string(), v)),
        )?;
        let tiers = build_table(
            "tier",
            config.tiers.iter().map(|(k, v)| (k.trim().to_lowercase(), v)),
        )?;
        let ticket_types = build_table(
            "ticket type",
            config
                .ticket_types
                .iter()
                .map(|(k, v)| (k.trim().to_lowercase(), v)),
        )?;

        Ok(Self {
            speakers,
            tiers,
            ticket_types,
        })
    }

    /// Code for a speaker, or `XX`.
    pub fn speaker_code(&self, speaker: &str) -> &str {
        self.speakers
            .get(speaker.trim())
            .map(String::as_str)
            .unwrap_or(SPEAKER_SENTINEL)
    }

    /// Code for a tier, or `X`.
    pub fn tier_code(&self, tier: &str) -> &str {
        self.tiers
            .get(&tier.trim().to_lowercase())
            .map(String::as_str)
            .unwrap_or(CATEGORY_SENTINEL)
    }

    /// Code for a ticket type, or `X`.
    pub fn ticket_type_code(&self, ticket_type: &str) -> &str {
        self.ticket_types
            .get(&ticket_type.trim().to_lowercase())
            .map(String::as_str)
            .unwrap_or(CATEGORY_SENTINEL)
    }

    /// Whether the speaker has an entry of its own.
    pub fn is_known_speaker(&self, speaker: &str) -> bool {
        self.speakers.contains_key(speaker.trim())
    }
}

fn build_table<'a>(
    table: &'static str,
    entries: impl Iterator<Item = (String, &'a String)>,
) -> Result<HashMap<String, String>, CodeTableError> {
    let mut out = HashMap::new();
    for (label, code) in entries {
        let code = code.trim();
        if code.is_empty() {
            return Err(CodeTableError::EmptyCode { table, label });
        }
        if code == SPEAKER_SENTINEL || code == CATEGORY_SENTINEL {
            return Err(CodeTableError::ReservedCode {
                table,
                label,
                code: code.to_string(),
            });
        }
        out.insert(label, code.to_string());
    }
    Ok(out)
}
