//! Row validation.

use serde::Serialize;
use thiserror::Error;

use super::types::{AttendeeRecord, EMAIL, FIRST_NAME, SPEAKER, TICKET_TIER, TICKET_TYPE};

/// A record that carries every required field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidRecord {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub speaker: String,
    pub ticket_tier: String,
    pub ticket_type: String,
}

impl ValidRecord {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }
}

/// Rejection reason, listing the absent columns in roster order.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[error("missing required field(s): {}", .fields.join(", "))]
pub struct MissingFields {
    pub fields: Vec<&'static str>,
}

/// Accepts a record iff first name, email, speaker, ticket type and tier are
/// all present. Last name is optional and defaults to empty.
pub fn validate(record: &AttendeeRecord) -> Result<ValidRecord, MissingFields> {
    let mut missing = Vec::new();
    let mut take = |value: &Option<String>, column: &'static str| match value {
        Some(v) => v.clone(),
        None => {
            missing.push(column);
            String::new()
        }
    };

    let first_name = take(&record.first_name, FIRST_NAME);
    let email = take(&record.email, EMAIL);
    let speaker = take(&record.speaker, SPEAKER);
    let ticket_type = take(&record.ticket_type, TICKET_TYPE);
    let ticket_tier = take(&record.ticket_tier, TICKET_TIER);

    if !missing.is_empty() {
        return Err(MissingFields { fields: missing });
    }

    Ok(ValidRecord {
        first_name,
        last_name: record.last_name.clone().unwrap_or_default(),
        email,
        speaker,
        ticket_tier,
        ticket_type,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete() -> AttendeeRecord {
        AttendeeRecord {
            first_name: Some("Alice".to_string()),
            last_name: Some("Smith".to_string()),
            email: Some("alice@x.com".to_string()),
            speaker: Some("Pankaj Rai".to_string()),
            ticket_tier: Some("gold".to_string()),
            ticket_type: Some("regular".to_string()),
        }
    }

    #[test]
    fn test_complete_record_accepted() {
        let valid = validate(&complete()).unwrap();
        assert_eq!(valid.full_name(), "Alice Smith");
        assert_eq!(valid.email, "alice@x.com");
    }

    #[test]
    fn test_last_name_is_optional() {
        let record = AttendeeRecord {
            last_name: None,
            ..complete()
        };
        let valid = validate(&record).unwrap();
        assert_eq!(valid.last_name, "");
        assert_eq!(valid.full_name(), "Alice");
    }

    #[test]
    fn test_missing_email_rejected() {
        let record = AttendeeRecord {
            email: None,
            ..complete()
        };
        let err = validate(&record).unwrap_err();
        assert_eq!(err.fields, vec![EMAIL]);
        assert_eq!(err.to_string(), "missing required field(s): Email ID");
    }

    #[test]
    fn test_all_missing_fields_itemized() {
        let record = AttendeeRecord {
            last_name: Some("Only".to_string()),
            ..Default::default()
        };
        let err = validate(&record).unwrap_err();
        assert_eq!(
            err.fields,
            vec![FIRST_NAME, EMAIL, SPEAKER, TICKET_TYPE, TICKET_TIER]
        );
    }
}
