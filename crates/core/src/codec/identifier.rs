//! Ticket identifier construction.

use serde::{Deserialize, Serialize};
use sha1::{Digest, Sha1};
use std::fmt;

use super::codes::{CategoryCodes, CATEGORY_SENTINEL, SPEAKER_SENTINEL};

/// Number of hex characters kept from the digest.
const HASH_SUFFIX_LEN: usize = 6;

/// A composite ticket code, e.g. `PR-GR-0001-C2A835`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TicketIdentifier {
    value: String,
    sequence: u32,
    triage: bool,
}

impl TicketIdentifier {
    pub fn as_str(&self) -> &str {
        &self.value
    }

    /// Sequence number the identifier was issued with.
    pub fn sequence(&self) -> u32 {
        self.sequence
    }

    /// Human-readable part without the hash suffix.
    pub fn base(&self) -> &str {
        self.value
            .rsplit_once('-')
            .map(|(base, _)| base)
            .unwrap_or(&self.value)
    }

    /// Trailing uppercase hex segment.
    pub fn hash_suffix(&self) -> &str {
        self.value
            .rsplit_once('-')
            .map(|(_, suffix)| suffix)
            .unwrap_or_default()
    }

    /// True when any category fell back to a sentinel code.
    pub fn needs_triage(&self) -> bool {
        self.triage
    }

    /// File name of the rendered ticket.
    pub fn artifact_file_name(&self, extension: &str) -> String {
        format!("ticket_{}.{}", self.value, extension)
    }
}

impl fmt::Display for TicketIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

impl AsRef<str> for TicketIdentifier {
    fn as_ref(&self) -> &str {
        &self.value
    }
}

/// Builds identifiers from category labels and a sequence number.
#[derive(Debug, Clone)]
pub struct IdentifierCodec {
    codes: CategoryCodes,
}

impl IdentifierCodec {
    pub fn new(codes: CategoryCodes) -> Self {
        Self { codes }
    }

    pub fn codes(&self) -> &CategoryCodes {
        &self.codes
    }

    /// Encodes `{speaker}-{tier}{type}-{seq:04}-{hash}`.
    ///
    /// Unknown labels degrade to sentinel codes instead of failing. The hash
    /// covers the labels exactly as given (untrimmed, original case).
    /// Sequences above 9999 widen the numeric field.
    pub fn encode(
        &self,
        speaker: &str,
        tier: &str,
        ticket_type: &str,
        sequence: u32,
    ) -> TicketIdentifier {
        let speaker_code = self.codes.speaker_code(speaker);
        let tier_code = self.codes.tier_code(tier);
        let type_code = self.codes.ticket_type_code(ticket_type);
        let triage = speaker_code == SPEAKER_SENTINEL
            || tier_code == CATEGORY_SENTINEL
            || type_code == CATEGORY_SENTINEL;

        let base = format!("{speaker_code}-{tier_code}{type_code}-{sequence:04}");

        let digest = Sha1::digest(format!("{speaker}-{tier}-{ticket_type}-{sequence}").as_bytes());
        let hex = format!("{:X}", digest);

        TicketIdentifier {
            value: format!("{}-{}", base, &hex[..HASH_SUFFIX_LEN]),
            sequence,
            triage,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CodesConfig;
    use std::collections::HashSet;

    fn codec() -> IdentifierCodec {
        IdentifierCodec::new(CategoryCodes::from_config(&CodesConfig::default()).unwrap())
    }

    #[test]
    fn test_known_identifiers() {
        let codec = codec();
        assert_eq!(
            codec.encode("Pankaj Rai", "gold", "regular", 1).as_str(),
            "PR-GR-0001-C2A835"
        );
        assert_eq!(
            codec
                .encode("Full-Day", "platinum+", "early bird", 2)
                .as_str(),
            "FD-PPE-0002-B4C905"
        );
    }

    #[test]
    fn test_encode_is_deterministic() {
        let codec = codec();
        let first = codec.encode("Sarika Singh", "silver", "full-day", 3);
        for _ in 0..10 {
            assert_eq!(codec.encode("Sarika Singh", "silver", "full-day", 3), first);
        }
        assert_eq!(first.as_str(), "SS1-SF-0003-A01BDF");
    }

    #[test]
    fn test_sequence_changes_hash_suffix() {
        let codec = codec();
        let suffixes: HashSet<String> = (1..=1000)
            .map(|n| codec.encode("Diamond", "diamond", "regular", n))
            .map(|id| id.hash_suffix().to_string())
            .collect();
        // 24-bit suffixes over 1000 samples; a handful of collisions at most
        assert!(suffixes.len() >= 990);

        let a = codec.encode("Full-Day", "platinum+", "early bird", 1);
        let b = codec.encode("Full-Day", "platinum+", "early bird", 2);
        assert_ne!(a.hash_suffix(), b.hash_suffix());
    }

    #[test]
    fn test_unknown_speaker_uses_sentinel() {
        let id = codec().encode("UnknownSpeaker", "gold", "regular", 1);
        assert!(id.as_str().starts_with("XX-GR-0001-"));
        assert!(id.needs_triage());
    }

    #[test]
    fn test_unknown_tier_and_type_use_sentinel() {
        let codec = codec();
        assert!(codec
            .encode("Pankaj Rai", "bronze", "regular", 7)
            .as_str()
            .starts_with("PR-XR-0007-"));
        assert!(codec
            .encode("Pankaj Rai", "gold", "vip", 7)
            .as_str()
            .starts_with("PR-GX-0007-"));
        assert!(!codec.encode("Pankaj Rai", "gold", "regular", 7).needs_triage());
    }

    #[test]
    fn test_lookup_normalizes_but_hash_uses_raw_input() {
        let codec = codec();
        let normal = codec.encode("Pankaj Rai", "gold", "regular", 1);
        let shouty = codec.encode(" Pankaj Rai", "GOLD", "Regular ", 1);
        assert_eq!(normal.base(), shouty.base());
        assert_ne!(normal.hash_suffix(), shouty.hash_suffix());
    }

    #[test]
    fn test_wide_sequence_is_not_truncated() {
        let id = codec().encode("Pankaj Rai", "gold", "regular", 12345);
        assert_eq!(id.base(), "PR-GR-12345");
        assert_eq!(id.sequence(), 12345);
    }

    #[test]
    fn test_hash_suffix_shape() {
        let id = codec().encode("Neeraj Khanna", "platinum", "early bird", 42);
        let suffix = id.hash_suffix();
        assert_eq!(suffix.len(), 6);
        assert!(suffix
            .chars()
            .all(|c| c.is_ascii_digit() || ('A'..='F').contains(&c)));
    }

    #[test]
    fn test_artifact_file_name() {
        let id = codec().encode("Pankaj Rai", "gold", "regular", 1);
        assert_eq!(id.artifact_file_name("jpeg"), "ticket_PR-GR-0001-C2A835.jpeg");
    }
}
