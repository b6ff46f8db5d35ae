//! Template lookup.
//!
//! Templates live under a root directory, one folder per known speaker:
//!
//! ```text
//! templates/
//!   Pankaj Rai/Pankaj Rai_gold.jpeg
//!   Full-Day/Full-Day_platinum+.jpeg
//!   General/General.jpeg          <- used whenever no exact match exists
//! ```

use std::path::{Path, PathBuf};
use tracing::debug;

use crate::codec::CategoryCodes;

/// Folder (and file stem) of the universal fallback template.
pub const GENERAL_TEMPLATE: &str = "General";

/// A resolved template asset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateReference {
    pub path: PathBuf,
    /// True when the exact speaker/tier asset was absent.
    pub is_fallback: bool,
}

/// Resolves the template for a speaker and tier.
#[derive(Debug, Clone)]
pub struct TemplateResolver {
    root: PathBuf,
    extension: String,
    codes: CategoryCodes,
}

impl TemplateResolver {
    pub fn new(root: impl Into<PathBuf>, extension: impl Into<String>, codes: CategoryCodes) -> Self {
        Self {
            root: root.into(),
            extension: extension.into(),
            codes,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the universal fallback template.
    pub fn fallback(&self) -> PathBuf {
        self.root
            .join(GENERAL_TEMPLATE)
            .join(format!("{}.{}", GENERAL_TEMPLATE, self.extension))
    }

    /// Looks up `{root}/{folder}/{speaker}_{tier}.{ext}`, where folder is the
    /// speaker for known speakers and `General` otherwise.
    ///
    /// Falls back to `{root}/General/General.{ext}` without checking that it
    /// exists; a missing fallback surfaces when the template is rendered.
    pub fn resolve(&self, speaker: &str, tier: &str) -> TemplateReference {
        let folder = if self.codes.is_known_speaker(speaker) {
            speaker
        } else {
            GENERAL_TEMPLATE
        };
        let candidate = self
            .root
            .join(folder)
            .join(format!("{}_{}.{}", speaker, tier, self.extension));

        if candidate.is_file() {
            debug!("Resolved template {:?}", candidate);
            return TemplateReference {
                path: candidate,
                is_fallback: false,
            };
        }

        debug!("No template at {:?}, using General", candidate);
        TemplateReference {
            path: self.fallback(),
            is_fallback: true,
        }
    }
}
