//! Batch configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::config::Config;
use crate::mailer::{AttachmentFile, MessageTemplate};

/// Configuration for a batch run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchConfig {
    /// Pause after every accepted row (milliseconds), to stay under the
    /// mail provider's rate limits. Zero disables the pause.
    #[serde(default = "default_row_delay")]
    pub row_delay_ms: u64,
}

fn default_row_delay() -> u64 {
    2000 // 2 seconds
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            row_delay_ms: default_row_delay(),
        }
    }
}

impl BatchConfig {
    pub fn row_delay(&self) -> Duration {
        Duration::from_millis(self.row_delay_ms)
    }
}

/// Everything the runner needs from the config, resolved once.
#[derive(Debug, Clone)]
pub struct BatchSettings {
    pub row_delay: Duration,
    pub output_dir: PathBuf,
    pub log_path: PathBuf,
    /// Extension of rendered tickets, also used for template lookup.
    pub artifact_extension: String,
    /// Attached to every message after the ticket.
    pub supplement: AttachmentFile,
    pub message: MessageTemplate,
}

impl BatchSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            row_delay: config.batch.row_delay(),
            output_dir: config.paths.output_dir.clone(),
            log_path: config.paths.log_path(),
            artifact_extension: config.render.template_extension.clone(),
            supplement: AttachmentFile::new(
                config.paths.supplement.clone(),
                config.paths.supplement_name.clone(),
            ),
            message: MessageTemplate::from_config(&config.mail, &config.message, &config.event),
        }
    }

    pub fn with_row_delay(mut self, row_delay: Duration) -> Self {
        self.row_delay = row_delay;
        self
    }
}
