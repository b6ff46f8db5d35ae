use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::batch::BatchConfig;
use crate::mailer::{EventConfig, MailConfig, MessageConfig};
use crate::renderer::RenderConfig;

/// Root configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub paths: PathsConfig,
    pub mail: MailConfig,
    #[serde(default)]
    pub codes: CodesConfig,
    #[serde(default)]
    pub message: MessageConfig,
    #[serde(default)]
    pub event: EventConfig,
    #[serde(default)]
    pub render: RenderConfig,
    #[serde(default)]
    pub batch: BatchConfig,
    #[serde(default)]
    pub credentials: CredentialsConfig,
    #[serde(default)]
    pub metrics: MetricsConfig,
}

/// Filesystem locations used by a run
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PathsConfig {
    /// Attendee roster (CSV with a header row).
    pub input: PathBuf,
    /// Root of the template tree (`{root}/{speaker}/{speaker}_{tier}.jpeg`).
    pub template_root: PathBuf,
    /// Where rendered tickets are written.
    pub output_dir: PathBuf,
    /// Issuance log; defaults to `issued_tickets.csv` inside `output_dir`.
    #[serde(default)]
    pub log_file: Option<PathBuf>,
    /// Document attached to every mail next to the ticket.
    pub supplement: PathBuf,
    /// Attachment name the supplement is sent under.
    #[serde(default = "default_supplement_name")]
    pub supplement_name: String,
}

impl PathsConfig {
    /// Resolved issuance log path.
    pub fn log_path(&self) -> PathBuf {
        self.log_file
            .clone()
            .unwrap_or_else(|| self.output_dir.join("issued_tickets.csv"))
    }
}

fn default_supplement_name() -> String {
    "Rules.pdf".to_string()
}

/// Category code tables. Keys are the labels found in the roster.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CodesConfig {
    #[serde(default = "default_speakers")]
    pub speakers: BTreeMap<String, String>,
    #[serde(default = "default_tiers")]
    pub tiers: BTreeMap<String, String>,
    #[serde(default = "default_ticket_types")]
    pub ticket_types: BTreeMap<String, String>,
}

impl Default for CodesConfig {
    fn default() -> Self {
        Self {
            speakers: default_speakers(),
            tiers: default_tiers(),
            ticket_types: default_ticket_types(),
        }
    }
}

fn table(entries: &[(&str, &str)]) -> BTreeMap<String, String> {
    entries
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

fn default_speakers() -> BTreeMap<String, String> {
    table(&[
        ("Pankaj Rai", "PR"),
        ("Sarika Singh", "SS1"),
        ("Meenakshi Anantram", "MA"),
        ("Neeraj Khanna", "NK"),
        ("Ananth Padmanabhan", "AP"),
        ("Ishan Shanavas", "IS"),
        ("Sandhya Sriram", "SS2"),
        ("Full-Day", "FD"),
        ("Diamond", "DM"),
    ])
}

fn default_tiers() -> BTreeMap<String, String> {
    table(&[
        ("silver", "S"),
        ("gold", "G"),
        ("platinum", "P"),
        ("platinum+", "PP"),
        ("diamond", "D"),
    ])
}

fn default_ticket_types() -> BTreeMap<String, String> {
    table(&[("early bird", "E"), ("full-day", "F"), ("regular", "R")])
}

/// Where the mail password comes from
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CredentialsConfig {
    #[serde(default)]
    pub method: CredentialMethod,
    /// Variable read by the `env` method.
    #[serde(default = "default_password_var")]
    pub env_var: String,
}

impl Default for CredentialsConfig {
    fn default() -> Self {
        Self {
            method: CredentialMethod::default(),
            env_var: default_password_var(),
        }
    }
}

fn default_password_var() -> String {
    "ADMIT_SMTP_PASSWORD".to_string()
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CredentialMethod {
    #[default]
    Prompt,
    Env,
}

/// Metrics output
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct MetricsConfig {
    /// Prometheus text file written after the run (textfile collector).
    #[serde(default)]
    pub textfile: Option<PathBuf>,
}

/// Sanitized config for logging (addresses kept, nothing secret is held here)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedConfig {
    pub input: PathBuf,
    pub template_root: PathBuf,
    pub output_dir: PathBuf,
    pub log_file: PathBuf,
    pub smtp: String,
    pub sender: String,
    pub credentials: String,
    pub row_delay_ms: u64,
    pub speakers: usize,
    pub tiers: usize,
    pub ticket_types: usize,
}

impl From<&Config> for SanitizedConfig {
    fn from(config: &Config) -> Self {
        Self {
            input: config.paths.input.clone(),
            template_root: config.paths.template_root.clone(),
            output_dir: config.paths.output_dir.clone(),
            log_file: config.paths.log_path(),
            smtp: format!("{}:{}", config.mail.host, config.mail.port),
            sender: config.mail.sender.clone(),
            credentials: match config.credentials.method {
                CredentialMethod::Prompt => "prompt".to_string(),
                CredentialMethod::Env => format!("env:{}", config.credentials.env_var),
            },
            row_delay_ms: config.batch.row_delay_ms,
            speakers: config.codes.speakers.len(),
            tiers: config.codes.tiers.len(),
            ticket_types: config.codes.ticket_types.len(),
        }
    }
}
