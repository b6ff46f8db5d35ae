//! Error types for the renderer module.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while rendering a ticket.
#[derive(Debug, Error)]
pub enum RenderError {
    /// Template image not found.
    #[error("Template not found: {path}")]
    ResourceNotFound { path: PathBuf },

    /// None of the configured fonts could be loaded.
    #[error("No usable font among {tried:?}")]
    FontUnavailable { tried: Vec<PathBuf> },

    /// Template could not be decoded.
    #[error("Failed to decode template {path}: {reason}")]
    DecodeFailed { path: PathBuf, reason: String },

    /// Rendered ticket could not be encoded or saved.
    #[error("Failed to save ticket {path}: {reason}")]
    EncodeFailed { path: PathBuf, reason: String },

    /// I/O error while rendering.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The blocking render task failed.
    #[error("Render task failed: {0}")]
    Task(String),
}

impl RenderError {
    /// Creates a resource not found error.
    pub fn not_found(path: impl Into<PathBuf>) -> Self {
        Self::ResourceNotFound { path: path.into() }
    }

    /// Whether a required asset was missing.
    pub fn is_resource_not_found(&self) -> bool {
        matches!(self, Self::ResourceNotFound { .. })
    }
}
