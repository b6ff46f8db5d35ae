//! Types for the mailer module.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// A file attached to an outgoing message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttachmentFile {
    /// File read at send time.
    pub path: PathBuf,
    /// Name shown to the recipient.
    pub filename: String,
    /// MIME type, e.g. `image/jpeg`.
    pub content_type: String,
}

impl AttachmentFile {
    /// Attachment whose content type is derived from the file extension.
    pub fn new(path: impl Into<PathBuf>, filename: impl Into<String>) -> Self {
        let path = path.into();
        let content_type = content_type_for(&path).to_string();
        Self {
            path,
            filename: filename.into(),
            content_type,
        }
    }
}

/// A fully composed message ready for a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutgoingMessage {
    pub from: String,
    pub to: String,
    pub subject: String,
    pub body: String,
    pub attachments: Vec<AttachmentFile>,
}

/// Confirmation returned by the transport.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryReceipt {
    pub recipient: String,
    /// Transport response, e.g. the SMTP reply code.
    pub response: String,
}

/// MIME type for common ticket and document extensions.
pub fn content_type_for(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_lowercase);

    match extension.as_deref() {
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("pdf") => "application/pdf",
        Some("txt") => "text/plain",
        _ => "application/octet-stream",
    }
}
