//! Testing utilities and mock implementations.
//!
//! Mocks for every injected capability of a batch run, so the whole
//! pipeline can be exercised without an SMTP server or image assets.
//!
//! # Example
//!
//! ```rust,ignore
//! use admit_core::testing::{fixtures, MockCredentialProvider, MockMailer, MockRenderer};
//!
//! let renderer = Arc::new(MockRenderer::new());
//! let mailer = Arc::new(MockMailer::new());
//! let runner = fixtures::runner(&dir, renderer.clone(), mailer.clone(),
//!     Arc::new(MockCredentialProvider::default()));
//!
//! let report = runner.run(&fixtures::roster(&[...])).await?;
//! assert_eq!(mailer.close_count().await, 1);
//! ```

mod mock_credentials;
mod mock_mailer;
mod mock_renderer;

pub use mock_credentials::MockCredentialProvider;
pub use mock_mailer::{MockMailer, MockSession};
pub use mock_renderer::{MockRenderer, RecordedRender};

/// Test fixtures and helper functions.
pub mod fixtures {
    use std::path::Path;
    use std::sync::Arc;
    use std::time::Duration;

    use crate::batch::{BatchRunner, BatchSettings};
    use crate::codec::{CategoryCodes, IdentifierCodec};
    use crate::config::CodesConfig;
    use crate::credentials::CredentialProvider;
    use crate::mailer::{AttachmentFile, EventConfig, Mailer, MessageConfig, MessageTemplate};
    use crate::renderer::Renderer;
    use crate::roster::Roster;
    use crate::template::TemplateResolver;

    /// Header row of a complete roster.
    pub const HEADERS: [&str; 6] = [
        "First Name",
        "Last Name",
        "Email ID",
        "Speaker",
        "Ticket Type",
        "Ticket Tier",
    ];

    /// The built-in code tables.
    pub fn codes() -> CategoryCodes {
        CategoryCodes::from_config(&CodesConfig::default())
            .expect("default code tables are valid")
    }

    /// A roster with [`HEADERS`] and the given rows.
    pub fn roster(rows: &[[&str; 6]]) -> Roster {
        Roster::new(
            HEADERS.iter().map(|h| h.to_string()).collect(),
            rows.iter()
                .map(|row| row.iter().map(|cell| cell.to_string()).collect())
                .collect(),
        )
    }

    /// A roster missing the given required column.
    pub fn roster_without(column: &str) -> Roster {
        let keep: Vec<usize> = (0..HEADERS.len())
            .filter(|&i| HEADERS[i] != column)
            .collect();
        Roster::new(
            keep.iter().map(|&i| HEADERS[i].to_string()).collect(),
            vec![keep.iter().map(|_| "x".to_string()).collect()],
        )
    }

    /// Settings writing under `dir` with no inter-row delay.
    pub fn settings(dir: &Path) -> BatchSettings {
        BatchSettings {
            row_delay: Duration::ZERO,
            output_dir: dir.join("out"),
            log_path: dir.join("out").join("issued_tickets.csv"),
            artifact_extension: "jpeg".to_string(),
            supplement: AttachmentFile::new(dir.join("rules.pdf"), "Rules.pdf"),
            message: MessageTemplate::new(
                "Ticket Desk <tickets@example.org>",
                MessageConfig::default(),
                EventConfig::default(),
            ),
        }
    }

    /// A runner with default codes and templates under `dir/templates`.
    pub fn runner(
        dir: &Path,
        renderer: Arc<dyn Renderer>,
        mailer: Arc<dyn Mailer>,
        credentials: Arc<dyn CredentialProvider>,
    ) -> BatchRunner {
        BatchRunner::new(
            settings(dir),
            IdentifierCodec::new(codes()),
            TemplateResolver::new(dir.join("templates"), "jpeg", codes()),
            renderer,
            mailer,
            credentials,
        )
    }
}
