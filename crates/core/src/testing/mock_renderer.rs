//! Mock renderer for testing.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::renderer::{Artifact, RenderError, RenderRequest, Renderer};

/// A recorded render request for test assertions.
#[derive(Debug, Clone)]
pub struct RecordedRender {
    /// The request that was submitted.
    pub request: RenderRequest,
    /// Whether the render succeeded.
    pub success: bool,
}

/// Mock implementation of the Renderer trait.
///
/// Provides controllable behavior for testing:
/// - Track render requests for assertions
/// - Fail the next render with a chosen error
/// - Optionally report missing templates like the real renderer
/// - Optionally write a placeholder artifact to disk
#[derive(Debug)]
pub struct MockRenderer {
    /// Recorded renders.
    renders: Arc<RwLock<Vec<RecordedRender>>>,
    /// If set, the next render will fail with this error.
    next_error: Arc<RwLock<Option<RenderError>>>,
    /// Fail with `ResourceNotFound` when the template is not a file.
    check_templates: Arc<RwLock<bool>>,
    /// Write placeholder bytes to the output path.
    write_artifacts: Arc<RwLock<bool>>,
}

impl Default for MockRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl MockRenderer {
    /// Create a new mock renderer.
    pub fn new() -> Self {
        Self {
            renders: Arc::new(RwLock::new(Vec::new())),
            next_error: Arc::new(RwLock::new(None)),
            check_templates: Arc::new(RwLock::new(false)),
            write_artifacts: Arc::new(RwLock::new(false)),
        }
    }

    /// Get all recorded renders.
    pub async fn recorded_renders(&self) -> Vec<RecordedRender> {
        self.renders.read().await.clone()
    }

    /// Get the number of renders attempted.
    pub async fn render_count(&self) -> usize {
        self.renders.read().await.len()
    }

    /// Configure the next render to fail with the given error.
    pub async fn set_next_error(&self, error: RenderError) {
        *self.next_error.write().await = Some(error);
    }

    /// Report missing templates as `ResourceNotFound`.
    pub async fn set_check_templates(&self, check: bool) {
        *self.check_templates.write().await = check;
    }

    /// Write a placeholder file at each output path.
    pub async fn set_write_artifacts(&self, write: bool) {
        *self.write_artifacts.write().await = write;
    }

    async fn take_error(&self) -> Option<RenderError> {
        self.next_error.write().await.take()
    }
}

#[async_trait]
impl Renderer for MockRenderer {
    fn name(&self) -> &str {
        "mock"
    }

    async fn render(&self, request: RenderRequest) -> Result<Artifact, RenderError> {
        let error = match self.take_error().await {
            Some(err) => Some(err),
            None if *self.check_templates.read().await && !request.template.is_file() => {
                Some(RenderError::not_found(request.template.clone()))
            }
            None => None,
        };

        if let Some(err) = error {
            self.renders.write().await.push(RecordedRender {
                request,
                success: false,
            });
            return Err(err);
        }

        let mut size_bytes = 0;
        if *self.write_artifacts.read().await {
            tokio::fs::write(&request.output, request.text.as_bytes()).await?;
            size_bytes = request.text.len() as u64;
        }

        self.renders.write().await.push(RecordedRender {
            request: request.clone(),
            success: true,
        });

        Ok(Artifact {
            path: request.output,
            width: 800,
            height: 300,
            size_bytes,
        })
    }
}
