//! Trait definitions for the renderer module.

use async_trait::async_trait;

use super::error::RenderError;
use super::types::{Artifact, RenderRequest};

/// A renderer that stamps ticket identifiers onto template images.
#[async_trait]
pub trait Renderer: Send + Sync {
    /// Returns the name of this renderer implementation.
    fn name(&self) -> &str;

    /// Renders the request and saves the result to `request.output`.
    ///
    /// Fails with [`RenderError::ResourceNotFound`] when the template is absent.
    async fn render(&self, request: RenderRequest) -> Result<Artifact, RenderError>;
}
