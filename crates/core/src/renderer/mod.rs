//! Renderer module for producing ticket images.
//!
//! This module provides the `Renderer` trait and an implementation that
//! stamps the ticket identifier onto a template image.
//!
//! # Features
//!
//! - TrueType text with a configurable font fallback chain
//! - Text block rotation to fit a narrow stub on the template
//! - Alpha compositing at a configurable offset
//! - JPEG output with configurable quality
//!
//! # Example
//!
//! ```ignore
//! use admit_core::renderer::{ImageRenderer, RenderConfig, RenderRequest, Renderer};
//!
//! let renderer = ImageRenderer::new(RenderConfig::default())?;
//! let artifact = renderer
//!     .render(RenderRequest {
//!         template: "templates/General/General.jpeg".into(),
//!         text: "PR-GR-0001-C2A835".to_string(),
//!         output: "out/ticket_PR-GR-0001-C2A835.jpeg".into(),
//!     })
//!     .await?;
//! println!("{}x{} ({} bytes)", artifact.width, artifact.height, artifact.size_bytes);
//! ```

mod config;
mod error;
mod image_renderer;
mod traits;
mod types;

pub use config::RenderConfig;
pub use error::RenderError;
pub use image_renderer::{load_font, ImageRenderer};
pub use traits::Renderer;
pub use types::{Artifact, RenderRequest, Rotation};
