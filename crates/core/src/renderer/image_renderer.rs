//! Renderer that composes tickets with the `image` crate.

use ab_glyph::{FontVec, PxScale};
use async_trait::async_trait;
use image::codecs::jpeg::JpegEncoder;
use image::{imageops, DynamicImage, Rgba, RgbaImage};
use imageproc::drawing::{draw_text_mut, text_size};
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, warn};

use super::config::RenderConfig;
use super::error::RenderError;
use super::traits::Renderer;
use super::types::{Artifact, RenderRequest, Rotation};

/// Stamps the identifier as a rotated text block onto the template.
pub struct ImageRenderer {
    config: RenderConfig,
    font: Arc<FontVec>,
}

impl ImageRenderer {
    /// Creates a renderer, loading the first usable font from the config.
    pub fn new(config: RenderConfig) -> Result<Self, RenderError> {
        let font = load_font(&config.fonts)?;
        Ok(Self::with_font(config, font))
    }

    /// Creates a renderer with an already loaded font.
    pub fn with_font(config: RenderConfig, font: FontVec) -> Self {
        Self {
            config,
            font: Arc::new(font),
        }
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }
}

#[async_trait]
impl Renderer for ImageRenderer {
    fn name(&self) -> &str {
        "image"
    }

    async fn render(&self, request: RenderRequest) -> Result<Artifact, RenderError> {
        let config = self.config.clone();
        let font = Arc::clone(&self.font);

        tokio::task::spawn_blocking(move || render_blocking(&config, &font, &request))
            .await
            .map_err(|e| RenderError::Task(e.to_string()))?
    }
}

fn render_blocking(
    config: &RenderConfig,
    font: &FontVec,
    request: &RenderRequest,
) -> Result<Artifact, RenderError> {
    let mut ticket = load_template(&request.template)?;

    let layer = text_layer(font, &request.text, config);
    let layer = rotate(&layer, config.rotation);
    stamp(&mut ticket, &layer, config.offset_x, config.offset_y);

    save_ticket(&ticket, &request.output, config.jpeg_quality)?;

    let size_bytes = std::fs::metadata(&request.output)?.len();
    debug!(
        "Rendered {} onto {:?} -> {:?}",
        request.text, request.template, request.output
    );

    Ok(Artifact {
        path: request.output.clone(),
        width: ticket.width(),
        height: ticket.height(),
        size_bytes,
    })
}

/// Loads the first font that exists and parses, warning when falling back.
pub fn load_font(candidates: &[PathBuf]) -> Result<FontVec, RenderError> {
    for (i, path) in candidates.iter().enumerate() {
        let bytes = match std::fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) => {
                debug!("Font {:?} unavailable: {}", path, e);
                continue;
            }
        };
        match FontVec::try_from_vec(bytes) {
            Ok(font) => {
                if i > 0 {
                    warn!("Preferred font not found, using {:?}", path);
                }
                return Ok(font);
            }
            Err(e) => warn!("Font {:?} could not be parsed: {}", path, e),
        }
    }

    Err(RenderError::FontUnavailable {
        tried: candidates.to_vec(),
    })
}

/// Opens the template as RGBA.
pub fn load_template(path: &Path) -> Result<RgbaImage, RenderError> {
    if !path.is_file() {
        return Err(RenderError::not_found(path));
    }
    let image = image::open(path).map_err(|e| RenderError::DecodeFailed {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    Ok(image.to_rgba8())
}

/// Draws `text` on a transparent block sized to the text plus padding.
fn text_layer(font: &FontVec, text: &str, config: &RenderConfig) -> RgbaImage {
    let scale = PxScale::from(config.font_size);
    let (width, height) = text_size(scale, font, text);
    let padding = config.padding;

    let mut layer = RgbaImage::from_pixel(
        width + padding,
        height + padding,
        Rgba([255, 255, 255, 0]),
    );
    let [r, g, b] = config.text_color;
    let inset = (padding / 2) as i32;
    draw_text_mut(&mut layer, Rgba([r, g, b, 255]), inset, inset, scale, font, text);
    layer
}

/// Rotates the block clockwise, growing the canvas to fit.
pub fn rotate(layer: &RgbaImage, rotation: Rotation) -> RgbaImage {
    match rotation {
        Rotation::None => layer.clone(),
        Rotation::Clockwise90 => imageops::rotate90(layer),
        Rotation::Clockwise180 => imageops::rotate180(layer),
        Rotation::Clockwise270 => imageops::rotate270(layer),
    }
}

/// Alpha-blends the block onto the ticket with its top-left corner at (x, y).
pub fn stamp(ticket: &mut RgbaImage, layer: &RgbaImage, x: i64, y: i64) {
    imageops::overlay(ticket, layer, x, y);
}

/// Saves as RGB. JPEG outputs honour `quality`; other extensions use the
/// format implied by the extension.
pub fn save_ticket(ticket: &RgbaImage, path: &Path, quality: u8) -> Result<(), RenderError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    let rgb = DynamicImage::ImageRgba8(ticket.clone()).to_rgb8();
    let encode_failed = |e: image::ImageError| RenderError::EncodeFailed {
        path: path.to_path_buf(),
        reason: e.to_string(),
    };

    let is_jpeg = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("jpeg") || ext.eq_ignore_ascii_case("jpg"))
        .unwrap_or(false);

    if is_jpeg {
        let mut writer = BufWriter::new(std::fs::File::create(path)?);
        DynamicImage::ImageRgb8(rgb)
            .write_with_encoder(JpegEncoder::new_with_quality(&mut writer, quality))
            .map_err(encode_failed)?;
    } else {
        rgb.save(path).map_err(encode_failed)?;
    }
    Ok(())
}
