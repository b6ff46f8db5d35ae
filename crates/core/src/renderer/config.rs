//! Configuration for the ticket renderer.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::types::Rotation;

/// Layout and encoding of rendered tickets.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderConfig {
    /// Extension of template assets and rendered tickets.
    #[serde(default = "default_extension")]
    pub template_extension: String,

    /// JPEG quality (1-100).
    #[serde(default = "default_quality")]
    pub jpeg_quality: u8,

    /// TrueType fonts, tried in order.
    #[serde(default = "default_fonts")]
    pub fonts: Vec<PathBuf>,

    /// Glyph height in pixels.
    #[serde(default = "default_font_size")]
    pub font_size: f32,

    /// Total extra space around the text, split evenly on both sides.
    #[serde(default = "default_padding")]
    pub padding: u32,

    /// Left edge of the pasted text block on the template.
    #[serde(default = "default_offset_x")]
    pub offset_x: i64,

    /// Top edge of the pasted text block on the template.
    #[serde(default = "default_offset_y")]
    pub offset_y: i64,

    /// Clockwise rotation of the text block, in degrees.
    #[serde(default = "default_rotation")]
    pub rotation: Rotation,

    /// Text colour as RGB.
    #[serde(default)]
    pub text_color: [u8; 3],
}

fn default_extension() -> String {
    "jpeg".to_string()
}

fn default_quality() -> u8 {
    95
}

fn default_fonts() -> Vec<PathBuf> {
    vec![
        PathBuf::from("fonts/CourierPrime-Regular.ttf"),
        PathBuf::from("arial.ttf"),
    ]
}

fn default_font_size() -> f32 {
    24.0
}

fn default_padding() -> u32 {
    20
}

fn default_offset_x() -> i64 {
    20
}

fn default_offset_y() -> i64 {
    230
}

fn default_rotation() -> Rotation {
    // Reads bottom-to-top along the ticket stub
    Rotation::Clockwise90
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            template_extension: default_extension(),
            jpeg_quality: default_quality(),
            fonts: default_fonts(),
            font_size: default_font_size(),
            padding: default_padding(),
            offset_x: default_offset_x(),
            offset_y: default_offset_y(),
            rotation: default_rotation(),
            text_color: [0, 0, 0],
        }
    }
}

impl RenderConfig {
    /// Sets the font candidates.
    pub fn with_fonts(mut self, fonts: Vec<PathBuf>) -> Self {
        self.fonts = fonts;
        self
    }

    /// Sets where the text block is pasted.
    pub fn with_offset(mut self, x: i64, y: i64) -> Self {
        self.offset_x = x;
        self.offset_y = y;
        self
    }

    /// Sets the rotation.
    pub fn with_rotation(mut self, rotation: Rotation) -> Self {
        self.rotation = rotation;
        self
    }
}
