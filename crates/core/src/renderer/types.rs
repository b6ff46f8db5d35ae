//! Types for the renderer module.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Clockwise rotation applied to the text block before pasting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u16", into = "u16")]
pub enum Rotation {
    None,
    Clockwise90,
    Clockwise180,
    Clockwise270,
}

impl TryFrom<u16> for Rotation {
    type Error = String;

    fn try_from(degrees: u16) -> Result<Self, Self::Error> {
        match degrees {
            0 => Ok(Self::None),
            90 => Ok(Self::Clockwise90),
            180 => Ok(Self::Clockwise180),
            270 => Ok(Self::Clockwise270),
            other => Err(format!(
                "rotation must be 0, 90, 180 or 270 degrees, got {other}"
            )),
        }
    }
}

impl From<Rotation> for u16 {
    fn from(rotation: Rotation) -> Self {
        match rotation {
            Rotation::None => 0,
            Rotation::Clockwise90 => 90,
            Rotation::Clockwise180 => 180,
            Rotation::Clockwise270 => 270,
        }
    }
}

/// A request to stamp text onto a template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderRequest {
    /// Template image to draw on.
    pub template: PathBuf,
    /// Text to stamp (the ticket identifier).
    pub text: String,
    /// Where the rendered ticket is saved.
    pub output: PathBuf,
}

/// A rendered ticket on disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Artifact {
    pub path: PathBuf,
    pub width: u32,
    pub height: u32,
    pub size_bytes: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rotation_round_trips_through_degrees() {
        for degrees in [0u16, 90, 180, 270] {
            let rotation = Rotation::try_from(degrees).unwrap();
            assert_eq!(u16::from(rotation), degrees);
        }
        assert!(Rotation::try_from(360).is_err());
    }
}
