//! The rendering surface the engine lays out into.

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

use crate::layout::box_model::Rect;

/// [Media Queries § 4.5 orientation](https://www.w3.org/TR/mediaqueries-4/#orientation)
///
/// "The orientation media feature is portrait when the value of the height
/// media feature is greater than or equal to the value of the width media
/// feature. Otherwise orientation is landscape."
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumString, Display, AsRefStr,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    /// Height ≥ width.
    Portrait,
    /// Width > height.
    Landscape,
}

/// Size, origin and pixel density of the surface.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Viewport {
    /// Width in device pixels.
    pub width: f32,
    /// Height in device pixels.
    pub height: f32,
    /// Horizontal origin offset of the surface.
    pub x: f32,
    /// Vertical origin offset of the surface.
    pub y: f32,
    /// Device pixels per CSS pixel.
    pub device_pixel_ratio: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 1280.0,
            height: 720.0,
            x: 0.0,
            y: 0.0,
            device_pixel_ratio: 1.0,
        }
    }
}

impl Viewport {
    /// A viewport at the origin with a pixel ratio of one.
    #[must_use]
    pub const fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            x: 0.0,
            y: 0.0,
            device_pixel_ratio: 1.0,
        }
    }

    /// Builder-style pixel ratio override.
    #[must_use]
    pub const fn with_device_pixel_ratio(mut self, ratio: f32) -> Self {
        self.device_pixel_ratio = ratio;
        self
    }

    /// Portrait when height ≥ width.
    #[must_use]
    pub fn orientation(&self) -> Orientation {
        if self.height >= self.width {
            Orientation::Portrait
        } else {
            Orientation::Landscape
        }
    }

    /// The surface as a rectangle.
    #[must_use]
    pub const fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }
}
