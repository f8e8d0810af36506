//! CSS Color values and parsing
//!
//! [CSS Color Level 4](https://www.w3.org/TR/css-color-4/)

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{LayoutError, Result};

/// [§ 4 Color syntax](https://www.w3.org/TR/css-color-4/#color-syntax)
///
/// sRGB color with every channel normalized to `0.0..=1.0`, the form the
/// host renderer consumes directly.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rgba {
    /// "the red color channel"
    pub r: f32,
    /// "the green color channel"
    pub g: f32,
    /// "the blue color channel"
    pub b: f32,
    /// "the alpha channel" (1.0 = fully opaque)
    pub a: f32,
}

impl Rgba {
    /// Black (#000000)
    pub const BLACK: Self = Self::new(0.0, 0.0, 0.0, 1.0);

    /// White (#ffffff)
    pub const WHITE: Self = Self::new(1.0, 1.0, 1.0, 1.0);

    /// [§ 6.2 The 'transparent' keyword](https://www.w3.org/TR/css-color-4/#transparent-color)
    /// "transparent black"
    pub const TRANSPARENT: Self = Self::new(0.0, 0.0, 0.0, 0.0);

    /// Build a color from normalized channels.
    #[must_use]
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Build a color from 8-bit channels.
    #[must_use]
    pub fn from_u8(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self::new(
            f32::from(r) / 255.0,
            f32::from(g) / 255.0,
            f32::from(b) / 255.0,
            f32::from(a) / 255.0,
        )
    }

    /// Whether the alpha channel is zero.
    #[must_use]
    pub fn is_transparent(&self) -> bool {
        self.a <= 0.0
    }

    /// [§ 4.2 The RGB hexadecimal notations](https://www.w3.org/TR/css-color-4/#hex-notation)
    ///
    /// "The syntax of a <hex-color> is a <hash-token> token whose value
    /// consists of 3, 4, 6, or 8 hexadecimal digits."
    #[must_use]
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        if !hex.is_ascii() {
            return None;
        }
        let nibble = |i: usize| u8::from_str_radix(&hex[i..=i].repeat(2), 16).ok();
        let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
        match hex.len() {
            // [§ 4.2.1]
            // "The three-digit RGB notation (#RGB) is converted into six-digit
            // form (#RRGGBB) by replicating digits, not by adding zeros."
            3 => Some(Self::from_u8(nibble(0)?, nibble(1)?, nibble(2)?, 255)),
            4 => Some(Self::from_u8(nibble(0)?, nibble(1)?, nibble(2)?, nibble(3)?)),
            6 => Some(Self::from_u8(byte(0)?, byte(2)?, byte(4)?, 255)),
            8 => Some(Self::from_u8(byte(0)?, byte(2)?, byte(4)?, byte(6)?)),
            _ => None,
        }
    }

    /// [§ 6.1 Named Colors](https://www.w3.org/TR/css-color-4/#named-colors)
    ///
    /// Common entries of the named color table.
    #[must_use]
    pub fn from_named(name: &str) -> Option<Self> {
        let (r, g, b) = match name.to_ascii_lowercase().as_str() {
            "transparent" => return Some(Self::TRANSPARENT),
            "black" => (0, 0, 0),
            "white" => (255, 255, 255),
            "red" => (255, 0, 0),
            "green" => (0, 128, 0),
            "lime" => (0, 255, 0),
            "blue" => (0, 0, 255),
            "yellow" => (255, 255, 0),
            "cyan" | "aqua" => (0, 255, 255),
            "magenta" | "fuchsia" => (255, 0, 255),
            "gray" | "grey" => (128, 128, 128),
            "silver" => (192, 192, 192),
            "maroon" => (128, 0, 0),
            "navy" => (0, 0, 128),
            "teal" => (0, 128, 128),
            "olive" => (128, 128, 0),
            "purple" => (128, 0, 128),
            "orange" => (255, 165, 0),
            _ => return None,
        };
        Some(Self::from_u8(r, g, b, 255))
    }

    /// [§ 4.1 The RGB functions](https://www.w3.org/TR/css-color-4/#rgb-functions)
    ///
    /// Legacy comma syntax: `rgb(r, g, b)` / `rgba(r, g, b, a)` with 0-255
    /// channels and a 0-1 alpha.
    fn from_function(src: &str) -> Option<Self> {
        let lower = src.to_ascii_lowercase();
        let body = lower
            .strip_prefix("rgba(")
            .or_else(|| lower.strip_prefix("rgb("))?
            .strip_suffix(')')?;
        let parts: Vec<f32> = body
            .split(',')
            .map(|p| p.trim().parse::<f32>())
            .collect::<std::result::Result<_, _>>()
            .ok()?;
        let channel = |v: f32| (v / 255.0).clamp(0.0, 1.0);
        match parts.as_slice() {
            [r, g, b] => Some(Self::new(channel(*r), channel(*g), channel(*b), 1.0)),
            [r, g, b, a] => Some(Self::new(
                channel(*r),
                channel(*g),
                channel(*b),
                a.clamp(0.0, 1.0),
            )),
            _ => None,
        }
    }
}

impl FromStr for Rgba {
    type Err = LayoutError;

    fn from_str(src: &str) -> Result<Self> {
        let trimmed = src.trim();
        let parsed = if trimmed.starts_with('#') {
            Self::from_hex(trimmed)
        } else if trimmed.contains('(') {
            Self::from_function(trimmed)
        } else {
            Self::from_named(trimmed)
        };
        parsed.ok_or_else(|| LayoutError::InvalidColor(src.to_string()))
    }
}
