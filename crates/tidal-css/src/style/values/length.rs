//! CSS Length values and parsing
//!
//! [CSS Values and Units Level 4](https://www.w3.org/TR/css-values-4/)

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

use crate::error::{LayoutError, Result};

/// Engine default font size.
/// [§ 3.5 font-size](https://www.w3.org/TR/css-fonts-4/#font-size-prop)
pub const DEFAULT_FONT_SIZE_PX: f32 = 16.0;

/// [§ 4.1 Lengths](https://www.w3.org/TR/css-values-4/#lengths)
///
/// Every unit suffix accepted in authored lengths.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumString, Display, AsRefStr,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum LengthUnit {
    /// [§ 6.1 Absolute lengths](https://www.w3.org/TR/css-values-4/#absolute-lengths)
    /// "1px = 1/96th of 1in"
    Px,
    /// "1pt = 1/72th of 1in"
    Pt,
    /// "1pc = 1/6th of 1in"
    Pc,
    /// "1in = 2.54cm = 96px"
    In,
    /// "1cm = 96px/2.54"
    Cm,
    /// "1mm = 1/10th of 1cm"
    Mm,
    /// "1Q = 1/40th of 1cm"
    Q,
    /// [§ 5.1.1 Font-relative lengths](https://www.w3.org/TR/css-values-4/#font-relative-lengths)
    /// "Equal to the computed value of the font-size property of the element"
    Em,
    /// "Equal to the computed value of font-size on the root element"
    Rem,
    /// x-height, approximated as half the font size.
    Ex,
    /// Advance of "0", approximated as half the font size.
    Ch,
    /// "Equal to the computed value of the line-height property"
    Lh,
    /// [§ 5.1.2 Viewport-percentage lengths](https://www.w3.org/TR/css-values-4/#viewport-relative-lengths)
    /// "1% of the width of the initial containing block"
    Vw,
    /// "1% of the height of the initial containing block"
    Vh,
    /// "1% of the smaller of vw or vh"
    Vmin,
    /// "1% of the larger of vw or vh"
    Vmax,
    /// Inline-axis viewport percentage (horizontal writing mode: `vw`).
    Vi,
    /// Block-axis viewport percentage (horizontal writing mode: `vh`).
    Vb,
    /// [§ 4.3 Percentages](https://www.w3.org/TR/css-values-4/#percentages)
    #[strum(serialize = "%")]
    #[serde(rename = "%")]
    Percent,
}

impl LengthUnit {
    /// Pixels per unit for the absolute units, before device-pixel-ratio
    /// scaling. `None` for relative units.
    #[must_use]
    pub const fn px_per_unit(self) -> Option<f32> {
        match self {
            Self::Px => Some(1.0),
            Self::In => Some(96.0),
            Self::Pt => Some(96.0 / 72.0),
            Self::Pc => Some(96.0 / 6.0),
            Self::Cm => Some(96.0 / 2.54),
            Self::Mm => Some(96.0 / 25.4),
            Self::Q => Some(96.0 / 101.6),
            _ => None,
        }
    }
}

/// A number paired with its unit, e.g. `2.5em`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Length {
    /// The numeric part.
    pub value: f32,
    /// The unit suffix.
    pub unit: LengthUnit,
}

impl Length {
    /// A length in CSS pixels.
    #[must_use]
    pub const fn px(value: f32) -> Self {
        Self {
            value,
            unit: LengthUnit::Px,
        }
    }

    /// A percentage.
    #[must_use]
    pub const fn percent(value: f32) -> Self {
        Self {
            value,
            unit: LengthUnit::Percent,
        }
    }
}

/// [§ 4.4 Automatic values](https://www.w3.org/TR/CSS2/cascade.html#value-def-auto)
///
/// "Some properties can take the keyword 'auto' as a value. This keyword
/// allows the user agent to compute the value based on other properties."
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum AutoLength {
    /// The value is 'auto' and will be resolved per property.
    Auto,
    /// A specific length value (px, em, vw, %, ...).
    Length(Length),
}

impl AutoLength {
    /// Check if the value is 'auto'.
    #[must_use]
    pub const fn is_auto(&self) -> bool {
        matches!(self, Self::Auto)
    }
}

impl FromStr for AutoLength {
    type Err = LayoutError;

    /// Parse the authored length grammar: `auto`, a bare number (pixels), or
    /// a number immediately followed by a unit suffix.
    fn from_str(src: &str) -> Result<Self> {
        let trimmed = src.trim();
        if trimmed.eq_ignore_ascii_case("auto") {
            return Ok(Self::Auto);
        }

        let split = numeric_prefix_len(trimmed);
        let (number, suffix) = trimmed.split_at(split);
        if number.is_empty() {
            return Err(LayoutError::InvalidLength {
                input: src.to_string(),
                reason: "expected a number".to_string(),
            });
        }
        let value: f32 = number.parse().map_err(|e| LayoutError::InvalidLength {
            input: src.to_string(),
            reason: format!("{e}"),
        })?;
        if !value.is_finite() {
            return Err(LayoutError::InvalidLength {
                input: src.to_string(),
                reason: "value is not finite".to_string(),
            });
        }

        let unit = if suffix.is_empty() {
            LengthUnit::Px
        } else {
            LengthUnit::from_str(suffix).map_err(|_| LayoutError::UnsupportedUnit {
                input: src.to_string(),
                unit: suffix.to_string(),
            })?
        };
        Ok(Self::Length(Length { value, unit }))
    }
}

/// Length of the leading `[+-]digits[.digits]` run.
///
/// Exponents are deliberately not consumed: `1em` must split as `1` + `em`.
fn numeric_prefix_len(s: &str) -> usize {
    let bytes = s.as_bytes();
    let mut i = 0;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        i += 1;
    }
    while i < bytes.len() && (bytes[i].is_ascii_digit() || bytes[i] == b'.') {
        i += 1;
    }
    i
}

/// An authored length: a bare number (pixels) or a string in the unit
/// grammar (`"1.5em"`, `"50vw"`, `"100%"`, `"auto"`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LengthInput {
    /// A number, interpreted as CSS pixels.
    Number(f32),
    /// A string to be parsed by the unit resolver.
    Text(String),
}

impl From<f32> for LengthInput {
    fn from(value: f32) -> Self {
        Self::Number(value)
    }
}

impl From<&str> for LengthInput {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for LengthInput {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}
