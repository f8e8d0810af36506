//! Unit resolution: authored lengths to device pixels.
//!
//! [§ 5 Distance Units](https://www.w3.org/TR/css-values-4/#lengths)

use std::collections::HashMap;
use std::str::FromStr;

use strum_macros::{AsRefStr, Display, EnumString};

use crate::error::Result;
use crate::layout::values::AutoOr;

use super::values::{AutoLength, DEFAULT_FONT_SIZE_PX, Length, LengthInput, LengthUnit};

/// Everything a relative length may depend on.
///
/// Sizes are in device pixels except `device_pixel_ratio` itself.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolutionContext {
    /// Scale applied to absolute units.
    pub device_pixel_ratio: f32,
    /// Font size of the element (or of its parent while resolving
    /// `font-size` itself).
    pub font_size: f32,
    /// Font size of the root element.
    pub root_font_size: f32,
    /// Used line height of the element, for `lh`.
    pub line_height: f32,
    /// Viewport width, for `vw`/`vi`/`vmin`/`vmax`.
    pub viewport_width: f32,
    /// Viewport height, for `vh`/`vb`/`vmin`/`vmax`.
    pub viewport_height: f32,
    /// Percentage basis of width-like properties.
    pub container_width: f32,
    /// Percentage basis of height-like properties.
    pub container_height: f32,
}

impl Default for ResolutionContext {
    fn default() -> Self {
        Self {
            device_pixel_ratio: 1.0,
            font_size: DEFAULT_FONT_SIZE_PX,
            root_font_size: DEFAULT_FONT_SIZE_PX,
            line_height: DEFAULT_FONT_SIZE_PX * 1.2,
            viewport_width: 0.0,
            viewport_height: 0.0,
            container_width: 0.0,
            container_height: 0.0,
        }
    }
}

/// What a length is the value of. Decides the percentage basis and the
/// meaning of `auto`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumString, Display, AsRefStr)]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum PropertyKind {
    /// `width`, `min-width`, `max-width`, `left`, `right`, `flex-basis`, gaps.
    Width,
    /// `height`, `min-height`, `max-height`, `top`, `bottom`.
    Height,
    /// `font-size`, `letter-spacing`, `word-spacing`.
    Font,
    /// `margin-*`
    Margin,
    /// `padding-*`
    Padding,
    /// `border-*-width`
    Border,
    /// `line-height`
    LineHeight,
    /// `top`/`right`/`bottom`/`left` on the horizontal axis.
    Offset,
    /// Anything else.
    Other,
}

impl PropertyKind {
    /// Classify a CSS property name. Unknown names are width-like.
    #[must_use]
    pub fn from_property(name: &str) -> Self {
        let name = name.trim().to_ascii_lowercase();
        match name.as_str() {
            "height" | "min-height" | "max-height" | "top" | "bottom" | "row-gap" => Self::Height,
            "font-size" | "letter-spacing" | "word-spacing" => Self::Font,
            "line-height" => Self::LineHeight,
            "left" | "right" => Self::Offset,
            _ if name.starts_with("margin") => Self::Margin,
            _ if name.starts_with("padding") => Self::Padding,
            _ if name.starts_with("border") => Self::Border,
            _ => Self::from_str(&name).unwrap_or(Self::Width),
        }
    }

    /// [§ 4.3 Percentages](https://www.w3.org/TR/css-values-4/#percentages)
    ///
    /// "Percentage values are always relative to another quantity."
    fn percent_basis(self, ctx: &ResolutionContext) -> f32 {
        match self {
            Self::Height => ctx.container_height,
            Self::Font | Self::LineHeight => ctx.font_size,
            // [§ 8.3 Margin properties](https://www.w3.org/TR/CSS2/box.html#margin-properties)
            // "The percentage is calculated with respect to the width of the
            // generated box's containing block." (also for vertical margins)
            Self::Width
            | Self::Margin
            | Self::Padding
            | Self::Border
            | Self::Offset
            | Self::Other => ctx.container_width,
        }
    }
}

/// Parses authored lengths and converts them to pixels.
///
/// Parsed values are cached by their source string; authored styles repeat
/// the same handful of strings on every node and every pass.
#[derive(Debug, Default)]
pub struct UnitResolver {
    cache: HashMap<String, AutoLength>,
}

impl UnitResolver {
    /// Create a resolver with an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse `src` in the unit grammar, consulting the cache first.
    ///
    /// # Errors
    ///
    /// `UnsupportedUnit` for an unknown suffix, `InvalidLength` when the
    /// numeric part does not parse.
    pub fn parse(&mut self, src: &str) -> Result<AutoLength> {
        if let Some(hit) = self.cache.get(src) {
            return Ok(*hit);
        }
        let parsed = AutoLength::from_str(src)?;
        let _ = self.cache.insert(src.to_string(), parsed);
        Ok(parsed)
    }

    /// Number of cached source strings.
    #[must_use]
    pub fn cache_len(&self) -> usize {
        self.cache.len()
    }

    /// Drop every cached parse.
    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }

    /// Resolve an authored value for `property`.
    ///
    /// `auto` resolves per property: width-like to the container width,
    /// height-like to [`AutoOr::Auto`] (derive from content), everything
    /// else to zero.
    ///
    /// # Errors
    ///
    /// Propagates parse errors from [`UnitResolver::parse`].
    pub fn resolve(
        &mut self,
        value: &LengthInput,
        property: PropertyKind,
        ctx: &ResolutionContext,
    ) -> Result<AutoOr> {
        let parsed = match value {
            LengthInput::Number(px) => AutoLength::Length(Length::px(*px)),
            LengthInput::Text(src) => self.parse(src)?,
        };
        Ok(match parsed {
            AutoLength::Auto => match property {
                PropertyKind::Width => AutoOr::Length(ctx.container_width),
                PropertyKind::Height => AutoOr::Auto,
                _ => AutoOr::Length(0.0),
            },
            AutoLength::Length(length) => AutoOr::Length(Self::to_px(length, property, ctx)),
        })
    }

    /// Resolve to pixels, mapping a height-like `auto` to `0`.
    ///
    /// # Errors
    ///
    /// Propagates parse errors from [`UnitResolver::parse`].
    pub fn resolve_px(
        &mut self,
        value: &LengthInput,
        property: PropertyKind,
        ctx: &ResolutionContext,
    ) -> Result<f32> {
        Ok(self.resolve(value, property, ctx)?.to_px_or(0.0))
    }

    /// Convert a parsed length to device pixels.
    ///
    /// [§ 6.1 Absolute lengths](https://www.w3.org/TR/css-values-4/#absolute-lengths)
    /// scale by the device pixel ratio; viewport-relative units are already
    /// in device pixels and are not scaled again.
    #[must_use]
    pub fn to_px(length: Length, property: PropertyKind, ctx: &ResolutionContext) -> f32 {
        let Length { value, unit } = length;
        if let Some(ratio) = unit.px_per_unit() {
            return value * ratio * ctx.device_pixel_ratio;
        }
        match unit {
            // [§ 5.1.1 Font-relative lengths](https://www.w3.org/TR/css-values-4/#font-relative-lengths)
            LengthUnit::Em => value * ctx.font_size,
            LengthUnit::Rem => value * ctx.root_font_size,
            LengthUnit::Ex | LengthUnit::Ch => value * ctx.font_size * 0.5,
            LengthUnit::Lh => value * ctx.line_height,
            // [§ 5.1.2 Viewport-percentage lengths](https://www.w3.org/TR/css-values-4/#viewport-relative-lengths)
            LengthUnit::Vw | LengthUnit::Vi => value / 100.0 * ctx.viewport_width,
            LengthUnit::Vh | LengthUnit::Vb => value / 100.0 * ctx.viewport_height,
            LengthUnit::Vmin => value / 100.0 * ctx.viewport_width.min(ctx.viewport_height),
            LengthUnit::Vmax => value / 100.0 * ctx.viewport_width.max(ctx.viewport_height),
            LengthUnit::Percent => value / 100.0 * property.percent_basis(ctx),
            // Absolute units returned above.
            LengthUnit::Px
            | LengthUnit::Pt
            | LengthUnit::Pc
            | LengthUnit::In
            | LengthUnit::Cm
            | LengthUnit::Mm
            | LengthUnit::Q => value * ctx.device_pixel_ratio,
        }
    }
}
