//! Engine configuration.

use serde::{Deserialize, Serialize};

use crate::layout::metrics::ApproximateFontMetrics;
use crate::style::computed::NORMAL_LINE_HEIGHT;
use crate::style::{DEFAULT_FONT_SIZE_PX, ResolvedStyle};

/// Tunables of a [`LayoutEngine`](crate::LayoutEngine).
///
/// Every field has a default, so a scene file may carry a partial object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct EngineConfig {
    /// Root font size in CSS pixels.
    pub default_font_size: f32,
    /// Root font family.
    pub default_font_family: String,
    /// Multiplier for `line-height: normal`, also used by the approximate
    /// font metrics.
    pub line_height_ratio: f32,
    /// Average glyph advance as a fraction of the font size.
    pub char_width_ratio: f32,
    /// Minimum interval between two viewport evaluations.
    pub viewport_throttle_ms: f64,
    /// Media-query result cache entries kept before the cache is reset.
    pub media_cache_capacity: usize,
    /// Widths below this are "mobile" for adaptive spacing.
    pub mobile_max_width: f32,
    /// Widths above this are "wide" for adaptive spacing.
    pub wide_min_width: f32,
    /// Cache text measurement per node between passes.
    pub text_cache: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            default_font_size: DEFAULT_FONT_SIZE_PX,
            default_font_family: "sans-serif".to_string(),
            line_height_ratio: NORMAL_LINE_HEIGHT,
            char_width_ratio: 0.6,
            viewport_throttle_ms: 16.0,
            media_cache_capacity: 32,
            mobile_max_width: 768.0,
            wide_min_width: 1440.0,
            text_cache: true,
        }
    }
}

impl EngineConfig {
    /// The default style record handed to the cascade. Absolute sizes are
    /// scaled by the device pixel ratio.
    #[must_use]
    pub fn default_style(&self, device_pixel_ratio: f32) -> ResolvedStyle {
        let mut style = ResolvedStyle {
            font_family: self.default_font_family.clone(),
            font_size: self.default_font_size * device_pixel_ratio,
            line_height_factor: Some(self.line_height_ratio),
            ..ResolvedStyle::default()
        };
        style.sync_line_height();
        style
    }

    /// Font metrics matching the configured ratios.
    #[must_use]
    pub const fn font_metrics(&self) -> ApproximateFontMetrics {
        ApproximateFontMetrics::new(self.char_width_ratio, self.line_height_ratio)
    }
}
