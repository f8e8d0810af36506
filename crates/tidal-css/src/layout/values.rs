//! Auto-or-length values that survive style resolution.
//!
//! [§ 6 Computed Values](https://www.w3.org/TR/css-cascade-4/#computed)

use super::box_model::EdgeSizes;

/// [§ 4.4 Automatic values](https://www.w3.org/TR/CSS2/cascade.html#value-def-auto)
///
/// "Some properties can take the keyword 'auto' as a value. This keyword
/// allows the user agent to compute the value based on other properties."
///
/// This enum represents a value that can either be 'auto' or a specific length.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum AutoOr {
    /// The value is 'auto' and must be resolved during layout.
    #[default]
    Auto,
    /// The value is a specific length in pixels.
    Length(f32),
}

impl AutoOr {
    /// Check if the value is 'auto'.
    #[must_use]
    pub const fn is_auto(&self) -> bool {
        matches!(self, Self::Auto)
    }

    /// Get the length value, or a default if 'auto'.
    #[must_use]
    pub const fn to_px_or(&self, default: f32) -> f32 {
        match self {
            Self::Length(v) => *v,
            Self::Auto => default,
        }
    }

    /// The length, if not 'auto'.
    #[must_use]
    pub const fn length(&self) -> Option<f32> {
        match self {
            Self::Length(v) => Some(*v),
            Self::Auto => None,
        }
    }
}

/// [§ 8 Box model](https://www.w3.org/TR/CSS2/box.html)
///
/// Edge values where each side can be 'auto' or a specific length.
/// Used for margins where 'auto' has special meaning (centering) and for the
/// `top`/`right`/`bottom`/`left` offsets of positioned boxes.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AutoEdgeSizes {
    /// Top edge value.
    pub top: AutoOr,
    /// Right edge value.
    pub right: AutoOr,
    /// Bottom edge value.
    pub bottom: AutoOr,
    /// Left edge value.
    pub left: AutoOr,
}

impl AutoEdgeSizes {
    /// Every side set to the same length.
    #[must_use]
    pub const fn uniform(px: f32) -> Self {
        Self {
            top: AutoOr::Length(px),
            right: AutoOr::Length(px),
            bottom: AutoOr::Length(px),
            left: AutoOr::Length(px),
        }
    }

    /// Every side 'auto'.
    #[must_use]
    pub const fn auto() -> Self {
        Self {
            top: AutoOr::Auto,
            right: AutoOr::Auto,
            bottom: AutoOr::Auto,
            left: AutoOr::Auto,
        }
    }

    /// Treat 'auto' sides as zero.
    #[must_use]
    pub const fn to_edges_or_zero(&self) -> EdgeSizes {
        EdgeSizes {
            top: self.top.to_px_or(0.0),
            right: self.right.to_px_or(0.0),
            bottom: self.bottom.to_px_or(0.0),
            left: self.left.to_px_or(0.0),
        }
    }
}
