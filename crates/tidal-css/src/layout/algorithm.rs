//! Layout algorithm dispatch.
//!
//! [CSS Display Module Level 3 § 2](https://www.w3.org/TR/css-display-3/#the-display-properties)
//!
//! "The inner display type... defines the kind of formatting context it
//! generates, dictating how its descendant boxes are laid out."
//!
//! Every algorithm shares one contract: given a node and the constraint on
//! its content box, return the content size plus the border boxes of its
//! in-flow children relative to the content origin. The engine owns
//! everything else (margins of the node itself, positioned offsets,
//! recursion), so an algorithm never writes to a child.

use std::collections::HashMap;
use std::str::FromStr;

use strum_macros::{AsRefStr, Display, EnumString};
use tidal_dom::NodeId;

use crate::error::{LayoutError, Result};
use crate::style::Display as DisplayValue;

use super::block::BlockLayout;
use super::box_model::{EdgeSizes, Point, Rect, Size};
use super::context::LayoutContext;
use super::flex::FlexLayout;
use super::inline::InlineLayout;

/// Available space along one axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Extent {
    /// The size is fixed.
    Exact(f32),
    /// Shrink to fit, up to this size.
    AtMost(f32),
    /// No limit: size to max-content.
    Unbounded,
}

impl Extent {
    /// The upper bound, if there is one.
    #[must_use]
    pub const fn limit(self) -> Option<f32> {
        match self {
            Self::Exact(v) | Self::AtMost(v) => Some(v),
            Self::Unbounded => None,
        }
    }

    /// The upper bound, or infinity.
    #[must_use]
    pub fn limit_or_infinite(self) -> f32 {
        self.limit().unwrap_or(f32::INFINITY)
    }

    /// The fixed size, if the extent is exact.
    #[must_use]
    pub const fn exact(self) -> Option<f32> {
        match self {
            Self::Exact(v) => Some(v),
            _ => None,
        }
    }

    /// This extent reduced by `amount` (floored at zero).
    #[must_use]
    pub fn shrink(self, amount: f32) -> Self {
        match self {
            Self::Exact(v) => Self::Exact((v - amount).max(0.0)),
            Self::AtMost(v) => Self::AtMost((v - amount).max(0.0)),
            Self::Unbounded => Self::Unbounded,
        }
    }

    /// Relax an exact size into an upper bound.
    #[must_use]
    pub const fn loosen(self) -> Self {
        match self {
            Self::Exact(v) => Self::AtMost(v),
            other => other,
        }
    }

    pub(crate) const fn key(self) -> (u8, u32) {
        match self {
            Self::Exact(v) => (0, v.to_bits()),
            Self::AtMost(v) => (1, v.to_bits()),
            Self::Unbounded => (2, 0),
        }
    }
}

/// Constraint on a content box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Constraint {
    /// Horizontal space.
    pub width: Extent,
    /// Vertical space.
    pub height: Extent,
}

impl Constraint {
    /// A constraint fixing both axes.
    #[must_use]
    pub const fn exact(size: Size) -> Self {
        Self {
            width: Extent::Exact(size.width),
            height: Extent::Exact(size.height),
        }
    }

    /// Max-content on both axes.
    #[must_use]
    pub const fn unbounded() -> Self {
        Self {
            width: Extent::Unbounded,
            height: Extent::Unbounded,
        }
    }

    /// A constraint with only the width limited.
    #[must_use]
    pub const fn width(width: Extent) -> Self {
        Self {
            width,
            height: Extent::Unbounded,
        }
    }
}

/// Placement of one in-flow child, relative to the parent's content origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChildPlacement {
    pub node: NodeId,
    pub border_box: Rect,
    /// Used margins (auto margins resolved).
    pub margin: EdgeSizes,
}

/// Output of one algorithm run.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Fragment {
    /// Content-box size of the node.
    pub size: Size,
    /// In-flow children in document order.
    pub placements: Vec<ChildPlacement>,
    /// Where the node's own text starts, relative to the content origin.
    pub text_origin: Option<Point>,
}

/// Names of the built-in algorithms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumString, Display, AsRefStr)]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum AlgorithmKind {
    Block,
    Inline,
    Flex,
}

impl AlgorithmKind {
    /// [§ 2 Box Layout Modes](https://www.w3.org/TR/css-display-3/#the-display-properties)
    ///
    /// flex and inline-flex use flex layout, inline and inline-block use
    /// inline layout, everything else is block layout.
    #[must_use]
    pub const fn for_display(display: DisplayValue) -> Self {
        match display {
            DisplayValue::Flex | DisplayValue::InlineFlex => Self::Flex,
            DisplayValue::Inline | DisplayValue::InlineBlock => Self::Inline,
            DisplayValue::None | DisplayValue::Block => Self::Block,
        }
    }
}

/// A layout strategy.
#[derive(Debug, Clone, PartialEq)]
pub enum LayoutAlgorithm {
    Block(BlockLayout),
    Inline(InlineLayout),
    Flex(FlexLayout),
}

impl LayoutAlgorithm {
    /// The display kind this algorithm serves.
    #[must_use]
    pub const fn kind(&self) -> AlgorithmKind {
        match self {
            Self::Block(_) => AlgorithmKind::Block,
            Self::Inline(_) => AlgorithmKind::Inline,
            Self::Flex(_) => AlgorithmKind::Flex,
        }
    }

    /// Size `node`'s content box within `constraint` and place its in-flow
    /// children.
    ///
    /// # Errors
    ///
    /// Fails with [`LayoutError::StyleNotResolved`] if the node or one of
    /// its children has no resolved style.
    pub fn layout(
        &self,
        ctx: &LayoutContext<'_>,
        node: NodeId,
        constraint: Constraint,
    ) -> Result<Fragment> {
        match self {
            Self::Block(block) => block.layout(ctx, node, constraint),
            Self::Inline(inline) => inline.layout(ctx, node, constraint),
            Self::Flex(flex) => flex.layout(ctx, node, constraint),
        }
    }

    /// Content size only.
    ///
    /// # Errors
    ///
    /// See [`LayoutAlgorithm::layout`].
    pub fn measure(
        &self,
        ctx: &LayoutContext<'_>,
        node: NodeId,
        constraint: Constraint,
    ) -> Result<Size> {
        Ok(self.layout(ctx, node, constraint)?.size)
    }

    /// Place children inside a content box whose size is already decided.
    ///
    /// # Errors
    ///
    /// See [`LayoutAlgorithm::layout`].
    pub fn arrange(&self, ctx: &LayoutContext<'_>, node: NodeId, content: Size) -> Result<Fragment> {
        self.layout(ctx, node, Constraint::exact(content))
    }
}

/// Registered algorithms, one per [`AlgorithmKind`].
#[derive(Debug, Clone, Default)]
pub struct AlgorithmTable {
    entries: HashMap<AlgorithmKind, LayoutAlgorithm>,
}

impl AlgorithmTable {
    /// An empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A table with block, inline and flex registered.
    #[must_use]
    pub fn with_defaults() -> Self {
        let mut table = Self::new();
        let _ = table.register(LayoutAlgorithm::Block(BlockLayout));
        let _ = table.register(LayoutAlgorithm::Inline(InlineLayout));
        let _ = table.register(LayoutAlgorithm::Flex(FlexLayout));
        table
    }

    /// Register `algorithm` under its kind, returning the one it replaces.
    pub fn register(&mut self, algorithm: LayoutAlgorithm) -> Option<LayoutAlgorithm> {
        self.entries.insert(algorithm.kind(), algorithm)
    }

    /// Remove the algorithm registered for `kind`.
    pub fn unregister(&mut self, kind: AlgorithmKind) -> Option<LayoutAlgorithm> {
        self.entries.remove(&kind)
    }

    /// # Errors
    ///
    /// Fails with [`LayoutError::UnknownAlgorithm`] if nothing is registered
    /// for `kind`.
    pub fn get(&self, kind: AlgorithmKind) -> Result<&LayoutAlgorithm> {
        self.entries
            .get(&kind)
            .ok_or_else(|| LayoutError::UnknownAlgorithm(kind.to_string()))
    }

    /// Look an algorithm up by name (`"block"`, `"inline"`, `"flex"`).
    ///
    /// # Errors
    ///
    /// Fails with [`LayoutError::UnknownAlgorithm`] if the name is not a
    /// known kind or nothing is registered for it.
    pub fn lookup(&self, name: &str) -> Result<&LayoutAlgorithm> {
        let kind = AlgorithmKind::from_str(name)
            .map_err(|_| LayoutError::UnknownAlgorithm(name.to_string()))?;
        self.get(kind)
    }

    /// Release every registration.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Number of registered algorithms.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no algorithm is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
