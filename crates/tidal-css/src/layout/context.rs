//! Per-node layout state and the read-only view algorithms work through.

use std::cell::RefCell;
use std::collections::HashMap;
use std::sync::Arc;

use tidal_dom::{DomTree, NodeId};

use crate::error::{LayoutError, Result};
use crate::style::{AuthoredStyle, ResolvedStyle};
use crate::viewport::Viewport;

use super::algorithm::{AlgorithmKind, AlgorithmTable, Constraint, Extent, LayoutAlgorithm};
use super::box_model::{BoxDimensions, BoxModel, Point, Rect, Size};
use super::metrics::FontMetrics;
use super::text::{TextBreaker, TextCacheKey, TextLayout};

/// Geometry of one node after a pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NodeLayout {
    /// All four boxes in surface coordinates.
    pub dimensions: BoxDimensions,
    /// The border box; what the paint list reports.
    pub bounds: Rect,
    /// Origin of the node's own text run, if it has text.
    pub text_origin: Option<Point>,
    pub z_index: i32,
    /// Index into the paint list, `None` when the node is not painted.
    pub paint_order: Option<usize>,
}

/// Everything the engine keeps per node besides the tree structure.
#[derive(Debug, Default)]
pub struct NodeState {
    pub(crate) authored: AuthoredStyle,
    pub(crate) resolved: Option<Arc<ResolvedStyle>>,
    pub(crate) layout: Option<NodeLayout>,
    pub(crate) style_dirty: bool,
    pub(crate) layout_dirty: bool,
    pub(crate) text_cache: RefCell<Option<(TextCacheKey, Arc<TextLayout>)>>,
}

impl NodeState {
    /// A fresh node: unstyled and dirty.
    #[must_use]
    pub fn new() -> Self {
        Self {
            style_dirty: true,
            layout_dirty: true,
            ..Self::default()
        }
    }

    /// The sparse authored style.
    #[must_use]
    pub const fn authored(&self) -> &AuthoredStyle {
        &self.authored
    }

    /// The resolved style, once computed.
    #[must_use]
    pub fn resolved(&self) -> Option<&Arc<ResolvedStyle>> {
        self.resolved.as_ref()
    }

    /// The last layout, once computed.
    #[must_use]
    pub const fn layout(&self) -> Option<&NodeLayout> {
        self.layout.as_ref()
    }

    /// Whether style must be recomputed.
    #[must_use]
    pub const fn is_style_dirty(&self) -> bool {
        self.style_dirty
    }

    /// Whether bounds must be recomputed.
    #[must_use]
    pub const fn is_layout_dirty(&self) -> bool {
        self.layout_dirty
    }

    pub(crate) fn clear_text_cache(&self) {
        let _ = self.text_cache.borrow_mut().take();
    }
}

type MeasureKey = (NodeId, (u8, u32), (u8, u32));

/// Read-only view of the tree handed to layout algorithms during a pass.
///
/// Owns the per-pass measurement cache; text layouts are cached on the
/// nodes and survive until the node's style is recomputed.
pub struct LayoutContext<'a> {
    tree: &'a DomTree,
    root: NodeId,
    states: &'a [NodeState],
    algorithms: &'a AlgorithmTable,
    metrics: &'a dyn FontMetrics,
    viewport: Viewport,
    text_cache_enabled: bool,
    measure_cache: RefCell<HashMap<MeasureKey, Size>>,
}

impl<'a> LayoutContext<'a> {
    /// A context over one consistent snapshot of the tree.
    #[must_use]
    pub fn new(
        tree: &'a DomTree,
        root: NodeId,
        states: &'a [NodeState],
        algorithms: &'a AlgorithmTable,
        metrics: &'a dyn FontMetrics,
        viewport: Viewport,
        text_cache_enabled: bool,
    ) -> Self {
        Self {
            tree,
            root,
            states,
            algorithms,
            metrics,
            viewport,
            text_cache_enabled,
            measure_cache: RefCell::new(HashMap::new()),
        }
    }

    #[must_use]
    pub const fn tree(&self) -> &'a DomTree {
        self.tree
    }

    /// The node the pass started from.
    #[must_use]
    pub const fn root(&self) -> NodeId {
        self.root
    }

    #[must_use]
    pub const fn viewport(&self) -> Viewport {
        self.viewport
    }

    #[must_use]
    pub fn metrics(&self) -> &'a dyn FontMetrics {
        self.metrics
    }

    /// Resolved style of `node`.
    ///
    /// # Errors
    ///
    /// [`LayoutError::UnknownNode`] for a dead id, [`LayoutError::StyleNotResolved`]
    /// if the cascade has not reached the node yet.
    pub fn style(&self, node: NodeId) -> Result<&'a ResolvedStyle> {
        if !self.tree.contains(node) {
            return Err(LayoutError::UnknownNode(node));
        }
        self.states
            .get(node.0)
            .and_then(|s| s.resolved.as_deref())
            .ok_or(LayoutError::StyleNotResolved(node))
    }

    /// Children in document order.
    #[must_use]
    pub fn children(&self, node: NodeId) -> &'a [NodeId] {
        self.tree.children(node)
    }

    /// Own text of `node`, if any and non-empty.
    #[must_use]
    pub fn own_text(&self, node: NodeId) -> Option<&'a str> {
        self.tree.text(node).filter(|t| !t.is_empty())
    }

    /// Children taking part in the node's own layout: displayed and not
    /// absolutely positioned.
    ///
    /// # Errors
    ///
    /// Fails if a child has no resolved style.
    pub fn in_flow_children(&self, node: NodeId) -> Result<Vec<NodeId>> {
        let mut out = Vec::new();
        for &child in self.children(node) {
            if self.style(child)?.is_in_flow() {
                out.push(child);
            }
        }
        Ok(out)
    }

    /// The algorithm for `node`'s display type.
    ///
    /// # Errors
    ///
    /// [`LayoutError::UnknownAlgorithm`] if the kind was unregistered.
    pub fn algorithm_for(&self, node: NodeId) -> Result<&'a LayoutAlgorithm> {
        let kind = AlgorithmKind::for_display(self.style(node)?.display);
        self.algorithms.get(kind)
    }

    /// Break `node`'s own text at `max_width`.
    ///
    /// # Errors
    ///
    /// Fails if the node has no resolved style.
    pub fn text_layout(&self, node: NodeId, max_width: f32) -> Result<Arc<TextLayout>> {
        let style = self.style(node)?;
        let text = self.own_text(node).unwrap_or_default();
        let breaker = TextBreaker::new(self.metrics);
        if !self.text_cache_enabled {
            return Ok(Arc::new(breaker.layout(text, max_width, style)));
        }

        let key = TextCacheKey::new(text, style, max_width);
        let state = &self.states[node.0];
        if let Some((cached_key, layout)) = state.text_cache.borrow().as_ref()
            && *cached_key == key
        {
            return Ok(Arc::clone(layout));
        }
        let layout = Arc::new(breaker.layout(text, max_width, style));
        *state.text_cache.borrow_mut() = Some((key, Arc::clone(&layout)));
        Ok(layout)
    }

    /// Content size of `node` under `constraint`, memoized for the pass.
    ///
    /// # Errors
    ///
    /// Propagates algorithm failures.
    pub fn measure(&self, node: NodeId, constraint: Constraint) -> Result<Size> {
        let key = (node, constraint.width.key(), constraint.height.key());
        if let Some(size) = self.measure_cache.borrow().get(&key) {
            return Ok(*size);
        }
        let size = self.algorithm_for(node)?.measure(self, node, constraint)?;
        let _ = self.measure_cache.borrow_mut().insert(key, size);
        Ok(size)
    }

    /// [§ 10.3 Calculating widths and margins](https://www.w3.org/TR/CSS2/visudet.html#Computing_widths_and_margins)
    ///
    /// Used content width of `node` placed in a containing block whose
    /// content width is `available`:
    /// - an explicit `width` is converted through `box-sizing`,
    /// - a block-level box in a definite container fills it ("'margin-left'
    ///   + ... + 'margin-right' = width of containing block"),
    /// - anything else shrinks to fit: min(max-content, available).
    ///
    /// The result is clamped by `min-width`/`max-width`.
    ///
    /// # Errors
    ///
    /// Fails if the node or a descendant has no resolved style.
    pub fn content_width(&self, node: NodeId, available: Extent) -> Result<f32> {
        let style = self.style(node)?;
        let spacing = style.padding_and_border().horizontal();
        let margins = style.margin_or_zero().horizontal();

        let width = if let Some(specified) = style.width.length() {
            BoxModel::content_length(specified, spacing, style.box_sizing)
        } else {
            match available {
                Extent::Exact(w) if !style.display.is_inline_level() => {
                    (w - margins - spacing).max(0.0)
                }
                _ => {
                    let max_content = self.measure(node, Constraint::unbounded())?.width;
                    available
                        .limit()
                        .map_or(max_content, |w| max_content.min((w - margins - spacing).max(0.0)))
                }
            }
        };
        Ok(style.clamp_content_width(width))
    }

    /// Border-box size of `node` once its content width is decided.
    ///
    /// # Errors
    ///
    /// Fails if the node or a descendant has no resolved style.
    pub fn border_box_for_content_width(&self, node: NodeId, content_width: f32) -> Result<Size> {
        let style = self.style(node)?;
        let spacing = style.padding_and_border();
        let height = match style.height.length() {
            Some(specified) => {
                BoxModel::content_length(specified, spacing.vertical(), style.box_sizing)
            }
            None => {
                self.measure(node, Constraint::width(Extent::Exact(content_width)))?
                    .height
            }
        };
        Ok(Size::new(
            content_width + spacing.horizontal(),
            style.clamp_content_height(height) + spacing.vertical(),
        ))
    }

    /// Border-box size of `node` in a containing block of content width
    /// `available`.
    ///
    /// # Errors
    ///
    /// Fails if the node or a descendant has no resolved style.
    pub fn border_box_size(&self, node: NodeId, available: Extent) -> Result<Size> {
        let width = self.content_width(node, available)?;
        self.border_box_for_content_width(node, width)
    }

    /// Border-box height of `node` when its border box is `border_width` wide.
    ///
    /// # Errors
    ///
    /// Fails if the node or a descendant has no resolved style.
    pub fn border_box_height_for_width(&self, node: NodeId, border_width: f32) -> Result<f32> {
        let spacing = self.style(node)?.padding_and_border().horizontal();
        let content_width = (border_width - spacing).max(0.0);
        Ok(self.border_box_for_content_width(node, content_width)?.height)
    }
}
