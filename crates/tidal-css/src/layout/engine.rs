//! The layout engine.
//!
//! [CSS 2.1 § 9 Visual formatting model](https://www.w3.org/TR/CSS2/visuren.html)
//!
//! Owns the element tree, the per-node style and layout state, and the
//! viewport. One pass runs in three phases:
//! 1. resolve styles top-down from the root,
//! 2. size and place every box, dispatching on its `display`,
//! 3. flatten the result into a paint list sorted by `z-index`.
//!
//! Mutations only mark state dirty and schedule a pass; the host drives
//! passes with [`LayoutEngine::tick`] or [`LayoutEngine::force_layout`].

use std::sync::Arc;
use std::time::{Duration, Instant};

use tidal_dom::{DomTree, NodeId};

use crate::cascade::StyleCascade;
use crate::config::EngineConfig;
use crate::error::{LayoutError, ListenerError, Result};
use crate::responsive::{
    Breakpoint, ListenerFailure, ListenerId, MediaCondition, ResponsiveEvaluator,
};
use crate::style::{AuthoredStyle, Position, ResolutionContext, ResolvedStyle};
use crate::viewport::Viewport;

use super::algorithm::{AlgorithmKind, AlgorithmTable, Extent, LayoutAlgorithm};
use super::box_model::{BoxModel, EdgeSizes, Point, Rect, Size};
use super::context::{LayoutContext, NodeLayout, NodeState};
use super::metrics::FontMetrics;
use super::paint::{PaintEntry, build_paint_list, hit_test};
use super::scheduler::Scheduler;
use super::text::{TextBreaker, TextLayout};

/// Layout of one node and its laid-out descendants.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutResult {
    pub node: NodeId,
    /// Border box in surface coordinates.
    pub bounds: Rect,
    /// Index into the paint list, `None` for invisible boxes.
    pub paint_order: Option<usize>,
    pub children: Vec<LayoutResult>,
}

/// Counters for instrumentation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LayoutStats {
    /// Completed passes.
    pub passes: u64,
    /// Duration of the last pass.
    pub last_pass: Duration,
    /// Duration of all passes together.
    pub total: Duration,
    /// Styles recomputed in the last pass.
    pub styled_nodes: usize,
    /// Boxes placed in the last pass.
    pub laid_out_nodes: usize,
    /// Length of the paint list after the last pass.
    pub paint_entries: usize,
}

/// CSS-like layout of an element tree into a viewport.
pub struct LayoutEngine {
    config: EngineConfig,
    tree: DomTree,
    states: Vec<NodeState>,
    root: Option<NodeId>,
    viewport: Viewport,
    cascade: StyleCascade,
    algorithms: AlgorithmTable,
    metrics: Box<dyn FontMetrics>,
    scheduler: Scheduler,
    responsive: ResponsiveEvaluator,
    paint_list: Vec<PaintEntry>,
    result: Option<LayoutResult>,
    stats: LayoutStats,
    /// Host time of the last [`LayoutEngine::tick`].
    clock_ms: f64,
}

impl LayoutEngine {
    /// An engine with the default configuration.
    #[must_use]
    pub fn new(viewport: Viewport) -> Self {
        Self::with_config(EngineConfig::default(), viewport)
    }

    /// An engine with `config`.
    #[must_use]
    pub fn with_config(config: EngineConfig, viewport: Viewport) -> Self {
        let defaults = Arc::new(config.default_style(viewport.device_pixel_ratio));
        let metrics = Box::new(config.font_metrics());
        let responsive = ResponsiveEvaluator::new(&config, viewport);
        Self {
            config,
            tree: DomTree::new(),
            states: Vec::new(),
            root: None,
            viewport,
            cascade: StyleCascade::new(defaults),
            algorithms: AlgorithmTable::with_defaults(),
            metrics,
            scheduler: Scheduler::new(),
            responsive,
            paint_list: Vec::new(),
            result: None,
            stats: LayoutStats::default(),
            clock_ms: 0.0,
        }
    }

    /// Replace the font metrics (for example with real glyph advances).
    #[must_use]
    pub fn with_metrics(mut self, metrics: impl FontMetrics + 'static) -> Self {
        self.metrics = Box::new(metrics);
        self.invalidate_all();
        self
    }

    #[must_use]
    pub const fn config(&self) -> &EngineConfig {
        &self.config
    }

    #[must_use]
    pub const fn tree(&self) -> &DomTree {
        &self.tree
    }

    #[must_use]
    pub const fn viewport(&self) -> Viewport {
        self.viewport
    }

    #[must_use]
    pub const fn root(&self) -> Option<NodeId> {
        self.root
    }

    // Tree construction

    /// Create a detached element.
    pub fn create_element(&mut self, tag: &str) -> NodeId {
        let id = self.tree.create_element(tag);
        self.reset_state(id);
        id
    }

    /// Create a detached text node.
    pub fn create_text(&mut self, text: &str) -> NodeId {
        let id = self.tree.create_text(text);
        self.reset_state(id);
        id
    }

    /// Give `id` a fresh state; the tree may hand out a recycled slot.
    fn reset_state(&mut self, id: NodeId) {
        while self.states.len() < self.tree.capacity() {
            self.states.push(NodeState::new());
        }
        self.states[id.0] = NodeState::new();
    }

    /// Make `node` the root of layout.
    ///
    /// # Errors
    ///
    /// [`LayoutError::UnknownNode`] for a dead id.
    pub fn set_root(&mut self, node: NodeId) -> Result<()> {
        self.require(node)?;
        self.root = Some(node);
        self.invalidate(node);
        Ok(())
    }

    /// Append `child` to `parent`, detaching it from any previous parent.
    ///
    /// # Errors
    ///
    /// Propagates tree errors (unknown nodes, cycles).
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<()> {
        self.insert_before(parent, child, None)
    }

    /// Insert `child` into `parent` before `reference` (at the end for `None`).
    ///
    /// # Errors
    ///
    /// Propagates tree errors (unknown nodes, cycles, foreign reference).
    pub fn insert_before(
        &mut self,
        parent: NodeId,
        child: NodeId,
        reference: Option<NodeId>,
    ) -> Result<()> {
        let old_parent = self.tree.parent(child);
        self.tree.insert_before(parent, child, reference)?;
        if let Some(old) = old_parent {
            self.invalidate_layout(old);
        }
        self.invalidate(child);
        Ok(())
    }

    /// Detach `child` from `parent`. The child stays alive.
    ///
    /// # Errors
    ///
    /// [`LayoutError::Tree`] if `child` is not a child of `parent`.
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) -> Result<()> {
        self.tree.remove_child(parent, child)?;
        self.invalidate_layout(parent);
        self.invalidate(child);
        Ok(())
    }

    /// Detach every child of `parent`, returning them.
    ///
    /// # Errors
    ///
    /// [`LayoutError::Tree`] if `parent` does not exist.
    pub fn clear_children(&mut self, parent: NodeId) -> Result<Vec<NodeId>> {
        let children = self.tree.clear_children(parent)?;
        for &child in &children {
            self.invalidate(child);
        }
        self.invalidate_layout(parent);
        Ok(children)
    }

    /// Destroy `node` and its subtree, releasing their state, caches and
    /// media queries.
    ///
    /// # Errors
    ///
    /// [`LayoutError::Tree`] if `node` does not exist.
    pub fn dispose_node(&mut self, node: NodeId) -> Result<()> {
        let parent = self.tree.parent(node);
        let disposed = self.tree.dispose(node)?;
        for id in &disposed {
            if let Some(state) = self.states.get_mut(id.0) {
                *state = NodeState::default();
            }
        }
        self.responsive.forget_targets(&disposed);
        if self.root.is_some_and(|root| disposed.contains(&root)) {
            self.root = None;
        }
        if let Some(parent) = parent {
            self.invalidate_layout(parent);
        }
        self.scheduler.schedule();
        Ok(())
    }

    // Style and content

    /// Merge `patch` into the node's authored style.
    ///
    /// # Errors
    ///
    /// [`LayoutError::UnknownNode`] for a dead id.
    pub fn set_style(&mut self, node: NodeId, patch: &AuthoredStyle) -> Result<()> {
        self.require(node)?;
        self.states[node.0].authored.merge(patch);
        self.invalidate(node);
        Ok(())
    }

    /// Replace the node's authored style.
    ///
    /// # Errors
    ///
    /// [`LayoutError::UnknownNode`] for a dead id.
    pub fn replace_style(&mut self, node: NodeId, style: AuthoredStyle) -> Result<()> {
        self.require(node)?;
        self.states[node.0].authored = style;
        self.invalidate(node);
        Ok(())
    }

    /// The node's authored style.
    #[must_use]
    pub fn authored_style(&self, node: NodeId) -> Option<&AuthoredStyle> {
        self.tree
            .contains(node)
            .then(|| self.states.get(node.0).map(NodeState::authored))
            .flatten()
    }

    /// Replace the node's raw text.
    ///
    /// # Errors
    ///
    /// [`LayoutError::UnknownNode`] for a dead id.
    pub fn set_text(&mut self, node: NodeId, text: &str) -> Result<()> {
        self.tree.set_text(node, Some(text.to_string()))?;
        self.invalidate_layout(node);
        Ok(())
    }

    // Viewport and responsive state

    /// Resize or move the surface. Everything is restyled on the next pass.
    pub fn set_viewport(&mut self, viewport: Viewport) {
        if viewport.device_pixel_ratio != self.viewport.device_pixel_ratio {
            self.cascade.set_defaults(Arc::new(
                self.config.default_style(viewport.device_pixel_ratio),
            ));
        }
        self.viewport = viewport;
        let _ = self.responsive.update_viewport(viewport, self.clock_ms);
        self.invalidate_all();
    }

    /// The responsive evaluator.
    #[must_use]
    pub const fn responsive(&self) -> &ResponsiveEvaluator {
        &self.responsive
    }

    /// The responsive evaluator, for changes the engine has no wrapper for.
    ///
    /// Everything is restyled on the next pass, since the caller may toggle
    /// any query.
    pub fn responsive_mut(&mut self) -> &mut ResponsiveEvaluator {
        self.invalidate_all();
        &mut self.responsive
    }

    /// Register (or replace) a breakpoint.
    pub fn add_breakpoint(&mut self, name: &str, breakpoint: Breakpoint) {
        for target in self.responsive.add_breakpoint(name, breakpoint) {
            self.invalidate(target);
        }
    }

    /// Register a media query whose patch applies to `target` while its
    /// condition holds. Returns whether it is active now.
    ///
    /// # Errors
    ///
    /// [`LayoutError::UnknownNode`] for a dead target,
    /// [`LayoutError::UnknownBreakpoint`] for an unregistered breakpoint.
    pub fn add_media_query(
        &mut self,
        name: &str,
        condition: MediaCondition,
        patch: AuthoredStyle,
        target: NodeId,
    ) -> Result<bool> {
        self.require(target)?;
        let previous = self
            .responsive
            .media_queries()
            .find(|q| q.name() == name)
            .map(|q| q.target());
        let active = self.responsive.add_media_query(name, condition, patch, target)?;
        if let Some(previous) = previous.filter(|p| self.tree.contains(*p)) {
            self.invalidate(previous);
        }
        self.invalidate(target);
        Ok(active)
    }

    /// Unregister a media query.
    ///
    /// # Errors
    ///
    /// [`LayoutError::UnknownMediaQuery`] if no query has this name.
    pub fn remove_media_query(&mut self, name: &str) -> Result<()> {
        let removed = self.responsive.remove_media_query(name)?;
        if self.tree.contains(removed.target()) {
            self.invalidate(removed.target());
        }
        Ok(())
    }

    /// Register a viewport-change listener.
    pub fn add_viewport_listener(
        &mut self,
        listener: impl FnMut(&Viewport) -> std::result::Result<(), ListenerError> + 'static,
    ) -> ListenerId {
        self.responsive.add_listener(listener)
    }

    /// Unregister a viewport-change listener.
    pub fn remove_viewport_listener(&mut self, id: ListenerId) -> bool {
        self.responsive.remove_listener(id)
    }

    /// Listener errors collected since the last call.
    pub fn take_listener_failures(&mut self) -> Vec<ListenerFailure> {
        self.responsive.take_failures()
    }

    /// Unregister a breakpoint.
    ///
    /// # Errors
    ///
    /// [`LayoutError::UnknownBreakpoint`] if no breakpoint has this name.
    pub fn remove_breakpoint(&mut self, name: &str) -> Result<()> {
        for target in self.responsive.remove_breakpoint(name)? {
            if self.tree.contains(target) {
                self.invalidate(target);
            }
        }
        Ok(())
    }

    // Algorithms

    /// Register a layout algorithm, replacing the one of the same kind.
    pub fn register_algorithm(&mut self, algorithm: LayoutAlgorithm) -> Option<LayoutAlgorithm> {
        self.invalidate_all();
        self.algorithms.register(algorithm)
    }

    /// Unregister the algorithm of `kind`. Boxes of that kind then fail to
    /// lay out with [`LayoutError::UnknownAlgorithm`].
    pub fn unregister_algorithm(&mut self, kind: AlgorithmKind) -> Option<LayoutAlgorithm> {
        self.invalidate_all();
        self.algorithms.unregister(kind)
    }

    /// The registered algorithms.
    #[must_use]
    pub const fn algorithms(&self) -> &AlgorithmTable {
        &self.algorithms
    }

    // Scheduling

    /// Request a pass on the next [`Self::tick`].
    pub fn schedule(&mut self) {
        self.scheduler.schedule();
    }

    /// Drop a pending pass.
    pub fn cancel(&mut self) {
        self.scheduler.cancel();
    }

    /// Whether a pass is pending.
    #[must_use]
    pub fn is_scheduled(&self) -> bool {
        self.scheduler.is_scheduled()
    }

    /// Frame callback at host time `now_ms`: applies a throttled viewport
    /// update if one is due, then runs the pending pass, if any.
    ///
    /// Returns whether a pass ran.
    ///
    /// # Errors
    ///
    /// Propagates style and layout errors of the pass.
    pub fn tick(&mut self, now_ms: f64) -> Result<bool> {
        self.clock_ms = now_ms;
        for target in self.responsive.flush(now_ms) {
            if self.tree.contains(target) {
                self.invalidate(target);
            }
        }
        if !self.scheduler.is_scheduled() {
            return Ok(false);
        }
        self.run_pass()
    }

    /// Cancel any pending pass and lay out now. A throttled viewport update
    /// is applied first, whether or not its interval has passed.
    ///
    /// Returns `None` if a pass is already running.
    ///
    /// # Errors
    ///
    /// Propagates style and layout errors of the pass.
    pub fn force_layout(&mut self) -> Result<Option<&LayoutResult>> {
        for target in self.responsive.flush_now(self.clock_ms) {
            if self.tree.contains(target) {
                self.invalidate(target);
            }
        }
        self.scheduler.cancel();
        if self.run_pass()? {
            Ok(self.result.as_ref())
        } else {
            Ok(None)
        }
    }

    /// Cancel pending work and release the paint list, the last result and
    /// every algorithm registration.
    pub fn dispose(&mut self) {
        self.scheduler.cancel();
        self.paint_list.clear();
        self.result = None;
        self.algorithms.clear();
    }

    // Results

    /// Boxes in paint order (back to front).
    #[must_use]
    pub fn paint_list(&self) -> &[PaintEntry] {
        &self.paint_list
    }

    /// Result tree of the last pass.
    #[must_use]
    pub const fn layout_result(&self) -> Option<&LayoutResult> {
        self.result.as_ref()
    }

    /// Geometry of `node` after the last pass.
    #[must_use]
    pub fn node_layout(&self, node: NodeId) -> Option<&NodeLayout> {
        self.live_state(node).and_then(NodeState::layout)
    }

    /// Resolved style of `node` after the last pass.
    #[must_use]
    pub fn resolved_style(&self, node: NodeId) -> Option<&ResolvedStyle> {
        self.live_state(node)
            .and_then(NodeState::resolved)
            .map(Arc::as_ref)
    }

    /// Break the node's text at `max_width` using its resolved style.
    ///
    /// # Errors
    ///
    /// [`LayoutError::UnknownNode`] for a dead id,
    /// [`LayoutError::StyleNotResolved`] before the node's first pass.
    pub fn measure_text(&self, node: NodeId, max_width: f32) -> Result<TextLayout> {
        self.require(node)?;
        let style = self
            .live_state(node)
            .and_then(NodeState::resolved)
            .ok_or(LayoutError::StyleNotResolved(node))?;
        let text = self.tree.text(node).unwrap_or_default();
        Ok(TextBreaker::new(self.metrics.as_ref()).layout(text, max_width, style))
    }

    /// First paint-list entry containing `(x, y)`.
    #[must_use]
    pub fn hit_test(&self, x: f32, y: f32) -> Option<NodeId> {
        hit_test(&self.paint_list, x, y)
    }

    /// Counters of the passes so far.
    #[must_use]
    pub const fn stats(&self) -> LayoutStats {
        self.stats
    }

    // Invalidation

    fn require(&self, node: NodeId) -> Result<()> {
        if self.tree.contains(node) {
            Ok(())
        } else {
            Err(LayoutError::UnknownNode(node))
        }
    }

    fn live_state(&self, node: NodeId) -> Option<&NodeState> {
        self.tree
            .contains(node)
            .then(|| self.states.get(node.0))
            .flatten()
    }

    /// Style of `node` and its subtree is stale; bounds of its ancestors too.
    fn invalidate(&mut self, node: NodeId) {
        let subtree: Vec<NodeId> = self.tree.descendants(node).collect();
        for id in subtree {
            if let Some(state) = self.states.get_mut(id.0) {
                state.style_dirty = true;
                state.layout_dirty = true;
            }
        }
        self.invalidate_layout(node);
    }

    /// Bounds of `node` and its ancestors are stale.
    fn invalidate_layout(&mut self, node: NodeId) {
        let chain: Vec<NodeId> = std::iter::once(node)
            .chain(self.tree.ancestors(node))
            .collect();
        for id in chain {
            if let Some(state) = self.states.get_mut(id.0) {
                state.layout_dirty = true;
            }
        }
        self.scheduler.schedule();
    }

    fn invalidate_all(&mut self) {
        for state in &mut self.states {
            state.style_dirty = true;
            state.layout_dirty = true;
        }
        self.scheduler.schedule();
    }

    // The pass

    /// Returns `false` if a pass is already running.
    fn run_pass(&mut self) -> Result<bool> {
        if !self.scheduler.begin() {
            log::warn!("layout pass requested while one is running; ignored");
            return Ok(false);
        }
        let started = Instant::now();
        let outcome = self.compute();
        self.scheduler.finish();
        let (styled, laid_out) = outcome?;

        let elapsed = started.elapsed();
        self.stats.passes += 1;
        self.stats.last_pass = elapsed;
        self.stats.total += elapsed;
        self.stats.styled_nodes = styled;
        self.stats.laid_out_nodes = laid_out;
        self.stats.paint_entries = self.paint_list.len();
        log::debug!(
            "layout pass {} in {elapsed:?}: {styled} styled, {laid_out} placed, {} painted",
            self.stats.passes,
            self.paint_list.len()
        );
        Ok(true)
    }

    /// Returns `(styled, laid_out)` counts.
    fn compute(&mut self) -> Result<(usize, usize)> {
        let Some(root) = self.root else {
            self.paint_list.clear();
            self.result = None;
            return Ok((0, 0));
        };

        // PHASE 1: Style.
        let mut styled = 0;
        let basis = Size::new(self.viewport.width, self.viewport.height);
        self.style_node(root, None, None, basis, false, &mut styled)?;

        // PHASE 2: Layout.
        let layouts = {
            let ctx = LayoutContext::new(
                &self.tree,
                root,
                &self.states,
                &self.algorithms,
                self.metrics.as_ref(),
                self.viewport,
                self.config.text_cache,
            );
            let mut out = Vec::new();
            layout_root(&ctx, root, &mut out)?;
            out
        };
        let laid_out = layouts.len();
        for state in &mut self.states {
            state.layout = None;
        }
        for (node, layout) in layouts {
            if let Some(state) = self.states.get_mut(node.0) {
                state.layout = Some(layout);
            }
        }
        let subtree: Vec<NodeId> = self.tree.descendants(root).collect();
        for id in &subtree {
            if let Some(state) = self.states.get_mut(id.0) {
                state.layout_dirty = false;
            }
        }

        // PHASE 3: Paint order.
        let entries = subtree
            .iter()
            .enumerate()
            .filter_map(|(order, &node)| {
                let state = self.states.get(node.0)?;
                let layout = state.layout.as_ref()?;
                let style = state.resolved.as_ref()?;
                style.visibility.is_visible().then_some(PaintEntry {
                    node,
                    bounds: layout.bounds,
                    z_index: layout.z_index,
                    order,
                })
            })
            .collect();
        self.paint_list = build_paint_list(entries);
        for (index, entry) in self.paint_list.iter().enumerate() {
            if let Some(layout) = self
                .states
                .get_mut(entry.node.0)
                .and_then(|s| s.layout.as_mut())
            {
                layout.paint_order = Some(index);
            }
        }
        self.result = self.build_result(root);
        Ok((styled, laid_out))
    }

    /// Recompute the style of `node` if it is dirty, missing or `force`d,
    /// then recurse. A recomputed node forces its children: they inherit.
    ///
    /// `basis` is the percentage basis for the node's lengths.
    fn style_node(
        &mut self,
        node: NodeId,
        parent: Option<&Arc<ResolvedStyle>>,
        root_font_size: Option<f32>,
        basis: Size,
        force: bool,
        styled: &mut usize,
    ) -> Result<()> {
        let state = &self.states[node.0];
        let recompute = force || state.style_dirty || state.resolved.is_none();
        let cached = if recompute {
            None
        } else {
            state.resolved.clone()
        };
        let style = if let Some(style) = cached {
            style
        } else {
            let mut authored = self.states[node.0].authored.clone();
            for patch in self.responsive.active_patches(node) {
                authored.merge(patch);
            }
            let defaults = Arc::clone(self.cascade.defaults());
            let inherited = parent.map_or(defaults.as_ref(), Arc::as_ref);
            let ctx = ResolutionContext {
                device_pixel_ratio: self.viewport.device_pixel_ratio,
                font_size: inherited.font_size,
                root_font_size: root_font_size.unwrap_or(defaults.font_size),
                line_height: inherited.line_height,
                viewport_width: self.viewport.width,
                viewport_height: self.viewport.height,
                container_width: basis.width,
                container_height: basis.height,
            };
            let tag = self.tree.tag_name(node).unwrap_or_default().to_string();
            let computed = Arc::new(self.cascade.compute(
                &tag,
                &authored,
                parent.map(Arc::as_ref),
                &ctx,
            )?);
            let state = &mut self.states[node.0];
            state.resolved = Some(Arc::clone(&computed));
            state.style_dirty = false;
            state.clear_text_cache();
            *styled += 1;
            log::trace!("styled {node} <{tag}>");
            computed
        };

        let root_font_size = root_font_size.or(Some(style.font_size));
        let child_basis = percentage_basis(&style, basis, self.viewport);
        let children = self.tree.children(node).to_vec();
        for child in children {
            self.style_node(
                child,
                Some(&style),
                root_font_size,
                child_basis,
                recompute,
                styled,
            )?;
        }
        Ok(())
    }

    fn build_result(&self, node: NodeId) -> Option<LayoutResult> {
        let layout = self.states.get(node.0)?.layout.as_ref()?;
        Some(LayoutResult {
            node,
            bounds: layout.bounds,
            paint_order: layout.paint_order,
            children: self
                .tree
                .children(node)
                .iter()
                .filter_map(|&child| self.build_result(child))
                .collect(),
        })
    }
}

/// Percentage basis handed to the children of a box with `style`.
///
/// [§ 10.1 Definition of "containing block"](https://www.w3.org/TR/CSS2/visudet.html#containing-block-details)
///
/// The width is the box's definite content width, or its own basis minus
/// its margins, border and padding. Heights only have a basis under an
/// explicit height; otherwise they fall back to the viewport.
fn percentage_basis(style: &ResolvedStyle, basis: Size, viewport: Viewport) -> Size {
    let spacing = style.padding_and_border();
    let margin = style.margin_or_zero();
    let width = style.width.length().map_or_else(
        || (basis.width - margin.horizontal() - spacing.horizontal()).max(0.0),
        |w| BoxModel::content_length(w, spacing.horizontal(), style.box_sizing),
    );
    let height = style.height.length().map_or(viewport.height, |h| {
        BoxModel::content_length(h, spacing.vertical(), style.box_sizing)
    });
    Size::new(width, height)
}

/// Size and place the root against the viewport, then its subtree.
fn layout_root(
    ctx: &LayoutContext<'_>,
    root: NodeId,
    out: &mut Vec<(NodeId, NodeLayout)>,
) -> Result<()> {
    let style = ctx.style(root)?;
    if style.display.is_none() {
        return Ok(());
    }
    let viewport = ctx.viewport();
    let size = ctx.border_box_size(root, Extent::Exact(viewport.width))?;
    let margin = style.margin_or_zero();
    let (left, right) = BoxModel::resolve_auto_margins(
        viewport.width,
        size.width,
        style.margin.left,
        style.margin.right,
    );
    let margin = EdgeSizes {
        left,
        right,
        ..margin
    };
    let border_box = Rect::new(
        viewport.x + left,
        viewport.y + margin.top,
        size.width,
        size.height,
    );
    place_node(ctx, root, border_box, margin, out)
}

/// Record `node` at `border_box`, let its algorithm place its in-flow
/// children, then position its out-of-flow children, recursing into each.
fn place_node(
    ctx: &LayoutContext<'_>,
    node: NodeId,
    border_box: Rect,
    margin: EdgeSizes,
    out: &mut Vec<(NodeId, NodeLayout)>,
) -> Result<()> {
    let style = ctx.style(node)?;
    let dimensions = BoxModel::from_border_box(border_box, style.padding, style.border_width, margin);
    let content = dimensions.content_box();
    let fragment = ctx.algorithm_for(node)?.arrange(ctx, node, content.size())?;
    log::trace!("placed {node} at {border_box:?}");

    out.push((
        node,
        NodeLayout {
            dimensions,
            bounds: border_box,
            text_origin: fragment.text_origin.map(|p| Point {
                x: content.x + p.x,
                y: content.y + p.y,
            }),
            z_index: style.z_index,
            paint_order: None,
        },
    ));

    for placement in fragment.placements {
        let mut rect = placement.border_box.translate(content.x, content.y);
        let child_style = ctx.style(placement.node)?;
        if child_style.position == Position::Relative {
            let (dx, dy) = relative_offset(child_style);
            rect = rect.translate(dx, dy);
        }
        place_node(ctx, placement.node, rect, placement.margin, out)?;
    }

    // [§ 10.1 Definition of "containing block"](https://www.w3.org/TR/CSS2/visudet.html#containing-block-details)
    //
    // "If the element has 'position: absolute', the containing block is
    // established by the nearest ancestor with a 'position' other than
    // 'static'... formed by the padding edge of the ancestor." Here the
    // parent always acts as that ancestor; fixed boxes use the viewport.
    for &child in ctx.children(node) {
        let child_style = ctx.style(child)?;
        if child_style.display.is_none() || !child_style.position.is_out_of_flow() {
            continue;
        }
        let containing_block = if child_style.position == Position::Fixed {
            ctx.viewport().rect()
        } else {
            dimensions.padding_box()
        };
        let (rect, child_margin) = absolute_box(
            ctx,
            child,
            child_style,
            containing_block,
            Point {
                x: content.x,
                y: content.y,
            },
        )?;
        place_node(ctx, child, rect, child_margin, out)?;
    }
    Ok(())
}

/// [§ 9.4.3 Relative positioning](https://www.w3.org/TR/CSS2/visuren.html#relative-positioning)
///
/// "If both 'left' and 'right' are not 'auto'... 'right' is ignored"; the
/// same holds for 'top' over 'bottom'.
fn relative_offset(style: &ResolvedStyle) -> (f32, f32) {
    let offsets = style.offsets;
    let dx = offsets
        .left
        .length()
        .or_else(|| offsets.right.length().map(|r| -r))
        .unwrap_or(0.0);
    let dy = offsets
        .top
        .length()
        .or_else(|| offsets.bottom.length().map(|b| -b))
        .unwrap_or(0.0);
    (dx, dy)
}

/// [§ 10.3.7 Absolutely positioned, non-replaced elements](https://www.w3.org/TR/CSS2/visudet.html#abs-non-replaced-width)
///
/// With both insets of an axis set and an auto size, the box stretches
/// between them; otherwise it shrinks to fit and sits at the set inset, or
/// at its static position (approximated by the parent's content origin).
fn absolute_box(
    ctx: &LayoutContext<'_>,
    node: NodeId,
    style: &ResolvedStyle,
    containing_block: Rect,
    static_position: Point,
) -> Result<(Rect, EdgeSizes)> {
    let margin = style.margin_or_zero();
    let spacing = style.padding_and_border();
    let offsets = style.offsets;
    let cb = containing_block;

    let content_width = match (offsets.left.length(), offsets.right.length()) {
        (Some(left), Some(right)) if style.width.is_auto() => style.clamp_content_width(
            (cb.width - left - right - margin.horizontal() - spacing.horizontal()).max(0.0),
        ),
        _ => ctx.content_width(node, Extent::AtMost(cb.width))?,
    };
    let mut size = ctx.border_box_for_content_width(node, content_width)?;
    if let (Some(top), Some(bottom)) = (offsets.top.length(), offsets.bottom.length())
        && style.height.is_auto()
    {
        size.height = style.clamp_content_height(
            (cb.height - top - bottom - margin.vertical() - spacing.vertical()).max(0.0),
        ) + spacing.vertical();
    }

    let x = match (offsets.left.length(), offsets.right.length()) {
        (Some(left), _) => cb.x + left + margin.left,
        (None, Some(right)) => cb.right() - right - margin.right - size.width,
        (None, None) => static_position.x + margin.left,
    };
    let y = match (offsets.top.length(), offsets.bottom.length()) {
        (Some(top), _) => cb.y + top + margin.top,
        (None, Some(bottom)) => cb.bottom() - bottom - margin.bottom - size.height,
        (None, None) => static_position.y + margin.top,
    };
    Ok((Rect::new(x, y, size.width, size.height), margin))
}
