//! Breakpoints, media queries and fluid sizing.
//!
//! [Media Queries Level 4](https://www.w3.org/TR/mediaqueries-4/)
//!
//! The evaluator classifies the current [`Viewport`] against named
//! breakpoints and media queries. A media query pairs a condition with an
//! [`AuthoredStyle`] patch for one node; while the query is active the
//! engine merges the patch over the node's authored style.
//!
//! Viewport updates are throttled: an update arriving sooner than
//! `viewport_throttle_ms` after the last evaluation is parked and applied by
//! [`ResponsiveEvaluator::flush`] on a later frame.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use tidal_dom::NodeId;

use crate::config::EngineConfig;
use crate::error::{LayoutError, ListenerError, Result};
use crate::style::AuthoredStyle;
use crate::viewport::{Orientation, Viewport};

/// [§ 4 Media Features](https://www.w3.org/TR/mediaqueries-4/#mq-features)
///
/// A conjunction of optional range predicates. An empty breakpoint matches
/// every viewport. Bounds are inclusive.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct Breakpoint {
    pub min_width: Option<f32>,
    pub max_width: Option<f32>,
    pub min_height: Option<f32>,
    pub max_height: Option<f32>,
    pub orientation: Option<Orientation>,
    /// [§ 5.3 resolution](https://www.w3.org/TR/mediaqueries-4/#resolution)
    pub min_pixel_ratio: Option<f32>,
}

impl Breakpoint {
    /// A breakpoint on width only.
    #[must_use]
    pub const fn width_range(min_width: Option<f32>, max_width: Option<f32>) -> Self {
        Self {
            min_width,
            max_width,
            min_height: None,
            max_height: None,
            orientation: None,
            min_pixel_ratio: None,
        }
    }

    /// Whether every present predicate holds for `viewport`.
    #[must_use]
    pub fn matches(&self, viewport: &Viewport) -> bool {
        self.min_width.is_none_or(|min| viewport.width >= min)
            && self.max_width.is_none_or(|max| viewport.width <= max)
            && self.min_height.is_none_or(|min| viewport.height >= min)
            && self.max_height.is_none_or(|max| viewport.height <= max)
            && self.orientation.is_none_or(|o| viewport.orientation() == o)
            && self
                .min_pixel_ratio
                .is_none_or(|min| viewport.device_pixel_ratio >= min)
    }
}

/// `mobile`, `tablet`, `desktop` and `wide`.
#[must_use]
pub fn default_breakpoints() -> Vec<(&'static str, Breakpoint)> {
    vec![
        ("mobile", Breakpoint::width_range(None, Some(767.0))),
        ("tablet", Breakpoint::width_range(Some(768.0), Some(1023.0))),
        ("desktop", Breakpoint::width_range(Some(1024.0), Some(1439.0))),
        ("wide", Breakpoint::width_range(Some(1440.0), None)),
    ]
}

/// A viewport predicate supplied by the host.
pub type ViewportPredicate = Box<dyn Fn(&Viewport) -> bool>;

/// What a media query tests.
pub enum MediaCondition {
    /// A registered breakpoint, by name.
    Breakpoint(String),
    /// An arbitrary predicate.
    Custom(ViewportPredicate),
}

impl MediaCondition {
    /// Condition on the named breakpoint.
    #[must_use]
    pub fn breakpoint(name: &str) -> Self {
        Self::Breakpoint(name.to_string())
    }

    /// Condition on a custom predicate.
    #[must_use]
    pub fn custom(predicate: impl Fn(&Viewport) -> bool + 'static) -> Self {
        Self::Custom(Box::new(predicate))
    }
}

impl fmt::Debug for MediaCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Breakpoint(name) => f.debug_tuple("Breakpoint").field(name).finish(),
            Self::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// A named condition with a style patch for one node.
#[derive(Debug)]
pub struct MediaQuery {
    name: String,
    condition: MediaCondition,
    patch: AuthoredStyle,
    target: NodeId,
    active: bool,
}

impl MediaQuery {
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub const fn condition(&self) -> &MediaCondition {
        &self.condition
    }

    #[must_use]
    pub const fn patch(&self) -> &AuthoredStyle {
        &self.patch
    }

    /// The node the patch applies to.
    #[must_use]
    pub const fn target(&self) -> NodeId {
        self.target
    }

    /// Activation as of the last evaluation.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.active
    }
}

/// Handle of a registered viewport listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(usize);

/// Called with the new viewport whenever a media query changes activation.
pub type ViewportListener = Box<dyn FnMut(&Viewport) -> std::result::Result<(), ListenerError>>;

/// One listener's failure during a notification round.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListenerFailure {
    pub listener: ListenerId,
    pub error: ListenerError,
}

/// Evaluates breakpoints and media queries against the viewport.
pub struct ResponsiveEvaluator {
    breakpoints: HashMap<String, Breakpoint>,
    /// In registration order; patches of several active queries on one node
    /// apply in this order.
    queries: Vec<MediaQuery>,
    listeners: Vec<(ListenerId, ViewportListener)>,
    next_listener: usize,
    viewport: Viewport,
    pending: Option<Viewport>,
    last_evaluated_ms: Option<f64>,
    throttle_ms: f64,
    cache: HashMap<(String, u32, u32), bool>,
    cache_capacity: usize,
    mobile_max_width: f32,
    wide_min_width: f32,
    failures: Vec<ListenerFailure>,
}

impl fmt::Debug for ResponsiveEvaluator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResponsiveEvaluator")
            .field("breakpoints", &self.breakpoints)
            .field("queries", &self.queries)
            .field("listeners", &self.listeners.len())
            .field("viewport", &self.viewport)
            .field("pending", &self.pending)
            .finish_non_exhaustive()
    }
}

impl ResponsiveEvaluator {
    /// An evaluator with the default breakpoints, positioned at `viewport`.
    #[must_use]
    pub fn new(config: &EngineConfig, viewport: Viewport) -> Self {
        Self {
            breakpoints: default_breakpoints()
                .into_iter()
                .map(|(name, bp)| (name.to_string(), bp))
                .collect(),
            queries: Vec::new(),
            listeners: Vec::new(),
            next_listener: 0,
            viewport,
            pending: None,
            last_evaluated_ms: None,
            throttle_ms: config.viewport_throttle_ms,
            cache: HashMap::new(),
            cache_capacity: config.media_cache_capacity.max(1),
            mobile_max_width: config.mobile_max_width,
            wide_min_width: config.wide_min_width,
            failures: Vec::new(),
        }
    }

    /// The viewport of the last evaluation.
    #[must_use]
    pub const fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Whether a throttled update is waiting for [`Self::flush`].
    #[must_use]
    pub const fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    // Breakpoints

    /// Register (or replace) a breakpoint and re-evaluate.
    ///
    /// Returns the targets of queries whose activation changed.
    pub fn add_breakpoint(&mut self, name: &str, breakpoint: Breakpoint) -> Vec<NodeId> {
        let _ = self.breakpoints.insert(name.to_string(), breakpoint);
        self.cache.clear();
        self.evaluate()
    }

    /// Remove a breakpoint. Queries referring to it stop matching.
    ///
    /// # Errors
    ///
    /// [`LayoutError::UnknownBreakpoint`] if it was never registered.
    pub fn remove_breakpoint(&mut self, name: &str) -> Result<Vec<NodeId>> {
        if self.breakpoints.remove(name).is_none() {
            return Err(LayoutError::UnknownBreakpoint(name.to_string()));
        }
        self.cache.clear();
        Ok(self.evaluate())
    }

    #[must_use]
    pub fn breakpoint(&self, name: &str) -> Option<&Breakpoint> {
        self.breakpoints.get(name)
    }

    /// Whether the named breakpoint matches the current viewport.
    ///
    /// # Errors
    ///
    /// [`LayoutError::UnknownBreakpoint`] if it was never registered.
    pub fn matches_breakpoint(&self, name: &str) -> Result<bool> {
        self.breakpoints
            .get(name)
            .map(|bp| bp.matches(&self.viewport))
            .ok_or_else(|| LayoutError::UnknownBreakpoint(name.to_string()))
    }

    // Media queries

    /// Register a media query named `name`, replacing any query of that
    /// name, and evaluate it immediately.
    ///
    /// Returns whether the query is active.
    ///
    /// # Errors
    ///
    /// [`LayoutError::UnknownBreakpoint`] if the condition names a breakpoint
    /// that was never registered.
    pub fn add_media_query(
        &mut self,
        name: &str,
        condition: MediaCondition,
        patch: AuthoredStyle,
        target: NodeId,
    ) -> Result<bool> {
        if let MediaCondition::Breakpoint(bp) = &condition
            && !self.breakpoints.contains_key(bp)
        {
            return Err(LayoutError::UnknownBreakpoint(bp.clone()));
        }
        self.queries.retain(|q| q.name != name);
        self.cache.retain(|(query, _, _), _| query != name);

        let mut query = MediaQuery {
            name: name.to_string(),
            condition,
            patch,
            target,
            active: false,
        };
        query.active = Self::query_matches(
            &query,
            &self.breakpoints,
            &mut self.cache,
            self.cache_capacity,
            &self.viewport,
        );
        let active = query.active;
        self.queries.push(query);
        Ok(active)
    }

    /// Unregister a media query, returning it.
    ///
    /// # Errors
    ///
    /// [`LayoutError::UnknownMediaQuery`] if no query has this name.
    pub fn remove_media_query(&mut self, name: &str) -> Result<MediaQuery> {
        let index = self
            .queries
            .iter()
            .position(|q| q.name == name)
            .ok_or_else(|| LayoutError::UnknownMediaQuery(name.to_string()))?;
        self.cache.retain(|(query, _, _), _| query != name);
        Ok(self.queries.remove(index))
    }

    /// Current activation of the named query.
    ///
    /// # Errors
    ///
    /// [`LayoutError::UnknownMediaQuery`] if no query has this name.
    pub fn is_active(&self, name: &str) -> Result<bool> {
        self.queries
            .iter()
            .find(|q| q.name == name)
            .map(MediaQuery::is_active)
            .ok_or_else(|| LayoutError::UnknownMediaQuery(name.to_string()))
    }

    /// Registered queries in registration order.
    pub fn media_queries(&self) -> impl Iterator<Item = &MediaQuery> {
        self.queries.iter()
    }

    /// Patches of the active queries targeting `node`, in registration order.
    pub fn active_patches(&self, node: NodeId) -> impl Iterator<Item = &AuthoredStyle> {
        self.queries
            .iter()
            .filter(move |q| q.active && q.target == node)
            .map(|q| &q.patch)
    }

    /// Drop every query targeting one of `nodes`.
    pub fn forget_targets(&mut self, nodes: &[NodeId]) {
        self.queries.retain(|q| !nodes.contains(&q.target));
    }

    // Listeners

    /// Register a listener notified on activation changes.
    pub fn add_listener(
        &mut self,
        listener: impl FnMut(&Viewport) -> std::result::Result<(), ListenerError> + 'static,
    ) -> ListenerId {
        let id = ListenerId(self.next_listener);
        self.next_listener += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Unregister a listener. Returns whether it existed.
    pub fn remove_listener(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(lid, _)| *lid != id);
        self.listeners.len() != before
    }

    /// Failures collected since the last call.
    pub fn take_failures(&mut self) -> Vec<ListenerFailure> {
        std::mem::take(&mut self.failures)
    }

    // Viewport

    /// Offer a new viewport at time `now_ms`.
    ///
    /// Applied at once unless the last evaluation was less than the
    /// throttle interval ago, in which case it is parked (replacing any
    /// earlier parked viewport). Returns the targets of queries whose
    /// activation changed.
    pub fn update_viewport(&mut self, viewport: Viewport, now_ms: f64) -> Vec<NodeId> {
        if self
            .last_evaluated_ms
            .is_some_and(|last| now_ms - last < self.throttle_ms)
        {
            log::trace!("viewport update throttled at {now_ms}ms");
            self.pending = Some(viewport);
            return Vec::new();
        }
        self.apply_viewport(viewport, now_ms)
    }

    /// Apply a parked viewport once the throttle interval has passed.
    pub fn flush(&mut self, now_ms: f64) -> Vec<NodeId> {
        let Some(viewport) = self.pending else {
            return Vec::new();
        };
        if self
            .last_evaluated_ms
            .is_some_and(|last| now_ms - last < self.throttle_ms)
        {
            return Vec::new();
        }
        self.apply_viewport(viewport, now_ms)
    }

    /// Apply a parked viewport now, ignoring the throttle interval.
    pub fn flush_now(&mut self, now_ms: f64) -> Vec<NodeId> {
        let Some(viewport) = self.pending else {
            return Vec::new();
        };
        self.apply_viewport(viewport, now_ms)
    }

    fn apply_viewport(&mut self, viewport: Viewport, now_ms: f64) -> Vec<NodeId> {
        if viewport.device_pixel_ratio != self.viewport.device_pixel_ratio {
            self.cache.clear();
        }
        self.viewport = viewport;
        self.pending = None;
        self.last_evaluated_ms = Some(now_ms);
        self.evaluate()
    }

    /// Re-evaluate every query against the current viewport. Listeners are
    /// notified once if any activation changed.
    pub fn evaluate(&mut self) -> Vec<NodeId> {
        let Self {
            breakpoints,
            queries,
            cache,
            cache_capacity,
            viewport,
            ..
        } = self;

        let mut changed = Vec::new();
        for query in queries.iter_mut() {
            let active = Self::query_matches(query, breakpoints, cache, *cache_capacity, viewport);
            if active != query.active {
                log::debug!(
                    "media query '{}' {}",
                    query.name,
                    if active { "activated" } else { "deactivated" }
                );
                query.active = active;
                if !changed.contains(&query.target) {
                    changed.push(query.target);
                }
            }
        }

        if !changed.is_empty() {
            let failures = self.notify_listeners();
            self.failures.extend(failures);
        }
        changed
    }

    /// Invoke every listener, isolating failures.
    fn notify_listeners(&mut self) -> Vec<ListenerFailure> {
        let viewport = self.viewport;
        let mut failures = Vec::new();
        for (id, listener) in &mut self.listeners {
            if let Err(error) = listener(&viewport) {
                log::error!("viewport listener {id:?} failed: {error}");
                failures.push(ListenerFailure {
                    listener: *id,
                    error,
                });
            }
        }
        failures
    }

    fn query_matches(
        query: &MediaQuery,
        breakpoints: &HashMap<String, Breakpoint>,
        cache: &mut HashMap<(String, u32, u32), bool>,
        capacity: usize,
        viewport: &Viewport,
    ) -> bool {
        let key = (
            query.name.clone(),
            viewport.width.to_bits(),
            viewport.height.to_bits(),
        );
        if let Some(&hit) = cache.get(&key) {
            return hit;
        }
        let result = match &query.condition {
            MediaCondition::Breakpoint(name) => breakpoints.get(name).is_some_and(|bp| bp.matches(viewport)),
            MediaCondition::Custom(predicate) => predicate(viewport),
        };
        if cache.len() >= capacity {
            cache.clear();
        }
        let _ = cache.insert(key, result);
        result
    }

    // Fluid helpers

    /// Font size interpolated linearly from `min_size` at `min_viewport`
    /// width to `max_size` at `max_viewport` width, clamped outside.
    #[must_use]
    pub fn fluid_font_size(
        &self,
        min_size: f32,
        max_size: f32,
        min_viewport: f32,
        max_viewport: f32,
    ) -> f32 {
        fluid_value(self.viewport.width, min_size, max_size, min_viewport, max_viewport)
    }

    /// `base` scaled by 0.8 on mobile widths and by 1.2 on wide widths.
    #[must_use]
    pub fn adaptive_spacing(&self, base: f32) -> f32 {
        let width = self.viewport.width;
        if width < self.mobile_max_width {
            base * 0.8
        } else if width >= self.wide_min_width {
            base * 1.2
        } else {
            base
        }
    }
}

/// Linear interpolation of a size across a width range, clamped.
#[must_use]
pub fn fluid_value(width: f32, min_size: f32, max_size: f32, min_width: f32, max_width: f32) -> f32 {
    if max_width <= min_width {
        return if width >= max_width { max_size } else { min_size };
    }
    let t = ((width - min_width) / (max_width - min_width)).clamp(0.0, 1.0);
    (max_size - min_size).mul_add(t, min_size)
}
