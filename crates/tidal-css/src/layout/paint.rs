//! Paint order.
//!
//! [§ 9.9 Layered presentation](https://www.w3.org/TR/CSS2/visuren.html#layers)
//!
//! "Each box belongs to one stacking context... Boxes with the same stack
//! level in a stacking context are stacked back-to-front according to
//! document tree order."
//!
//! The paint list is flat: one stable sort by `z-index` over document
//! order. There are no nested stacking contexts.

use tidal_dom::NodeId;

use super::box_model::Rect;

/// One drawable box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PaintEntry {
    pub node: NodeId,
    /// Border box in surface coordinates.
    pub bounds: Rect,
    pub z_index: i32,
    /// Position in document (pre-)order.
    pub order: usize,
}

/// Sort `entries` (given in document order) by stack level.
///
/// [`slice::sort_by_key`] is stable, so equal levels keep document order.
#[must_use]
pub fn build_paint_list(mut entries: Vec<PaintEntry>) -> Vec<PaintEntry> {
    entries.sort_by_key(|entry| entry.z_index);
    entries
}

/// First entry, in paint-list order, whose bounds contain `(x, y)`.
#[must_use]
pub fn hit_test(entries: &[PaintEntry], x: f32, y: f32) -> Option<NodeId> {
    entries
        .iter()
        .find(|entry| entry.bounds.contains_point(x, y))
        .map(|entry| entry.node)
}
