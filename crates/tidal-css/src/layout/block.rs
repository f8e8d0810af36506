//! Block formatting.
//!
//! [§ 9.4.1 Block formatting contexts](https://www.w3.org/TR/CSS2/visuren.html#block-formatting)
//!
//! "In a block formatting context, boxes are laid out one after the other,
//! vertically, beginning at the top of a containing block. The vertical
//! distance between two sibling boxes is determined by the 'margin'
//! properties. Vertical margins between adjacent block-level boxes in a
//! block formatting context collapse."

use tidal_dom::NodeId;

use crate::error::Result;
use crate::style::Display;

use super::algorithm::{ChildPlacement, Constraint, Extent, Fragment};
use super::box_model::{BoxModel, EdgeSizes, Point, Rect, Size};
use super::context::LayoutContext;
use super::inline::{InlineItem, flow_inline};

/// Stacks block-level children vertically.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BlockLayout;

/// A stretch of consecutive inline-level content, or one block-level child.
enum Segment {
    Inline(Vec<InlineItem>),
    Block(NodeId),
}

impl BlockLayout {
    /// # Errors
    ///
    /// Fails if the node or a child has no resolved style.
    pub fn layout(
        &self,
        ctx: &LayoutContext<'_>,
        node: NodeId,
        constraint: Constraint,
    ) -> Result<Fragment> {
        let width = constraint.width;

        // [§ 9.2.1.1 Anonymous block boxes](https://www.w3.org/TR/CSS2/visuren.html#anonymous-block-level)
        //
        // "If a block container box has a block-level box inside it, then we
        // force it to have only block-level boxes inside it." Runs of
        // inline-level content between blocks form anonymous block boxes.
        let mut segments = Vec::new();
        let mut pending = Vec::new();
        if ctx.own_text(node).is_some() {
            pending.push(InlineItem::OwnText(node));
        }
        for child in ctx.in_flow_children(node)? {
            if ctx.style(child)?.display.is_inline_level() {
                pending.push(InlineItem::Child(child));
            } else {
                if !pending.is_empty() {
                    segments.push(Segment::Inline(std::mem::take(&mut pending)));
                }
                segments.push(Segment::Block(child));
            }
        }
        if !pending.is_empty() {
            segments.push(Segment::Inline(pending));
        }

        // [§ 8.3.1 Collapsing margins](https://www.w3.org/TR/CSS2/box.html#collapsing-margins)
        //
        // A box inside its parent's formatting context hands the abutting
        // margin of its first (last) block child up to its own top (bottom)
        // margin, where the parent places it. See `collapsed_margins`.
        let (absorb_top, absorb_bottom) = absorbs_child_margins(ctx, node)?;

        let mut fragment = Fragment::default();
        let mut y = 0.0_f32;
        let mut used_width = 0.0_f32;
        // Bottom margin of the previous segment; `None` before the first.
        let mut pending_margin: Option<f32> = None;

        for segment in segments {
            match segment {
                Segment::Inline(items) => {
                    let run = flow_inline(ctx, node, &items, width)?;
                    y += pending_margin.unwrap_or(0.0);
                    fragment.placements.extend(run.placements.into_iter().map(|p| {
                        ChildPlacement {
                            border_box: p.border_box.translate(0.0, y),
                            ..p
                        }
                    }));
                    if let Some(origin) = run.text_origin {
                        fragment.text_origin = Some(Point {
                            x: origin.x,
                            y: origin.y + y,
                        });
                    }
                    y += run.size.height;
                    used_width = used_width.max(run.size.width);
                    pending_margin = Some(0.0);
                }
                Segment::Block(child) => {
                    let child_style = ctx.style(child)?;
                    let margin = child_style.margin_or_zero();
                    let (collapsed_top, collapsed_bottom) = collapsed_margins(ctx, child)?;
                    let size = ctx.border_box_size(child, width)?;

                    let (left, right) = match width {
                        Extent::Exact(available) => BoxModel::resolve_auto_margins(
                            available,
                            size.width,
                            child_style.margin.left,
                            child_style.margin.right,
                        ),
                        _ => (margin.left, margin.right),
                    };
                    let gap = match pending_margin {
                        Some(previous) => {
                            BoxModel::collapse_sibling_margins(previous, collapsed_top)
                        }
                        None if absorb_top => 0.0,
                        None => collapsed_top,
                    };

                    let top = y + gap;
                    fragment.placements.push(ChildPlacement {
                        node: child,
                        border_box: Rect::new(left, top, size.width, size.height),
                        margin: EdgeSizes {
                            top: margin.top,
                            right,
                            bottom: margin.bottom,
                            left,
                        },
                    });
                    y = top + size.height;
                    used_width = used_width.max(left + size.width + right);
                    pending_margin = Some(collapsed_bottom);
                }
            }
        }

        if let Some(last) = pending_margin
            && !absorb_bottom
        {
            y += last;
        }

        fragment.size = Size::new(
            width.exact().unwrap_or(used_width),
            constraint.height.exact().unwrap_or(y),
        );
        Ok(fragment)
    }
}

/// Whether `node`'s top and bottom margins meet those of its first and last
/// block children.
///
/// Only a block box taking part in its parent's block formatting context
/// does; the layout root, out-of-flow boxes and flex items start a context of
/// their own. Padding or border keeps the margins apart, and so does an
/// explicit height at the bottom.
fn absorbs_child_margins(ctx: &LayoutContext<'_>, node: NodeId) -> Result<(bool, bool)> {
    let style = ctx.style(node)?;
    let in_parent_context = node != ctx.root()
        && style.display == Display::Block
        && style.is_in_flow()
        && match ctx.tree().parent(node) {
            Some(parent) => ctx.style(parent)?.display == Display::Block,
            None => false,
        };
    if !in_parent_context {
        return Ok((false, false));
    }
    let top = style.padding.top <= 0.0 && style.border_width.top <= 0.0;
    let bottom =
        style.padding.bottom <= 0.0 && style.border_width.bottom <= 0.0 && style.height.is_auto();
    Ok((top, bottom))
}

/// [§ 8.3.1 Collapsing margins](https://www.w3.org/TR/CSS2/box.html#collapsing-margins)
///
/// `(top, bottom)` margins of `node` as its parent sees them: its own, each
/// collapsed with the abutting margin of its first or last child when that
/// child is block-level and nothing separates the two.
///
/// # Errors
///
/// Fails if the node or a descendant has no resolved style.
pub fn collapsed_margins(ctx: &LayoutContext<'_>, node: NodeId) -> Result<(f32, f32)> {
    let own = ctx.style(node)?.margin_or_zero();
    let (absorb_top, absorb_bottom) = absorbs_child_margins(ctx, node)?;
    if !absorb_top && !absorb_bottom {
        return Ok((own.top, own.bottom));
    }
    let children = ctx.in_flow_children(node)?;
    let is_block = |child: NodeId| -> Result<bool> {
        Ok(!ctx.style(child)?.display.is_inline_level())
    };

    let mut top = own.top;
    if absorb_top
        && ctx.own_text(node).is_none()
        && let Some(&first) = children.first()
        && is_block(first)?
    {
        top = BoxModel::collapse_sibling_margins(top, collapsed_margins(ctx, first)?.0);
    }
    let mut bottom = own.bottom;
    if absorb_bottom
        && let Some(&last) = children.last()
        && is_block(last)?
    {
        bottom = BoxModel::collapse_sibling_margins(bottom, collapsed_margins(ctx, last)?.1);
    }
    Ok((top, bottom))
}
