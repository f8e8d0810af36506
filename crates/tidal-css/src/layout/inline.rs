//! Inline formatting.
//!
//! [§ 9.4.2 Inline formatting contexts](https://www.w3.org/TR/CSS2/visuren.html#inline-formatting)
//!
//! "In an inline formatting context, boxes are laid out horizontally, one
//! after the other, beginning at the top of a containing block."
//!
//! Inline-level content is packed into rows. An element's own text is one
//! atom broken into lines by the [`TextBreaker`](super::text::TextBreaker);
//! every inline-level child (text nodes included) is another atom sized
//! through the context. A row wraps before an atom that would overflow it,
//! unless the row is still empty.

use tidal_dom::NodeId;

use crate::error::Result;

use super::algorithm::{ChildPlacement, Constraint, Extent, Fragment};
use super::box_model::{EdgeSizes, Point, Rect, Size};
use super::context::LayoutContext;

const EPSILON: f32 = 0.01;

/// Lays out inline and inline-block boxes, and text nodes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InlineLayout;

impl InlineLayout {
    /// Flow the node's own text and all in-flow children as one inline run.
    ///
    /// # Errors
    ///
    /// Fails if the node or a child has no resolved style.
    pub fn layout(
        &self,
        ctx: &LayoutContext<'_>,
        node: NodeId,
        constraint: Constraint,
    ) -> Result<Fragment> {
        let mut items = Vec::new();
        if ctx.own_text(node).is_some() {
            items.push(InlineItem::OwnText(node));
        }
        items.extend(
            ctx.in_flow_children(node)?
                .into_iter()
                .map(InlineItem::Child),
        );

        let run = flow_inline(ctx, node, &items, constraint.width)?;
        Ok(Fragment {
            size: Size::new(
                constraint.width.exact().unwrap_or(run.size.width),
                constraint.height.exact().unwrap_or(run.size.height),
            ),
            placements: run.placements,
            text_origin: run.text_origin,
        })
    }
}

/// One atom of an inline run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum InlineItem {
    /// The container's own text.
    OwnText(NodeId),
    /// An inline-level child box.
    Child(NodeId),
}

/// A laid-out inline run, relative to its own top-left corner.
#[derive(Debug, Clone, Default)]
pub(crate) struct InlineRun {
    pub size: Size,
    pub placements: Vec<ChildPlacement>,
    pub text_origin: Option<Point>,
}

enum AtomKind {
    Text,
    Child { node: NodeId, size: Size, margin: EdgeSizes },
}

struct Atom {
    kind: AtomKind,
    x: f32,
    outer: Size,
}

#[derive(Default)]
struct Row {
    atoms: Vec<Atom>,
    width: f32,
    height: f32,
}

/// Pack `items` into rows no wider than `width`.
///
/// Rows are offset by `text-align` when the width is definite. Aligned own
/// text spans the full width so that its lines align inside it.
pub(crate) fn flow_inline(
    ctx: &LayoutContext<'_>,
    container: NodeId,
    items: &[InlineItem],
    width: Extent,
) -> Result<InlineRun> {
    if items.is_empty() {
        return Ok(InlineRun::default());
    }
    let style = ctx.style(container)?;
    let limit = width.limit_or_infinite();
    let definite = limit.is_finite();
    let align = style.text_align.offset_factor();

    let mut rows = vec![Row::default()];
    for item in items {
        let (kind, outer) = match *item {
            InlineItem::OwnText(node) => {
                let text = ctx.text_layout(node, limit)?;
                let text_width = if definite && align > 0.0 {
                    limit
                } else {
                    text.width
                };
                (AtomKind::Text, Size::new(text_width, text.height))
            }
            InlineItem::Child(child) => {
                let margin = ctx.style(child)?.margin_or_zero();
                let size = ctx.border_box_size(child, width.loosen())?;
                let outer = Size::new(
                    size.width + margin.horizontal(),
                    size.height + margin.vertical(),
                );
                (AtomKind::Child { node: child, size, margin }, outer)
            }
        };

        let needs_wrap = rows
            .last()
            .is_some_and(|row| row.width > 0.0 && definite && row.width + outer.width > limit + EPSILON);
        if needs_wrap {
            rows.push(Row::default());
        }
        if let Some(row) = rows.last_mut() {
            row.atoms.push(Atom {
                kind,
                x: row.width,
                outer,
            });
            row.width += outer.width;
            row.height = row.height.max(outer.height);
        }
    }

    let mut run = InlineRun::default();
    let mut y = 0.0;
    for row in rows {
        let offset = if definite {
            (limit - row.width).max(0.0) * align
        } else {
            0.0
        };
        for atom in row.atoms {
            let x = offset + atom.x;
            match atom.kind {
                AtomKind::Text => run.text_origin = Some(Point { x, y }),
                AtomKind::Child { node, size, margin } => run.placements.push(ChildPlacement {
                    node,
                    border_box: Rect::new(
                        x + margin.left,
                        y + margin.top,
                        size.width,
                        size.height,
                    ),
                    margin,
                }),
            }
        }
        run.size.width = run.size.width.max(row.width);
        y += row.height;
    }
    run.size.height = y;
    Ok(run)
}
