//! CSS Box Model types and geometry.
//!
//! [CSS Box Model Module Level 3](https://www.w3.org/TR/css-box-3/)

use crate::style::BoxSizing;

use super::values::AutoOr;

/// [§ 3. The CSS Box Model](https://www.w3.org/TR/css-box-3/#box-model)
///
/// "Each box has a content area and optional surrounding padding, border,
/// and margin areas."
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BoxDimensions {
    /// Content area dimensions
    pub content: Rect,
    /// Padding edge (content + padding)
    pub padding: EdgeSizes,
    /// Border edge (content + padding + border)
    pub border: EdgeSizes,
    /// Margin edge (content + padding + border + margin)
    pub margin: EdgeSizes,
}

/// A rectangle positioned in 2D space.
///
/// [§ 3 The CSS Box Model](https://www.w3.org/TR/css-box-3/#box-model)
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Rect {
    /// Horizontal position of the top-left corner.
    pub x: f32,
    /// Vertical position of the top-left corner.
    pub y: f32,
    /// Width of the rectangle.
    pub width: f32,
    /// Height of the rectangle.
    pub height: f32,
}

impl Rect {
    /// Build a rectangle.
    #[must_use]
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Right edge.
    #[must_use]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    /// Bottom edge.
    #[must_use]
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// The size of the rectangle.
    #[must_use]
    pub const fn size(&self) -> Size {
        Size {
            width: self.width,
            height: self.height,
        }
    }

    /// Half-open point containment: the left/top edges are inside, the
    /// right/bottom edges are not.
    #[must_use]
    pub fn contains_point(&self, x: f32, y: f32) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }

    /// Whether `inner` lies entirely within this rectangle.
    #[must_use]
    pub fn contains_rect(&self, inner: &Self) -> bool {
        const EPSILON: f32 = 1e-3;
        self.x <= inner.x + EPSILON
            && self.y <= inner.y + EPSILON
            && self.right() + EPSILON >= inner.right()
            && self.bottom() + EPSILON >= inner.bottom()
    }

    /// Move the rectangle by `(dx, dy)`.
    #[must_use]
    pub fn translate(&self, dx: f32, dy: f32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            ..*self
        }
    }

    /// Grow the rectangle outward by `edges`.
    #[must_use]
    pub fn expanded_by(&self, edges: &EdgeSizes) -> Self {
        Self {
            x: self.x - edges.left,
            y: self.y - edges.top,
            width: self.width + edges.horizontal(),
            height: self.height + edges.vertical(),
        }
    }

    /// Shrink the rectangle inward by `edges`, never below zero size.
    #[must_use]
    pub fn shrunk_by(&self, edges: &EdgeSizes) -> Self {
        Self {
            x: self.x + edges.left,
            y: self.y + edges.top,
            width: (self.width - edges.horizontal()).max(0.0),
            height: (self.height - edges.vertical()).max(0.0),
        }
    }
}

/// A width/height pair without a position.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Size {
    /// Horizontal extent.
    pub width: f32,
    /// Vertical extent.
    pub height: f32,
}

impl Size {
    /// Build a size.
    #[must_use]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// A point in the surface's coordinate space.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Point {
    /// Horizontal coordinate.
    pub x: f32,
    /// Vertical coordinate.
    pub y: f32,
}

/// Edge sizes for padding, border, or margin.
///
/// [§ 3 The CSS Box Model](https://www.w3.org/TR/css-box-3/#box-model)
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct EdgeSizes {
    /// Top edge size.
    pub top: f32,
    /// Right edge size.
    pub right: f32,
    /// Bottom edge size.
    pub bottom: f32,
    /// Left edge size.
    pub left: f32,
}

impl EdgeSizes {
    /// Every side set to `px`.
    #[must_use]
    pub const fn uniform(px: f32) -> Self {
        Self {
            top: px,
            right: px,
            bottom: px,
            left: px,
        }
    }

    /// `left + right`
    #[must_use]
    pub fn horizontal(&self) -> f32 {
        self.left + self.right
    }

    /// `top + bottom`
    #[must_use]
    pub fn vertical(&self) -> f32 {
        self.top + self.bottom
    }

    /// Side-wise sum.
    #[must_use]
    pub fn plus(&self, other: &Self) -> Self {
        Self {
            top: self.top + other.top,
            right: self.right + other.right,
            bottom: self.bottom + other.bottom,
            left: self.left + other.left,
        }
    }

    /// Whether any side is non-zero.
    #[must_use]
    pub fn is_nonzero(&self) -> bool {
        self.top != 0.0 || self.right != 0.0 || self.bottom != 0.0 || self.left != 0.0
    }
}

impl BoxDimensions {
    // [§ 3 The CSS Box Model](https://www.w3.org/TR/css-box-3/#box-model)
    //
    // "Each box has a content area and optional surrounding padding, border,
    // and margin areas... These areas are determined by their respective edges."
    //
    // ┌─────────────────────────────────────────┐
    // │              margin-top                 │
    // │   ┌─────────────────────────────────┐   │
    // │   │          border-top             │   │
    // │   │   ┌─────────────────────────┐   │   │
    // │   │   │      padding-top        │   │   │
    // │   │   │   ┌─────────────────┐   │   │   │
    // │ m │ b │ p │                 │ p │ b │ m │
    // │ a │ o │ a │     CONTENT     │ a │ o │ a │
    // │ r │ r │ d │                 │ d │ r │ r │
    // │ g │ d │ d │                 │ d │ d │ g │
    // │ i │ e │ i │                 │ i │ e │ i │
    // │ n │ r │ n │                 │ n │ r │ n │
    // │   │   │ g │                 │ g │   │   │
    // │   │   │   └─────────────────┘   │   │   │
    // │   │   │      padding-bottom     │   │   │
    // │   │   └─────────────────────────┘   │   │
    // │   │          border-bottom          │   │
    // │   └─────────────────────────────────┘   │
    // │              margin-bottom              │
    // └─────────────────────────────────────────┘

    /// [§ 3.2 Padding](https://www.w3.org/TR/css-box-3/#paddings)
    ///
    /// "The padding box contains both the content and padding areas."
    #[must_use]
    pub fn padding_box(&self) -> Rect {
        self.content.expanded_by(&self.padding)
    }

    /// [§ 3.3 Borders](https://www.w3.org/TR/css-box-3/#borders)
    ///
    /// "The border box contains content, padding, and border areas."
    #[must_use]
    pub fn border_box(&self) -> Rect {
        self.padding_box().expanded_by(&self.border)
    }

    /// [§ 3.1 Margins](https://www.w3.org/TR/css-box-3/#margins)
    ///
    /// "The margin box is the outermost box, and contains all four areas."
    #[must_use]
    pub fn margin_box(&self) -> Rect {
        self.border_box().expanded_by(&self.margin)
    }

    /// [§ 3 The CSS Box Model](https://www.w3.org/TR/css-box-3/#box-model)
    /// "The content box contains the actual content of the element."
    #[must_use]
    pub const fn content_box(&self) -> Rect {
        self.content
    }

    /// Move all four boxes by `(dx, dy)`.
    pub fn translate(&mut self, dx: f32, dy: f32) {
        self.content = self.content.translate(dx, dy);
    }
}

/// Pure box-model arithmetic. Holds no state.
pub struct BoxModel;

impl BoxModel {
    /// Derive the nested boxes outward from a content rectangle.
    ///
    /// Spacing is floored at zero so that each outer box contains the inner
    /// one.
    #[must_use]
    pub fn compute(
        content: Rect,
        padding: EdgeSizes,
        border: EdgeSizes,
        margin: EdgeSizes,
    ) -> BoxDimensions {
        BoxDimensions {
            content: Rect {
                width: content.width.max(0.0),
                height: content.height.max(0.0),
                ..content
            },
            padding: non_negative(padding),
            border: non_negative(border),
            margin: non_negative(margin),
        }
    }

    /// Derive the nested boxes from an already-placed border box.
    ///
    /// The content box is the border box shrunk by border and padding,
    /// floored at zero size.
    #[must_use]
    pub fn from_border_box(
        border_box: Rect,
        padding: EdgeSizes,
        border: EdgeSizes,
        margin: EdgeSizes,
    ) -> BoxDimensions {
        let padding = non_negative(padding);
        let border = non_negative(border);
        let content = border_box.shrunk_by(&border).shrunk_by(&padding);
        BoxDimensions {
            content,
            padding,
            border,
            margin: non_negative(margin),
        }
    }

    /// Space left for content inside `container` once the element's own
    /// margin, border and padding are reserved, floored at zero.
    #[must_use]
    pub fn available_content_size(
        container: Size,
        padding: &EdgeSizes,
        border: &EdgeSizes,
        margin: &EdgeSizes,
    ) -> Size {
        let reserved = padding.plus(border).plus(margin);
        Size {
            width: (container.width - reserved.horizontal()).max(0.0),
            height: (container.height - reserved.vertical()).max(0.0),
        }
    }

    /// [§ 4.4 box-sizing](https://www.w3.org/TR/css-box-4/#box-sizing)
    ///
    /// Border-box size of an element whose `width`/`height` is `specified`.
    /// Under `content-box` padding and border are added; under `border-box`
    /// the specified size already includes them, but it can never be smaller
    /// than padding plus border.
    #[must_use]
    pub fn intrinsic_size(
        specified: Size,
        padding: &EdgeSizes,
        border: &EdgeSizes,
        box_sizing: BoxSizing,
    ) -> Size {
        let spacing = padding.plus(border);
        match box_sizing {
            BoxSizing::ContentBox => Size {
                width: specified.width.max(0.0) + spacing.horizontal(),
                height: specified.height.max(0.0) + spacing.vertical(),
            },
            BoxSizing::BorderBox => Size {
                width: specified.width.max(spacing.horizontal()),
                height: specified.height.max(spacing.vertical()),
            },
        }
    }

    /// Content-box length for a specified `width`/`height` along one axis.
    #[must_use]
    pub fn content_length(specified: f32, spacing: f32, box_sizing: BoxSizing) -> f32 {
        match box_sizing {
            BoxSizing::ContentBox => specified.max(0.0),
            BoxSizing::BorderBox => (specified - spacing).max(0.0),
        }
    }

    /// [§ 10.3.3 Block-level, non-replaced elements in normal flow](https://www.w3.org/TR/CSS2/visudet.html#blockwidth)
    ///
    /// "If both 'margin-left' and 'margin-right' are 'auto', their used
    /// values are equal. This horizontally centers the element with respect
    /// to the edges of the containing block."
    ///
    /// "If there is exactly one value specified as 'auto', its used value
    /// follows from the equality."
    ///
    /// Returns `(left, right)`. Auto margins never become negative.
    #[must_use]
    pub fn resolve_auto_margins(
        available: f32,
        border_box_width: f32,
        left: AutoOr,
        right: AutoOr,
    ) -> (f32, f32) {
        match (left, right) {
            (AutoOr::Auto, AutoOr::Auto) => {
                let each = ((available - border_box_width) / 2.0).max(0.0);
                (each, each)
            }
            (AutoOr::Auto, AutoOr::Length(r)) => {
                ((available - border_box_width - r).max(0.0), r)
            }
            (AutoOr::Length(l), AutoOr::Auto) => {
                (l, (available - border_box_width - l).max(0.0))
            }
            (AutoOr::Length(l), AutoOr::Length(r)) => (l, r),
        }
    }

    /// [§ 8.3.1 Collapsing margins](https://www.w3.org/TR/CSS2/box.html#collapsing-margins)
    ///
    /// "When two or more margins collapse, the resulting margin width is the
    /// maximum of the collapsing margins' widths."
    #[must_use]
    pub fn collapse_sibling_margins(a: f32, b: f32) -> f32 {
        a.max(b)
    }

    /// [§ 8.3.1 Collapsing margins](https://www.w3.org/TR/CSS2/box.html#collapsing-margins)
    ///
    /// A parent's margin and its first (or last) child's abutting margin
    /// collapse to the larger of the two, unless the parent has border or
    /// padding on that side, or content separates them, in which case both
    /// apply.
    #[must_use]
    pub fn collapse_parent_child(
        parent: f32,
        child: f32,
        parent_has_border_or_padding: bool,
        child_has_content: bool,
    ) -> f32 {
        if parent_has_border_or_padding || child_has_content {
            parent + child
        } else {
            parent.max(child)
        }
    }
}

fn non_negative(edges: EdgeSizes) -> EdgeSizes {
    EdgeSizes {
        top: edges.top.max(0.0),
        right: edges.right.max(0.0),
        bottom: edges.bottom.max(0.0),
        left: edges.left.max(0.0),
    }
}
