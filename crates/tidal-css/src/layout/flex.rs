//! CSS Flexbox Layout Algorithm.
//!
//! [§ 9 Flex Layout Algorithm](https://www.w3.org/TR/css-flexbox-1/#layout-algorithm)
//!
//! Supported:
//! - all four `flex-direction` values
//! - `flex-wrap` with greedy line breaking, `wrap-reverse` included
//! - `flex-grow` / `flex-shrink` distribution with min/max clamping (§ 9.7)
//! - `flex-basis` (definite length or auto)
//! - `justify-content`, `align-items`/`align-self`, `align-content`
//! - `row-gap` / `column-gap`
//!
//! All sizes inside the algorithm are border-box sizes; margins are the only
//! "outer" contribution. `baseline` alignment is treated as `flex-start`,
//! and `auto` margins on flex items are treated as zero.

use tidal_common::warning::warn_once;
use tidal_dom::NodeId;

use crate::error::Result;
use crate::style::{AlignContent, AlignItems, FlexWrap, JustifyContent, ResolvedStyle};

use super::algorithm::{ChildPlacement, Constraint, Extent, Fragment};
use super::box_model::{BoxModel, EdgeSizes, Rect, Size};
use super::context::LayoutContext;

const EPSILON: f32 = 0.01;

/// Lays out flex containers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FlexLayout;

/// Per-item data collected during flex layout.
///
/// [§ 9.2 Line Length Determination](https://www.w3.org/TR/css-flexbox-1/#algo-main-item)
#[derive(Debug, Clone)]
struct FlexItem {
    node: NodeId,
    /// [§ 9.2 step 3](https://www.w3.org/TR/css-flexbox-1/#algo-main-item)
    /// The flex base size.
    base_size: f32,
    /// [§ 9.2 step 3E](https://www.w3.org/TR/css-flexbox-1/#algo-main-item)
    /// "The hypothetical main size is the item's flex base size clamped
    /// according to its used min and max main sizes."
    hypothetical_size: f32,
    min_main: f32,
    max_main: f32,
    grow: f32,
    shrink: f32,
    /// The resolved target main size after § 9.7.
    target_size: f32,
    /// Whether this item is frozen during the § 9.7 loop.
    frozen: bool,
    /// Clamping adjustment of the current § 9.7 iteration.
    violation: f32,
    /// Sum of the main-axis margins.
    outer_main: f32,
    margin: EdgeSizes,
    cross_size: f32,
    /// The cross size property is `auto`, so `stretch` applies.
    cross_auto: bool,
    min_cross: f32,
    max_cross: f32,
    align: AlignItems,
}

/// Main and cross axis mapping.
#[derive(Debug, Clone, Copy)]
struct Axes {
    row: bool,
}

impl Axes {
    const fn main_margins(self, m: &EdgeSizes) -> (f32, f32) {
        if self.row { (m.left, m.right) } else { (m.top, m.bottom) }
    }

    const fn cross_margins(self, m: &EdgeSizes) -> (f32, f32) {
        if self.row { (m.top, m.bottom) } else { (m.left, m.right) }
    }

    fn rect(self, main_pos: f32, cross_pos: f32, main: f32, cross: f32) -> Rect {
        if self.row {
            Rect::new(main_pos, cross_pos, main, cross)
        } else {
            Rect::new(cross_pos, main_pos, cross, main)
        }
    }

    const fn size(self, main: f32, cross: f32) -> Size {
        if self.row {
            Size::new(main, cross)
        } else {
            Size::new(cross, main)
        }
    }
}

/// A flex line: a contiguous range of items.
#[derive(Debug, Clone)]
struct FlexLine {
    start: usize,
    end: usize,
    cross_size: f32,
    cross_pos: f32,
}

impl FlexLayout {
    /// Main entry point for flex layout.
    ///
    /// [§ 9 Flex Layout Algorithm](https://www.w3.org/TR/css-flexbox-1/#layout-algorithm)
    ///
    /// # Errors
    ///
    /// Fails if the container or an item has no resolved style.
    pub fn layout(
        &self,
        ctx: &LayoutContext<'_>,
        node: NodeId,
        constraint: Constraint,
    ) -> Result<Fragment> {
        let style = ctx.style(node)?;
        if ctx.own_text(node).is_some() {
            warn_once("flex", "text directly inside a flex container is not laid out");
        }

        // STEP 1 (§ 9.1): Initial setup. Determine the axes.
        let axes = Axes {
            row: style.flex_direction.is_row(),
        };
        let (main_extent, cross_extent) = if axes.row {
            (constraint.width, constraint.height)
        } else {
            (constraint.height, constraint.width)
        };
        let (main_gap, cross_gap) = if axes.row {
            (style.column_gap, style.row_gap)
        } else {
            (style.row_gap, style.column_gap)
        };

        // STEP 2 (§ 9.2): Collect flex items and determine flex base sizes.
        //
        // [§ 4.1 Absolutely-Positioned Flex Children](https://www.w3.org/TR/css-flexbox-1/#abspos-items)
        //
        // "An absolutely-positioned child of a flex container does not
        // participate in flex layout."
        let mut items = Vec::new();
        for child in ctx.in_flow_children(node)? {
            items.push(collect_item(ctx, style, child, axes, cross_extent)?);
        }

        // STEP 3 (§ 9.3): Collect flex items into flex lines.
        let wrap = style.flex_wrap != FlexWrap::Nowrap;
        let mut lines = partition_lines(&items, main_extent.limit(), main_gap, wrap);

        // STEP 4 (§ 9.7): Resolve flexible lengths, line by line.
        for line in &lines {
            let slice = &mut items[line.start..line.end];
            let gaps = main_gap * slice.len().saturating_sub(1) as f32;
            let hypothetical: f32 = slice
                .iter()
                .map(|item| item.hypothetical_size + item.outer_main)
                .sum();
            let available = match main_extent {
                Extent::Exact(main) => Some(main - gaps),
                Extent::AtMost(main) if hypothetical + gaps > main => Some(main - gaps),
                _ => None,
            };
            match available {
                Some(available) => resolve_flexible_lengths(slice, available),
                None => {
                    for item in slice.iter_mut() {
                        item.target_size = item.hypothetical_size;
                    }
                }
            }
        }

        // STEP 5 (§ 9.4): Hypothetical cross size of each item.
        if axes.row {
            for item in &mut items {
                item.cross_size = ctx.border_box_height_for_width(item.node, item.target_size)?;
            }
        }

        // STEP 6 (§ 9.4 step 8): Cross size of each flex line.
        //
        // "If the flex container is single-line and has a definite cross
        // size, the cross size of the flex line is the flex container's
        // inner cross size."
        for line in &mut lines {
            line.cross_size = items[line.start..line.end]
                .iter()
                .map(|item| {
                    let (start, end) = axes.cross_margins(&item.margin);
                    item.cross_size + start + end
                })
                .fold(0.0_f32, f32::max);
        }
        if !wrap
            && let (Some(cross), [line]) = (cross_extent.exact(), lines.as_mut_slice())
        {
            line.cross_size = cross;
        }

        // STEP 7 (§ 9.4 step 15): Container cross size.
        let cross_gaps = cross_gap * lines.len().saturating_sub(1) as f32;
        let lines_cross: f32 = lines.iter().map(|l| l.cross_size).sum::<f32>() + cross_gaps;
        let container_cross = cross_extent.exact().unwrap_or(lines_cross);

        // STEP 8 (§ 9.4 step 9 / § 8.4): align-content.
        let mut free_cross = container_cross - lines_cross;
        if style.align_content == AlignContent::Stretch && free_cross > 0.0 && !lines.is_empty() {
            let extra = free_cross / lines.len() as f32;
            for line in &mut lines {
                line.cross_size += extra;
            }
            free_cross = 0.0;
        }
        let (initial, between) = distribute_space(
            Distribution::from(style.align_content),
            free_cross.max(0.0),
            lines.len(),
        );
        let mut cursor = initial;
        for line in &mut lines {
            line.cross_pos = cursor;
            cursor += line.cross_size + cross_gap + between;
        }
        if style.flex_wrap == FlexWrap::WrapReverse {
            for line in &mut lines {
                line.cross_pos = container_cross - line.cross_pos - line.cross_size;
            }
        }

        // STEP 9 (§ 9.4 step 11 / § 8.3): Align items within their line.
        for line in &lines {
            for item in &mut items[line.start..line.end] {
                let (start, end) = axes.cross_margins(&item.margin);
                if item.align == AlignItems::Stretch && item.cross_auto {
                    item.cross_size = (line.cross_size - start - end)
                        .min(item.max_cross)
                        .max(item.min_cross);
                }
            }
        }

        // STEP 10 (§ 9.5 / § 8.2): Main-axis alignment.
        let line_used = |line: &FlexLine| {
            items[line.start..line.end]
                .iter()
                .map(|item| item.target_size + item.outer_main)
                .sum::<f32>()
                + main_gap * (line.end - line.start).saturating_sub(1) as f32
        };
        let container_main = main_extent
            .exact()
            .unwrap_or_else(|| lines.iter().map(&line_used).fold(0.0_f32, f32::max));

        let reverse = style.flex_direction.is_reverse();
        let mut placements = Vec::with_capacity(items.len());
        for line in &lines {
            let free = (container_main - line_used(line)).max(0.0);
            let (initial, between) = distribute_space(
                Distribution::from(style.justify_content),
                free,
                line.end - line.start,
            );
            let mut cursor = initial;
            for item in &items[line.start..line.end] {
                let (main_start, main_end) = axes.main_margins(&item.margin);
                let (cross_start, cross_end) = axes.cross_margins(&item.margin);

                let mut main_pos = cursor + main_start;
                cursor = main_pos + item.target_size + main_end + main_gap + between;
                if reverse {
                    main_pos = container_main - main_pos - item.target_size;
                }

                let cross_offset = match item.align {
                    AlignItems::FlexEnd => line.cross_size - item.cross_size - cross_end,
                    AlignItems::Center => {
                        cross_start
                            + (line.cross_size - item.cross_size - cross_start - cross_end) / 2.0
                    }
                    AlignItems::FlexStart | AlignItems::Baseline | AlignItems::Stretch => {
                        cross_start
                    }
                };

                placements.push(ChildPlacement {
                    node: item.node,
                    border_box: axes.rect(
                        main_pos,
                        line.cross_pos + cross_offset,
                        item.target_size,
                        item.cross_size,
                    ),
                    margin: item.margin,
                });
            }
        }

        Ok(Fragment {
            size: axes.size(container_main, container_cross),
            placements,
            text_origin: None,
        })
    }
}

/// Build the [`FlexItem`] of one child.
///
/// [§ 9.2 step 3](https://www.w3.org/TR/css-flexbox-1/#algo-main-item)
///
/// Determine flex base size:
///   A. If flex-basis is a definite length, use it.
///   B. If flex-basis is auto and the item has a definite main size, use that.
///   C. Otherwise, use the max-content size.
fn collect_item(
    ctx: &LayoutContext<'_>,
    container: &ResolvedStyle,
    child: NodeId,
    axes: Axes,
    cross_extent: Extent,
) -> Result<FlexItem> {
    let style = ctx.style(child)?;
    let margin = style.margin_or_zero();
    let spacing = style.padding_and_border();
    let align = style.align_self.resolve(container.align_items);

    let (spacing_main, spacing_cross) = if axes.row {
        (spacing.horizontal(), spacing.vertical())
    } else {
        (spacing.vertical(), spacing.horizontal())
    };
    let clamp_width = |border: f32| {
        style.clamp_content_width(border - spacing.horizontal()) + spacing.horizontal()
    };
    let clamp_height =
        |border: f32| style.clamp_content_height(border - spacing.vertical()) + spacing.vertical();
    let (clamp_main, clamp_cross): (&dyn Fn(f32) -> f32, &dyn Fn(f32) -> f32) = if axes.row {
        (&clamp_width, &clamp_height)
    } else {
        (&clamp_height, &clamp_width)
    };
    let to_border_main =
        |specified: f32| BoxModel::content_length(specified, spacing_main, style.box_sizing) + spacing_main;

    let (specified_main, specified_cross) = if axes.row {
        (style.width, style.height)
    } else {
        (style.height, style.width)
    };
    let (cross_start, cross_end) = axes.cross_margins(&margin);

    // A column item's cross size (its width) is needed before its height.
    let column_width = if axes.row {
        0.0
    } else if specified_cross.is_auto()
        && align == AlignItems::Stretch
        && let Some(cross) = cross_extent.exact()
    {
        clamp_width((cross - cross_start - cross_end).max(spacing_cross))
    } else {
        ctx.border_box_size(child, cross_extent.loosen())?.width
    };

    let base_size = if let Some(basis) = style.flex_basis.length() {
        to_border_main(basis)
    } else if let Some(main) = specified_main.length() {
        to_border_main(main)
    } else if axes.row {
        ctx.border_box_size(child, Extent::Unbounded)?.width
    } else {
        ctx.border_box_height_for_width(child, column_width)?
    };

    let (main_start, main_end) = axes.main_margins(&margin);
    Ok(FlexItem {
        node: child,
        base_size,
        hypothetical_size: clamp_main(base_size),
        min_main: clamp_main(0.0),
        max_main: clamp_main(f32::INFINITY),
        grow: style.flex_grow.max(0.0),
        shrink: style.flex_shrink.max(0.0),
        target_size: 0.0,
        frozen: false,
        violation: 0.0,
        outer_main: main_start + main_end,
        margin,
        cross_size: column_width,
        cross_auto: specified_cross.is_auto(),
        min_cross: clamp_cross(0.0),
        max_cross: clamp_cross(f32::INFINITY),
        align,
    })
}

/// [§ 9.3 Main Size Determination](https://www.w3.org/TR/css-flexbox-1/#algo-line-break)
///
/// "If the flex container is single-line, collect all the flex items into a
/// single flex line." Otherwise, "collect consecutive items one by one until
/// the first uncollected item would not fit into the flex container's inner
/// main size... If the very first uncollected item wouldn't fit, collect
/// just it into the line."
fn partition_lines(
    items: &[FlexItem],
    main_limit: Option<f32>,
    gap: f32,
    wrap: bool,
) -> Vec<FlexLine> {
    let mut lines = Vec::new();
    if items.is_empty() {
        return lines;
    }
    let new_line = |start, end| FlexLine {
        start,
        end,
        cross_size: 0.0,
        cross_pos: 0.0,
    };

    let mut start = 0;
    let mut used = 0.0_f32;
    for (i, item) in items.iter().enumerate() {
        let outer = item.hypothetical_size + item.outer_main;
        let add = if i == start { outer } else { gap + outer };
        let overflows = main_limit.is_some_and(|limit| used + add > limit + EPSILON);
        if wrap && i > start && overflows {
            lines.push(new_line(start, i));
            start = i;
            used = outer;
        } else {
            used += add;
        }
    }
    lines.push(new_line(start, items.len()));
    lines
}

/// [§ 9.7 Resolving Flexible Lengths](https://www.w3.org/TR/css-flexbox-1/#resolve-flexible-lengths)
///
/// Full iterative freeze-loop algorithm over border-box main sizes.
///
/// Positive free space is distributed in full whenever some item can grow,
/// so that a growing line always fills its container.
fn resolve_flexible_lengths(items: &mut [FlexItem], available_main: f32) {
    if items.is_empty() {
        return;
    }

    // STEP 1: "Determine the used flex factor."
    //
    // "If the sum of the outer hypothetical main sizes of all items on the
    // line is less than the flex container's inner main size, use the flex
    // grow factor for the rest of this algorithm; otherwise, use the flex
    // shrink factor."
    let sum_outer_hypo: f32 = items
        .iter()
        .map(|item| item.hypothetical_size + item.outer_main)
        .sum();
    let growing = sum_outer_hypo < available_main;

    // STEP 2: "Size inflexible items."
    //
    // "Freeze, setting its target main size to its hypothetical main size…
    //   - any item that has a flex factor of zero
    //   - if using the flex grow factor: any item that has a flex base size
    //     greater than its hypothetical main size
    //   - if using the flex shrink factor: any item that has a flex base size
    //     less than its hypothetical main size"
    for item in items.iter_mut() {
        item.frozen = false;
        item.target_size = item.hypothetical_size;
        let factor = if growing { item.grow } else { item.shrink };
        item.frozen = factor == 0.0
            || (growing && item.base_size > item.hypothetical_size)
            || (!growing && item.base_size < item.hypothetical_size);
    }

    // STEP 3: Loop until all items are frozen.
    loop {
        if items.iter().all(|item| item.frozen) {
            break;
        }

        // 3a. Calculate remaining free space.
        let remaining_free = available_main
            - items
                .iter()
                .map(|item| {
                    if item.frozen {
                        item.target_size + item.outer_main
                    } else {
                        item.base_size + item.outer_main
                    }
                })
                .sum::<f32>();

        // 3b. Distribute free space.
        if growing {
            // "Find the ratio of the item's flex grow factor to the sum of
            // the flex grow factors of all unfrozen items on the line. Set
            // the item's target main size to its flex base size plus a
            // fraction of the remaining free space proportional to the
            // ratio."
            let grow_sum: f32 = items
                .iter()
                .filter(|item| !item.frozen)
                .map(|item| item.grow)
                .sum();
            if grow_sum > 0.0 {
                for item in items.iter_mut().filter(|item| !item.frozen) {
                    item.target_size = item.base_size + remaining_free * (item.grow / grow_sum);
                }
            }
        } else {
            // "For every unfrozen item on the line, multiply its flex shrink
            // factor by its inner flex base size, and note this as its
            // scaled flex shrink factor... Set the item's target main size
            // to its flex base size minus a fraction of the absolute value
            // of the remaining free space proportional to the ratio."
            let scaled_shrink_sum: f32 = items
                .iter()
                .filter(|item| !item.frozen)
                .map(|item| item.shrink * item.base_size)
                .sum();
            if scaled_shrink_sum > 0.0 {
                for item in items.iter_mut().filter(|item| !item.frozen) {
                    let ratio = item.shrink * item.base_size / scaled_shrink_sum;
                    item.target_size = remaining_free.abs().mul_add(-ratio, item.base_size);
                }
            }
        }

        // 3c. "Fix min/max violations." Sizes never go below zero.
        let mut total_violation = 0.0_f32;
        for item in items.iter_mut().filter(|item| !item.frozen) {
            let clamped = item
                .target_size
                .min(item.max_main)
                .max(item.min_main)
                .max(0.0);
            item.violation = clamped - item.target_size;
            total_violation += item.violation;
            item.target_size = clamped;
        }

        // 3d. "Freeze over-flexed items."
        //
        // "If the total violation is:
        //   - Zero: freeze all items.
        //   - Positive: freeze all items with min violations.
        //   - Negative: freeze all items with max violations."
        for item in items.iter_mut().filter(|item| !item.frozen) {
            item.frozen = if total_violation.abs() < EPSILON {
                true
            } else if total_violation > 0.0 {
                item.violation > 0.0
            } else {
                item.violation < 0.0
            };
        }
    }
}

/// Packing shared by `justify-content` and `align-content`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Distribution {
    Start,
    End,
    Center,
    SpaceBetween,
    SpaceAround,
    SpaceEvenly,
}

impl From<JustifyContent> for Distribution {
    fn from(value: JustifyContent) -> Self {
        match value {
            JustifyContent::FlexStart => Self::Start,
            JustifyContent::FlexEnd => Self::End,
            JustifyContent::Center => Self::Center,
            JustifyContent::SpaceBetween => Self::SpaceBetween,
            JustifyContent::SpaceAround => Self::SpaceAround,
            JustifyContent::SpaceEvenly => Self::SpaceEvenly,
        }
    }
}

impl From<AlignContent> for Distribution {
    fn from(value: AlignContent) -> Self {
        match value {
            AlignContent::FlexStart | AlignContent::Stretch => Self::Start,
            AlignContent::FlexEnd => Self::End,
            AlignContent::Center => Self::Center,
            AlignContent::SpaceBetween => Self::SpaceBetween,
            AlignContent::SpaceAround => Self::SpaceAround,
            AlignContent::SpaceEvenly => Self::SpaceEvenly,
        }
    }
}

/// Alignment offsets.
///
/// [§ 8.2 Axis Alignment: the justify-content property](https://www.w3.org/TR/css-flexbox-1/#justify-content-property)
///
/// Returns `(initial_offset, gap_between_items)`.
fn distribute_space(mode: Distribution, free_space: f32, count: usize) -> (f32, f32) {
    if count == 0 {
        return (0.0, 0.0);
    }
    let n = count as f32;

    match mode {
        // "Flex items are packed toward the start of the line."
        Distribution::Start => (0.0, 0.0),

        // "Flex items are packed toward the end of the line."
        Distribution::End => (free_space, 0.0),

        // "Flex items are packed toward the center of the line."
        Distribution::Center => (free_space / 2.0, 0.0),

        // "If the leftover free-space is negative or there is only a single
        // flex item on the line, this value is identical to flex-start."
        Distribution::SpaceBetween => {
            if count <= 1 || free_space <= 0.0 {
                (0.0, 0.0)
            } else {
                (0.0, free_space / (n - 1.0))
            }
        }

        // "Flex items are evenly distributed in the line, with half-size
        // spaces on either end."
        Distribution::SpaceAround => {
            if free_space <= 0.0 {
                (0.0, 0.0)
            } else {
                let gap = free_space / n;
                (gap / 2.0, gap)
            }
        }

        // Equal spaces between items and at both ends.
        Distribution::SpaceEvenly => {
            if free_space <= 0.0 {
                (0.0, 0.0)
            } else {
                let gap = free_space / (n + 1.0);
                (gap, gap)
            }
        }
    }
}
