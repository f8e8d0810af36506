//! Per-element style resolution.
//!
//! This module implements style computation per
//! [CSS Cascading and Inheritance Level 4](https://www.w3.org/TR/css-cascade-4/),
//! reduced to a single author origin: each node carries its own sparse
//! authored style, so there is no selector matching.
//!
//! Resolution order for one element:
//! 1. start from the engine's default record,
//! 2. inherit from the parent's resolved style,
//! 3. apply authored properties through the [`UnitResolver`],
//! 4. apply tag adjustments for properties the author left unset.

mod ua;

use std::str::FromStr;
use std::sync::Arc;

use tidal_dom::TEXT_TAG;

use crate::error::Result;
use crate::layout::box_model::EdgeSizes;
use crate::layout::values::{AutoEdgeSizes, AutoOr};
use crate::style::{
    AuthoredStyle, Display, LengthInput, PropertyKind, ResolutionContext, ResolvedStyle, Rgba,
    Side, UnitResolver,
};

pub use ua::{default_display_for_tag, heading_level};

/// Resolves authored style into [`ResolvedStyle`] records.
#[derive(Debug)]
pub struct StyleCascade {
    defaults: Arc<ResolvedStyle>,
    resolver: UnitResolver,
}

impl StyleCascade {
    /// Create a cascade that starts every element from `defaults`.
    #[must_use]
    pub fn new(defaults: Arc<ResolvedStyle>) -> Self {
        Self {
            defaults,
            resolver: UnitResolver::new(),
        }
    }

    /// The shared default record.
    #[must_use]
    pub fn defaults(&self) -> &Arc<ResolvedStyle> {
        &self.defaults
    }

    /// Replace the default record (for example after a pixel-ratio change).
    pub fn set_defaults(&mut self, defaults: Arc<ResolvedStyle>) {
        self.defaults = defaults;
    }

    /// The unit resolver used for authored lengths.
    pub fn resolver_mut(&mut self) -> &mut UnitResolver {
        &mut self.resolver
    }

    /// [§ 6 Cascading](https://www.w3.org/TR/css-cascade-4/#cascading)
    ///
    /// Compute the resolved style of one element.
    ///
    /// `ctx` supplies the viewport, pixel ratio, root font size and
    /// percentage bases; its font size and line height are overwritten from
    /// the parent and from the element itself as resolution proceeds.
    ///
    /// # Errors
    ///
    /// Fails on the first authored length or color that does not parse.
    pub fn compute(
        &mut self,
        tag: &str,
        authored: &AuthoredStyle,
        parent: Option<&ResolvedStyle>,
        ctx: &ResolutionContext,
    ) -> Result<ResolvedStyle> {
        // STEP 1: Global defaults.
        let mut style = (*self.defaults).clone();

        // STEP 2: Inheritance.
        //
        // [§ 7 Inheritance](https://www.w3.org/TR/css-cascade-4/#inheriting)
        if let Some(parent) = parent {
            style.inherit_from(parent);
        }

        // Text nodes are anonymous inline boxes: inherited properties only.
        if tag == TEXT_TAG {
            style.display = Display::Inline;
            return Ok(style);
        }

        ua::apply_tag_font_size(tag, authored, &mut style);

        let mut ctx = ResolutionContext {
            font_size: style.font_size,
            line_height: style.line_height,
            ..*ctx
        };

        // STEP 3: Authored properties.
        self.apply_authored(authored, &mut style, &mut ctx)?;

        // STEP 4: Tag adjustments.
        ua::apply_tag_adjustments(tag, authored, &mut style);

        Ok(style)
    }

    fn apply_authored(
        &mut self,
        authored: &AuthoredStyle,
        style: &mut ResolvedStyle,
        ctx: &mut ResolutionContext,
    ) -> Result<()> {
        // Font size first: em units of every other property depend on it.
        // While resolving font-size itself, `em` and `%` refer to the parent.
        if let Some(size) = &authored.font_size {
            style.font_size = self
                .resolver
                .resolve_px(size, PropertyKind::Font, ctx)?
                .max(0.0);
        }
        ctx.font_size = style.font_size;

        if let Some(line_height) = &authored.line_height {
            if is_keyword(line_height, "normal") {
                style.line_height_factor = self.defaults.line_height_factor;
            } else if let Some(factor) = line_height_factor(line_height) {
                style.line_height_factor = Some(factor.max(0.0));
            } else {
                style.line_height_factor = None;
                style.line_height = self
                    .resolver
                    .resolve_px(line_height, PropertyKind::LineHeight, ctx)?
                    .max(0.0);
            }
        }
        style.sync_line_height();
        ctx.line_height = style.line_height;

        if let Some(family) = &authored.font_family {
            style.font_family.clone_from(family);
        }
        if let Some(weight) = authored.font_weight {
            style.font_weight = weight.clamp(1, 1000);
        }
        assign(&mut style.font_style, authored.font_style);
        if let Some(spacing) = &authored.letter_spacing {
            style.letter_spacing = self.resolver.resolve_px(spacing, PropertyKind::Font, ctx)?;
        }
        if let Some(spacing) = &authored.word_spacing {
            style.word_spacing = self.resolver.resolve_px(spacing, PropertyKind::Font, ctx)?;
        }
        assign(&mut style.text_align, authored.text_align);
        assign(&mut style.text_decoration, authored.text_decoration);
        assign(&mut style.text_transform, authored.text_transform);
        assign(&mut style.white_space, authored.white_space);
        assign(&mut style.word_break, authored.word_break);
        assign(&mut style.overflow_wrap, authored.overflow_wrap);
        assign(&mut style.text_overflow, authored.text_overflow);

        assign(&mut style.display, authored.display);
        assign(&mut style.position, authored.position);
        assign(&mut style.box_sizing, authored.box_sizing);
        assign(&mut style.visibility, authored.visibility);
        assign(&mut style.z_index, authored.z_index);
        if let Some(opacity) = authored.opacity {
            style.opacity = opacity.clamp(0.0, 1.0);
        }

        // Sizes keep 'auto' so layout can derive them from content.
        if let Some(width) = &authored.width {
            style.width = self.resolve_size(width, PropertyKind::Width, ctx)?;
        }
        if let Some(height) = &authored.height {
            style.height = self.resolve_size(height, PropertyKind::Height, ctx)?;
        }
        if let Some(min) = &authored.min_width {
            style.min_width = self.resolver.resolve_px(min, PropertyKind::Width, ctx)?.max(0.0);
        }
        if let Some(min) = &authored.min_height {
            style.min_height = self.resolver.resolve_px(min, PropertyKind::Height, ctx)?.max(0.0);
        }
        if let Some(max) = &authored.max_width {
            style.max_width = self.resolve_max(max, PropertyKind::Width, ctx)?;
        }
        if let Some(max) = &authored.max_height {
            style.max_height = self.resolve_max(max, PropertyKind::Height, ctx)?;
        }

        style.margin = self.resolve_auto_edges(
            style.margin,
            |side| authored.margin_side(side),
            |_| PropertyKind::Margin,
            ctx,
        )?;
        style.offsets = self.resolve_auto_edges(
            style.offsets,
            |side| authored.offset_side(side),
            |side| match side {
                Side::Top | Side::Bottom => PropertyKind::Height,
                Side::Left | Side::Right => PropertyKind::Offset,
            },
            ctx,
        )?;
        style.padding = self.resolve_edges(
            style.padding,
            |side| authored.padding_side(side),
            PropertyKind::Padding,
            ctx,
        )?;
        style.border_width = self.resolve_edges(
            style.border_width,
            |side| authored.border_side(side),
            PropertyKind::Border,
            ctx,
        )?;

        if let Some(color) = &authored.color {
            style.color = Rgba::from_str(color)?;
        }
        if let Some(color) = &authored.background_color {
            style.background_color = Rgba::from_str(color)?;
        }
        if let Some(color) = &authored.border_color {
            style.border_color = Rgba::from_str(color)?;
        }

        assign(&mut style.flex_direction, authored.flex_direction);
        assign(&mut style.flex_wrap, authored.flex_wrap);
        assign(&mut style.justify_content, authored.justify_content);
        assign(&mut style.align_items, authored.align_items);
        assign(&mut style.align_self, authored.align_self);
        assign(&mut style.align_content, authored.align_content);
        if let Some(grow) = authored.flex_grow {
            style.flex_grow = grow.max(0.0);
        }
        if let Some(shrink) = authored.flex_shrink {
            style.flex_shrink = shrink.max(0.0);
        }
        if let Some(basis) = &authored.flex_basis {
            // [§ 7.2.3 flex-basis](https://www.w3.org/TR/css-flexbox-1/#flex-basis-property)
            // "auto: When specified on a flex item, the auto keyword
            // retrieves the value of the main size property."
            style.flex_basis = self.resolve_size(basis, PropertyKind::Width, ctx)?;
        }
        if let Some(gap) = &authored.gap {
            let px = self.resolver.resolve_px(gap, PropertyKind::Width, ctx)?.max(0.0);
            style.row_gap = px;
            style.column_gap = px;
        }
        if let Some(gap) = &authored.row_gap {
            style.row_gap = self.resolver.resolve_px(gap, PropertyKind::Height, ctx)?.max(0.0);
        }
        if let Some(gap) = &authored.column_gap {
            style.column_gap = self.resolver.resolve_px(gap, PropertyKind::Width, ctx)?.max(0.0);
        }

        Ok(())
    }

    /// `width`/`height`: 'auto' stays 'auto', lengths are floored at zero.
    fn resolve_size(
        &mut self,
        value: &LengthInput,
        property: PropertyKind,
        ctx: &ResolutionContext,
    ) -> Result<AutoOr> {
        if is_auto(value) {
            return Ok(AutoOr::Auto);
        }
        Ok(AutoOr::Length(
            self.resolver.resolve_px(value, property, ctx)?.max(0.0),
        ))
    }

    /// `max-width`/`max-height`: `none` means unbounded.
    fn resolve_max(
        &mut self,
        value: &LengthInput,
        property: PropertyKind,
        ctx: &ResolutionContext,
    ) -> Result<Option<f32>> {
        if is_keyword(value, "none") {
            return Ok(None);
        }
        Ok(Some(self.resolver.resolve_px(value, property, ctx)?.max(0.0)))
    }

    /// Margins and offsets: 'auto' is kept per side. Negative margins are
    /// clamped to zero.
    fn resolve_auto_edges<'a>(
        &mut self,
        current: AutoEdgeSizes,
        side_value: impl Fn(Side) -> Option<&'a LengthInput>,
        kind: impl Fn(Side) -> PropertyKind,
        ctx: &ResolutionContext,
    ) -> Result<AutoEdgeSizes> {
        let mut resolve = |side: Side, fallback: AutoOr| -> Result<AutoOr> {
            let Some(value) = side_value(side) else {
                return Ok(fallback);
            };
            if is_auto(value) {
                return Ok(AutoOr::Auto);
            }
            let px = self.resolver.resolve_px(value, kind(side), ctx)?;
            Ok(AutoOr::Length(match kind(side) {
                PropertyKind::Margin => px.max(0.0),
                _ => px,
            }))
        };
        Ok(AutoEdgeSizes {
            top: resolve(Side::Top, current.top)?,
            right: resolve(Side::Right, current.right)?,
            bottom: resolve(Side::Bottom, current.bottom)?,
            left: resolve(Side::Left, current.left)?,
        })
    }

    /// Padding and border widths: non-negative pixels per side.
    fn resolve_edges<'a>(
        &mut self,
        current: EdgeSizes,
        side_value: impl Fn(Side) -> Option<&'a LengthInput>,
        kind: PropertyKind,
        ctx: &ResolutionContext,
    ) -> Result<EdgeSizes> {
        let mut resolve = |side: Side, fallback: f32| -> Result<f32> {
            side_value(side).map_or(Ok(fallback), |value| {
                Ok(self.resolver.resolve_px(value, kind, ctx)?.max(0.0))
            })
        };
        Ok(EdgeSizes {
            top: resolve(Side::Top, current.top)?,
            right: resolve(Side::Right, current.right)?,
            bottom: resolve(Side::Bottom, current.bottom)?,
            left: resolve(Side::Left, current.left)?,
        })
    }
}

fn assign<T>(slot: &mut T, value: Option<T>) {
    if let Some(value) = value {
        *slot = value;
    }
}

fn is_auto(value: &LengthInput) -> bool {
    is_keyword(value, "auto")
}

fn is_keyword(value: &LengthInput, keyword: &str) -> bool {
    matches!(value, LengthInput::Text(text) if text.trim().eq_ignore_ascii_case(keyword))
}

/// [§ 10.8 line-height](https://www.w3.org/TR/CSS2/visudet.html#propdef-line-height)
///
/// "<number>: The used value of the property is this number multiplied by
/// the element's font size."
///
/// A bare number, or a string without a unit, is such a multiplier.
fn line_height_factor(value: &LengthInput) -> Option<f32> {
    match value {
        LengthInput::Number(factor) => Some(*factor),
        LengthInput::Text(text) => text.trim().parse::<f32>().ok(),
    }
}
