//! Authored (specified) style.
//!
//! [§ 6.4 Specified Values](https://www.w3.org/TR/css-cascade-4/#specified)
//!
//! A sparse property set: every field is optional and unset properties fall
//! through to inheritance or the engine defaults. Length-valued properties
//! accept a bare number (pixels) or the unit grammar of
//! [`AutoLength`](crate::style::AutoLength).

use serde::{Deserialize, Serialize};

use super::display::Display;
use super::keywords::{
    AlignContent, AlignItems, AlignSelf, BoxSizing, FlexDirection, FlexWrap, FontStyle,
    JustifyContent, OverflowWrap, Position, TextAlign, TextDecoration, TextOverflow,
    TextTransform, Visibility, WhiteSpace, WordBreak,
};
use super::values::LengthInput;

/// Sparse authored style of one element.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct AuthoredStyle {
    // Box generation and positioning
    pub display: Option<Display>,
    pub position: Option<Position>,
    pub box_sizing: Option<BoxSizing>,
    pub visibility: Option<Visibility>,
    pub z_index: Option<i32>,
    pub opacity: Option<f32>,

    // Sizing
    pub width: Option<LengthInput>,
    pub height: Option<LengthInput>,
    pub min_width: Option<LengthInput>,
    pub min_height: Option<LengthInput>,
    pub max_width: Option<LengthInput>,
    pub max_height: Option<LengthInput>,

    // Spacing. The shorthand applies to every side; a per-side value wins.
    pub margin: Option<LengthInput>,
    pub margin_top: Option<LengthInput>,
    pub margin_right: Option<LengthInput>,
    pub margin_bottom: Option<LengthInput>,
    pub margin_left: Option<LengthInput>,
    pub padding: Option<LengthInput>,
    pub padding_top: Option<LengthInput>,
    pub padding_right: Option<LengthInput>,
    pub padding_bottom: Option<LengthInput>,
    pub padding_left: Option<LengthInput>,
    pub border_width: Option<LengthInput>,
    pub border_top_width: Option<LengthInput>,
    pub border_right_width: Option<LengthInput>,
    pub border_bottom_width: Option<LengthInput>,
    pub border_left_width: Option<LengthInput>,

    // Offsets for positioned boxes
    pub top: Option<LengthInput>,
    pub right: Option<LengthInput>,
    pub bottom: Option<LengthInput>,
    pub left: Option<LengthInput>,

    // Typography
    pub font_family: Option<String>,
    pub font_size: Option<LengthInput>,
    pub font_weight: Option<u16>,
    pub font_style: Option<FontStyle>,
    /// A bare number is a multiplier of the font size.
    pub line_height: Option<LengthInput>,
    pub letter_spacing: Option<LengthInput>,
    pub word_spacing: Option<LengthInput>,
    pub text_align: Option<TextAlign>,
    pub text_decoration: Option<TextDecoration>,
    pub text_transform: Option<TextTransform>,
    pub white_space: Option<WhiteSpace>,
    pub word_break: Option<WordBreak>,
    pub overflow_wrap: Option<OverflowWrap>,
    pub text_overflow: Option<TextOverflow>,

    // Color
    pub color: Option<String>,
    pub background_color: Option<String>,
    pub border_color: Option<String>,

    // Flexbox
    pub flex_direction: Option<FlexDirection>,
    pub flex_wrap: Option<FlexWrap>,
    pub justify_content: Option<JustifyContent>,
    pub align_items: Option<AlignItems>,
    pub align_self: Option<AlignSelf>,
    pub align_content: Option<AlignContent>,
    pub flex_grow: Option<f32>,
    pub flex_shrink: Option<f32>,
    pub flex_basis: Option<LengthInput>,
    pub gap: Option<LengthInput>,
    pub row_gap: Option<LengthInput>,
    pub column_gap: Option<LengthInput>,
}

/// Copy every field that is set in `$patch` onto `$target`.
macro_rules! merge_fields {
    ($target:ident, $patch:ident; $($field:ident),+ $(,)?) => {
        $(
            if let Some(value) = &$patch.$field {
                $target.$field = Some(value.clone());
            }
        )+
    };
}

/// Physical box side, used to pick a per-side longhand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Top,
    Right,
    Bottom,
    Left,
}

impl AuthoredStyle {
    /// Overlay `patch` on top of this style: every property set in the patch
    /// replaces the current value, unset properties are kept.
    pub fn merge(&mut self, patch: &Self) {
        let this = self;
        merge_fields!(this, patch;
            display, position, box_sizing, visibility, z_index, opacity,
            width, height, min_width, min_height, max_width, max_height,
            margin, margin_top, margin_right, margin_bottom, margin_left,
            padding, padding_top, padding_right, padding_bottom, padding_left,
            border_width, border_top_width, border_right_width, border_bottom_width,
            border_left_width,
            top, right, bottom, left,
            font_family, font_size, font_weight, font_style, line_height,
            letter_spacing, word_spacing, text_align, text_decoration, text_transform,
            white_space, word_break, overflow_wrap, text_overflow,
            color, background_color, border_color,
            flex_direction, flex_wrap, justify_content, align_items, align_self,
            align_content, flex_grow, flex_shrink, flex_basis, gap, row_gap, column_gap,
        );
    }

    /// Return a copy with `patch` merged on top.
    #[must_use]
    pub fn merged(&self, patch: &Self) -> Self {
        let mut out = self.clone();
        out.merge(patch);
        out
    }

    /// The effective margin of one side (longhand, else shorthand).
    #[must_use]
    pub fn margin_side(&self, side: Side) -> Option<&LengthInput> {
        let longhand = match side {
            Side::Top => &self.margin_top,
            Side::Right => &self.margin_right,
            Side::Bottom => &self.margin_bottom,
            Side::Left => &self.margin_left,
        };
        longhand.as_ref().or(self.margin.as_ref())
    }

    /// The effective padding of one side (longhand, else shorthand).
    #[must_use]
    pub fn padding_side(&self, side: Side) -> Option<&LengthInput> {
        let longhand = match side {
            Side::Top => &self.padding_top,
            Side::Right => &self.padding_right,
            Side::Bottom => &self.padding_bottom,
            Side::Left => &self.padding_left,
        };
        longhand.as_ref().or(self.padding.as_ref())
    }

    /// The effective border width of one side (longhand, else shorthand).
    #[must_use]
    pub fn border_side(&self, side: Side) -> Option<&LengthInput> {
        let longhand = match side {
            Side::Top => &self.border_top_width,
            Side::Right => &self.border_right_width,
            Side::Bottom => &self.border_bottom_width,
            Side::Left => &self.border_left_width,
        };
        longhand.as_ref().or(self.border_width.as_ref())
    }

    /// The offset property of one side.
    #[must_use]
    pub const fn offset_side(&self, side: Side) -> Option<&LengthInput> {
        match side {
            Side::Top => self.top.as_ref(),
            Side::Right => self.right.as_ref(),
            Side::Bottom => self.bottom.as_ref(),
            Side::Left => self.left.as_ref(),
        }
    }
}
