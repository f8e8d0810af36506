//! Resolved (computed) style.
//!
//! [§ 6.5 Computed Values](https://www.w3.org/TR/css-cascade-4/#computed)
//!
//! "The computed value is the result of resolving the specified value...
//! as far as possible without laying out the document."
//!
//! Every length here is already in device pixels. The only values left
//! unresolved are the ones whose `auto` carries meaning for layout: sizes
//! (derive from content), margins (centering) and offsets.

use crate::layout::box_model::EdgeSizes;
use crate::layout::values::{AutoEdgeSizes, AutoOr};

use super::display::Display;
use super::keywords::{
    AlignContent, AlignItems, AlignSelf, BoxSizing, FlexDirection, FlexWrap, FontStyle,
    JustifyContent, OverflowWrap, Position, TextAlign, TextDecoration, TextOverflow,
    TextTransform, Visibility, WhiteSpace, WordBreak,
};
use super::values::{DEFAULT_FONT_SIZE_PX, Rgba};

/// Line height multiplier used for `line-height: normal`.
///
/// [§ 10.8.1 Leading and half-leading](https://www.w3.org/TR/CSS2/visudet.html#leading)
/// "We recommend a used value for 'normal' between 1.0 and 1.2."
pub const NORMAL_LINE_HEIGHT: f32 = 1.2;

/// Dense style record of one element.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedStyle {
    // Box generation and positioning
    pub display: Display,
    pub position: Position,
    pub box_sizing: BoxSizing,
    pub visibility: Visibility,
    pub z_index: i32,
    pub opacity: f32,

    // Sizing
    pub width: AutoOr,
    pub height: AutoOr,
    pub min_width: f32,
    pub min_height: f32,
    /// `None` for `max-width: none`.
    pub max_width: Option<f32>,
    /// `None` for `max-height: none`.
    pub max_height: Option<f32>,

    // Spacing
    pub margin: AutoEdgeSizes,
    pub padding: EdgeSizes,
    pub border_width: EdgeSizes,
    /// `top`/`right`/`bottom`/`left`.
    pub offsets: AutoEdgeSizes,

    // Typography
    pub font_family: String,
    pub font_size: f32,
    pub font_weight: u16,
    pub font_style: FontStyle,
    /// Used line height in pixels.
    pub line_height: f32,
    /// Set when line-height was authored as a multiplier (or is `normal`).
    /// Inherited as the factor, so children with another font size scale.
    pub line_height_factor: Option<f32>,
    pub letter_spacing: f32,
    pub word_spacing: f32,
    pub text_align: TextAlign,
    pub text_decoration: TextDecoration,
    pub text_transform: TextTransform,
    pub white_space: WhiteSpace,
    pub word_break: WordBreak,
    pub overflow_wrap: OverflowWrap,
    pub text_overflow: TextOverflow,

    // Color
    pub color: Rgba,
    pub background_color: Rgba,
    pub border_color: Rgba,

    // Flexbox
    pub flex_direction: FlexDirection,
    pub flex_wrap: FlexWrap,
    pub justify_content: JustifyContent,
    pub align_items: AlignItems,
    pub align_self: AlignSelf,
    pub align_content: AlignContent,
    pub flex_grow: f32,
    pub flex_shrink: f32,
    pub flex_basis: AutoOr,
    pub row_gap: f32,
    pub column_gap: f32,
}

impl Default for ResolvedStyle {
    /// Global initial values.
    fn default() -> Self {
        Self {
            display: Display::Block,
            position: Position::Static,
            box_sizing: BoxSizing::ContentBox,
            visibility: Visibility::Visible,
            z_index: 0,
            opacity: 1.0,
            width: AutoOr::Auto,
            height: AutoOr::Auto,
            min_width: 0.0,
            min_height: 0.0,
            max_width: None,
            max_height: None,
            margin: AutoEdgeSizes::uniform(0.0),
            padding: EdgeSizes::default(),
            border_width: EdgeSizes::default(),
            offsets: AutoEdgeSizes::auto(),
            font_family: "sans-serif".to_string(),
            font_size: DEFAULT_FONT_SIZE_PX,
            font_weight: 400,
            font_style: FontStyle::Normal,
            line_height: DEFAULT_FONT_SIZE_PX * NORMAL_LINE_HEIGHT,
            line_height_factor: Some(NORMAL_LINE_HEIGHT),
            letter_spacing: 0.0,
            word_spacing: 0.0,
            text_align: TextAlign::Start,
            text_decoration: TextDecoration::None,
            text_transform: TextTransform::None,
            white_space: WhiteSpace::Normal,
            word_break: WordBreak::Normal,
            overflow_wrap: OverflowWrap::Normal,
            text_overflow: TextOverflow::Clip,
            color: Rgba::BLACK,
            background_color: Rgba::TRANSPARENT,
            border_color: Rgba::BLACK,
            flex_direction: FlexDirection::Row,
            flex_wrap: FlexWrap::Nowrap,
            justify_content: JustifyContent::FlexStart,
            align_items: AlignItems::Stretch,
            align_self: AlignSelf::Auto,
            align_content: AlignContent::Stretch,
            flex_grow: 0.0,
            flex_shrink: 1.0,
            flex_basis: AutoOr::Auto,
            row_gap: 0.0,
            column_gap: 0.0,
        }
    }
}

impl ResolvedStyle {
    /// [§ 7 Inheritance](https://www.w3.org/TR/css-cascade-4/#inheriting)
    ///
    /// "Inheritance propagates property values from parent elements to their
    /// children."
    ///
    /// Copies the inherited properties of `parent` onto `self`; every other
    /// property keeps its current (initial) value.
    pub fn inherit_from(&mut self, parent: &Self) {
        self.font_family.clone_from(&parent.font_family);
        self.font_size = parent.font_size;
        self.font_weight = parent.font_weight;
        self.font_style = parent.font_style;
        self.line_height = parent.line_height;
        self.line_height_factor = parent.line_height_factor;
        self.letter_spacing = parent.letter_spacing;
        self.word_spacing = parent.word_spacing;
        self.text_align = parent.text_align;
        self.text_decoration = parent.text_decoration;
        self.text_transform = parent.text_transform;
        self.white_space = parent.white_space;
        self.word_break = parent.word_break;
        self.overflow_wrap = parent.overflow_wrap;
        self.text_overflow = parent.text_overflow;
        self.color = parent.color;
        self.visibility = parent.visibility;
    }

    /// Recompute the used line height after the font size changed.
    pub fn sync_line_height(&mut self) {
        if let Some(factor) = self.line_height_factor {
            self.line_height = self.font_size * factor;
        }
    }

    /// Padding plus border on every side.
    #[must_use]
    pub fn padding_and_border(&self) -> EdgeSizes {
        self.padding.plus(&self.border_width)
    }

    /// Margins with 'auto' treated as zero.
    #[must_use]
    pub const fn margin_or_zero(&self) -> EdgeSizes {
        self.margin.to_edges_or_zero()
    }

    /// Whether the box takes part in its parent's layout.
    #[must_use]
    pub const fn is_in_flow(&self) -> bool {
        !self.display.is_none() && !self.position.is_out_of_flow()
    }

    /// Clamp a content-box width to `min-width`/`max-width`.
    #[must_use]
    pub fn clamp_content_width(&self, width: f32) -> f32 {
        let spacing = self.padding_and_border().horizontal();
        clamp_axis(width, self.min_width, self.max_width, spacing, self.box_sizing)
    }

    /// Clamp a content-box height to `min-height`/`max-height`.
    #[must_use]
    pub fn clamp_content_height(&self, height: f32) -> f32 {
        let spacing = self.padding_and_border().vertical();
        clamp_axis(height, self.min_height, self.max_height, spacing, self.box_sizing)
    }
}

/// [§ 10.4 Minimum and maximum widths](https://www.w3.org/TR/CSS2/visudet.html#min-max-widths)
///
/// min/max are authored in the element's sizing box; compare in content box.
/// "If the tentative used width is greater than 'max-width'... 'max-width'
/// is used. If the resulting width is smaller than 'min-width'... 'min-width'
/// is used."
fn clamp_axis(value: f32, min: f32, max: Option<f32>, spacing: f32, sizing: BoxSizing) -> f32 {
    let to_content = |v: f32| match sizing {
        BoxSizing::ContentBox => v,
        BoxSizing::BorderBox => (v - spacing).max(0.0),
    };
    let mut out = value;
    if let Some(max) = max {
        out = out.min(to_content(max));
    }
    out.max(to_content(min)).max(0.0)
}
