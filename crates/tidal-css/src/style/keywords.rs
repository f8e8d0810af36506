//! Keyword-valued properties.
//!
//! Every enum spells its variants the way CSS does (`flex-start`,
//! `pre-wrap`, ...). Parsing goes through `strum`, so
//! `"space-between".parse::<JustifyContent>()` works, and serde uses the same
//! spelling for scene files.

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// [§ 2.1 Choosing a positioning scheme](https://www.w3.org/TR/CSS2/visuren.html#choose-position)
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, EnumString, Display, AsRefStr,
)]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
#[serde(rename_all = "kebab-case")]
pub enum Position {
    /// "The box is a normal box, laid out according to the normal flow."
    #[default]
    Static,
    /// "The box's position is calculated according to the normal flow.
    /// Then the box is offset relative to its normal position."
    Relative,
    /// "The box's position is specified with the 'top', 'right', 'bottom',
    /// and 'left' properties... taken out of the normal flow."
    Absolute,
    /// "The box's position is calculated according to the 'absolute' model,
    /// but in addition, the box is fixed with respect to some reference."
    Fixed,
    /// Laid out like `relative` with zero offsets.
    Sticky,
}

impl Position {
    /// Absolute and fixed boxes do not take part in their parent's flow.
    #[must_use]
    pub const fn is_out_of_flow(self) -> bool {
        matches!(self, Self::Absolute | Self::Fixed)
    }
}

/// [§ 4.4 box-sizing](https://www.w3.org/TR/css-box-4/#box-sizing)
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, EnumString, Display, AsRefStr,
)]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
#[serde(rename_all = "kebab-case")]
pub enum BoxSizing {
    /// "width and height... are applied to the content box"
    #[default]
    ContentBox,
    /// "width and height... include padding and border"
    BorderBox,
}

/// [§ 11.2 Visibility](https://www.w3.org/TR/CSS2/visufx.html#visibility)
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, EnumString, Display, AsRefStr,
)]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
#[serde(rename_all = "kebab-case")]
pub enum Visibility {
    /// "The generated box is visible."
    #[default]
    Visible,
    /// "The generated box is invisible (fully transparent), but still
    /// affects layout."
    Hidden,
    /// Treated as `hidden`.
    Collapse,
}

impl Visibility {
    /// Whether the box is painted.
    #[must_use]
    pub const fn is_visible(self) -> bool {
        matches!(self, Self::Visible)
    }
}

/// [§ 3.3 font-style](https://www.w3.org/TR/css-fonts-4/#font-style-prop)
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, EnumString, Display, AsRefStr,
)]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
#[serde(rename_all = "kebab-case")]
pub enum FontStyle {
    #[default]
    Normal,
    Italic,
    Oblique,
}

/// [§ 7.1 text-align](https://www.w3.org/TR/css-text-3/#text-align-property)
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, EnumString, Display, AsRefStr,
)]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
#[serde(rename_all = "kebab-case")]
pub enum TextAlign {
    #[default]
    Start,
    End,
    Left,
    Right,
    Center,
    /// Laid out as `start`; inter-word stretching is left to the renderer.
    Justify,
}

impl TextAlign {
    /// Fraction of the free space placed before a line (0 = start,
    /// 0.5 = center, 1 = end) in a left-to-right context.
    #[must_use]
    pub const fn offset_factor(self) -> f32 {
        match self {
            Self::Start | Self::Left | Self::Justify => 0.0,
            Self::Center => 0.5,
            Self::End | Self::Right => 1.0,
        }
    }
}

/// [§ 2 text-decoration-line](https://www.w3.org/TR/css-text-decor-3/#text-decoration-line-property)
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, EnumString, Display, AsRefStr,
)]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
#[serde(rename_all = "kebab-case")]
pub enum TextDecoration {
    #[default]
    None,
    Underline,
    Overline,
    LineThrough,
}

/// [§ 2.1 text-transform](https://www.w3.org/TR/css-text-3/#text-transform-property)
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, EnumString, Display, AsRefStr,
)]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
#[serde(rename_all = "kebab-case")]
pub enum TextTransform {
    #[default]
    None,
    /// "Puts the first typographic letter unit of each word... in titlecase."
    Capitalize,
    /// "Puts all letters in uppercase."
    Uppercase,
    /// "Puts all letters in lowercase."
    Lowercase,
}

/// [§ 3 White Space and Wrapping: the white-space property](https://www.w3.org/TR/css-text-3/#white-space-property)
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, EnumString, Display, AsRefStr,
)]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
#[serde(rename_all = "kebab-case")]
pub enum WhiteSpace {
    /// Collapse white space, wrap lines.
    #[default]
    Normal,
    /// Collapse white space, never wrap.
    Nowrap,
    /// Preserve white space, never wrap.
    Pre,
    /// Preserve white space, wrap lines.
    PreWrap,
    /// Collapse spaces and tabs, preserve segment breaks, wrap lines.
    PreLine,
}

impl WhiteSpace {
    /// Whether soft wrap opportunities may be taken.
    #[must_use]
    pub const fn allows_wrap(self) -> bool {
        !matches!(self, Self::Nowrap | Self::Pre)
    }
}

/// [§ 5.2 word-break](https://www.w3.org/TR/css-text-3/#word-break-property)
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, EnumString, Display, AsRefStr,
)]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
#[serde(rename_all = "kebab-case")]
pub enum WordBreak {
    #[default]
    Normal,
    /// "Breaking is allowed within 'words'."
    BreakAll,
    /// "Breaking is forbidden within 'words'."
    KeepAll,
    /// Legacy alias for `overflow-wrap: anywhere`.
    BreakWord,
}

/// [§ 5.5 overflow-wrap](https://www.w3.org/TR/css-text-3/#overflow-wrap-property)
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, EnumString, Display, AsRefStr,
)]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
#[serde(rename_all = "kebab-case")]
pub enum OverflowWrap {
    #[default]
    Normal,
    BreakWord,
    Anywhere,
}

/// [§ 5.1 text-overflow](https://www.w3.org/TR/css-overflow-3/#text-overflow)
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, EnumString, Display, AsRefStr,
)]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
#[serde(rename_all = "kebab-case")]
pub enum TextOverflow {
    #[default]
    Clip,
    Ellipsis,
}

/// [§ 5.1 flex-direction](https://www.w3.org/TR/css-flexbox-1/#flex-direction-property)
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, EnumString, Display, AsRefStr,
)]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
#[serde(rename_all = "kebab-case")]
pub enum FlexDirection {
    /// "The flex container's main axis has the same orientation as the
    /// inline axis of the current writing mode."
    #[default]
    Row,
    /// "Same as row, except the main-start and main-end directions are swapped."
    RowReverse,
    /// "The flex container's main axis has the same orientation as the
    /// block axis of the current writing mode."
    Column,
    /// "Same as column, except the main-start and main-end directions are swapped."
    ColumnReverse,
}

impl FlexDirection {
    /// Whether the main axis is horizontal.
    #[must_use]
    pub const fn is_row(self) -> bool {
        matches!(self, Self::Row | Self::RowReverse)
    }

    /// Whether main-start and main-end are swapped.
    #[must_use]
    pub const fn is_reverse(self) -> bool {
        matches!(self, Self::RowReverse | Self::ColumnReverse)
    }
}

/// [§ 5.2 flex-wrap](https://www.w3.org/TR/css-flexbox-1/#flex-wrap-property)
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, EnumString, Display, AsRefStr,
)]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
#[serde(rename_all = "kebab-case")]
pub enum FlexWrap {
    /// "The flex container is single-line."
    #[default]
    Nowrap,
    /// "The flex container is multi-line."
    Wrap,
    /// "Same as wrap", with cross-start and cross-end swapped.
    WrapReverse,
}

/// [§ 8.2 justify-content](https://www.w3.org/TR/css-flexbox-1/#justify-content-property)
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, EnumString, Display, AsRefStr,
)]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
#[serde(rename_all = "kebab-case")]
pub enum JustifyContent {
    /// "Flex items are packed toward the start of the line."
    #[default]
    FlexStart,
    /// "Flex items are packed toward the end of the line."
    FlexEnd,
    /// "Flex items are packed toward the center of the line."
    Center,
    /// "Flex items are evenly distributed in the line."
    SpaceBetween,
    /// "...with half-size spaces on either end."
    SpaceAround,
    /// Equal spacing between items and at both ends.
    SpaceEvenly,
}

/// [§ 8.3 align-items](https://www.w3.org/TR/css-flexbox-1/#align-items-property)
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, EnumString, Display, AsRefStr,
)]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
#[serde(rename_all = "kebab-case")]
pub enum AlignItems {
    FlexStart,
    FlexEnd,
    Center,
    /// Aligned as `flex-start`.
    Baseline,
    #[default]
    Stretch,
}

/// [§ 8.3 align-self](https://www.w3.org/TR/css-flexbox-1/#align-items-property)
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, EnumString, Display, AsRefStr,
)]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
#[serde(rename_all = "kebab-case")]
pub enum AlignSelf {
    /// Defer to the container's `align-items`.
    #[default]
    Auto,
    FlexStart,
    FlexEnd,
    Center,
    Baseline,
    Stretch,
}

impl AlignSelf {
    /// Resolve `auto` against the container's `align-items`.
    #[must_use]
    pub const fn resolve(self, parent: AlignItems) -> AlignItems {
        match self {
            Self::Auto => parent,
            Self::FlexStart => AlignItems::FlexStart,
            Self::FlexEnd => AlignItems::FlexEnd,
            Self::Center => AlignItems::Center,
            Self::Baseline => AlignItems::Baseline,
            Self::Stretch => AlignItems::Stretch,
        }
    }
}

/// [§ 8.4 align-content](https://www.w3.org/TR/css-flexbox-1/#align-content-property)
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, EnumString, Display, AsRefStr,
)]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
#[serde(rename_all = "kebab-case")]
pub enum AlignContent {
    FlexStart,
    FlexEnd,
    Center,
    SpaceBetween,
    SpaceAround,
    SpaceEvenly,
    #[default]
    Stretch,
}
