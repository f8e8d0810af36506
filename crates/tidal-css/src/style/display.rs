//! CSS Display property types
//!
//! [§ 2 Box Layout Modes: the display property](https://www.w3.org/TR/css-display-3/#the-display-properties)

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, EnumString};

// [§ 2 Box Layout Modes: the display property](https://www.w3.org/TR/css-display-3/#the-display-properties)
//
// "The display property defines an element's display type, which consists of
// the two basic qualities of how an element generates boxes:
//   - the inner display type, which defines the kind of formatting context
//     it generates, dictating how its descendant boxes are laid out.
//   - the outer display type, which dictates how the principal box itself
//     participates in flow layout."

/// [§ 2.1 Outer Display Roles](https://www.w3.org/TR/css-display-3/#outer-role)
///
/// "The `<display-outside>` keywords specify the element's outer display type,
/// which is essentially its principal box's role in flow layout."
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum OuterDisplayType {
    /// "The element generates a block-level box when placed in flow layout."
    Block,
    /// "The element generates an inline-level box when placed in flow layout."
    Inline,
}

/// [§ 2.2 Inner Display Layout Models](https://www.w3.org/TR/css-display-3/#inner-model)
///
/// "The `<display-inside>` keywords specify the element's inner display type,
/// which defines the type of formatting context that lays out its contents."
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum InnerDisplayType {
    /// "The element lays out its contents using flow layout (block-and-inline layout)."
    Flow,
    /// Flow layout that establishes a new formatting context (`inline-block`).
    FlowRoot,
    /// "The element lays out its contents using flex layout."
    Flex,
}

/// The `display` keywords the engine understands.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    EnumString,
    strum_macros::Display,
    AsRefStr,
)]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
#[serde(rename_all = "kebab-case")]
pub enum Display {
    /// "The element and its descendants generate no boxes."
    None,
    /// `block flow`
    #[default]
    Block,
    /// `inline flow`
    Inline,
    /// `inline flow-root`
    InlineBlock,
    /// `block flex`
    Flex,
    /// `inline flex`
    InlineFlex,
}

impl Display {
    /// [§ 2.1 Outer Display Roles](https://www.w3.org/TR/css-display-3/#outer-role)
    ///
    /// `None` for `display: none`, which generates no box at all.
    #[must_use]
    pub const fn outer(self) -> Option<OuterDisplayType> {
        match self {
            Self::None => None,
            Self::Block | Self::Flex => Some(OuterDisplayType::Block),
            Self::Inline | Self::InlineBlock | Self::InlineFlex => Some(OuterDisplayType::Inline),
        }
    }

    /// [§ 2.2 Inner Display Layout Models](https://www.w3.org/TR/css-display-3/#inner-model)
    #[must_use]
    pub const fn inner(self) -> Option<InnerDisplayType> {
        match self {
            Self::None => None,
            Self::Block | Self::Inline => Some(InnerDisplayType::Flow),
            Self::InlineBlock => Some(InnerDisplayType::FlowRoot),
            Self::Flex | Self::InlineFlex => Some(InnerDisplayType::Flex),
        }
    }

    /// Whether the element generates no box.
    #[must_use]
    pub const fn is_none(self) -> bool {
        matches!(self, Self::None)
    }

    /// Whether the principal box takes part in an inline formatting context.
    #[must_use]
    pub const fn is_inline_level(self) -> bool {
        matches!(self.outer(), Some(OuterDisplayType::Inline))
    }
}
