//! Style values, authored and resolved style records
//!
//! This module implements CSS value types and style representation per:
//! - [CSS Values and Units Level 4](https://www.w3.org/TR/css-values-4/)
//! - [CSS Color Level 4](https://www.w3.org/TR/css-color-4/)
//! - [CSS Display Module Level 3](https://www.w3.org/TR/css-display-3/)

mod authored;
pub mod computed;
mod display;
mod keywords;
pub mod units;
mod values;

// Re-export all public types
pub use authored::{AuthoredStyle, Side};
pub use computed::ResolvedStyle;
pub use display::{Display, InnerDisplayType, OuterDisplayType};
pub use keywords::{
    AlignContent, AlignItems, AlignSelf, BoxSizing, FlexDirection, FlexWrap, FontStyle,
    JustifyContent, OverflowWrap, Position, TextAlign, TextDecoration, TextOverflow,
    TextTransform, Visibility, WhiteSpace, WordBreak,
};
pub use units::{PropertyKind, ResolutionContext, UnitResolver};
pub use values::{AutoLength, DEFAULT_FONT_SIZE_PX, Length, LengthInput, LengthUnit, Rgba};
