//! Layout engine
//!
//! Turns resolved styles into border boxes on the rendering surface.
//!
//! # Relevant Specifications
//!
//! - [CSS Box Model Module Level 3](https://www.w3.org/TR/css-box-3/)
//! - [CSS 2.1 Visual Formatting Model](https://www.w3.org/TR/CSS2/visuren.html)
//! - [CSS Flexible Box Layout Module Level 1](https://www.w3.org/TR/css-flexbox-1/)
//! - [CSS Text Module Level 3](https://www.w3.org/TR/css-text-3/)
//!
//! # Module Structure
//!
//! - [`box_model`] - Box dimensions, rectangles, and edge sizes
//! - [`values`] - `auto`-able values
//! - [`algorithm`] - Constraints, fragments and the algorithm table
//! - [`block`], [`inline`], [`flex`] - The three layout algorithms
//! - [`text`] - Line breaking
//! - [`context`] - Per-node state and the view algorithms work through
//! - [`scheduler`] - Frame scheduling of passes
//! - [`paint`] - Paint order and hit testing
//! - [`engine`] - The engine tying them together

pub mod algorithm;
pub mod block;
pub mod box_model;
pub mod context;
pub mod engine;
pub mod flex;
pub mod inline;
pub mod metrics;
pub mod paint;
pub mod scheduler;
pub mod text;
pub mod values;

// Re-exports for convenience
pub use algorithm::{
    AlgorithmKind, AlgorithmTable, ChildPlacement, Constraint, Extent, Fragment, LayoutAlgorithm,
};
pub use block::BlockLayout;
pub use box_model::{BoxDimensions, BoxModel, EdgeSizes, Point, Rect, Size};
pub use context::{LayoutContext, NodeLayout, NodeState};
pub use engine::{LayoutEngine, LayoutResult, LayoutStats};
pub use flex::FlexLayout;
pub use inline::InlineLayout;
pub use metrics::{ApproximateFontMetrics, FontMetrics};
pub use paint::{PaintEntry, build_paint_list, hit_test};
pub use scheduler::{Scheduler, SchedulerState};
pub use text::{BreakOpportunity, BreakType, TextBreaker, TextLayout, TextLine, TextWord};
pub use values::{AutoEdgeSizes, AutoOr};
