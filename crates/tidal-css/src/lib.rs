//! Style resolution, box model, flexbox, line breaking and layout for the
//! Tidal engine.
//!
//! # Scope
//!
//! This crate implements:
//! - **Unit resolution** ([CSS Values Level 4](https://www.w3.org/TR/css-values-4/))
//!   - `px`, `%`, `em`, `rem`, `vw`, `vh`, `vmin`, `vmax`, `pt`, `pc`, `in`, `cm`, `mm`
//!   - Device-pixel-ratio scaling
//!
//! - **Style cascade** ([CSS Cascading Level 4](https://www.w3.org/TR/css-cascade-4/))
//!   - Element defaults, authored style, inheritance
//!   - Responsive patches from active media queries
//!
//! - **Box model** ([CSS Box Model Level 3](https://www.w3.org/TR/css-box-3/))
//!   - Content, padding, border and margin boxes, `box-sizing`
//!   - Margin collapsing and `auto` margins
//!
//! - **Layout** ([CSS 2.1 § 9](https://www.w3.org/TR/CSS2/visuren.html))
//!   - Block, inline and flex algorithms
//!   - Relative, absolute and fixed positioning
//!   - Frame-scheduled passes, `z-index` paint order, hit testing
//!
//! - **Text** ([CSS Text Level 3](https://www.w3.org/TR/css-text-3/))
//!   - `white-space`, `text-transform`, `text-align`
//!   - Greedy line breaking with penalties, `word-break`, `overflow-wrap`
//!
//! - **Responsive evaluation**
//!   - Named breakpoints, media queries, throttled viewport updates
//!   - Fluid typography and adaptive spacing
//!
//! # Not Implemented
//!
//! - Selectors and stylesheets: styles are attached to nodes directly
//! - Floats, tables, grid
//! - Nested stacking contexts
//! - Painting: the engine only reports boxes

/// Style cascade per [CSS Cascading Level 4](https://www.w3.org/TR/css-cascade-4/).
pub mod cascade;
/// Engine configuration.
pub mod config;
/// Error types.
pub mod error;
/// Box model and layout per [CSS 2.1 § 9](https://www.w3.org/TR/CSS2/visuren.html).
pub mod layout;
/// Breakpoints, media queries and fluid values.
pub mod responsive;
/// Authored and resolved styles per [CSS Values Level 4](https://www.w3.org/TR/css-values-4/).
pub mod style;
/// The rendering surface.
pub mod viewport;

pub use cascade::StyleCascade;
pub use config::EngineConfig;
pub use error::{LayoutError, ListenerError, Result};
pub use layout::{LayoutEngine, LayoutResult, LayoutStats, NodeLayout, PaintEntry};
pub use responsive::{Breakpoint, MediaCondition, ResponsiveEvaluator};
pub use style::{AuthoredStyle, Display, ResolvedStyle};
pub use viewport::{Orientation, Viewport};

pub use tidal_dom::NodeId;
