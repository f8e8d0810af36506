//! Error types for style resolution and layout.

use thiserror::Error;
use tidal_dom::{NodeId, TreeError};

/// Errors raised by the cascade, the layout engine and the responsive
/// evaluator.
///
/// Soft conditions (an empty flex distribution, an overlong word) are not
/// errors; they fall back to documented defaults and at most log a warning.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LayoutError {
    /// An authored length failed to parse as a number.
    #[error("invalid length '{input}': {reason}")]
    InvalidLength {
        /// The authored source text.
        input: String,
        /// What was wrong with it.
        reason: String,
    },

    /// An authored length carries a unit suffix the resolver does not know.
    #[error("unsupported unit '{unit}' in '{input}'")]
    UnsupportedUnit {
        /// The authored source text.
        input: String,
        /// The offending suffix.
        unit: String,
    },

    /// An authored color could not be parsed.
    #[error("invalid color '{0}'")]
    InvalidColor(String),

    /// A node was measured or laid out before its style was resolved.
    #[error("style of node {0} has not been resolved")]
    StyleNotResolved(NodeId),

    /// The node id does not refer to a live node.
    #[error("node {0} does not exist")]
    UnknownNode(NodeId),

    /// No layout algorithm is registered under this name.
    #[error("no layout algorithm registered for '{0}'")]
    UnknownAlgorithm(String),

    /// A media query refers to a breakpoint that was never registered.
    #[error("unknown breakpoint '{0}'")]
    UnknownBreakpoint(String),

    /// A media query name was never registered.
    #[error("unknown media query '{0}'")]
    UnknownMediaQuery(String),

    /// A tree mutation was rejected.
    #[error(transparent)]
    Tree(#[from] TreeError),
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, LayoutError>;

/// Failure reported by a viewport-change listener.
///
/// Listener failures never abort evaluation: every listener runs, and each
/// failure is logged and collected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("viewport listener failed: {message}")]
pub struct ListenerError {
    /// What went wrong.
    pub message: String,
}

impl ListenerError {
    /// A failure carrying `message`.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
