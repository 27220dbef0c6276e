//! Layout Diagnostics
//!
//! Recoverable constraint problems surfaced to the caller. A layout pass
//! never aborts; every condition here degrades to a valid sized state.

use std::fmt;

use trellis_geometry::Axis;

use crate::tree::{ContainerId, ItemId};

/// The tree node a diagnostic refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Node {
    Container(ContainerId),
    Item(ItemId),
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Node::Container(id) => write!(f, "container {}", id.index()),
            Node::Item(id) => write!(f, "item {}", id.index()),
        }
    }
}

/// Constraint problem recovered during a pass
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum Diagnostic {
    /// min > max on one axis; max is authoritative and min is ignored.
    #[error("{node}: min {min} exceeds max {max} along {axis:?}, min ignored")]
    MinExceedsMax {
        node: Node,
        axis: Axis,
        min: f32,
        max: f32,
    },

    #[error("{node}: negative size {size} resolved to 0")]
    NegativeSize { node: Node, size: f32 },

    /// No ancestor with a concrete size in that dimension; treated as auto.
    #[error("{node}: {pct}% has no sized ancestor along {axis:?}, treating as auto")]
    UnresolvablePercent { node: Node, axis: Axis, pct: f32 },
}
