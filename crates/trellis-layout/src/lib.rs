//! Trellis Layout Engine
//!
//! Box-layout sizing for the Trellis widget framework: flex distribution
//! along a primary axis, percentage dimensioning against sized ancestors,
//! min/max clamping with redistribution, stretch-to-max cross-axis
//! alignment with dimension retention between runs, a coalescing re-layout
//! queue, and grid auto sizing.

mod cache;
mod config;
mod diagnostics;
mod engine;
mod flex;
mod scheduler;
mod table;
mod tree;

pub use cache::CrossCacheStats;
pub use config::{AlignConfig, AxisConfig, ChildConfig, ConfigError, ContainerConfig, DimensionValue, build};
pub use diagnostics::{Diagnostic, Node};
pub use engine::{EngineStats, LayoutEngine, LayoutResult};
pub use flex::{FlexEntry, distribute};
pub use scheduler::LayoutScheduler;
pub use table::{GridCell, GridStructure, default_chrome};
pub use tree::{
    Align, Constraints, Container, ContainerId, ContentMeasure, Dimension, Item, ItemContent,
    ItemId, ItemSpec, LayoutTree, MapMeasure,
};
