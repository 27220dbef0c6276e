//! Cross-Axis Dimension Cache
//!
//! Retains each item's last computed cross-axis size between layout runs,
//! plus a per-container fingerprint of the inputs that defined the previous
//! pass. Same available space and same child constraints → a top-level run:
//! cached cross sizes are reused instead of re-measuring content.

use std::collections::HashMap;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use trellis_geometry::{Axis, Size};

use crate::tree::{Align, Constraints, ContainerId, Dimension, ItemId, ItemSpec};

/// Inputs that define a pass over one container. Content is deliberately
/// excluded: a pass whose key matches the previous one is a top-level run.
#[derive(Debug, Clone, PartialEq)]
pub struct PassKey {
    pub avail: (Option<f32>, Option<f32>),
    pub base: (Option<f32>, Option<f32>),
    pub axis: Axis,
    pub align: Align,
    pub width: Dimension,
    pub height: Dimension,
    pub constraints: Constraints,
    pub entries: Vec<PassEntry>,
}

/// One child's constraint fingerprint
#[derive(Debug, Clone, PartialEq)]
pub struct PassEntry {
    pub item: ItemId,
    pub spec: ItemSpec,
    pub constraints: Constraints,
    pub cross_percent: Option<f32>,
}

fn hash_opt<H: Hasher>(value: Option<f32>, state: &mut H) {
    value.map(f32::to_bits).hash(state);
}

fn hash_constraints<H: Hasher>(cons: &Constraints, state: &mut H) {
    hash_opt(cons.min_width, state);
    hash_opt(cons.max_width, state);
    hash_opt(cons.min_height, state);
    hash_opt(cons.max_height, state);
}

fn hash_dimension<H: Hasher>(dim: Dimension, state: &mut H) {
    match dim {
        Dimension::Auto => 0u8.hash(state),
        Dimension::Fixed(v) => {
            1u8.hash(state);
            v.to_bits().hash(state);
        }
        Dimension::Percent(p) => {
            2u8.hash(state);
            p.to_bits().hash(state);
        }
    }
}

impl Hash for PassEntry {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.item.hash(state);
        match self.spec {
            ItemSpec::Content => 0u8.hash(state),
            ItemSpec::Fixed(v) => {
                1u8.hash(state);
                v.to_bits().hash(state);
            }
            ItemSpec::Flex(w) => {
                2u8.hash(state);
                w.to_bits().hash(state);
            }
            ItemSpec::Percent(p) => {
                3u8.hash(state);
                p.to_bits().hash(state);
            }
        }
        hash_constraints(&self.constraints, state);
        hash_opt(self.cross_percent, state);
    }
}

impl Hash for PassKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        hash_opt(self.avail.0, state);
        hash_opt(self.avail.1, state);
        hash_opt(self.base.0, state);
        hash_opt(self.base.1, state);
        self.axis.hash(state);
        self.align.hash(state);
        hash_dimension(self.width, state);
        hash_dimension(self.height, state);
        hash_constraints(&self.constraints, state);
        for entry in &self.entries {
            entry.hash(state);
        }
    }
}

impl PassKey {
    pub fn fingerprint(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.hash(&mut hasher);
        hasher.finish()
    }
}

/// Cache statistics
#[derive(Debug, Clone, Copy, Default)]
pub struct CrossCacheStats {
    pub hits: u64,
    pub misses: u64,
    pub invalidations: u64,
}

impl CrossCacheStats {
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

/// Per-item cross-axis sizes plus per-container pass fingerprints.
/// Owned by the engine; mutated only during its own pass.
#[derive(Debug, Default)]
pub struct CrossCache {
    entries: HashMap<ItemId, f32>,
    passes: HashMap<ContainerId, u64>,
    stats: CrossCacheStats,
}

impl CrossCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached cross-axis size, counting hit/miss
    pub fn get(&mut self, item: ItemId) -> Option<f32> {
        match self.entries.get(&item) {
            Some(&cross) => {
                self.stats.hits += 1;
                Some(cross)
            }
            None => {
                self.stats.misses += 1;
                None
            }
        }
    }

    pub fn store(&mut self, item: ItemId, cross: f32) {
        self.entries.insert(item, cross);
    }

    /// Evict an item's entry; returns whether one existed
    pub fn invalidate(&mut self, item: ItemId) -> bool {
        let existed = self.entries.remove(&item).is_some();
        if existed {
            self.stats.invalidations += 1;
        }
        existed
    }

    /// True when `key` matches the fingerprint recorded for the previous
    /// pass over `container` — a top-level run.
    pub fn is_top_level_run(&self, container: ContainerId, key: &PassKey) -> bool {
        self.passes.get(&container) == Some(&key.fingerprint())
    }

    pub fn record_pass(&mut self, container: ContainerId, key: &PassKey) {
        self.passes.insert(container, key.fingerprint());
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.passes.clear();
    }

    pub fn stats(&self) -> &CrossCacheStats {
        &self.stats
    }
}

/// Convenience for keys built from a viewport
pub(crate) fn size_to_base(viewport: Size) -> (Option<f32>, Option<f32>) {
    (Some(viewport.width), Some(viewport.height))
}
