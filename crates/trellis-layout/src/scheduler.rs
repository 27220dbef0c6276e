//! Re-layout Scheduling
//!
//! Explicit coalescing queue replacing synchronous re-entrant layout:
//! content-change notifications enqueue a request, and the queue is drained
//! between passes. At most one pending entry exists per container, and each
//! container is honored at most once per drain — follow-up requests against
//! a container that already ran stay queued for the next drain, which keeps
//! a pair of mutually re-triggering containers from spinning.

use std::collections::VecDeque;

use trellis_geometry::Size;

use crate::engine::{LayoutEngine, LayoutResult};
use crate::tree::{ContainerId, ContentMeasure, ItemId, LayoutTree};

/// Coalescing queue of pending re-layout requests
#[derive(Debug, Default)]
pub struct LayoutScheduler {
    queue: VecDeque<ContainerId>,
}

impl LayoutScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request a re-layout of `container`, coalescing duplicates
    pub fn schedule(&mut self, container: ContainerId) {
        if self.queue.contains(&container) {
            tracing::trace!(container = container.index(), "re-layout coalesced");
        } else {
            self.queue.push_back(container);
        }
    }

    /// Content changed inside `item` without touching its constraints:
    /// schedule the owning container. The cross-axis cache is left alone,
    /// so the next pass retains previously computed dimensions.
    pub fn content_changed(&mut self, tree: &LayoutTree, item: ItemId) {
        self.schedule(tree.owner_of(item));
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Drain the queue, running one pass per distinct container. `on_pass`
    /// is the host's resize hook; it may schedule follow-up work, which is
    /// coalesced and honored on the next drain if its container already ran.
    pub fn drain<F>(
        &mut self,
        engine: &mut LayoutEngine,
        tree: &LayoutTree,
        viewport: Size,
        measure: &dyn ContentMeasure,
        mut on_pass: F,
    ) -> Vec<(ContainerId, LayoutResult)>
    where
        F: FnMut(ContainerId, &LayoutResult, &mut LayoutScheduler),
    {
        let mut ran: Vec<ContainerId> = Vec::new();
        let mut results = Vec::new();
        while let Some(cid) = self.pop_next(&ran) {
            let result = engine.layout(tree, cid, viewport, measure);
            ran.push(cid);
            on_pass(cid, &result, self);
            results.push((cid, result));
        }
        results
    }

    /// Drain without a resize hook
    pub fn run(
        &mut self,
        engine: &mut LayoutEngine,
        tree: &LayoutTree,
        viewport: Size,
        measure: &dyn ContentMeasure,
    ) -> Vec<(ContainerId, LayoutResult)> {
        self.drain(engine, tree, viewport, measure, |_, _, _| {})
    }

    /// First queued container that has not run in this drain. Entries that
    /// already ran stay queued.
    fn pop_next(&mut self, ran: &[ContainerId]) -> Option<ContainerId> {
        let idx = self.queue.iter().position(|cid| !ran.contains(cid))?;
        self.queue.remove(idx)
    }
}
