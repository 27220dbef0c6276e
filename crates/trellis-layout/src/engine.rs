//! Box Layout Engine
//!
//! Computes a concrete rectangle for every item in a container tree: flex
//! distribution along the primary axis, percentage resolution against the
//! nearest sized ancestor, min/max clamping, and cross-axis alignment with
//! dimension retention between runs.

use std::collections::HashMap;

use trellis_geometry::{Axis, Rect, Size};

use crate::cache::{CrossCache, CrossCacheStats, PassEntry, PassKey, size_to_base};
use crate::diagnostics::{Diagnostic, Node};
use crate::flex::{self, EPSILON, FlexEntry, clamp_opt};
use crate::tree::{
    Align, Constraints, ContainerId, ContentMeasure, Dimension, ItemContent, ItemId, ItemSpec,
    LayoutTree,
};

/// Result of one layout pass. Positions are relative to the root
/// container's origin.
#[derive(Debug, Clone, Default)]
pub struct LayoutResult {
    rects: HashMap<ItemId, Rect>,
    pub container_size: Size,
    pub diagnostics: Vec<Diagnostic>,
}

impl LayoutResult {
    pub fn rect(&self, item: ItemId) -> Option<Rect> {
        self.rects.get(&item).copied()
    }

    pub fn rects(&self) -> &HashMap<ItemId, Rect> {
        &self.rects
    }
}

/// Engine statistics
#[derive(Debug, Clone, Copy, Default)]
pub struct EngineStats {
    pub passes: u64,
    pub cross_reused: u64,
    pub clamp_reruns: u64,
}

/// The layout engine. Owns the cross-axis cache; a pass is synchronous and
/// always ends in a valid (possibly degenerate) sized state.
#[derive(Debug, Default)]
pub struct LayoutEngine {
    cache: CrossCache,
    stats: EngineStats,
}

impl LayoutEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lay out `root` against a viewport. The viewport is the percentage
    /// base for the root; a root with auto dimensions shrink-wraps its
    /// content.
    pub fn layout(
        &mut self,
        tree: &LayoutTree,
        root: ContainerId,
        viewport: Size,
        measure: &dyn ContentMeasure,
    ) -> LayoutResult {
        self.stats.passes += 1;
        tracing::debug!(
            container = root.index(),
            width = viewport.width,
            height = viewport.height,
            "layout pass"
        );

        let mut pass = Pass {
            tree,
            measure,
            cache: &mut self.cache,
            stats: &mut self.stats,
            rects: HashMap::new(),
            diagnostics: Vec::new(),
            record: true,
        };
        let size = pass.layout_container(root, (None, None), size_to_base(viewport), (0.0, 0.0));

        LayoutResult {
            rects: pass.rects,
            container_size: size,
            diagnostics: pass.diagnostics,
        }
    }

    /// Lay out `root` with no anchoring viewport, as for floating content:
    /// percentages have no base and degrade to auto with a diagnostic, and
    /// auto dimensions shrink-wrap.
    pub fn layout_intrinsic(
        &mut self,
        tree: &LayoutTree,
        root: ContainerId,
        measure: &dyn ContentMeasure,
    ) -> LayoutResult {
        self.stats.passes += 1;
        tracing::debug!(container = root.index(), "intrinsic layout pass");

        let mut pass = Pass {
            tree,
            measure,
            cache: &mut self.cache,
            stats: &mut self.stats,
            rects: HashMap::new(),
            diagnostics: Vec::new(),
            record: true,
        };
        let size = pass.layout_container(root, (None, None), (None, None), (0.0, 0.0));

        LayoutResult {
            rects: pass.rects,
            container_size: size,
            diagnostics: pass.diagnostics,
        }
    }

    /// Mark an item's cached cross-axis size stale; the next pass
    /// recomputes it from content.
    pub fn invalidate(&mut self, item: ItemId) {
        if self.cache.invalidate(item) {
            tracing::debug!(item = item.index(), "cross-axis cache invalidated");
        }
    }

    pub fn stats(&self) -> &EngineStats {
        &self.stats
    }

    pub fn cache_stats(&self) -> &CrossCacheStats {
        self.cache.stats()
    }
}

/// Transient state of one pass
struct Pass<'a> {
    tree: &'a LayoutTree,
    measure: &'a dyn ContentMeasure,
    cache: &'a mut CrossCache,
    stats: &'a mut EngineStats,
    rects: HashMap<ItemId, Rect>,
    diagnostics: Vec<Diagnostic>,
    /// False while probing natural sizes: no rects, no cache writes,
    /// no diagnostics.
    record: bool,
}

impl Pass<'_> {
    fn diag(&mut self, diagnostic: Diagnostic) {
        if self.record && !self.diagnostics.contains(&diagnostic) {
            tracing::warn!("{diagnostic}");
            self.diagnostics.push(diagnostic);
        }
    }

    /// Drop a min bound that contradicts its max, once per axis
    fn normalized(&mut self, node: Node, cons: Constraints) -> Constraints {
        let mut out = cons;
        for axis in [Axis::Horizontal, Axis::Vertical] {
            if let (Some(min), Some(max)) = (cons.min(axis), cons.max(axis)) {
                if min > max {
                    self.diag(Diagnostic::MinExceedsMax {
                        node,
                        axis,
                        min,
                        max,
                    });
                    match axis {
                        Axis::Horizontal => out.min_width = None,
                        Axis::Vertical => out.min_height = None,
                    }
                }
            }
        }
        out
    }

    fn non_negative(&mut self, node: Node, value: f32) -> f32 {
        if value < 0.0 {
            self.diag(Diagnostic::NegativeSize { node, size: value });
            0.0
        } else {
            value
        }
    }

    /// Resolve a declared dimension against its percentage base.
    /// `None` means auto (including an unresolvable percentage).
    fn resolve_dimension(
        &mut self,
        node: Node,
        dim: Dimension,
        base: Option<f32>,
        axis: Axis,
    ) -> Option<f32> {
        match dim {
            Dimension::Auto => None,
            Dimension::Fixed(v) => Some(self.non_negative(node, v)),
            Dimension::Percent(p) => match base {
                Some(b) => {
                    let p = self.non_negative(node, p);
                    Some(b * p / 100.0)
                }
                None => {
                    self.diag(Diagnostic::UnresolvablePercent { node, axis, pct: p });
                    None
                }
            },
        }
    }

    /// Natural size of an item: leaf content measure, or a probe layout of
    /// the nested container.
    fn natural(&mut self, id: ItemId, base: (Option<f32>, Option<f32>)) -> Size {
        match self.tree.item(id).content {
            ItemContent::Leaf => self.measure.natural_size(id),
            ItemContent::Container(sub) => {
                let saved = self.record;
                self.record = false;
                let size = self.layout_container(sub, (None, None), base, (0.0, 0.0));
                self.record = saved;
                size
            }
        }
    }

    fn layout_container(
        &mut self,
        cid: ContainerId,
        avail: (Option<f32>, Option<f32>),
        base: (Option<f32>, Option<f32>),
        origin: (f32, f32),
    ) -> Size {
        let (axis, align, width_spec, height_spec, cons_raw) = {
            let c = self.tree.container(cid);
            (c.axis, c.align, c.width, c.height, c.constraints)
        };
        let node = Node::Container(cid);
        let cons = self.normalized(node, cons_raw);

        // Declared dimensions override the space handed down by the parent.
        let declared_w = self.resolve_dimension(node, width_spec, base.0, Axis::Horizontal);
        let declared_h = self.resolve_dimension(node, height_spec, base.1, Axis::Vertical);
        let w = declared_w
            .or(avail.0)
            .map(|v| clamp_opt(v, cons.min(Axis::Horizontal), cons.max(Axis::Horizontal)));
        let h = declared_h
            .or(avail.1)
            .map(|v| clamp_opt(v, cons.min(Axis::Vertical), cons.max(Axis::Vertical)));

        let key = self.pass_key(cid, avail, base, axis, align, width_spec, height_spec, cons_raw);
        let top_level = self.record && self.cache.is_top_level_run(cid, &key);

        let (avail_main, avail_cross) = match axis {
            Axis::Horizontal => (w, h),
            Axis::Vertical => (h, w),
        };
        // Children resolve percentages against the nearest concrete size.
        let child_base = (w.or(base.0), h.or(base.1));

        let (content_main, content_cross) =
            self.run_children(cid, axis, align, avail_main, child_base, top_level, origin);

        let main = avail_main.unwrap_or(content_main);
        let cross = avail_cross.unwrap_or(content_cross);
        let final_main = clamp_opt(main, cons.min(axis), cons.max(axis));
        let cross_axis = axis.perpendicular();
        let final_cross = clamp_opt(cross, cons.min(cross_axis), cons.max(cross_axis));

        // A clamp that changed the space children saw re-triggers one
        // child pass against the clamped size.
        if (final_main - main).abs() > EPSILON || (final_cross - cross).abs() > EPSILON {
            if self.record {
                self.stats.clamp_reruns += 1;
                tracing::debug!(
                    container = cid.index(),
                    "container clamp changed available space, re-running children"
                );
            }
            let size = axis.pack(final_main, final_cross);
            self.run_children(
                cid,
                axis,
                align,
                Some(final_main),
                (Some(size.width), Some(size.height)),
                false,
                origin,
            );
        }

        if self.record {
            self.cache.record_pass(cid, &key);
        }
        axis.pack(final_main, final_cross)
    }

    #[allow(clippy::too_many_arguments)]
    fn pass_key(
        &self,
        cid: ContainerId,
        avail: (Option<f32>, Option<f32>),
        base: (Option<f32>, Option<f32>),
        axis: Axis,
        align: Align,
        width: Dimension,
        height: Dimension,
        constraints: Constraints,
    ) -> PassKey {
        let entries = self
            .tree
            .children(cid)
            .iter()
            .map(|&id| {
                let item = self.tree.item(id);
                PassEntry {
                    item: id,
                    spec: item.spec,
                    constraints: item.constraints,
                    cross_percent: item.cross_percent,
                }
            })
            .collect();
        PassKey {
            avail,
            base,
            axis,
            align,
            width,
            height,
            constraints,
            entries,
        }
    }

    /// Size and position every child. Returns (main-axis extent, cross-axis
    /// extent) of the content.
    fn run_children(
        &mut self,
        cid: ContainerId,
        axis: Axis,
        align: Align,
        avail_main: Option<f32>,
        base: (Option<f32>, Option<f32>),
        top_level: bool,
        origin: (f32, f32),
    ) -> (f32, f32) {
        let children: Vec<ItemId> = self.tree.children(cid).to_vec();
        if children.is_empty() {
            return (0.0, 0.0);
        }
        let cross_axis = axis.perpendicular();
        let base_main = match axis {
            Axis::Horizontal => base.0,
            Axis::Vertical => base.1,
        };
        let base_cross = match axis {
            Axis::Horizontal => base.1,
            Axis::Vertical => base.0,
        };

        // Weightless-flex containers split remaining space evenly.
        let all_flex = children
            .iter()
            .all(|&id| matches!(self.tree.item(id).spec, ItemSpec::Flex(_)));
        let flex_total: f32 = children
            .iter()
            .map(|&id| match self.tree.item(id).spec {
                ItemSpec::Flex(w) => w.max(0.0),
                _ => 0.0,
            })
            .sum();
        let even_split = all_flex && flex_total <= 0.0;

        // On a top-level run cached cross sizes stand in for measuring.
        let mut cached_cross = vec![None; children.len()];
        if top_level {
            for (i, &id) in children.iter().enumerate() {
                if self.tree.item(id).cross_percent.is_none() {
                    cached_cross[i] = self.cache.get(id);
                }
            }
        }

        // Measure only the children whose main or cross size needs it.
        let mut naturals = vec![Size::zero(); children.len()];
        let mut cons = Vec::with_capacity(children.len());
        for (i, &id) in children.iter().enumerate() {
            let item = self.tree.item(id);
            let main_needs = match item.spec {
                ItemSpec::Content => true,
                ItemSpec::Fixed(_) => false,
                ItemSpec::Percent(_) => base_main.is_none(),
                ItemSpec::Flex(w) => avail_main.is_none() || (w <= 0.0 && !even_split),
            };
            let cross_needs = match item.cross_percent {
                Some(_) => base_cross.is_none(),
                None => cached_cross[i].is_none(),
            };
            let raw = item.constraints;
            if main_needs || cross_needs {
                naturals[i] = self.natural(id, base);
            }
            cons.push(self.normalized(Node::Item(id), raw));
        }

        // Primary axis: fixed/percent/content first, flex over the rest.
        let mut mains = vec![0.0f32; children.len()];
        let mut flex_indices = Vec::new();
        let mut flex_entries = Vec::new();
        for (i, &id) in children.iter().enumerate() {
            let node = Node::Item(id);
            let (min, max) = (cons[i].min(axis), cons[i].max(axis));
            match self.tree.item(id).spec {
                ItemSpec::Fixed(v) => {
                    let v = self.non_negative(node, v);
                    mains[i] = clamp_opt(v, min, max);
                }
                ItemSpec::Percent(p) => match base_main {
                    Some(b) => {
                        let p = self.non_negative(node, p);
                        mains[i] = clamp_opt(b * p / 100.0, min, max);
                    }
                    None => {
                        self.diag(Diagnostic::UnresolvablePercent {
                            node,
                            axis,
                            pct: p,
                        });
                        mains[i] = clamp_opt(axis.main(naturals[i]), min, max);
                    }
                },
                ItemSpec::Flex(weight) if weight > 0.0 || even_split => {
                    flex_indices.push(i);
                    flex_entries.push(FlexEntry {
                        weight: weight.max(0.0),
                        min,
                        max,
                    });
                }
                ItemSpec::Flex(_) | ItemSpec::Content => {
                    mains[i] = clamp_opt(axis.main(naturals[i]), min, max);
                }
            }
        }
        match avail_main {
            Some(am) => {
                let fixed_sum: f32 = mains.iter().sum();
                let remaining = (am - fixed_sum).max(0.0);
                let shares = flex::distribute(remaining, &flex_entries);
                for (k, &i) in flex_indices.iter().enumerate() {
                    mains[i] = shares[k];
                }
            }
            None => {
                // Auto-sized main axis: no remaining space to share, flexed
                // items fall back to content size.
                for &i in &flex_indices {
                    let (min, max) = (cons[i].min(axis), cons[i].max(axis));
                    mains[i] = clamp_opt(axis.main(naturals[i]), min, max);
                }
            }
        }

        // Cross axis: natural size, or the cached one on a top-level run.
        let mut crosses = vec![0.0f32; children.len()];
        for (i, &id) in children.iter().enumerate() {
            let (min, max) = (cons[i].min(cross_axis), cons[i].max(cross_axis));
            crosses[i] = match self.tree.item(id).cross_percent {
                Some(p) => match base_cross {
                    Some(b) => {
                        let p = self.non_negative(Node::Item(id), p);
                        clamp_opt(b * p / 100.0, min, max)
                    }
                    None => {
                        self.diag(Diagnostic::UnresolvablePercent {
                            node: Node::Item(id),
                            axis: cross_axis,
                            pct: p,
                        });
                        clamp_opt(axis.cross(naturals[i]), min, max)
                    }
                },
                None => match cached_cross[i] {
                    Some(cross) => {
                        self.stats.cross_reused += 1;
                        cross
                    }
                    None => clamp_opt(axis.cross(naturals[i]), min, max),
                },
            };
        }
        let target = crosses.iter().copied().fold(0.0f32, f32::max);

        // Place children and recurse into nested containers.
        let mut cursor = 0.0f32;
        let mut content_cross = 0.0f32;
        for (i, &id) in children.iter().enumerate() {
            let final_cross = match align {
                Align::StretchMax => {
                    clamp_opt(target, cons[i].min(cross_axis), cons[i].max(cross_axis))
                }
                Align::Start => crosses[i],
            };
            content_cross = content_cross.max(final_cross);

            let size = axis.pack(mains[i], final_cross);
            let rect = axis.place(cursor, size).translated(origin.0, origin.1);
            if self.record {
                self.rects.insert(id, rect);
            }

            if let ItemContent::Container(sub) = self.tree.item(id).content {
                self.layout_container(
                    sub,
                    (Some(size.width), Some(size.height)),
                    (Some(size.width), Some(size.height)),
                    (rect.x, rect.y),
                );
            }

            if self.record && self.tree.item(id).cross_percent.is_none() {
                self.cache.store(id, crosses[i]);
            }
            cursor += mains[i];
        }

        (cursor, content_cross)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::{Container, Item, MapMeasure};

    fn engine() -> LayoutEngine {
        LayoutEngine::new()
    }

    #[test]
    fn test_flex_shares_after_fixed() {
        // fixed 100 leaves 300; flex 1 and 2 split it 100/200
        let mut tree = LayoutTree::new();
        let root = tree.add_container(
            Container::new(Axis::Horizontal, Align::Start).with_width(Dimension::Fixed(400.0)),
        );
        let a = tree.add_item(root, Item::fixed(100.0));
        let b = tree.add_item(root, Item::flex(1.0));
        let c = tree.add_item(root, Item::flex(2.0));

        let result = engine().layout(&tree, root, Size::new(800.0, 600.0), &MapMeasure::new());
        assert_eq!(result.rect(a).unwrap().width, 100.0);
        assert_eq!(result.rect(b).unwrap().width, 100.0);
        assert_eq!(result.rect(c).unwrap().width, 200.0);
        assert_eq!(result.rect(b).unwrap().x, 100.0);
        assert_eq!(result.rect(c).unwrap().x, 200.0);
        assert!(result.diagnostics.is_empty());
    }

    #[test]
    fn test_percent_container_clamps_to_max_width() {
        // width: 70%, maxWidth: 200 on a wide viewport yields exactly 200
        let mut tree = LayoutTree::new();
        let root = tree.add_container(
            Container::new(Axis::Horizontal, Align::Start)
                .with_width(Dimension::Percent(70.0))
                .with_constraints(Constraints {
                    max_width: Some(200.0),
                    ..Default::default()
                }),
        );
        tree.add_item(root, Item::flex(1.0));

        let result = engine().layout(&tree, root, Size::new(1000.0, 600.0), &MapMeasure::new());
        assert_eq!(result.container_size.width, 200.0);
    }

    #[test]
    fn test_percent_container_without_max() {
        let mut tree = LayoutTree::new();
        let root = tree.add_container(
            Container::new(Axis::Horizontal, Align::Start).with_width(Dimension::Percent(70.0)),
        );
        tree.add_item(root, Item::flex(1.0));

        let result = engine().layout(&tree, root, Size::new(1000.0, 600.0), &MapMeasure::new());
        assert_eq!(result.container_size.width, 700.0);
    }

    #[test]
    fn test_negative_percent_resolves_to_zero() {
        let mut tree = LayoutTree::new();
        let root = tree.add_container(
            Container::new(Axis::Horizontal, Align::Start).with_width(Dimension::Fixed(100.0)),
        );
        let a = tree.add_item(root, Item::percent(-25.0));

        let result = engine().layout(&tree, root, Size::new(800.0, 600.0), &MapMeasure::new());
        assert_eq!(result.rect(a).unwrap().width, 0.0);
        assert_eq!(
            result.diagnostics,
            vec![Diagnostic::NegativeSize {
                node: Node::Item(a),
                size: -25.0
            }]
        );
    }

    #[test]
    fn test_negative_fixed_size_diagnostic() {
        let mut tree = LayoutTree::new();
        let root = tree.add_container(Container::new(Axis::Horizontal, Align::Start));
        let a = tree.add_item(root, Item::fixed(-30.0));

        let result = engine().layout(&tree, root, Size::new(800.0, 600.0), &MapMeasure::new());
        assert_eq!(result.rect(a).unwrap().width, 0.0);
        assert_eq!(
            result.diagnostics,
            vec![Diagnostic::NegativeSize {
                node: Node::Item(a),
                size: -30.0
            }]
        );
    }

    #[test]
    fn test_min_exceeds_max_uses_max() {
        let mut tree = LayoutTree::new();
        let root = tree.add_container(
            Container::new(Axis::Horizontal, Align::Start).with_width(Dimension::Fixed(500.0)),
        );
        let a = tree.add_item(
            root,
            Item::flex(1.0).with_constraints(Constraints {
                min_width: Some(400.0),
                max_width: Some(100.0),
                ..Default::default()
            }),
        );

        let result = engine().layout(&tree, root, Size::new(800.0, 600.0), &MapMeasure::new());
        // min ignored, max authoritative
        assert_eq!(result.rect(a).unwrap().width, 100.0);
        assert!(matches!(
            result.diagnostics[0],
            Diagnostic::MinExceedsMax { .. }
        ));
    }

    #[test]
    fn test_percent_item_resolves_against_viewport() {
        let mut tree = LayoutTree::new();
        // auto-width root: the viewport is the nearest sized ancestor
        let root = tree.add_container(Container::new(Axis::Horizontal, Align::Start));
        let a = tree.add_item(root, Item::percent(50.0));

        let result = engine().layout(&tree, root, Size::new(800.0, 600.0), &MapMeasure::new());
        assert_eq!(result.rect(a).unwrap().width, 400.0);
    }

    #[test]
    fn test_unresolvable_percent_falls_back_to_natural() {
        let mut tree = LayoutTree::new();
        let root = tree.add_container(Container::new(Axis::Horizontal, Align::Start));
        let a = tree.add_item(root, Item::percent(50.0));

        let mut measure = MapMeasure::new();
        measure.set(a, Size::new(80.0, 20.0));

        // no viewport: nothing to resolve the percentage against
        let result = engine().layout_intrinsic(&tree, root, &measure);
        assert_eq!(result.rect(a).unwrap().width, 80.0);
        assert!(result.diagnostics.contains(&Diagnostic::UnresolvablePercent {
            node: Node::Item(a),
            axis: Axis::Horizontal,
            pct: 50.0,
        }));
    }

    #[test]
    fn test_stretchmax_cross_axis() {
        let mut tree = LayoutTree::new();
        let root = tree.add_container(
            Container::new(Axis::Vertical, Align::StretchMax).with_height(Dimension::Fixed(400.0)),
        );
        let a = tree.add_item(root, Item::content_sized());
        let b = tree.add_item(root, Item::content_sized());

        let mut measure = MapMeasure::new();
        measure.set(a, Size::new(150.0, 40.0));
        measure.set(b, Size::new(90.0, 30.0));

        let result = engine().layout(&tree, root, Size::new(800.0, 600.0), &measure);
        assert_eq!(result.rect(a).unwrap().width, 150.0);
        assert_eq!(result.rect(b).unwrap().width, 150.0);
        assert_eq!(result.container_size.width, 150.0);
        assert_eq!(result.rect(b).unwrap().y, 40.0);
    }

    #[test]
    fn test_weightless_flex_splits_evenly() {
        let mut tree = LayoutTree::new();
        let root = tree.add_container(
            Container::new(Axis::Horizontal, Align::Start).with_width(Dimension::Fixed(300.0)),
        );
        let a = tree.add_item(root, Item::flex(0.0));
        let b = tree.add_item(root, Item::flex(0.0));
        let c = tree.add_item(root, Item::flex(0.0));

        let result = engine().layout(&tree, root, Size::new(800.0, 600.0), &MapMeasure::new());
        for id in [a, b, c] {
            assert_eq!(result.rect(id).unwrap().width, 100.0);
        }
    }

    #[test]
    fn test_flex_zero_among_sized_items_is_content_sized() {
        let mut tree = LayoutTree::new();
        let root = tree.add_container(
            Container::new(Axis::Horizontal, Align::Start).with_width(Dimension::Fixed(300.0)),
        );
        let a = tree.add_item(root, Item::fixed(100.0));
        let b = tree.add_item(root, Item::flex(0.0));

        let mut measure = MapMeasure::new();
        measure.set(b, Size::new(50.0, 20.0));

        let result = engine().layout(&tree, root, Size::new(800.0, 600.0), &measure);
        assert_eq!(result.rect(a).unwrap().width, 100.0);
        assert_eq!(result.rect(b).unwrap().width, 50.0);
    }

    #[test]
    fn test_auto_main_axis_flex_falls_back_to_content() {
        let mut tree = LayoutTree::new();
        let root = tree.add_container(Container::new(Axis::Horizontal, Align::Start));
        let a = tree.add_item(root, Item::flex(1.0));
        let b = tree.add_item(root, Item::fixed(40.0));

        let mut measure = MapMeasure::new();
        measure.set(a, Size::new(60.0, 20.0));

        let result = engine().layout(&tree, root, Size::new(800.0, 600.0), &measure);
        assert_eq!(result.rect(a).unwrap().width, 60.0);
        assert_eq!(result.container_size.width, 100.0);
    }

    #[test]
    fn test_auto_container_max_clamp_reruns_children() {
        // shrink-wrapped content exceeds maxWidth: children re-lay out
        // against the clamped space
        let mut tree = LayoutTree::new();
        let root = tree.add_container(
            Container::new(Axis::Horizontal, Align::Start).with_constraints(Constraints {
                max_width: Some(120.0),
                ..Default::default()
            }),
        );
        let a = tree.add_item(root, Item::fixed(100.0));
        let b = tree.add_item(root, Item::flex(1.0));

        let mut measure = MapMeasure::new();
        measure.set(b, Size::new(80.0, 20.0));

        let mut eng = engine();
        let result = eng.layout(&tree, root, Size::new(800.0, 600.0), &measure);
        assert_eq!(result.container_size.width, 120.0);
        assert_eq!(result.rect(a).unwrap().width, 100.0);
        // flex child re-ran against the clamped 120 and got the 20 left over
        assert_eq!(result.rect(b).unwrap().width, 20.0);
        assert_eq!(eng.stats().clamp_reruns, 1);
    }

    #[test]
    fn test_nested_container_positions() {
        let mut tree = LayoutTree::new();
        let root = tree.add_container(
            Container::new(Axis::Horizontal, Align::Start)
                .with_width(Dimension::Fixed(400.0))
                .with_height(Dimension::Fixed(100.0)),
        );
        let sub = tree.add_container(Container::new(Axis::Vertical, Align::Start));
        let side = tree.add_item(root, Item::fixed(100.0));
        let host = tree.add_nested(root, Item::flex(1.0), sub);
        let inner = tree.add_item(sub, Item::fixed(30.0));

        let mut measure = MapMeasure::new();
        measure.set(side, Size::new(100.0, 100.0));
        measure.set(inner, Size::new(0.0, 30.0));

        let result = engine().layout(&tree, root, Size::new(800.0, 600.0), &measure);
        let host_rect = result.rect(host).unwrap();
        assert_eq!(host_rect.x, 100.0);
        assert_eq!(host_rect.width, 300.0);
        // nested item is positioned relative to the root origin
        let inner_rect = result.rect(inner).unwrap();
        assert_eq!(inner_rect.x, 100.0);
        assert_eq!(inner_rect.y, 0.0);
        assert_eq!(inner_rect.height, 30.0);
    }

    #[test]
    fn test_idempotent_layout() {
        let mut tree = LayoutTree::new();
        let root = tree.add_container(
            Container::new(Axis::Vertical, Align::StretchMax).with_height(Dimension::Fixed(300.0)),
        );
        let a = tree.add_item(root, Item::content_sized());
        let b = tree.add_item(root, Item::flex(1.0));

        let mut measure = MapMeasure::new();
        measure.set(a, Size::new(120.0, 40.0));
        measure.set(b, Size::new(60.0, 20.0));

        let mut eng = engine();
        let first = eng.layout(&tree, root, Size::new(800.0, 600.0), &measure);
        let second = eng.layout(&tree, root, Size::new(800.0, 600.0), &measure);
        assert_eq!(first.rect(a), second.rect(a));
        assert_eq!(first.rect(b), second.rect(b));
        assert_eq!(first.container_size, second.container_size);
    }

    #[test]
    fn test_cross_axis_retention_and_invalidate() {
        let mut tree = LayoutTree::new();
        let root = tree.add_container(
            Container::new(Axis::Vertical, Align::StretchMax).with_height(Dimension::Fixed(400.0)),
        );
        let wide = tree.add_item(root, Item::content_sized());
        let narrow = tree.add_item(root, Item::content_sized());

        let mut measure = MapMeasure::new();
        measure.set(wide, Size::new(150.0, 40.0));
        measure.set(narrow, Size::new(90.0, 30.0));

        let mut eng = engine();
        let first = eng.layout(&tree, root, Size::new(800.0, 600.0), &measure);
        assert_eq!(first.container_size.width, 150.0);

        // content change that does not touch constraints: width is retained
        measure.set(wide, Size::new(120.0, 40.0));
        let second = eng.layout(&tree, root, Size::new(800.0, 600.0), &measure);
        assert_eq!(second.container_size.width, 150.0);
        assert_eq!(second.rect(narrow).unwrap().width, 150.0);

        // invalidation forces recomputation from current content
        eng.invalidate(wide);
        let third = eng.layout(&tree, root, Size::new(800.0, 600.0), &measure);
        assert_eq!(third.container_size.width, 120.0);
    }

    struct CountingMeasure {
        size: Size,
        calls: std::cell::Cell<usize>,
    }

    impl ContentMeasure for CountingMeasure {
        fn natural_size(&self, _item: ItemId) -> Size {
            self.calls.set(self.calls.get() + 1);
            self.size
        }
    }

    #[test]
    fn test_top_level_run_skips_measuring() {
        let mut tree = LayoutTree::new();
        let root = tree.add_container(
            Container::new(Axis::Vertical, Align::StretchMax).with_height(Dimension::Fixed(300.0)),
        );
        tree.add_item(root, Item::fixed(40.0));
        tree.add_item(root, Item::fixed(60.0));

        let measure = CountingMeasure {
            size: Size::new(150.0, 40.0),
            calls: std::cell::Cell::new(0),
        };
        let mut eng = engine();
        let first = eng.layout(&tree, root, Size::new(800.0, 600.0), &measure);
        assert_eq!(first.container_size.width, 150.0);
        assert_eq!(measure.calls.get(), 2);

        // identical inputs: the cached cross sizes answer, content is
        // not re-measured
        let second = eng.layout(&tree, root, Size::new(800.0, 600.0), &measure);
        assert_eq!(second.container_size.width, 150.0);
        assert_eq!(measure.calls.get(), 2);
    }

    #[test]
    fn test_viewport_change_recomputes() {
        let mut tree = LayoutTree::new();
        let root = tree.add_container(
            Container::new(Axis::Vertical, Align::StretchMax).with_height(Dimension::Fixed(400.0)),
        );
        let a = tree.add_item(root, Item::content_sized());

        let mut measure = MapMeasure::new();
        measure.set(a, Size::new(150.0, 40.0));

        let mut eng = engine();
        eng.layout(&tree, root, Size::new(800.0, 600.0), &measure);

        measure.set(a, Size::new(120.0, 40.0));
        // different viewport: not a top-level run, content re-measured
        let result = eng.layout(&tree, root, Size::new(900.0, 600.0), &measure);
        assert_eq!(result.container_size.width, 120.0);
    }

    #[test]
    fn test_item_cross_percent() {
        let mut tree = LayoutTree::new();
        let root = tree.add_container(
            Container::new(Axis::Vertical, Align::Start)
                .with_width(Dimension::Fixed(200.0))
                .with_height(Dimension::Fixed(400.0)),
        );
        let a = tree.add_item(root, Item::fixed(50.0).with_cross_percent(50.0));

        let result = engine().layout(&tree, root, Size::new(800.0, 600.0), &MapMeasure::new());
        let rect = result.rect(a).unwrap();
        assert_eq!(rect.height, 50.0);
        assert_eq!(rect.width, 100.0);
    }
}
