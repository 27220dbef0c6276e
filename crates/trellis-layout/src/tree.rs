//! Layout Tree
//!
//! Arena-owned containers and items. Containers hold an ordered list of
//! items; an item belongs to exactly one container and is either a leaf
//! (content measured by the host) or hosts a nested container.

use std::collections::HashMap;

use trellis_geometry::{Axis, Size};

/// Index of a container in the tree arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContainerId(pub(crate) usize);

/// Index of an item in the tree arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ItemId(pub(crate) usize);

impl ContainerId {
    pub fn index(&self) -> usize {
        self.0
    }
}

impl ItemId {
    pub fn index(&self) -> usize {
        self.0
    }
}

/// Cross-axis alignment mode
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Align {
    /// Items keep their natural cross-axis size
    #[default]
    Start,
    /// Items stretch to the largest natural cross-axis size
    StretchMax,
}

/// Declared size for one container dimension
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub enum Dimension {
    /// Sized by content
    #[default]
    Auto,
    Fixed(f32),
    /// Percent of the nearest sized ancestor
    Percent(f32),
}

/// Optional min/max bounds, both axes
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Constraints {
    pub min_width: Option<f32>,
    pub max_width: Option<f32>,
    pub min_height: Option<f32>,
    pub max_height: Option<f32>,
}

impl Constraints {
    /// Lower bound of the dimension running along `axis`
    pub fn min(&self, axis: Axis) -> Option<f32> {
        match axis {
            Axis::Horizontal => self.min_width,
            Axis::Vertical => self.min_height,
        }
    }

    /// Upper bound of the dimension running along `axis`
    pub fn max(&self, axis: Axis) -> Option<f32> {
        match axis {
            Axis::Horizontal => self.max_width,
            Axis::Vertical => self.max_height,
        }
    }
}

/// Primary-axis sizing of an item
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub enum ItemSpec {
    /// Sized by content (natural size)
    #[default]
    Content,
    Fixed(f32),
    /// Proportional share of remaining space. A weight of 0 is
    /// content-sized unless every sibling is also weightless flex.
    Flex(f32),
    /// Percent of the nearest sized ancestor
    Percent(f32),
}

/// What an item holds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemContent {
    Leaf,
    Container(ContainerId),
}

/// A box participating in its container's layout
#[derive(Debug, Clone)]
pub struct Item {
    pub spec: ItemSpec,
    pub constraints: Constraints,
    /// Percent spec for the cross dimension, if any
    pub cross_percent: Option<f32>,
    pub content: ItemContent,
    pub(crate) owner: ContainerId,
}

impl Item {
    fn with_spec(spec: ItemSpec) -> Self {
        Self {
            spec,
            constraints: Constraints::default(),
            cross_percent: None,
            content: ItemContent::Leaf,
            owner: ContainerId(0),
        }
    }

    /// Item sized by its content
    pub fn content_sized() -> Self {
        Self::with_spec(ItemSpec::Content)
    }

    pub fn fixed(size: f32) -> Self {
        Self::with_spec(ItemSpec::Fixed(size))
    }

    pub fn flex(weight: f32) -> Self {
        Self::with_spec(ItemSpec::Flex(weight))
    }

    pub fn percent(pct: f32) -> Self {
        Self::with_spec(ItemSpec::Percent(pct))
    }

    pub fn with_constraints(mut self, constraints: Constraints) -> Self {
        self.constraints = constraints;
        self
    }

    pub fn with_cross_percent(mut self, pct: f32) -> Self {
        self.cross_percent = Some(pct);
        self
    }
}

/// A box that lays out an ordered sequence of items along one axis
#[derive(Debug, Clone)]
pub struct Container {
    pub axis: Axis,
    pub align: Align,
    pub width: Dimension,
    pub height: Dimension,
    pub constraints: Constraints,
    pub(crate) children: Vec<ItemId>,
}

impl Container {
    pub fn new(axis: Axis, align: Align) -> Self {
        Self {
            axis,
            align,
            width: Dimension::Auto,
            height: Dimension::Auto,
            constraints: Constraints::default(),
            children: Vec::new(),
        }
    }

    pub fn with_width(mut self, width: Dimension) -> Self {
        self.width = width;
        self
    }

    pub fn with_height(mut self, height: Dimension) -> Self {
        self.height = height;
        self
    }

    pub fn with_constraints(mut self, constraints: Constraints) -> Self {
        self.constraints = constraints;
        self
    }
}

impl Default for Container {
    fn default() -> Self {
        Self::new(Axis::Horizontal, Align::Start)
    }
}

/// Arena holding every container and item of one layout hierarchy
#[derive(Debug, Default)]
pub struct LayoutTree {
    containers: Vec<Container>,
    items: Vec<Item>,
}

impl LayoutTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_container(&mut self, container: Container) -> ContainerId {
        let id = ContainerId(self.containers.len());
        self.containers.push(container);
        id
    }

    /// Append a leaf item to `owner`
    pub fn add_item(&mut self, owner: ContainerId, mut item: Item) -> ItemId {
        item.owner = owner;
        item.content = ItemContent::Leaf;
        let id = ItemId(self.items.len());
        self.items.push(item);
        self.containers[owner.0].children.push(id);
        id
    }

    /// Append an item to `owner` that hosts an already-added container
    pub fn add_nested(&mut self, owner: ContainerId, mut item: Item, child: ContainerId) -> ItemId {
        item.owner = owner;
        item.content = ItemContent::Container(child);
        let id = ItemId(self.items.len());
        self.items.push(item);
        self.containers[owner.0].children.push(id);
        id
    }

    pub fn container(&self, id: ContainerId) -> &Container {
        &self.containers[id.0]
    }

    pub fn item(&self, id: ItemId) -> &Item {
        &self.items[id.0]
    }

    pub fn children(&self, id: ContainerId) -> &[ItemId] {
        &self.containers[id.0].children
    }

    pub fn owner_of(&self, item: ItemId) -> ContainerId {
        self.items[item.0].owner
    }

    pub fn container_count(&self) -> usize {
        self.containers.len()
    }

    pub fn item_count(&self) -> usize {
        self.items.len()
    }
}

/// Natural (intrinsic) content size of a leaf item, reported by the host
/// rendering layer.
pub trait ContentMeasure {
    fn natural_size(&self, item: ItemId) -> Size;
}

/// Host/test measure backed by a map. Unknown items measure as zero.
#[derive(Debug, Default)]
pub struct MapMeasure {
    sizes: HashMap<ItemId, Size>,
}

impl MapMeasure {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, item: ItemId, size: Size) {
        self.sizes.insert(item, size);
    }
}

impl ContentMeasure for MapMeasure {
    fn natural_size(&self, item: ItemId) -> Size {
        self.sizes.get(&item).copied().unwrap_or_default()
    }
}
