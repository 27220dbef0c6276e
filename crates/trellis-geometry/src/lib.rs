//! Trellis Geometry
//!
//! Plain value types shared by the layout engine and its hosts.

/// Width/height pair
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Both dimensions zero
    pub fn zero() -> Self {
        Self::default()
    }

    /// Component-wise maximum
    pub fn max(&self, other: Size) -> Size {
        Size {
            width: self.width.max(other.width),
            height: self.height.max(other.height),
        }
    }
}

/// Rectangle positioned relative to some origin
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Shift the rectangle by an offset, keeping its size
    pub fn translated(&self, dx: f32, dy: f32) -> Rect {
        Rect {
            x: self.x + dx,
            y: self.y + dy,
            ..*self
        }
    }
}

/// Edge sizes (top, right, bottom, left)
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct EdgeSizes {
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
    pub left: f32,
}

impl EdgeSizes {
    pub fn uniform(value: f32) -> Self {
        Self {
            top: value,
            right: value,
            bottom: value,
            left: value,
        }
    }

    /// Total horizontal extent (left + right)
    pub fn horizontal(&self) -> f32 {
        self.left + self.right
    }

    /// Total vertical extent (top + bottom)
    pub fn vertical(&self) -> f32 {
        self.top + self.bottom
    }
}

/// Primary-axis orientation of a box container
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Axis {
    /// Row layout: main axis runs left-to-right
    #[default]
    Horizontal,
    /// Column layout: main axis runs top-to-bottom
    Vertical,
}

impl Axis {
    /// The component of `size` along this axis
    pub fn main(&self, size: Size) -> f32 {
        match self {
            Axis::Horizontal => size.width,
            Axis::Vertical => size.height,
        }
    }

    /// The component of `size` perpendicular to this axis
    pub fn cross(&self, size: Size) -> f32 {
        match self {
            Axis::Horizontal => size.height,
            Axis::Vertical => size.width,
        }
    }

    /// The other axis
    pub fn perpendicular(&self) -> Axis {
        match self {
            Axis::Horizontal => Axis::Vertical,
            Axis::Vertical => Axis::Horizontal,
        }
    }

    /// Build a size from main/cross components
    pub fn pack(&self, main: f32, cross: f32) -> Size {
        match self {
            Axis::Horizontal => Size::new(main, cross),
            Axis::Vertical => Size::new(cross, main),
        }
    }

    /// Position a box at `main_offset` along this axis
    pub fn place(&self, main_offset: f32, size: Size) -> Rect {
        match self {
            Axis::Horizontal => Rect::new(main_offset, 0.0, size.width, size.height),
            Axis::Vertical => Rect::new(0.0, main_offset, size.width, size.height),
        }
    }
}
