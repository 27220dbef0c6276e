//! Grid Auto Sizing
//!
//! Column/row sizing for table-style containers. Non-spanning cells set the
//! track minimums from their content plus chrome (border and padding);
//! spanning cells then distribute any deficit across the tracks they cover.

use trellis_geometry::{EdgeSizes, Rect, Size};

/// Default cell chrome: 1px border + 1px padding per side
pub fn default_chrome() -> EdgeSizes {
    EdgeSizes::uniform(2.0)
}

/// One cell's content and placement
#[derive(Debug, Clone)]
pub struct GridCell {
    pub row: usize,
    pub col: usize,
    pub col_span: usize,
    pub content_width: f32,
    pub content_height: f32,
    /// Border + padding per side
    pub chrome: EdgeSizes,
}

impl GridCell {
    pub fn new(row: usize, col: usize, content_width: f32, content_height: f32) -> Self {
        Self {
            row,
            col,
            col_span: 1,
            content_width,
            content_height,
            chrome: default_chrome(),
        }
    }

    pub fn with_span(mut self, col_span: usize) -> Self {
        self.col_span = col_span.max(1);
        self
    }

    pub fn with_chrome(mut self, chrome: EdgeSizes) -> Self {
        self.chrome = chrome;
        self
    }

    /// Width the cell needs: content plus horizontal chrome
    fn required_width(&self) -> f32 {
        self.content_width + self.chrome.horizontal()
    }

    fn required_height(&self) -> f32 {
        self.content_height + self.chrome.vertical()
    }
}

/// A grid of cells with auto-sized tracks
#[derive(Debug, Clone)]
pub struct GridStructure {
    cols: usize,
    rows: usize,
    cells: Vec<GridCell>,
    col_widths: Vec<f32>,
    row_heights: Vec<f32>,
}

impl GridStructure {
    pub fn new(cols: usize, rows: usize) -> Self {
        Self {
            cols,
            rows,
            cells: Vec::new(),
            col_widths: vec![0.0; cols],
            row_heights: vec![0.0; rows],
        }
    }

    /// Add a cell, clamping its span to the grid. Returns false when the
    /// cell starts outside the grid and was dropped.
    pub fn add_cell(&mut self, mut cell: GridCell) -> bool {
        if cell.col >= self.cols {
            tracing::warn!(col = cell.col, cols = self.cols, "cell outside grid dropped");
            return false;
        }
        cell.col_span = cell.col_span.min(self.cols - cell.col);
        self.cells.push(cell);
        true
    }

    /// Size tracks from content: non-spanning cells first, then spanning
    /// deficits, distributed evenly over the covered columns in declared
    /// order.
    pub fn size_tracks(&mut self) {
        for width in &mut self.col_widths {
            *width = 0.0;
        }
        for height in &mut self.row_heights {
            *height = 0.0;
        }

        for cell in &self.cells {
            if cell.col_span == 1 {
                self.col_widths[cell.col] = self.col_widths[cell.col].max(cell.required_width());
            }
            if cell.row < self.rows {
                self.row_heights[cell.row] =
                    self.row_heights[cell.row].max(cell.required_height());
            }
        }

        for cell in &self.cells {
            if cell.col_span <= 1 {
                continue;
            }
            let end = cell.col + cell.col_span;
            let have: f32 = self.col_widths[cell.col..end].iter().sum();
            let need = cell.required_width();
            if need > have {
                let per_track = (need - have) / cell.col_span as f32;
                for width in &mut self.col_widths[cell.col..end] {
                    *width += per_track;
                }
            }
        }
    }

    pub fn col_widths(&self) -> &[f32] {
        &self.col_widths
    }

    pub fn row_heights(&self) -> &[f32] {
        &self.row_heights
    }

    /// Total grid size after `size_tracks`
    pub fn dimensions(&self) -> Size {
        Size::new(self.col_widths.iter().sum(), self.row_heights.iter().sum())
    }

    /// Outer bounds of a cell: the spanned tracks. A cell outside the grid
    /// gets a zero-width rect at the grid's right edge.
    pub fn cell_bounds(&self, cell: &GridCell) -> Rect {
        let col = cell.col.min(self.cols);
        let end = (cell.col + cell.col_span).min(self.cols);
        let x: f32 = self.col_widths[..col].iter().sum();
        let y: f32 = self.row_heights[..cell.row.min(self.rows)].iter().sum();
        let width: f32 = self.col_widths[col..end].iter().sum();
        let height = if cell.row < self.rows {
            self.row_heights[cell.row]
        } else {
            0.0
        };
        Rect::new(x, y, width, height)
    }

    pub fn cells(&self) -> &[GridCell] {
        &self.cells
    }
}
