use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// A single cell position (0-indexed).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellRef {
    pub row: usize,
    pub col: usize,
}

impl CellRef {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

impl From<(usize, usize)> for CellRef {
    fn from((row, col): (usize, usize)) -> Self {
        Self { row, col }
    }
}

/// A rectangular range of cells, inclusive on both ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Range {
    pub start_row: usize,
    pub start_col: usize,
    pub end_row: usize,
    pub end_col: usize,
}

impl Range {
    /// Create a new range, automatically normalizing so start <= end.
    pub fn new(r1: usize, c1: usize, r2: usize, c2: usize) -> Self {
        Self {
            start_row: r1.min(r2),
            start_col: c1.min(c2),
            end_row: r1.max(r2),
            end_col: c1.max(c2),
        }
    }

    /// Create a single-cell range.
    pub fn single(row: usize, col: usize) -> Self {
        Self {
            start_row: row,
            start_col: col,
            end_row: row,
            end_col: col,
        }
    }

    /// Check if this range contains a cell.
    pub fn contains(&self, row: usize, col: usize) -> bool {
        row >= self.start_row && row <= self.end_row &&
        col >= self.start_col && col <= self.end_col
    }

    /// Number of cells in this range.
    pub fn cell_count(&self) -> usize {
        (self.end_row - self.start_row + 1) * (self.end_col - self.start_col + 1)
    }

    /// Iterate over all cells in this range (row-major order).
    pub fn cells(&self) -> impl Iterator<Item = CellRef> {
        let start_col = self.start_col;
        let end_col = self.end_col;

        (self.start_row..=self.end_row).flat_map(move |r| {
            (start_col..=end_col).map(move |c| CellRef::new(r, c))
        })
    }

    /// Check if this is a single cell.
    pub fn is_single(&self) -> bool {
        self.start_row == self.end_row && self.start_col == self.end_col
    }
}

/// The selection model: ordered list of ranges, in the order they were selected.
///
/// The first range's top-left cell is the "current" cell that copy reads from
/// and paste writes to.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    ranges: Vec<Range>,
    anchor: (usize, usize),
}

impl Selection {
    /// Create a new selection with a single cell.
    pub fn new(row: usize, col: usize) -> Self {
        Self {
            ranges: vec![Range::single(row, col)],
            anchor: (row, col),
        }
    }

    /// A selection covering a rectangle.
    pub fn range(r1: usize, c1: usize, r2: usize, c2: usize) -> Self {
        Self {
            ranges: vec![Range::new(r1, c1, r2, c2)],
            anchor: (r1, c1),
        }
    }

    /// An empty selection (nothing selected).
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    /// Get all ranges.
    pub fn ranges(&self) -> &[Range] {
        &self.ranges
    }

    /// The first selected cell, if any.
    pub fn first_cell(&self) -> Option<CellRef> {
        self.ranges.first().map(|r| CellRef::new(r.start_row, r.start_col))
    }

    /// Check if a cell is selected.
    pub fn contains(&self, row: usize, col: usize) -> bool {
        self.ranges.iter().any(|r| r.contains(row, col))
    }

    /// Total number of selected cells (overlaps counted once per range).
    pub fn cell_count(&self) -> usize {
        self.ranges.iter().map(|r| r.cell_count()).sum()
    }

    /// Iterate over all selected cells, range by range.
    pub fn all_cells(&self) -> impl Iterator<Item = CellRef> + '_ {
        self.ranges.iter().flat_map(|r| r.cells())
    }

    /// Unique row indices touched by the selection, ascending.
    pub fn rows(&self) -> BTreeSet<usize> {
        self.ranges
            .iter()
            .flat_map(|r| r.start_row..=r.end_row)
            .collect()
    }

    /// Extend the last range from anchor to the given cell (shift+click).
    pub fn extend_to(&mut self, row: usize, col: usize) {
        let (anchor_row, anchor_col) = self.anchor;
        let range = Range::new(anchor_row, anchor_col, row, col);
        match self.ranges.last_mut() {
            Some(last) => *last = range,
            None => self.ranges.push(range),
        }
    }

    /// Add a new range (ctrl+click).
    pub fn add_cell(&mut self, row: usize, col: usize) {
        self.ranges.push(Range::single(row, col));
        self.anchor = (row, col);
    }

    pub fn clear(&mut self) {
        self.ranges.clear();
        self.anchor = (0, 0);
    }
}
