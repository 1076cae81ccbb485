//! Freehand paint layer: a set of filled grid cells beneath all nodes.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};

use crate::snap::cell_index;

/// Integer grid cell. Keyed as `"col,row"` when rendered to text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Cell {
    pub col: i64,
    pub row: i64,
}

impl Cell {
    pub fn new(col: i64, row: i64) -> Self {
        Self { col, row }
    }

    /// Cell under a world-space point.
    pub fn from_world(point: Point, grid_size: f64) -> Self {
        Self {
            col: cell_index(point.x, grid_size),
            row: cell_index(point.y, grid_size),
        }
    }

    /// World rectangle covered by the cell.
    pub fn world_rect(&self, grid_size: f64) -> Rect {
        let x = self.col as f64 * grid_size;
        let y = self.row as f64 * grid_size;
        Rect::new(x, y, x + grid_size, y + grid_size)
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.col, self.row)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid cell key: {0:?}")]
pub struct ParseCellError(String);

impl FromStr for Cell {
    type Err = ParseCellError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseCellError(s.to_string());
        let (col, row) = s.split_once(',').ok_or_else(err)?;
        Ok(Self {
            col: col.trim().parse().map_err(|_| err())?,
            row: row.trim().parse().map_err(|_| err())?,
        })
    }
}

/// Set of painted cells.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaintLayer {
    cells: BTreeSet<Cell>,
}

impl PaintLayer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if the cell was not already painted.
    pub fn insert(&mut self, cell: Cell) -> bool {
        self.cells.insert(cell)
    }

    /// Returns true if the cell was painted.
    pub fn remove(&mut self, cell: Cell) -> bool {
        self.cells.remove(&cell)
    }

    pub fn contains(&self, cell: Cell) -> bool {
        self.cells.contains(&cell)
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = Cell> + '_ {
        self.cells.iter().copied()
    }

    /// Cell keys in `"col,row"` form.
    pub fn keys(&self) -> Vec<String> {
        self.cells.iter().map(Cell::to_string).collect()
    }
}

impl FromIterator<Cell> for PaintLayer {
    fn from_iter<I: IntoIterator<Item = Cell>>(iter: I) -> Self {
        Self {
            cells: iter.into_iter().collect(),
        }
    }
}
