#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use std::{fs, path::Path};

use anyhow::{Context, Result};

use super::{error::PicobotError, rules::CellKind};
use crate::constants::{NUM_COLS, NUM_ROWS};

/// One cell of a map.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Cell {
    /// Open and not yet visited.
    Open,
    /// Open and visited during the current run.
    Visited,
    /// Impassable terrain.
    Wall,
}

impl Cell {
    /// What the agent perceives; it cannot tell visited from open.
    pub fn kind(self) -> CellKind {
        match self {
            Cell::Open | Cell::Visited => CellKind::Open,
            Cell::Wall => CellKind::Wall,
        }
    }
}

/// The shape a map is required to have.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MapShape {
    /// Required number of rows.
    pub rows: usize,
    /// Required number of columns in every row.
    pub cols: usize,
}

impl Default for MapShape {
    fn default() -> Self {
        Self {
            rows: NUM_ROWS,
            cols: NUM_COLS,
        }
    }
}

/// A Picobot map, row-major, row 0 at the top and column 0 on the left.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    /// The cells, one `Vec` per line of the map file.
    cells: Vec<Vec<Cell>>,
}

impl Grid {
    /// Parses a map with the standard 25x25 shape.
    pub fn parse(source: &str) -> Result<Self, PicobotError> {
        Self::parse_with_shape(source, MapShape::default())
    }

    /// Parses a map, requiring `shape`.
    ///
    /// A space is open, any other character is a wall. A single-row map is
    /// not checked for width.
    pub fn parse_with_shape(source: &str, shape: MapShape) -> Result<Self, PicobotError> {
        let cells: Vec<Vec<Cell>> = source
            .lines()
            .map(|line| {
                line.chars()
                    .map(|c| if c == ' ' { Cell::Open } else { Cell::Wall })
                    .collect()
            })
            .collect();

        if cells.len() != shape.rows {
            return Err(PicobotError::Dimension(format!(
                "map has {} rows, but should have {}",
                cells.len(),
                shape.rows
            )));
        }

        if cells.len() > 1 && cells.iter().any(|row| row.len() != shape.cols) {
            return Err(PicobotError::Dimension(format!(
                "map has at least one row not {} columns wide",
                shape.cols
            )));
        }

        Ok(Self { cells })
    }

    /// Reads and parses a standard map file.
    pub fn from_path(path: &Path) -> Result<Self> {
        let source = fs::read_to_string(path)
            .with_context(|| format!("Could not read Picobot map {}", path.display()))?;
        Self::parse(&source).with_context(|| format!("Invalid Picobot map {}", path.display()))
    }

    /// Number of rows.
    pub fn rows(&self) -> usize {
        self.cells.len()
    }

    /// Total number of cells, walls included.
    pub fn num_cells(&self) -> usize {
        self.cells.iter().map(Vec::len).sum()
    }

    /// The cell at (`row`, `col`), or `None` off the map.
    pub fn get(&self, row: isize, col: isize) -> Option<Cell> {
        let row = usize::try_from(row).ok()?;
        let col = usize::try_from(col).ok()?;
        self.cells.get(row)?.get(col).copied()
    }

    /// Marks an open cell visited. Returns whether it was newly visited.
    pub fn visit(&mut self, row: usize, col: usize) -> bool {
        match self.cells.get_mut(row).and_then(|r| r.get_mut(col)) {
            Some(cell) if *cell == Cell::Open => {
                *cell = Cell::Visited;
                true
            }
            _ => false,
        }
    }

    /// Number of cells still open (not visited, not walls).
    pub fn count_open(&self) -> usize {
        self.cells
            .iter()
            .flatten()
            .filter(|&&c| c == Cell::Open)
            .count()
    }

    /// Draws the map: `#` wall, space open, `~` visited, `P` for the agent
    /// and `!` for an agent standing on a wall.
    pub fn render(&self, agent: Option<(usize, usize)>) -> String {
        let mut out = String::new();
        for (r, row) in self.cells.iter().enumerate() {
            for (c, cell) in row.iter().enumerate() {
                let here = agent == Some((r, c));
                let ch = match (cell, here) {
                    (Cell::Wall, true) => '!',
                    (_, true) => 'P',
                    (Cell::Wall, false) => '#',
                    (Cell::Open, false) => ' ',
                    (Cell::Visited, false) => '~',
                };
                out.push(ch);
            }
            out.push('\n');
        }
        out
    }
}
