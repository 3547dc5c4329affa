//! Board module - manages the game grid
//!
//! The board is a `rows x cols` grid where each cell is empty or carries a color tag.
//! Uses a flat vector in row-major order; the extent is fixed when the board is built
//! and every operation preserves it.
//! Coordinates: (x, y) where x is the column (left to right) and y is the row (top to bottom).
//! Any coordinate outside the grid, negative ones included, is out of bounds.

use crate::pieces::Piece;
use crate::types::{cell_value, Cell, ColorTag};

/// Build a `rows x cols` grid of empty cells, one `Vec` per row
pub fn create_grid(rows: usize, cols: usize) -> Vec<Vec<Cell>> {
    vec![vec![None; cols]; rows]
}

/// The game board using flat storage
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    rows: usize,
    cols: usize,
    /// Flat vector of cells, row-major order (y * cols + x)
    cells: Vec<Cell>,
}

impl Board {
    /// Create a new empty board
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            cells: vec![None; rows * cols],
        }
    }

    /// Calculate flat index from (x, y) coordinates
    #[inline(always)]
    fn index(&self, x: i32, y: i32) -> Option<usize> {
        let x = usize::try_from(x).ok()?;
        let y = usize::try_from(y).ok()?;
        if x >= self.cols || y >= self.rows {
            return None;
        }
        Some(y * self.cols + x)
    }

    /// Number of columns
    pub fn width(&self) -> usize {
        self.cols
    }

    /// Number of rows
    pub fn height(&self) -> usize {
        self.rows
    }

    /// Get cell at position (x, y)
    /// Returns None if out of bounds
    pub fn get(&self, x: i32, y: i32) -> Option<Cell> {
        self.index(x, y).map(|idx| self.cells[idx])
    }

    /// Set cell at position (x, y)
    /// Returns false if out of bounds
    pub fn set(&mut self, x: i32, y: i32, cell: Cell) -> bool {
        match self.index(x, y) {
            Some(idx) => {
                self.cells[idx] = cell;
                true
            }
            None => false,
        }
    }

    /// Check if position is out of bounds
    pub fn is_out_of_bounds(&self, x: i32, y: i32) -> bool {
        self.index(x, y).is_none()
    }

    /// Check if position is occupied (within bounds and filled)
    pub fn is_occupied(&self, x: i32, y: i32) -> bool {
        matches!(self.get(x, y), Some(Some(_)))
    }

    /// Check if position is within bounds and empty
    pub fn is_valid(&self, x: i32, y: i32) -> bool {
        matches!(self.get(x, y), Some(None))
    }

    /// Cells of row `y`, `None` if the row does not exist
    pub fn row(&self, y: usize) -> Option<&[Cell]> {
        if y >= self.rows {
            return None;
        }
        let start = y * self.cols;
        Some(&self.cells[start..start + self.cols])
    }

    /// Check if a row is completely filled
    pub fn is_row_full(&self, y: usize) -> bool {
        self.row(y)
            .is_some_and(|row| row.iter().all(|cell| cell.is_some()))
    }

    /// Check if a row has no occupied cell
    pub fn is_row_empty(&self, y: usize) -> bool {
        self.row(y)
            .is_some_and(|row| row.iter().all(|cell| cell.is_none()))
    }

    /// Remove every full row and refill the top with as many empty rows.
    /// Returns the number of rows removed.
    pub fn clear_full_rows(&mut self) -> usize {
        let width = self.cols;
        let mut write_y = self.rows;
        let mut cleared = 0;

        // Scan from bottom to top, compacting survivors downwards.
        for read_y in (0..self.rows).rev() {
            if self.is_row_full(read_y) {
                cleared += 1;
            } else {
                write_y -= 1;
                if write_y != read_y {
                    let src_start = read_y * width;
                    let dst_start = write_y * width;
                    self.cells
                        .copy_within(src_start..src_start + width, dst_start);
                }
            }
        }

        // Rows above the last survivor are the new empty rows.
        for cell in &mut self.cells[..write_y * width] {
            *cell = None;
        }

        cleared
    }

    /// Whether any occupied cell of `piece` lies outside the grid
    pub fn is_out_of_bounds_piece(&self, piece: &Piece) -> bool {
        piece
            .occupied_cells()
            .any(|(x, y, _)| self.is_out_of_bounds(x, y))
    }

    /// Whether any occupied cell of `piece` lands on an occupied board cell
    pub fn collides(&self, piece: &Piece) -> bool {
        piece
            .occupied_cells()
            .any(|(x, y, _)| self.is_occupied(x, y))
    }

    /// Whether `piece` can sit at its current position
    pub fn fits(&self, piece: &Piece) -> bool {
        !self.is_out_of_bounds_piece(piece) && !self.collides(piece)
    }

    /// Write every occupied cell of `piece` into the board.
    /// Cells outside the grid are skipped. Returns the number of cells written.
    pub fn merge_piece(&mut self, piece: &Piece) -> usize {
        let mut written = 0;
        for (x, y, tag) in piece.occupied_cells() {
            if self.set(x, y, Some(tag)) {
                written += 1;
            }
        }
        written
    }

    /// Get a reference to the internal cells
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Numeric grid (0 = empty, 1..=7 = tag), one `Vec` per row
    pub fn to_rows(&self) -> Vec<Vec<u8>> {
        if self.cols == 0 {
            return vec![Vec::new(); self.rows];
        }
        self.cells
            .chunks(self.cols)
            .map(|row| row.iter().copied().map(cell_value).collect())
            .collect()
    }

    /// Deep copy of the board with `active` overlaid, as a numeric grid.
    ///
    /// Neither the board nor the piece is touched; piece cells outside the grid
    /// are dropped rather than wrapped.
    pub fn snapshot(&self, active: Option<&Piece>) -> Vec<Vec<u8>> {
        let mut grid = self.to_rows();
        if let Some(piece) = active {
            for (x, y, tag) in piece.occupied_cells() {
                if let Some(idx) = self.index(x, y) {
                    grid[idx / self.cols][idx % self.cols] = tag.get();
                }
            }
        }
        grid
    }

    /// Clear the entire board
    pub fn clear(&mut self) {
        for cell in &mut self.cells {
            *cell = None;
        }
    }

    /// Create from a numeric 2D grid (0 = empty, otherwise a tag).
    /// Returns None if rows are ragged or a value is not a valid tag.
    pub fn from_rows(rows: &[Vec<u8>]) -> Option<Self> {
        let height = rows.len();
        let width = rows.first().map_or(0, Vec::len);
        let mut board = Self::new(height, width);
        for (y, row) in rows.iter().enumerate() {
            if row.len() != width {
                return None;
            }
            for (x, &value) in row.iter().enumerate() {
                let cell = match value {
                    0 => None,
                    v => Some(ColorTag::new(v)?),
                };
                board.cells[y * width + x] = cell;
            }
        }
        Some(board)
    }
}

impl From<Vec<Vec<Cell>>> for Board {
    fn from(grid: Vec<Vec<Cell>>) -> Self {
        let rows = grid.len();
        let cols = grid.first().map_or(0, Vec::len);
        let mut cells = Vec::with_capacity(rows * cols);
        for mut row in grid {
            row.resize(cols, None);
            cells.extend(row);
        }
        Self { rows, cols, cells }
    }
}
