//! Pieces module - the seven piece templates, spawning and speculative transforms
//!
//! Every piece is a square matrix (2x2, 3x3 or 4x4) anchored at the top-left
//! corner of its bounding box. Matrix row maps to board row (y) and matrix
//! column to board column (x).
//!
//! Moves and rotations are speculative: the transform is applied in place,
//! checked, and undone when the piece no longer fits. There are no wall kicks.

use arrayvec::ArrayVec;

use crate::rng::RandomSource;
use crate::types::{ColorTag, Cell, PieceKind, PIECE_KIND_COUNT, SPAWN_X};

/// Largest template edge (the I piece)
pub const MAX_PIECE_SIZE: usize = 4;

const I_TEMPLATE: &[&[u8]] = &[&[0, 0, 0, 0], &[1, 1, 1, 1], &[0, 0, 0, 0], &[0, 0, 0, 0]];
const J_TEMPLATE: &[&[u8]] = &[&[1, 0, 0], &[1, 1, 1], &[0, 0, 0]];
const L_TEMPLATE: &[&[u8]] = &[&[0, 0, 1], &[1, 1, 1], &[0, 0, 0]];
const O_TEMPLATE: &[&[u8]] = &[&[1, 1], &[1, 1]];
const T_TEMPLATE: &[&[u8]] = &[&[0, 1, 0], &[1, 1, 1], &[0, 0, 0]];
const Z_TEMPLATE: &[&[u8]] = &[&[1, 1, 0], &[0, 1, 1], &[0, 0, 0]];
const S_TEMPLATE: &[&[u8]] = &[&[0, 1, 1], &[1, 1, 0], &[0, 0, 0]];

/// Uncolored template for a kind (nonzero = occupied)
pub fn template(kind: PieceKind) -> &'static [&'static [u8]] {
    match kind {
        PieceKind::I => I_TEMPLATE,
        PieceKind::J => J_TEMPLATE,
        PieceKind::L => L_TEMPLATE,
        PieceKind::O => O_TEMPLATE,
        PieceKind::T => T_TEMPLATE,
        PieceKind::Z => Z_TEMPLATE,
        PieceKind::S => S_TEMPLATE,
    }
}

/// Anchor of a freshly spawned piece.
///
/// The I piece starts one row above the top: its bar sits on the second
/// matrix row, so it still lands on board row 0.
pub fn spawn_position(kind: PieceKind) -> (i32, i32) {
    match kind {
        PieceKind::I => (SPAWN_X, -1),
        _ => (SPAWN_X, 0),
    }
}

/// Square matrix of cells, stored inline (at most 4x4)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PieceMatrix {
    size: usize,
    cells: ArrayVec<Cell, { MAX_PIECE_SIZE * MAX_PIECE_SIZE }>,
}

impl PieceMatrix {
    /// Paint a template: every nonzero template cell becomes `tag`.
    /// Returns None if the template is not square or larger than 4x4.
    pub fn paint(template: &[&[u8]], tag: ColorTag) -> Option<Self> {
        let size = template.len();
        if size > MAX_PIECE_SIZE || template.iter().any(|row| row.len() != size) {
            return None;
        }
        Some(Self::painted(template, tag))
    }

    /// Colored matrix for a kind
    pub fn for_kind(kind: PieceKind) -> Self {
        Self::painted(template(kind), kind.tag())
    }

    fn painted(template: &[&[u8]], tag: ColorTag) -> Self {
        let cells = template
            .iter()
            .flat_map(|row| row.iter())
            .map(|&v| if v != 0 { Some(tag) } else { None })
            .collect();
        Self {
            size: template.len(),
            cells,
        }
    }

    /// Edge length N of the N x N matrix
    pub fn size(&self) -> usize {
        self.size
    }

    /// Cell at (row, col), None when outside the matrix
    pub fn get(&self, row: usize, col: usize) -> Option<Cell> {
        if row >= self.size || col >= self.size {
            return None;
        }
        Some(self.cells[row * self.size + col])
    }

    /// Quarter turn: the new cell at (row, col) is the old cell at (N-1-col, row)
    pub fn rotated(&self) -> Self {
        let n = self.size;
        let mut cells = ArrayVec::new();
        for row in 0..n {
            for col in 0..n {
                cells.push(self.cells[(n - 1 - col) * n + row]);
            }
        }
        Self { size: n, cells }
    }

    /// Occupied cells as (row, col, tag)
    pub fn occupied(&self) -> impl Iterator<Item = (usize, usize, ColorTag)> + '_ {
        let n = self.size;
        self.cells
            .iter()
            .enumerate()
            .filter_map(move |(i, cell)| cell.map(|tag| (i / n, i % n, tag)))
    }

    /// Numeric rows (0 = empty)
    pub fn to_rows(&self) -> Vec<Vec<u8>> {
        self.cells
            .chunks(self.size.max(1))
            .map(|row| row.iter().map(|c| c.map_or(0, ColorTag::get)).collect())
            .collect()
    }
}

/// A piece instance: kind, anchor and colored matrix
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Piece {
    pub kind: PieceKind,
    pub x: i32,
    pub y: i32,
    blocks: PieceMatrix,
}

impl Piece {
    /// New piece of `kind` at its spawn anchor
    pub fn spawn(kind: PieceKind) -> Self {
        let (x, y) = spawn_position(kind);
        Self {
            kind,
            x,
            y,
            blocks: PieceMatrix::for_kind(kind),
        }
    }

    /// Color tag shared by every occupied cell
    pub fn tag(&self) -> ColorTag {
        self.kind.tag()
    }

    pub fn blocks(&self) -> &PieceMatrix {
        &self.blocks
    }

    /// Occupied cells in board coordinates as (x, y, tag)
    pub fn occupied_cells(&self) -> impl Iterator<Item = (i32, i32, ColorTag)> + '_ {
        self.blocks
            .occupied()
            .map(move |(row, col, tag)| (self.x + col as i32, self.y + row as i32, tag))
    }
}

/// Spawn the requested kind, or a uniformly random one when `requested` is None
pub fn spawn_piece<R: RandomSource + ?Sized>(requested: Option<PieceKind>, rng: &mut R) -> Piece {
    let kind = match requested {
        Some(kind) => kind,
        None => {
            let index = rng.next_index(PIECE_KIND_COUNT);
            PieceKind::ALL[index % PIECE_KIND_COUNT]
        }
    };
    Piece::spawn(kind)
}

/// Shift the piece by (dx, dy), undoing the shift when it no longer fits.
/// Returns true if the piece moved.
pub fn try_shift(piece: &mut Piece, dx: i32, dy: i32, fits: impl Fn(&Piece) -> bool) -> bool {
    piece.x += dx;
    piece.y += dy;
    if fits(piece) {
        return true;
    }
    piece.x -= dx;
    piece.y -= dy;
    false
}

/// Rotate the piece in place, restoring the previous matrix when it no longer fits.
/// Returns true if the piece rotated.
pub fn try_rotate(piece: &mut Piece, fits: impl Fn(&Piece) -> bool) -> bool {
    let rotated = piece.blocks.rotated();
    let previous = std::mem::replace(&mut piece.blocks, rotated);
    if fits(piece) {
        return true;
    }
    piece.blocks = previous;
    false
}
