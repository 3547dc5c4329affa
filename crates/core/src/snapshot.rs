use crate::pieces::Piece;
use crate::types::PieceKind;

#[cfg(feature = "serde")]
use serde::Serialize;

/// Read-only view of a piece
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct PieceSnapshot {
    pub kind: PieceKind,
    pub x: i32,
    pub y: i32,
    /// Square matrix, 0 = empty, otherwise the piece's tag
    pub blocks: Vec<Vec<u8>>,
}

impl From<&Piece> for PieceSnapshot {
    fn from(value: &Piece) -> Self {
        Self {
            kind: value.kind,
            x: value.x,
            y: value.y,
            blocks: value.blocks().to_rows(),
        }
    }
}

/// Deep copy of every observable field of a session
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct GameSnapshot {
    /// Board with the active piece overlaid, row 0 at the top
    pub grid: Vec<Vec<u8>>,
    pub rows: usize,
    pub cols: usize,
    pub active: PieceSnapshot,
    /// `None` once the game is over
    pub next: Option<PieceSnapshot>,
    pub score: u32,
    pub lines: u32,
    pub level: u32,
    pub speed_ms: u32,
    pub game_over: bool,
}

impl GameSnapshot {
    /// Whether the session still accepts movement commands
    pub fn playable(&self) -> bool {
        !self.game_over
    }

    /// Number of occupied cells in the overlaid grid
    pub fn occupied_count(&self) -> usize {
        self.grid.iter().flatten().filter(|&&v| v != 0).count()
    }
}
