//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental types used throughout the engine.
//! All types are pure data with no behavior beyond conversions, so they can be
//! shared between the engine and whatever layer renders or drives it.
//!
//! # Board Dimensions
//!
//! Default playfield dimensions (configurable per session):
//!
//! - **Rows**: 20 (row 0 is the top)
//! - **Columns**: 10 (column 0 is the left edge)
//! - **Spawn column**: 3 for every piece
//!
//! # Speed Curve
//!
//! Speed is the interval, in milliseconds, a caller should wait between two
//! automatic downward steps:
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `BASE_SPEED_MS` | 1000 | Interval at level 1 |
//! | `SPEED_STEP_MS` | 50 | Reduction per level gained |
//! | `SPEED_FLOOR_MS` | 50 | Interval never drops below this |
//! | `LINES_PER_LEVEL` | 10 | Cleared lines needed per level |
//!
//! # Examples
//!
//! ```
//! use blockfall_types::{ColorTag, GameCommand, PieceKind, DEFAULT_COLS, DEFAULT_ROWS};
//!
//! // Shape index is 0-based, color tag is 1-based.
//! let kind = PieceKind::T;
//! assert_eq!(kind.index(), 4);
//! assert_eq!(kind.tag().get(), 5);
//! assert_eq!(PieceKind::from_tag(kind.tag()), kind);
//!
//! // Tags outside 1..=7 do not exist.
//! assert!(ColorTag::new(0).is_none());
//! assert!(ColorTag::new(8).is_none());
//!
//! // Commands parse case-insensitively.
//! assert_eq!(GameCommand::from_str("moveLeft"), Some(GameCommand::MoveLeft));
//!
//! assert_eq!(DEFAULT_ROWS, 20);
//! assert_eq!(DEFAULT_COLS, 10);
//! ```

use std::fmt;
use std::num::NonZeroU8;

#[cfg(feature = "serde")]
use serde::Serialize;

/// Default board height in rows
pub const DEFAULT_ROWS: usize = 20;

/// Default board width in columns
pub const DEFAULT_COLS: usize = 10;

/// Smallest accepted board height (a vertical bar must fit)
pub const MIN_ROWS: usize = 4;

/// Smallest accepted board width (a horizontal bar must fit at the spawn column)
pub const MIN_COLS: usize = 7;

/// Largest accepted board extent on either axis
pub const MAX_DIMENSION: usize = 1024;

/// Horizontal anchor of every freshly spawned piece
pub const SPAWN_X: i32 = 3;

/// Fall interval at level 1 (1000ms = 1 second per row)
pub const BASE_SPEED_MS: u32 = 1000;

/// Fall interval reduction per level gained
pub const SPEED_STEP_MS: u32 = 50;

/// Fall interval floor
pub const SPEED_FLOOR_MS: u32 = 50;

/// Lines that must be cleared to advance one level
pub const LINES_PER_LEVEL: u32 = 10;

/// Score awarded per lock, indexed by rows cleared in that lock.
///
/// - 0 rows: 0
/// - 1 row: 400
/// - 2 rows: 1350
/// - 3 rows: 2200
/// - 4 rows: 3650
pub const LINE_SCORES: [u32; 5] = [0, 400, 1350, 2200, 3650];

/// Number of distinct piece shapes (and color tags)
pub const PIECE_KIND_COUNT: usize = 7;


/// Opaque color tag carried by every occupied cell (1..=7).
///
/// Tags are identifiers only. Mapping a tag to a visible color is the
/// caller's concern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize), serde(transparent))]
pub struct ColorTag(NonZeroU8);

impl ColorTag {
    /// Build a tag from its numeric value, `None` unless it lies in 1..=7
    pub const fn new(value: u8) -> Option<Self> {
        if value == 0 || value as usize > PIECE_KIND_COUNT {
            return None;
        }
        match NonZeroU8::new(value) {
            Some(v) => Some(Self(v)),
            None => None,
        }
    }

    /// Numeric value of the tag (1..=7)
    pub const fn get(self) -> u8 {
        self.0.get()
    }
}

impl fmt::Display for ColorTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.get())
    }
}

/// A cell on the game board
///
/// - `None`: empty cell (numeric tag 0)
/// - `Some(ColorTag)`: occupied cell
pub type Cell = Option<ColorTag>;

/// Numeric view of a cell: 0 for empty, the tag value otherwise
#[inline]
pub fn cell_value(cell: Cell) -> u8 {
    cell.map_or(0, ColorTag::get)
}

/// The seven piece shapes
///
/// Order matches the catalog: index 0..=6, color tag 1..=7.
/// - **I**: 4-wide bar
/// - **J**: hook opening right
/// - **L**: hook opening left
/// - **O**: 2x2 square
/// - **T**: T-shaped
/// - **Z**: Z-shaped
/// - **S**: S-shaped (mirror of Z)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub enum PieceKind {
    I,
    J,
    L,
    O,
    T,
    Z,
    S,
}

impl PieceKind {
    /// All kinds in catalog order
    pub const ALL: [PieceKind; PIECE_KIND_COUNT] = [
        PieceKind::I,
        PieceKind::J,
        PieceKind::L,
        PieceKind::O,
        PieceKind::T,
        PieceKind::Z,
        PieceKind::S,
    ];

    /// Zero-based catalog index
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Kind at a zero-based catalog index
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Color tag painted on every cell of this kind (`index + 1`)
    pub const fn tag(self) -> ColorTag {
        match ColorTag::new(self as u8 + 1) {
            Some(tag) => tag,
            // Seven variants, seven tags.
            None => unreachable!(),
        }
    }

    /// Kind owning a color tag
    pub fn from_tag(tag: ColorTag) -> Self {
        Self::ALL[(tag.get() - 1) as usize]
    }

    /// Parse piece kind from string (case-insensitive)
    ///
    /// # Examples
    ///
    /// ```
    /// use blockfall_types::PieceKind;
    ///
    /// assert_eq!(PieceKind::from_str("i"), Some(PieceKind::I));
    /// assert_eq!(PieceKind::from_str("S"), Some(PieceKind::S));
    /// assert_eq!(PieceKind::from_str("unknown"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "i" => Some(PieceKind::I),
            "j" => Some(PieceKind::J),
            "l" => Some(PieceKind::L),
            "o" => Some(PieceKind::O),
            "t" => Some(PieceKind::T),
            "z" => Some(PieceKind::Z),
            "s" => Some(PieceKind::S),
            _ => None,
        }
    }

    /// Convert to lowercase string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            PieceKind::I => "i",
            PieceKind::J => "j",
            PieceKind::L => "l",
            PieceKind::O => "o",
            PieceKind::T => "t",
            PieceKind::Z => "z",
            PieceKind::S => "s",
        }
    }
}

/// Discrete commands a caller can issue to a session
///
/// A timer loop issues `MoveDown` at the session's speed, an input source
/// issues the rest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub enum GameCommand {
    /// Move piece one row down, locking it if it cannot move
    MoveDown,
    /// Move piece one column left
    MoveLeft,
    /// Move piece one column right
    MoveRight,
    /// Rotate piece 90° in place
    Rotate,
    /// Start a new session with the same dimensions
    Reset,
}

impl GameCommand {
    /// Parse command from string
    ///
    /// # Examples
    ///
    /// ```
    /// use blockfall_types::GameCommand;
    ///
    /// assert_eq!(GameCommand::from_str("moveDown"), Some(GameCommand::MoveDown));
    /// assert_eq!(GameCommand::from_str("ROTATE"), Some(GameCommand::Rotate));
    /// assert_eq!(GameCommand::from_str("unknown"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "movedown" => Some(GameCommand::MoveDown),
            "moveleft" => Some(GameCommand::MoveLeft),
            "moveright" => Some(GameCommand::MoveRight),
            "rotate" => Some(GameCommand::Rotate),
            "reset" => Some(GameCommand::Reset),
            _ => None,
        }
    }

    /// Convert to camelCase string
    pub fn as_str(&self) -> &'static str {
        match self {
            GameCommand::MoveDown => "moveDown",
            GameCommand::MoveLeft => "moveLeft",
            GameCommand::MoveRight => "moveRight",
            GameCommand::Rotate => "rotate",
            GameCommand::Reset => "reset",
        }
    }
}

/// Event recorded after a piece locks.
///
/// Callers that want instrumentation on score or level changes pull it with
/// `GameState::take_last_event`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct LockEvent {
    pub kind: PieceKind,
    pub lines_cleared: u32,
    pub score_delta: u32,
    pub score: u32,
    pub lines: u32,
    pub level: u32,
    pub speed_ms: u32,
    pub level_up: bool,
    pub game_over: bool,
}
