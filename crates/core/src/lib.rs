//! Core game logic module - pure, deterministic, and testable
//!
//! This crate contains all the rules of the falling-block engine: the board, the
//! piece catalog, movement and rotation, line clears, scoring and the session
//! lifecycle. It has **no dependencies** on rendering, input, timing or I/O:
//!
//! - **Deterministic**: a seeded or scripted random source replays the same game
//! - **Synchronous**: every command completes before returning; callers own the clock
//! - **Portable**: state is exposed as plain data for any renderer
//!
//! # Module Structure
//!
//! - [`board`]: bounds-checked grid, collision tests, line clearing, render overlay
//! - [`pieces`]: the seven templates, spawning, speculative shift/rotate
//! - [`rng`]: injectable randomness for piece selection
//! - [`scoring`]: score table, level and speed progression
//! - [`config`]: board dimensions and their validation
//! - [`game_state`]: the session state machine
//! - [`snapshot`]: deep-copied views for rendering
//!
//! # Example
//!
//! ```
//! use blockfall_core::{GameConfig, GameState};
//! use blockfall_core::types::GameCommand;
//!
//! let mut game = GameState::with_seed(GameConfig::default(), 12345).unwrap();
//!
//! game.apply_command(GameCommand::MoveRight);
//! game.apply_command(GameCommand::Rotate);
//! game.apply_command(GameCommand::MoveDown);
//!
//! let snap = game.snapshot();
//! assert_eq!(snap.grid.len(), 20);
//! assert_eq!(snap.occupied_count(), 4);
//! assert_eq!(snap.score, 0);
//! ```
//!
//! # Timing
//!
//! The engine has no clock. Call [`GameState::move_down`] every
//! [`GameState::speed_ms`] milliseconds; the interval shrinks as the level rises.

pub mod board;
pub mod config;
pub mod game_state;
pub mod pieces;
pub mod rng;
pub mod scoring;
pub mod snapshot;

pub use blockfall_types as types;

// Re-export commonly used types for convenience
pub use board::{create_grid, Board};
pub use config::{ConfigError, GameConfig};
pub use game_state::GameState;
pub use pieces::{spawn_piece, Piece, PieceMatrix};
pub use rng::{KindSequence, RandomSource, SimpleRng};
pub use scoring::{calculate_level, calculate_line_score, Progress, ScoreResult};
pub use snapshot::{GameSnapshot, PieceSnapshot};
