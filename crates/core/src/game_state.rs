//! Game state module - manages the complete game session
//!
//! This module ties together all core components: board, pieces, RNG, and scoring.
//! It handles piece movement, rotation, locking, line clears, and the session lifecycle.
//!
//! Lifecycle:
//! - **Active**: the active piece accepts moves and rotations.
//! - **Locking**: a failed downward move merges the piece, clears rows, promotes
//!   the next piece and checks for game over. Runs to completion inside `move_down`.
//! - **GameOver**: terminal. Movement and rotation are no-ops; only `reset` starts over.

use log::{debug, info, trace};

use crate::board::Board;
use crate::config::{ConfigError, GameConfig};
use crate::pieces::{spawn_piece, try_rotate, try_shift, Piece};
use crate::rng::{RandomSource, SimpleRng};
use crate::scoring::Progress;
use crate::snapshot::{GameSnapshot, PieceSnapshot};
use crate::types::{GameCommand, LockEvent};

/// Complete game session
#[derive(Debug, Clone)]
pub struct GameState<R = SimpleRng> {
    config: GameConfig,
    board: Board,
    active: Piece,
    /// Buffered next piece; `None` only after game over.
    next: Option<Piece>,
    progress: Progress,
    game_over: bool,
    /// Last lock event (consumed by observers).
    last_event: Option<LockEvent>,
    rng: R,
}

impl GameState<SimpleRng> {
    /// Create a session seeded from entropy
    pub fn new(config: GameConfig) -> Result<Self, ConfigError> {
        Self::with_rng(config, SimpleRng::from_entropy())
    }

    /// Create a session with a fixed seed
    pub fn with_seed(config: GameConfig, seed: u32) -> Result<Self, ConfigError> {
        Self::with_rng(config, SimpleRng::new(seed))
    }
}

impl<R: RandomSource> GameState<R> {
    /// Create a session drawing pieces from `rng`
    pub fn with_rng(config: GameConfig, rng: R) -> Result<Self, ConfigError> {
        config.validate()?;
        let state = Self::start(config, rng);
        debug!(
            "new session {}x{}: active={:?}",
            config.rows, config.cols, state.active.kind
        );
        Ok(state)
    }

    fn start(config: GameConfig, mut rng: R) -> Self {
        let active = spawn_piece(None, &mut rng);
        let next = spawn_piece(None, &mut rng);
        Self {
            config,
            board: Board::new(config.rows, config.cols),
            active,
            next: Some(next),
            progress: Progress::new(),
            game_over: false,
            last_event: None,
            rng,
        }
    }

    /// Create a session on a prefilled board.
    ///
    /// The board's extent becomes the session's dimensions. If the first piece
    /// does not fit, the session starts in game over. `reset` returns to an empty board.
    pub fn from_board(board: Board, rng: R) -> Result<Self, ConfigError> {
        let config = GameConfig::new(board.height(), board.width());
        let mut state = Self::with_rng(config, rng)?;
        state.board = board;
        if !state.board.fits(&state.active) {
            info!("first piece {:?} is blocked, game over", state.active.kind);
            state.game_over = true;
            state.next = None;
        }
        Ok(state)
    }

    /// Reinitialize the whole session with the same dimensions
    pub fn reset(&mut self) {
        self.board.clear();
        self.active = spawn_piece(None, &mut self.rng);
        self.next = Some(spawn_piece(None, &mut self.rng));
        self.progress = Progress::new();
        self.game_over = false;
        self.last_event = None;
        debug!("session reset: active={:?}", self.active.kind);
    }

    pub fn config(&self) -> GameConfig {
        self.config
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn active(&self) -> &Piece {
        &self.active
    }

    pub fn next(&self) -> Option<&Piece> {
        self.next.as_ref()
    }

    pub fn score(&self) -> u32 {
        self.progress.score()
    }

    pub fn lines(&self) -> u32 {
        self.progress.lines()
    }

    pub fn level(&self) -> u32 {
        self.progress.level()
    }

    /// Interval in milliseconds the caller should wait between automatic `move_down`s
    pub fn speed_ms(&self) -> u32 {
        self.progress.speed_ms()
    }

    pub fn game_over(&self) -> bool {
        self.game_over
    }

    pub fn rng(&self) -> &R {
        &self.rng
    }

    /// Board with the active piece overlaid (0 = empty, 1..=7 = tag)
    pub fn grid(&self) -> Vec<Vec<u8>> {
        self.board.snapshot(Some(&self.active))
    }

    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            grid: self.grid(),
            rows: self.board.height(),
            cols: self.board.width(),
            active: PieceSnapshot::from(&self.active),
            next: self.next.as_ref().map(PieceSnapshot::from),
            score: self.score(),
            lines: self.lines(),
            level: self.level(),
            speed_ms: self.speed_ms(),
            game_over: self.game_over,
        }
    }

    /// Take and clear the last lock event.
    pub fn take_last_event(&mut self) -> Option<LockEvent> {
        self.last_event.take()
    }

    /// Move the active piece one row down, locking it if it cannot move
    pub fn move_down(&mut self) {
        if self.game_over {
            return;
        }
        if !self.try_move(0, 1) {
            self.lock_piece();
        }
    }

    pub fn move_left(&mut self) {
        if !self.game_over {
            self.try_move(-1, 0);
        }
    }

    pub fn move_right(&mut self) {
        if !self.game_over {
            self.try_move(1, 0);
        }
    }

    /// Rotate the active piece a quarter turn in place
    pub fn rotate(&mut self) {
        if !self.game_over {
            self.try_rotate();
        }
    }

    /// Apply a command
    pub fn apply_command(&mut self, command: GameCommand) {
        match command {
            GameCommand::MoveDown => self.move_down(),
            GameCommand::MoveLeft => self.move_left(),
            GameCommand::MoveRight => self.move_right(),
            GameCommand::Rotate => self.rotate(),
            GameCommand::Reset => self.reset(),
        }
    }

    /// Try to move the active piece
    pub(crate) fn try_move(&mut self, dx: i32, dy: i32) -> bool {
        let board = &self.board;
        let moved = try_shift(&mut self.active, dx, dy, |p| board.fits(p));
        if !moved {
            trace!("move ({}, {}) rejected for {:?}", dx, dy, self.active.kind);
        }
        moved
    }

    /// Try to rotate the active piece (no wall kicks)
    pub(crate) fn try_rotate(&mut self) -> bool {
        let board = &self.board;
        let rotated = try_rotate(&mut self.active, |p| board.fits(p));
        if !rotated {
            trace!("rotation rejected for {:?}", self.active.kind);
        }
        rotated
    }

    /// Lock the active piece onto the board, clear rows and bring in the next piece
    pub(crate) fn lock_piece(&mut self) {
        let locked_kind = self.active.kind;
        self.board.merge_piece(&self.active);

        // Checked on the merged board, before compaction can empty the top row.
        let top_row_occupied = !self.board.is_row_empty(0);

        let cleared = self.board.clear_full_rows();
        let result = self.progress.apply_clear(cleared);
        debug!(
            "locked {:?} at ({}, {}), cleared {}",
            locked_kind, self.active.x, self.active.y, cleared
        );
        if result.lines_cleared > 0 {
            info!(
                "cleared {} line(s): +{} score={} lines={}",
                result.lines_cleared,
                result.score_delta,
                self.progress.score(),
                self.progress.lines()
            );
        }
        if result.level_up {
            info!(
                "level {} reached, speed {}ms",
                self.progress.level(),
                self.progress.speed_ms()
            );
        }

        let promoted = match self.next.take() {
            Some(piece) => piece,
            None => spawn_piece(None, &mut self.rng),
        };
        self.active = promoted;

        let blocked = !self.board.fits(&self.active);
        if top_row_occupied || blocked {
            self.game_over = true;
            info!(
                "game over: score={} lines={} level={}",
                self.progress.score(),
                self.progress.lines(),
                self.progress.level()
            );
        } else {
            self.next = Some(spawn_piece(None, &mut self.rng));
        }

        self.last_event = Some(LockEvent {
            kind: locked_kind,
            lines_cleared: result.lines_cleared,
            score_delta: result.score_delta,
            score: self.progress.score(),
            lines: self.progress.lines(),
            level: self.progress.level(),
            speed_ms: self.progress.speed_ms(),
            level_up: result.level_up,
            game_over: self.game_over,
        });
    }

    #[cfg(test)]
    pub(crate) fn board_mut(&mut self) -> &mut Board {
        &mut self.board
    }
}

impl Default for GameState<SimpleRng> {
    fn default() -> Self {
        Self::start(GameConfig::default(), SimpleRng::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::KindSequence;
    use crate::types::{ColorTag, PieceKind};

    fn session(kinds: &[PieceKind]) -> GameState<KindSequence> {
        GameState::with_rng(GameConfig::default(), KindSequence::new(kinds.to_vec())).unwrap()
    }

    /// Issue move-down until a lock happens, returning the number of commands sent
    fn fall_until_lock<R: RandomSource>(state: &mut GameState<R>) -> usize {
        let mut steps = 0;
        loop {
            state.move_down();
            steps += 1;
            if state.take_last_event().is_some() {
                return steps;
            }
            assert!(steps < 100, "piece never locked");
        }
    }

    fn fill_row_except(state: &mut GameState<KindSequence>, y: i32, gap: &[i32]) {
        let tag = ColorTag::new(2);
        for x in 0..10 {
            if !gap.contains(&x) {
                state.board_mut().set(x, y, tag);
            }
        }
    }

    #[test]
    fn test_new_game_state() {
        let state = session(&[PieceKind::T, PieceKind::O]);

        assert!(!state.game_over());
        assert_eq!(state.score(), 0);
        assert_eq!(state.lines(), 0);
        assert_eq!(state.level(), 1);
        assert_eq!(state.speed_ms(), 1000);
        assert_eq!(state.active().kind, PieceKind::T);
        assert_eq!(state.next().map(|p| p.kind), Some(PieceKind::O));
        assert!(state.board().cells().iter().all(|c| c.is_none()));
    }

    #[test]
    fn test_rejects_degenerate_config() {
        let err = GameState::with_seed(GameConfig::new(0, 0), 1).unwrap_err();
        assert!(matches!(err, ConfigError::TooFewRows { .. }));
    }

    #[test]
    fn test_default_game_state() {
        let state = GameState::default();
        assert_eq!(state.config(), GameConfig::new(20, 10));
        assert!(!state.game_over());
    }

    #[test]
    fn test_try_move() {
        let mut state = session(&[PieceKind::T]);
        let initial_x = state.active().x;

        assert!(state.try_move(1, 0));
        assert_eq!(state.active().x, initial_x + 1);

        assert!(state.try_move(-1, 0));
        assert_eq!(state.active().x, initial_x);

        // Can't move above the top
        assert!(!state.try_move(0, -1));
    }

    #[test]
    fn test_walls_stop_horizontal_moves() {
        let mut state = session(&[PieceKind::O]);
        for _ in 0..20 {
            state.move_left();
        }
        assert_eq!(state.active().x, 0);
        for _ in 0..20 {
            state.move_right();
        }
        // O occupies two columns of a 2x2 matrix.
        assert_eq!(state.active().x, 8);
    }

    #[test]
    fn test_collision_stops_horizontal_moves() {
        let mut state = session(&[PieceKind::O]);
        state.board_mut().set(2, 1, ColorTag::new(3));
        state.move_left();
        assert_eq!(state.active().x, 3);
    }

    #[test]
    fn test_i_piece_cannot_rotate_at_spawn() {
        let mut state = session(&[PieceKind::I]);
        let before = state.active().clone();
        state.rotate();
        // A vertical bar would poke above the top row.
        assert_eq!(state.active(), &before);

        state.move_down();
        state.rotate();
        let cols: Vec<i32> = state.active().occupied_cells().map(|(x, _, _)| x).collect();
        assert_eq!(cols, vec![5, 5, 5, 5]);
    }

    #[test]
    fn test_rotation_blocked_by_collision() {
        let mut state = session(&[PieceKind::T]);
        state.move_down();
        // Rotated T needs (4, 3).
        state.board_mut().set(4, 3, ColorTag::new(1));
        let before = state.active().clone();
        assert!(!state.try_rotate());
        assert_eq!(state.active(), &before);
    }

    #[test]
    fn test_lock_places_piece_at_bottom() {
        let mut state = session(&[PieceKind::O, PieceKind::T]);
        let steps = fall_until_lock(&mut state);

        // 18 successful steps, then the failing one that locks.
        assert_eq!(steps, 19);
        let tag = Some(PieceKind::O.tag());
        assert_eq!(state.board().get(3, 18), Some(tag));
        assert_eq!(state.board().get(4, 18), Some(tag));
        assert_eq!(state.board().get(3, 19), Some(tag));
        assert_eq!(state.board().get(4, 19), Some(tag));
        assert_eq!(state.board().cells().iter().filter(|c| c.is_some()).count(), 4);

        assert_eq!(state.active().kind, PieceKind::T);
        assert_eq!(state.next().map(|p| p.kind), Some(PieceKind::O));
        assert!(!state.game_over());
    }

    #[test]
    fn test_lock_piece_clears_line() {
        let mut state = session(&[PieceKind::I]);
        fill_row_except(&mut state, 19, &[5]);

        state.move_down();
        assert!(state.try_rotate());
        fall_until_lock(&mut state);

        assert_eq!(state.lines(), 1);
        assert_eq!(state.score(), 400);
        assert_eq!(state.board().height(), 20);
        let tag = Some(PieceKind::I.tag());
        assert_eq!(state.board().get(5, 19), Some(tag));
        assert_eq!(state.board().get(5, 17), Some(tag));
        assert_eq!(state.board().get(5, 16), Some(None));
        assert_eq!(state.board().get(0, 19), Some(None));
        assert!(state.board().is_row_empty(0));
    }

    #[test]
    fn test_tetris_scores_3650() {
        let mut state = session(&[PieceKind::I]);
        for y in 16..20 {
            fill_row_except(&mut state, y, &[5]);
        }
        state.move_down();
        assert!(state.try_rotate());
        fall_until_lock(&mut state);

        assert_eq!(state.lines(), 4);
        assert_eq!(state.score(), 3650);
        assert!(state.board().cells().iter().all(|c| c.is_none()));
    }

    #[test]
    fn test_lock_event_contents() {
        let mut state = session(&[PieceKind::I]);
        fill_row_except(&mut state, 19, &[3, 4, 5, 6]);
        for _ in 0..19 {
            state.move_down();
        }
        assert!(state.take_last_event().is_none());
        state.move_down();
        let event = state.take_last_event().unwrap();
        assert_eq!(event.kind, PieceKind::I);
        assert_eq!(event.lines_cleared, 1);
        assert_eq!(event.score_delta, 400);
        assert_eq!(event.score, 400);
        assert!(!event.level_up);
        assert!(!event.game_over);
    }

    #[test]
    fn test_level_and_speed_progression() {
        let mut state = session(&[PieceKind::I]);
        for round in 1..=10u32 {
            fill_row_except(&mut state, 19, &[3, 4, 5, 6]);
            fall_until_lock(&mut state);
            assert_eq!(state.lines(), round);
            if round < 10 {
                assert_eq!(state.level(), 1);
                assert_eq!(state.speed_ms(), 1000);
            }
        }
        assert_eq!(state.level(), 2);
        assert_eq!(state.speed_ms(), 950);
    }

    #[test]
    fn test_game_over_detection() {
        let mut state = session(&[PieceKind::O, PieceKind::T, PieceKind::S]);
        for x in 0..3 {
            state.board_mut().set(x, 0, ColorTag::new(6));
        }
        fall_until_lock(&mut state);

        assert!(state.game_over());
        assert!(state.next().is_none());
        // Only the two pieces drawn at session start.
        assert_eq!(state.rng().draws(), 2);
        assert_eq!(state.active().kind, PieceKind::T);
    }

    #[test]
    fn test_full_top_row_ends_game_even_when_cleared() {
        let mut state = session(&[PieceKind::O]);
        fill_row_except(&mut state, 0, &[]);
        fall_until_lock(&mut state);

        assert!(state.game_over());
        assert_eq!(state.lines(), 1);
        assert!(state.board().is_row_empty(0));
    }

    #[test]
    fn test_blocked_spawn_ends_game() {
        let mut state = session(&[PieceKind::O, PieceKind::T]);
        state.move_left();
        state.move_left();
        state.move_left();
        // T spawns over row 1, cols 3..=5; row 0 stays free.
        state.board_mut().set(3, 1, ColorTag::new(1));
        fall_until_lock(&mut state);
        assert!(state.board().is_row_empty(0));
        assert!(state.game_over());
        assert!(state.next().is_none());
    }

    #[test]
    fn test_game_over_stops_game() {
        let mut state = session(&[PieceKind::O]);
        state.board_mut().set(0, 0, ColorTag::new(1));
        fall_until_lock(&mut state);
        assert!(state.game_over());

        let before = state.snapshot();
        state.move_down();
        state.move_left();
        state.move_right();
        state.rotate();
        assert_eq!(state.snapshot(), before);
        assert!(state.take_last_event().is_none());
    }

    #[test]
    fn test_reset_restores_everything() {
        let mut state = session(&[PieceKind::I]);
        fill_row_except(&mut state, 19, &[3, 4, 5, 6]);
        fall_until_lock(&mut state);
        state.board_mut().set(0, 0, ColorTag::new(1));
        fall_until_lock(&mut state);
        assert!(state.game_over());

        state.apply_command(GameCommand::Reset);
        assert!(!state.game_over());
        assert_eq!((state.score(), state.lines(), state.level()), (0, 0, 1));
        assert_eq!(state.speed_ms(), 1000);
        assert_eq!(state.board().height(), 20);
        assert_eq!(state.board().width(), 10);
        assert!(state.board().cells().iter().all(|c| c.is_none()));
        assert!(state.next().is_some());
        assert!(state.take_last_event().is_none());
    }

    #[test]
    fn test_snapshot_is_pure() {
        let mut state = session(&[PieceKind::L]);
        state.move_down();
        let board_before = state.board().clone();
        let active_before = state.active().clone();

        let a = state.snapshot();
        let b = state.snapshot();
        assert_eq!(a, b);
        assert_eq!(state.board(), &board_before);
        assert_eq!(state.active(), &active_before);
        assert_eq!(a.occupied_count(), 4);
        assert!(state.board().cells().iter().all(|c| c.is_none()));
    }

    #[test]
    fn test_apply_command_dispatch() {
        let mut state = session(&[PieceKind::T]);
        state.apply_command(GameCommand::MoveRight);
        assert_eq!(state.active().x, 4);
        state.apply_command(GameCommand::MoveLeft);
        assert_eq!(state.active().x, 3);
        state.apply_command(GameCommand::MoveDown);
        assert_eq!(state.active().y, 1);
        state.apply_command(GameCommand::Rotate);
        assert_ne!(state.active().blocks(), Piece::spawn(PieceKind::T).blocks());
    }

    #[test]
    fn test_from_board_blocked_start() {
        let mut board = Board::new(20, 10);
        board.set(4, 1, ColorTag::new(1));
        let state = GameState::from_board(board, KindSequence::repeat(PieceKind::T)).unwrap();
        assert!(state.game_over());
        assert!(state.next().is_none());
    }
}
