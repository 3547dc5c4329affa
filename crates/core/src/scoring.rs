//! Scoring module - line-clear scoring, level and speed progression
//!
//! Rules:
//! - A lock that clears 0/1/2/3/4 rows scores 0/400/1350/2200/3650.
//! - `level = lines / 10 + 1`, recomputed after every lock.
//! - Every level gained shortens the fall interval by 50ms, never below 50ms.
//!   The interval never grows.

use crate::types::{
    BASE_SPEED_MS, LINES_PER_LEVEL, LINE_SCORES, SPEED_FLOOR_MS, SPEED_STEP_MS,
};

/// Score awarded for clearing `lines` rows in a single lock.
///
/// A single lock cannot clear more than four rows (no piece is taller), so
/// larger counts are scored as four.
pub fn calculate_line_score(lines: usize) -> u32 {
    LINE_SCORES[lines.min(LINE_SCORES.len() - 1)]
}

/// Level for a total line count (starts at 1)
pub fn calculate_level(total_lines: u32) -> u32 {
    total_lines / LINES_PER_LEVEL + 1
}

/// Fall interval after gaining `levels_gained` levels from `speed_ms`
pub fn next_speed_ms(speed_ms: u32, levels_gained: u32) -> u32 {
    let reduced = speed_ms.saturating_sub(SPEED_STEP_MS.saturating_mul(levels_gained));
    reduced.max(SPEED_FLOOR_MS).min(speed_ms)
}

/// Outcome of scoring one lock
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScoreResult {
    pub lines_cleared: u32,
    pub score_delta: u32,
    pub level_up: bool,
}

/// Session counters driven by line clears
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Progress {
    score: u32,
    lines: u32,
    level: u32,
    speed_ms: u32,
}

impl Progress {
    /// Counters of a fresh session
    pub fn new() -> Self {
        Self {
            score: 0,
            lines: 0,
            level: 1,
            speed_ms: BASE_SPEED_MS,
        }
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn lines(&self) -> u32 {
        self.lines
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn speed_ms(&self) -> u32 {
        self.speed_ms
    }

    /// Apply the rows cleared by one lock
    pub fn apply_clear(&mut self, cleared: usize) -> ScoreResult {
        let score_delta = calculate_line_score(cleared);
        let lines_cleared = u32::try_from(cleared).unwrap_or(u32::MAX);

        self.score = self.score.saturating_add(score_delta);
        self.lines = self.lines.saturating_add(lines_cleared);

        let previous_level = self.level;
        self.level = calculate_level(self.lines);
        let levels_gained = self.level - previous_level;
        if levels_gained > 0 {
            self.speed_ms = next_speed_ms(self.speed_ms, levels_gained);
        }

        ScoreResult {
            lines_cleared,
            score_delta,
            level_up: levels_gained > 0,
        }
    }
}

impl Default for Progress {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_scores() {
        assert_eq!(calculate_line_score(0), 0);
        assert_eq!(calculate_line_score(1), 400);
        assert_eq!(calculate_line_score(2), 1350);
        assert_eq!(calculate_line_score(3), 2200);
        assert_eq!(calculate_line_score(4), 3650);
        assert_eq!(calculate_line_score(9), 3650);
    }

    #[test]
    fn test_level_calculation() {
        assert_eq!(calculate_level(0), 1);
        assert_eq!(calculate_level(9), 1);
        assert_eq!(calculate_level(10), 2);
        assert_eq!(calculate_level(29), 3);
        assert_eq!(calculate_level(100), 11);
    }

    #[test]
    fn test_speed_steps_and_floor() {
        assert_eq!(next_speed_ms(1000, 1), 950);
        assert_eq!(next_speed_ms(1000, 2), 900);
        assert_eq!(next_speed_ms(100, 1), 50);
        assert_eq!(next_speed_ms(50, 1), 50);
        assert_eq!(next_speed_ms(50, 10), 50);
        // Never increases, even from below the floor.
        assert_eq!(next_speed_ms(30, 1), 30);
    }

    #[test]
    fn test_progress_starts_fresh() {
        let p = Progress::new();
        assert_eq!((p.score(), p.lines(), p.level(), p.speed_ms()), (0, 0, 1, 1000));
    }

    #[test]
    fn test_zero_clear_changes_nothing() {
        let mut p = Progress::new();
        let result = p.apply_clear(0);
        assert_eq!(result, ScoreResult::default());
        assert_eq!(p, Progress::new());
    }

    #[test]
    fn test_level_up_on_tenth_line() {
        let mut p = Progress::new();
        for _ in 0..2 {
            assert!(!p.apply_clear(4).level_up);
        }
        assert_eq!(p.lines(), 8);
        assert_eq!(p.speed_ms(), 1000);

        let result = p.apply_clear(2);
        assert!(result.level_up);
        assert_eq!(p.lines(), 10);
        assert_eq!(p.level(), 2);
        assert_eq!(p.speed_ms(), 950);
        assert_eq!(p.score(), 3650 * 2 + 1350);
    }

    #[test]
    fn test_speed_reaches_floor() {
        let mut p = Progress::new();
        // 19 level-ups bring 1000 down to 50; more must not go lower.
        for _ in 0..60 {
            p.apply_clear(4);
        }
        assert_eq!(p.level(), 25);
        assert_eq!(p.speed_ms(), 50);
    }
}
