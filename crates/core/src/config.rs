//! Session configuration

use thiserror::Error;

use crate::types::{DEFAULT_COLS, DEFAULT_ROWS, MAX_DIMENSION, MIN_COLS, MIN_ROWS};

/// Errors rejected at session construction
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("board needs at least {min} rows, got {rows}")]
    TooFewRows { rows: usize, min: usize },

    #[error("board needs at least {min} columns, got {cols}")]
    TooFewCols { cols: usize, min: usize },

    #[error("board dimension {value} exceeds the maximum of {max}")]
    TooLarge { value: usize, max: usize },
}

/// Board dimensions for a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct GameConfig {
    pub rows: usize,
    pub cols: usize,
}

impl GameConfig {
    pub fn new(rows: usize, cols: usize) -> Self {
        Self { rows, cols }
    }

    /// Check the dimensions can host every piece at its spawn anchor
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.rows < MIN_ROWS {
            return Err(ConfigError::TooFewRows {
                rows: self.rows,
                min: MIN_ROWS,
            });
        }
        if self.cols < MIN_COLS {
            return Err(ConfigError::TooFewCols {
                cols: self.cols,
                min: MIN_COLS,
            });
        }
        let largest = self.rows.max(self.cols);
        if largest > MAX_DIMENSION {
            return Err(ConfigError::TooLarge {
                value: largest,
                max: MAX_DIMENSION,
            });
        }
        Ok(())
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            rows: DEFAULT_ROWS,
            cols: DEFAULT_COLS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert_eq!(GameConfig::default(), GameConfig::new(20, 10));
        assert!(GameConfig::default().validate().is_ok());
    }

    #[test]
    fn test_rejects_degenerate_dimensions() {
        assert_eq!(
            GameConfig::new(0, 10).validate(),
            Err(ConfigError::TooFewRows { rows: 0, min: 4 })
        );
        assert_eq!(
            GameConfig::new(20, 6).validate(),
            Err(ConfigError::TooFewCols { cols: 6, min: 7 })
        );
        assert!(matches!(
            GameConfig::new(2000, 10).validate(),
            Err(ConfigError::TooLarge { value: 2000, .. })
        ));
    }

    #[test]
    fn test_smallest_board_is_accepted() {
        assert!(GameConfig::new(4, 7).validate().is_ok());
    }

    #[test]
    fn test_error_messages_are_readable() {
        let err = GameConfig::new(20, 3).validate().unwrap_err();
        assert_eq!(err.to_string(), "board needs at least 7 columns, got 3");
    }
}
