// Error type shared by the board engine and its construction-time contracts

use thiserror::Error;

/// Everything that can go wrong in the game core.
///
/// `OutOfRange` is the only runtime error and signals a caller contract
/// violation, not a recoverable game event: the cursor is always wrapped
/// into bounds, so a well-behaved front end never triggers it. The other
/// variants reject invalid construction parameters before any board exists.
#[derive(Error, Debug, Copy, Clone, PartialEq)]
pub enum GameError {
    #[error("coordinates ({x}, {y}) out of range for a {width}x{height} board")]
    OutOfRange {
        x: usize,
        y: usize,
        width: usize,
        height: usize,
    },
    #[error("board size {width}x{height} must be at least 1x1")]
    InvalidSize { width: usize, height: usize },
    #[error("mine fill ratio {fill} must lie within [0, 1]")]
    InvalidFillRatio { fill: f64 },
}

pub type Result<T> = std::result::Result<T, GameError>;
