use thiserror::Error;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    /// The grid cannot hold a snake and its food. Raised at construction
    /// time, never mid-game.
    #[error("a {width}x{height} grid is too small to play on")]
    InvalidConfiguration { width: i64, height: i64 },

    /// Every cell is occupied by the snake, so food placement has nowhere
    /// to go. The orchestration layer decides whether this counts as a win.
    #[error("every cell is occupied, no room left for food")]
    NoSpaceAvailable,
}
