//! Fatal configuration errors raised while setting up a board.

use thiserror::Error;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum GameError {
    #[error("invalid grid dimensions {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },
    #[error("cannot place {mines} mines in {slots} slots")]
    TooManyMines { mines: usize, slots: usize },
}
