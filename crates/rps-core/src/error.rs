//! Errors surfaced by game operations.

use crate::games::Move;
use thiserror::Error;

/// Errors from registry, game and player operations.
///
/// Every variant is a caller mistake or a state conflict; none of them leave
/// a game partially modified.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum GameError {
    #[error("Game could not be found.")]
    GameNotFound(String),

    #[error("The game is already full.")]
    GameFull,

    #[error("The name already exists.")]
    DuplicateName(String),

    #[error("Invalid move '{0}'.")]
    InvalidMove(String),

    #[error("Player does not exist.")]
    PlayerNotFound(String),

    #[error("Unable to set move to {0}, move has already been set.")]
    MoveAlreadySet(Move),
}
