//! A participant in a single game.

use crate::error::GameError;
use crate::games::Move;
use crate::protocol::Outcome;
use serde::Serialize;

/// Player
///
/// The chosen move is never serialized, so a shared game view cannot leak one
/// player's pending choice to the other.
#[derive(Clone, Debug, Serialize)]
pub struct Player {
    pub name: String,
    #[serde(skip_serializing)]
    chosen: Option<Move>,
    #[serde(rename = "state")]
    outcome: Option<Outcome>,
}

impl Player {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            chosen: None,
            outcome: None,
        }
    }

    /// Record the player's move. A move can only be set once.
    pub fn set_move(&mut self, mv: Move) -> Result<(), GameError> {
        if self.chosen.is_some() {
            return Err(GameError::MoveAlreadySet(mv));
        }
        self.chosen = Some(mv);
        Ok(())
    }

    pub fn get_move(&self) -> Option<Move> {
        self.chosen
    }

    pub fn has_move(&self) -> bool {
        self.chosen.is_some()
    }

    pub fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    pub(crate) fn set_outcome(&mut self, outcome: Outcome) {
        self.outcome = Some(outcome);
    }
}
