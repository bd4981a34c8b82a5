//! Rock-Paper-Scissors rules.

use crate::error::GameError;
use crate::protocol::GameResult;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A player's move
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Move {
    Rock,
    Paper,
    Scissors,
}

impl Move {
    pub const ALL: [Move; 3] = [Move::Rock, Move::Paper, Move::Scissors];

    /// Wire token, as accepted by `FromStr`
    pub fn as_str(&self) -> &'static str {
        match self {
            Move::Rock => "rock",
            Move::Paper => "paper",
            Move::Scissors => "scissors",
        }
    }

    /// The move this one defeats
    pub fn defeats(&self) -> Move {
        match self {
            Move::Rock => Move::Scissors,
            Move::Scissors => Move::Paper,
            Move::Paper => Move::Rock,
        }
    }

    /// Check if this move beats the other
    pub fn beats(&self, other: &Move) -> bool {
        self.defeats() == *other
    }
}

impl FromStr for Move {
    type Err = GameError;

    /// Tokens are case-sensitive; anything else is echoed back in the error.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "rock" => Ok(Move::Rock),
            "paper" => Ok(Move::Paper),
            "scissors" => Ok(Move::Scissors),
            other => Err(GameError::InvalidMove(other.to_string())),
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Rock-Paper-Scissors judge
pub struct RpsGame;

impl RpsGame {
    /// Decide a round between player one (`a`) and player two (`b`)
    pub fn judge(a: Move, b: Move) -> GameResult {
        if a == b {
            GameResult::Draw
        } else if a.beats(&b) {
            GameResult::AWins
        } else {
            GameResult::BWins
        }
    }
}
