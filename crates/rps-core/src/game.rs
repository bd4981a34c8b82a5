//! Two-player game state machine.

use crate::error::GameError;
use crate::games::{Move, RpsGame};
use crate::player::Player;
use crate::protocol::{GameId, GameResult, GameStatus, Outcome};
use serde::ser::{Serialize, SerializeStruct, Serializer};
use std::time::Instant;
use tracing::info;

/// Maximum number of players in a game
pub const MAX_PLAYERS: usize = 2;

/// A single match between two players
///
/// Status moves `WaitingForPlayer -> WaitingForMoves -> Finished` and never
/// back. Players are kept in join order; the first joiner is player one.
#[derive(Clone, Debug)]
pub struct Game {
    id: GameId,
    status: GameStatus,
    players: Vec<Player>,
    finished_at: Option<Instant>,
}

impl Game {
    pub fn new() -> Self {
        Self::with_id(GameId::new())
    }

    pub fn with_id(id: GameId) -> Self {
        Self {
            id,
            status: GameStatus::WaitingForPlayer,
            players: Vec::with_capacity(MAX_PLAYERS),
            finished_at: None,
        }
    }

    pub fn id(&self) -> GameId {
        self.id
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    /// When the game reached `Finished`, if it has
    pub fn finished_at(&self) -> Option<Instant> {
        self.finished_at
    }

    pub fn is_full(&self) -> bool {
        self.players.len() >= MAX_PLAYERS
    }

    /// Add a player. Fails without side effects when the game is full or the
    /// name is taken.
    pub fn add_player(&mut self, player: Player) -> Result<(), GameError> {
        if self.is_full() {
            return Err(GameError::GameFull);
        }
        if self.player(&player.name).is_some() {
            return Err(GameError::DuplicateName(player.name));
        }

        self.players.push(player);

        if self.is_full() {
            self.status = GameStatus::WaitingForMoves;
        }
        Ok(())
    }

    pub fn player(&self, name: &str) -> Option<&Player> {
        self.players.iter().find(|p| p.name == name)
    }

    pub fn player_mut(&mut self, name: &str) -> Option<&mut Player> {
        self.players.iter_mut().find(|p| p.name == name)
    }

    /// True once both players are in and both have picked a move
    pub fn is_ready(&self) -> bool {
        self.status == GameStatus::WaitingForMoves && self.players.iter().all(Player::has_move)
    }

    /// Parse a move token
    pub fn validate_move(token: &str) -> Result<Move, GameError> {
        token.parse()
    }

    /// Decide the game and mark it finished.
    ///
    /// Does nothing and returns `false` unless the game is ready, so a
    /// duplicate trigger can never overwrite settled outcomes.
    pub fn resolve(&mut self) -> bool {
        if !self.is_ready() {
            return false;
        }

        let (move_a, move_b) = match (self.players[0].get_move(), self.players[1].get_move()) {
            (Some(a), Some(b)) => (a, b),
            _ => return false,
        };

        let (outcome_a, outcome_b) = match RpsGame::judge(move_a, move_b) {
            GameResult::AWins => (Outcome::Winner(move_a), Outcome::Loser(move_b)),
            GameResult::BWins => (Outcome::Loser(move_a), Outcome::Winner(move_b)),
            GameResult::Draw => (Outcome::Draw, Outcome::Draw),
        };

        self.players[0].set_outcome(outcome_a);
        self.players[1].set_outcome(outcome_b);
        self.status = GameStatus::Finished;
        self.finished_at = Some(Instant::now());

        info!(
            game_id = %self.id,
            player_one = %outcome_a,
            player_two = %outcome_b,
            "Game resolved"
        );
        true
    }
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}

impl Serialize for Game {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("Game", 4)?;
        s.serialize_field("id", &self.id)?;
        s.serialize_field("status", &self.status)?;
        s.serialize_field("state", self.status.description())?;
        s.serialize_field("players", &self.players)?;
        s.end()
    }
}
