//! RPS Core Library
//!
//! This crate provides the in-memory model for two-player rock-paper-scissors
//! games: players, the per-game state machine, and the registry that owns
//! every game and serializes access to each of them.

pub mod error;
pub mod game;
pub mod games;
pub mod player;
pub mod protocol;
pub mod registry;

pub use error::GameError;
pub use game::{Game, MAX_PLAYERS};
pub use games::{Move, RpsGame};
pub use player::Player;
pub use protocol::{GameId, GameResult, GameStatus, Outcome};
pub use registry::GameRegistry;
