//! Protocol types shared by the core and its transports.

mod types;

pub use types::{GameId, GameResult, GameStatus, Outcome};
