//! In-memory game registry.
//!
//! The registry owns every game. Each game sits behind its own mutex, so the
//! check-then-act sequences of joining and moving are atomic per game while
//! different games proceed independently.

use crate::error::GameError;
use crate::game::Game;
use crate::player::Player;
use crate::protocol::{GameId, GameStatus};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock};
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// A game shared between the registry and in-flight operations
pub type SharedGame = Arc<Mutex<Game>>;

/// Owned store of games keyed by id
#[derive(Default)]
pub struct GameRegistry {
    games: RwLock<HashMap<GameId, SharedGame>>,
}

/// Every mutation is all-or-nothing, so a poisoned lock still guards a
/// consistent game.
fn lock(game: &Mutex<Game>) -> MutexGuard<'_, Game> {
    game.lock().unwrap_or_else(PoisonError::into_inner)
}

impl GameRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty game and return its id
    pub fn create_game(&self) -> GameId {
        let game = Game::new();
        let id = game.id();
        self.games
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(id, Arc::new(Mutex::new(game)));

        info!(game_id = %id, "Created game");
        id
    }

    /// Find a game by id. Only the canonical hyphenated lowercase form the
    /// id was issued in matches; anything else is reported as not found.
    pub fn lookup(&self, id: &str) -> Result<SharedGame, GameError> {
        let games = self.games.read().unwrap_or_else(PoisonError::into_inner);
        id.parse::<GameId>()
            .ok()
            .filter(|game_id| game_id.to_string() == id)
            .and_then(|game_id| games.get(&game_id).cloned())
            .ok_or_else(|| {
                debug!(game_id = %id, "Game not found");
                GameError::GameNotFound(id.to_string())
            })
    }

    /// Snapshot of a game's current state
    pub fn get_game(&self, id: &str) -> Result<Game, GameError> {
        let game = self.lookup(id)?;
        let snapshot = lock(&game).clone();
        Ok(snapshot)
    }

    pub fn join_game(&self, id: &str, player: Player) -> Result<(), GameError> {
        let game = self.lookup(id)?;
        let mut game = lock(&game);
        let name = player.name.clone();

        game.add_player(player).inspect_err(|e| {
            debug!(game_id = %id, player = %name, error = %e, "Join rejected");
        })?;

        info!(game_id = %id, player = %name, status = ?game.status(), "Player joined");
        Ok(())
    }

    /// Record a player's move and resolve the game once both moves are in.
    ///
    /// The whole sequence runs under the game's lock, so of two concurrent
    /// final moves exactly one performs the resolution.
    pub fn submit_move(&self, id: &str, name: &str, token: &str) -> Result<(), GameError> {
        let game = self.lookup(id)?;
        let mut game = lock(&game);

        let mv = Game::validate_move(token)?;
        let player = game
            .player_mut(name)
            .ok_or_else(|| GameError::PlayerNotFound(name.to_string()))?;
        player.set_move(mv).inspect_err(|e| {
            debug!(game_id = %id, player = %name, error = %e, "Move rejected");
        })?;

        info!(game_id = %id, player = %name, "Move submitted");

        if game.is_ready() {
            game.resolve();
        }
        Ok(())
    }

    /// Remove games that finished more than `ttl` ago. Returns how many were
    /// removed. Games still in progress are never evicted.
    pub fn evict_finished(&self, ttl: Duration) -> usize {
        let now = Instant::now();
        let mut games = self.games.write().unwrap_or_else(PoisonError::into_inner);
        let before = games.len();

        games.retain(|_, game| {
            let game = lock(game);
            match (game.status(), game.finished_at()) {
                (GameStatus::Finished, Some(at)) => now.duration_since(at) < ttl,
                _ => true,
            }
        });

        let evicted = before - games.len();
        if evicted > 0 {
            info!(evicted, remaining = games.len(), "Evicted finished games");
        }
        evicted
    }

    pub fn len(&self) -> usize {
        self.games.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop every game
    pub fn clear(&self) {
        self.games
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::Move;
    use crate::protocol::Outcome;
    use std::sync::Barrier;
    use std::thread;

    fn hosted(registry: &GameRegistry, host: &str) -> String {
        let id = registry.create_game().to_string();
        registry.join_game(&id, Player::new(host)).unwrap();
        id
    }

    #[test]
    fn test_create_game_ids_are_unique() {
        let registry = GameRegistry::new();
        let a = registry.create_game();
        let b = registry.create_game();
        assert_ne!(a, b);
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_unknown_ids_are_not_found() {
        let registry = GameRegistry::new();
        registry.create_game();

        let missing = GameId::new().to_string();
        for id in ["123", "", missing.as_str()] {
            assert_eq!(
                registry.get_game(id).unwrap_err(),
                GameError::GameNotFound(id.to_string())
            );
            assert!(matches!(
                registry.join_game(id, Player::new("Foo")),
                Err(GameError::GameNotFound(_))
            ));
            assert!(matches!(
                registry.submit_move(id, "Foo", "rock"),
                Err(GameError::GameNotFound(_))
            ));
        }
    }

    #[test]
    fn test_non_canonical_id_spellings_are_not_found() {
        let registry = GameRegistry::new();
        let game_id = registry.create_game();
        let id = game_id.to_string();
        assert!(registry.lookup(&id).is_ok());

        let spellings = [
            id.to_uppercase(),
            game_id.as_uuid().simple().to_string(),
            format!("urn:uuid:{}", id),
            format!("{{{}}}", id),
        ];
        for spelling in &spellings {
            assert_eq!(
                registry.get_game(spelling).unwrap_err(),
                GameError::GameNotFound(spelling.clone())
            );
            assert!(matches!(
                registry.join_game(spelling, Player::new("Foo")),
                Err(GameError::GameNotFound(_))
            ));
        }
        assert!(registry.get_game(&id).unwrap().players().is_empty());
    }

    #[test]
    fn test_submit_move_error_order() {
        let registry = GameRegistry::new();
        let id = hosted(&registry, "Foo");

        // Invalid token is reported before the player lookup
        assert_eq!(
            registry.submit_move(&id, "Nobody", "duck"),
            Err(GameError::InvalidMove("duck".to_string()))
        );
        assert_eq!(
            registry.submit_move(&id, "Nobody", "rock"),
            Err(GameError::PlayerNotFound("Nobody".to_string()))
        );

        registry.submit_move(&id, "Foo", "rock").unwrap();
        assert_eq!(
            registry.submit_move(&id, "Foo", "paper"),
            Err(GameError::MoveAlreadySet(Move::Paper))
        );
    }

    #[test]
    fn test_full_game_resolves() {
        let registry = GameRegistry::new();
        let id = hosted(&registry, "Foo");
        registry.join_game(&id, Player::new("Bar")).unwrap();

        registry.submit_move(&id, "Foo", "paper").unwrap();
        assert_eq!(
            registry.get_game(&id).unwrap().status(),
            GameStatus::WaitingForMoves
        );
        registry.submit_move(&id, "Bar", "scissors").unwrap();

        let game = registry.get_game(&id).unwrap();
        assert_eq!(game.status(), GameStatus::Finished);
        assert_eq!(
            game.player("Foo").unwrap().outcome(),
            Some(Outcome::Loser(Move::Paper))
        );
        assert_eq!(
            game.player("Bar").unwrap().outcome(),
            Some(Outcome::Winner(Move::Scissors))
        );
    }

    #[test]
    fn test_failures_leave_other_games_usable() {
        let registry = GameRegistry::new();
        let a = hosted(&registry, "Foo");
        let b = hosted(&registry, "Foo");

        assert!(registry.join_game(&a, Player::new("Foo")).is_err());
        registry.join_game(&b, Player::new("Bar")).unwrap();
        registry.join_game(&a, Player::new("Bar")).unwrap();
    }

    #[test]
    fn test_concurrent_joins_fill_only_one_slot() {
        let registry = Arc::new(GameRegistry::new());
        let id = hosted(&registry, "Host");
        let barrier = Arc::new(Barrier::new(8));

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let registry = Arc::clone(&registry);
                let barrier = Arc::clone(&barrier);
                let id = id.clone();
                thread::spawn(move || {
                    barrier.wait();
                    registry.join_game(&id, Player::new(format!("P{}", i)))
                })
            })
            .collect();

        let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
        assert!(results
            .iter()
            .filter_map(|r| r.as_ref().err())
            .all(|e| *e == GameError::GameFull));
        assert_eq!(registry.get_game(&id).unwrap().players().len(), 2);
    }

    #[test]
    fn test_concurrent_final_moves_resolve_once() {
        for _ in 0..50 {
            let registry = Arc::new(GameRegistry::new());
            let id = hosted(&registry, "Foo");
            registry.join_game(&id, Player::new("Bar")).unwrap();
            let barrier = Arc::new(Barrier::new(2));

            let handles: Vec<_> = [("Foo", "rock"), ("Bar", "scissors")]
                .into_iter()
                .map(|(name, mv)| {
                    let registry = Arc::clone(&registry);
                    let barrier = Arc::clone(&barrier);
                    let id = id.clone();
                    thread::spawn(move || {
                        barrier.wait();
                        registry.submit_move(&id, name, mv)
                    })
                })
                .collect();

            for h in handles {
                h.join().unwrap().unwrap();
            }

            let game = registry.get_game(&id).unwrap();
            assert_eq!(game.status(), GameStatus::Finished);
            assert_eq!(
                game.player("Foo").unwrap().outcome(),
                Some(Outcome::Winner(Move::Rock))
            );
            assert_eq!(
                game.player("Bar").unwrap().outcome(),
                Some(Outcome::Loser(Move::Scissors))
            );
        }
    }

    #[test]
    fn test_evict_finished_keeps_open_games() {
        let registry = GameRegistry::new();
        let open = hosted(&registry, "Foo");
        let done = hosted(&registry, "Foo");
        registry.join_game(&done, Player::new("Bar")).unwrap();
        registry.submit_move(&done, "Foo", "rock").unwrap();
        registry.submit_move(&done, "Bar", "rock").unwrap();

        assert_eq!(registry.evict_finished(Duration::from_secs(3600)), 0);
        assert_eq!(registry.evict_finished(Duration::ZERO), 1);

        assert!(registry.get_game(&open).is_ok());
        assert!(matches!(
            registry.get_game(&done),
            Err(GameError::GameNotFound(_))
        ));
    }

    #[test]
    fn test_clear() {
        let registry = GameRegistry::new();
        let id = registry.create_game().to_string();
        registry.clear();
        assert!(registry.is_empty());
        assert!(registry.get_game(&id).is_err());
    }
}
