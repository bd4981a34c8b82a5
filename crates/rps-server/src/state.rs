//! Application state management.

use rps_core::GameRegistry;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

/// Shared application state
#[derive(Clone, Default)]
pub struct AppState {
    registry: Arc<GameRegistry>,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve an existing registry (used by tests to inspect it afterwards)
    pub fn with_registry(registry: Arc<GameRegistry>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &GameRegistry {
        &self.registry
    }

    /// Periodically drop games that finished more than `ttl` ago
    pub fn spawn_eviction(&self, ttl: Duration, every: Duration) -> JoinHandle<()> {
        let registry = Arc::clone(&self.registry);
        tracing::info!(?ttl, ?every, "Finished-game eviction enabled");

        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(every);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                registry.evict_finished(ttl);
            }
        })
    }
}
