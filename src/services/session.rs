use std::sync::Arc;

use crate::{
    models::{session::DEFAULT_ADDRESS, SessionState},
    storage::{persist, KeyValueStore, StorageKey},
};

/// Owns the shopper's score, streak and delivery address
///
/// Each mutation is written through to the store before returning.
pub struct SessionManager {
    store: Arc<dyn KeyValueStore>,
    state: SessionState,
}

impl SessionManager {
    /// Reconstructs state from storage; absent or unparsable values fall back
    /// to the defaults
    pub fn load(store: Arc<dyn KeyValueStore>) -> Self {
        let score = read_counter(store.as_ref(), StorageKey::Points);
        let streak = read_counter(store.as_ref(), StorageKey::Streak);
        let address = read(store.as_ref(), StorageKey::Address)
            .filter(|a| !a.is_empty())
            .unwrap_or_else(|| DEFAULT_ADDRESS.to_string());

        tracing::debug!(score, streak, "Loaded session state");

        Self {
            store,
            state: SessionState {
                score,
                streak,
                address,
            },
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// +10 points and +1 streak
    pub fn record_success(&mut self) -> SessionState {
        self.state.record_success();
        persist(
            self.store.as_ref(),
            StorageKey::Points,
            &self.state.score.to_string(),
        );
        persist(
            self.store.as_ref(),
            StorageKey::Streak,
            &self.state.streak.to_string(),
        );

        tracing::info!(
            score = self.state.score,
            streak = self.state.streak,
            "Recorded successful analysis"
        );

        self.state.clone()
    }

    /// Stores the address as typed, blank included
    pub fn set_address(&mut self, address: impl Into<String>) -> SessionState {
        self.state.address = address.into();
        persist(self.store.as_ref(), StorageKey::Address, &self.state.address);
        self.state.clone()
    }
}

fn read(store: &dyn KeyValueStore, key: StorageKey) -> Option<String> {
    match store.get(key) {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!(key = %key, error = %e, "Failed to read local state");
            None
        }
    }
}

fn read_counter(store: &dyn KeyValueStore, key: StorageKey) -> u64 {
    let Some(raw) = read(store, key) else {
        return 0;
    };
    raw.trim().parse().unwrap_or_else(|_| {
        tracing::warn!(key = %key, value = %raw, "Ignoring unparsable counter");
        0
    })
}
