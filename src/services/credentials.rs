use std::sync::Arc;

use crate::{
    error::{AppError, AppResult},
    models::Credential,
    storage::{persist, KeyValueStore, StorageKey},
};

/// Holds the shopper-supplied API key
pub struct CredentialStore {
    store: Arc<dyn KeyValueStore>,
    current: Option<Credential>,
}

impl CredentialStore {
    /// Loads the persisted key, falling back to `seed` (usually from config)
    pub fn load(store: Arc<dyn KeyValueStore>, seed: Option<&str>) -> Self {
        let persisted = store.get(StorageKey::ApiKey).unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Failed to read stored API key");
            None
        });

        let current = persisted
            .or_else(|| seed.map(str::to_string))
            .map(Credential::new)
            .filter(|c| !c.is_blank());

        Self { store, current }
    }

    pub fn get(&self) -> Option<&Credential> {
        self.current.as_ref()
    }

    pub fn is_set(&self) -> bool {
        self.current.is_some()
    }

    pub fn set(&mut self, raw: &str) -> AppResult<()> {
        if raw.trim().is_empty() {
            return Err(AppError::InvalidInput("API key cannot be empty".to_string()));
        }

        let credential = Credential::new(raw);
        persist(self.store.as_ref(), StorageKey::ApiKey, credential.expose());
        self.current = Some(credential);
        tracing::info!("API key saved");
        Ok(())
    }

    pub fn clear(&mut self) {
        if let Err(e) = self.store.remove(StorageKey::ApiKey) {
            tracing::warn!(error = %e, "Failed to remove stored API key");
        }
        self.current = None;
    }
}
