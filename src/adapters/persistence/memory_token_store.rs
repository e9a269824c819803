use std::collections::HashMap;
use std::sync::Mutex;

use secrecy::ExposeSecret;

use crate::app_error::AppResult;
use crate::application::ports::token_store::{ROLE_KEY, TOKEN_KEY, TokenStore, USERNAME_KEY};
use crate::entities::credential::Credential;

/// Process-local token store. All three keys are written under one lock.
#[derive(Default)]
pub struct InMemoryTokenStore {
    values: Mutex<HashMap<&'static str, String>>,
}

impl InMemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_credential(credential: &Credential) -> Self {
        let store = Self::new();
        store.write_all(credential);
        store
    }

    /// Remove a single key, leaving the store partially populated.
    pub fn remove_key(&self, key: &str) {
        self.values
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .remove(key);
    }

    fn write_all(&self, credential: &Credential) {
        let mut values = self.values.lock().unwrap_or_else(|p| p.into_inner());
        values.insert(TOKEN_KEY, credential.token.expose_secret().to_string());
        values.insert(USERNAME_KEY, credential.subject.clone());
        values.insert(ROLE_KEY, credential.role.clone());
    }
}

impl TokenStore for InMemoryTokenStore {
    fn save(&self, credential: &Credential) -> AppResult<()> {
        self.write_all(credential);
        Ok(())
    }

    fn read(&self) -> Option<Credential> {
        let values = self.values.lock().unwrap_or_else(|p| p.into_inner());
        Credential::from_parts(
            values.get(TOKEN_KEY).cloned(),
            values.get(USERNAME_KEY).cloned(),
            values.get(ROLE_KEY).cloned(),
        )
    }

    fn clear(&self) -> AppResult<()> {
        self.values.lock().unwrap_or_else(|p| p.into_inner()).clear();
        Ok(())
    }
}
