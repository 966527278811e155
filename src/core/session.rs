// src/core/session.rs
//! Session store: the bearer token and identity of the signed-in user.
//!
//! Token and identity live together in [`Credentials`], so they are set and
//! cleared as one. Only [`SessionStore::hydrate`], [`SessionStore::login`] and
//! [`SessionStore::logout`] mutate the store, and each writes through to
//! storage before returning.

use anyhow::{Context, Result};

use crate::app_log;
use crate::core::storage::SessionStorage;
use crate::types::{Portal, User};

#[derive(Debug, Clone, PartialEq)]
pub struct Credentials {
    pub token: String,
    pub user: User,
}

pub struct SessionStore {
    portal: Portal,
    storage: Box<dyn SessionStorage>,
    credentials: Option<Credentials>,
}

impl SessionStore {
    /// Unauthenticated store over `storage`. Call [`hydrate`](Self::hydrate)
    /// to pick up a persisted session.
    pub fn new(portal: Portal, storage: impl SessionStorage + 'static) -> Self {
        Self {
            portal,
            storage: Box::new(storage),
            credentials: None,
        }
    }

    /// Create and hydrate in one step
    pub fn open(portal: Portal, storage: impl SessionStorage + 'static) -> Result<Self> {
        let mut store = Self::new(portal, storage);
        store.hydrate()?;
        Ok(store)
    }

    /// Load the persisted pair. Anything short of a token plus a parsable
    /// identity clears both, in memory and in storage.
    pub fn hydrate(&mut self) -> Result<bool> {
        self.credentials = None;

        let token = self.storage.get(self.portal.token_key())?;
        let raw_user = self.storage.get(self.portal.identity_key())?;

        let restored = match (token, raw_user) {
            (Some(token), Some(raw_user)) if !token.is_empty() => {
                match serde_json::from_str::<User>(&raw_user) {
                    Ok(user) => Some(Credentials { token, user }),
                    Err(e) => {
                        app_log!(warn, "Discarding unparsable {} identity: {}", self.portal, e);
                        None
                    }
                }
            }
            _ => None,
        };

        match restored {
            Some(credentials) => {
                app_log!(
                    info,
                    "Restored {} session for {}",
                    self.portal,
                    credentials.user.email
                );
                self.credentials = Some(credentials);
                Ok(true)
            }
            None => {
                self.clear_storage()?;
                Ok(false)
            }
        }
    }

    /// Replace the session wholesale. Calling it again with the same values
    /// changes nothing.
    pub fn login(&mut self, user: User, token: String) -> Result<()> {
        if let Some(current) = &self.credentials {
            if current.token == token && current.user == user {
                return Ok(());
            }
        }

        let raw_user = serde_json::to_string(&user).context("Failed to serialize identity")?;

        if let Err(e) = self.persist(&token, &raw_user) {
            self.credentials = None;
            if let Err(cleanup) = self.clear_storage() {
                app_log!(warn, "Failed to roll back partial session write: {:#}", cleanup);
            }
            return Err(e);
        }

        app_log!(info, "Signed in to {} as {}", self.portal, user.email);
        self.credentials = Some(Credentials { token, user });
        Ok(())
    }

    /// Clear the session wholesale. Safe when already signed out.
    pub fn logout(&mut self) -> Result<()> {
        if let Some(credentials) = self.credentials.take() {
            app_log!(info, "Signed out {} from {}", credentials.user.email, self.portal);
        }
        self.clear_storage()
    }

    pub fn is_authenticated(&self) -> bool {
        self.credentials.is_some()
    }

    pub fn portal(&self) -> Portal {
        self.portal
    }

    pub fn token(&self) -> Option<&str> {
        self.credentials.as_ref().map(|c| c.token.as_str())
    }

    pub fn user(&self) -> Option<&User> {
        self.credentials.as_ref().map(|c| &c.user)
    }

    pub fn credentials(&self) -> Option<&Credentials> {
        self.credentials.as_ref()
    }

    /// Read-only view of the backing storage
    pub fn storage(&self) -> &dyn SessionStorage {
        self.storage.as_ref()
    }

    fn persist(&mut self, token: &str, raw_user: &str) -> Result<()> {
        self.storage
            .set(self.portal.token_key(), token)
            .context("Failed to persist session token")?;
        self.storage
            .set(self.portal.identity_key(), raw_user)
            .context("Failed to persist session identity")?;
        Ok(())
    }

    fn clear_storage(&mut self) -> Result<()> {
        let token = self.storage.remove(self.portal.token_key());
        let identity = self.storage.remove(self.portal.identity_key());
        token
            .and(identity)
            .context("Failed to clear persisted session")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::storage::{FileStorage, MemoryStorage};
    use serde_json::json;
    use tempfile::TempDir;

    fn user(name: &str) -> User {
        serde_json::from_value(json!({
            "id": 1,
            "name": name,
            "email": "jo@example.test",
            "type": "talent",
            "created_at": "2024-05-01T00:00:00Z",
            "updated_at": "2024-05-01T00:00:00Z"
        }))
        .unwrap()
    }

    fn persisted(store: &SessionStore, key: &str) -> Option<String> {
        store.storage().get(key).unwrap()
    }

    #[test]
    fn login_then_logout_round_trip() {
        let mut store = SessionStore::new(Portal::Talent, MemoryStorage::new());
        assert!(!store.is_authenticated());

        store.login(user("Jo"), "tok-1".into()).unwrap();
        assert!(store.is_authenticated());
        assert_eq!(store.token(), Some("tok-1"));
        assert_eq!(persisted(&store, "authToken").as_deref(), Some("tok-1"));
        assert!(persisted(&store, "authUser").is_some());

        store.logout().unwrap();
        assert!(!store.is_authenticated());
        assert!(store.user().is_none());
        assert_eq!(persisted(&store, "authToken"), None);
        assert_eq!(persisted(&store, "authUser"), None);
    }

    #[test]
    fn logout_when_signed_out_is_harmless() {
        let mut store = SessionStore::new(Portal::Employer, MemoryStorage::new());
        store.logout().unwrap();
        store.logout().unwrap();
        assert!(!store.is_authenticated());
    }

    #[test]
    fn login_twice_with_same_values_is_a_no_op() {
        let mut store = SessionStore::new(Portal::Talent, MemoryStorage::new());
        store.login(user("Jo"), "tok".into()).unwrap();
        let before = store.credentials().cloned();

        store.login(user("Jo"), "tok".into()).unwrap();
        assert_eq!(store.credentials().cloned(), before);
    }

    #[test]
    fn hydrate_with_only_token_clears_everything() {
        let storage = MemoryStorage::new().with_entry("token", "orphan");
        let store = SessionStore::open(Portal::Employer, storage).unwrap();

        assert!(!store.is_authenticated());
        assert!(store.token().is_none());
        assert!(store.user().is_none());
        assert_eq!(persisted(&store, "token"), None);
    }

    #[test]
    fn hydrate_with_only_identity_clears_everything() {
        let raw = serde_json::to_string(&user("Jo")).unwrap();
        let storage = MemoryStorage::new().with_entry("authUser", &raw);
        let store = SessionStore::open(Portal::Talent, storage).unwrap();

        assert!(!store.is_authenticated());
        assert_eq!(persisted(&store, "authUser"), None);
    }

    #[test]
    fn hydrate_with_corrupt_identity_clears_everything() {
        let storage = MemoryStorage::new()
            .with_entry("authToken", "tok")
            .with_entry("authUser", "{broken");
        let store = SessionStore::open(Portal::Talent, storage).unwrap();

        assert!(!store.is_authenticated());
        assert_eq!(persisted(&store, "authToken"), None);
    }

    #[test]
    fn hydrate_restores_a_persisted_session_from_disk() {
        let dir = TempDir::new().unwrap();
        {
            let mut store = SessionStore::new(
                Portal::Employer,
                FileStorage::for_portal(dir.path(), Portal::Employer),
            );
            store.login(user("Acme"), "tok-9".into()).unwrap();
        }

        let store = SessionStore::open(
            Portal::Employer,
            FileStorage::for_portal(dir.path(), Portal::Employer),
        )
        .unwrap();
        assert!(store.is_authenticated());
        assert_eq!(store.user().unwrap().name, "Acme");

        // The talent portal keeps its own keys and sees nothing.
        let other = SessionStore::open(
            Portal::Talent,
            FileStorage::for_portal(dir.path(), Portal::Talent),
        )
        .unwrap();
        assert!(!other.is_authenticated());
    }
}
