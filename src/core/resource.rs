//! Remote data held by a screen: loading, loaded, or failed with a message.

use std::future::Future;

use crate::error::ApiError;

#[derive(Debug, Clone, PartialEq)]
pub enum ResourceState<T> {
    Loading,
    Ready(T),
    Failed(String),
}

/// One fetched value plus the dependency key it was fetched for.
///
/// A screen calls [`load`](Resource::load) on entry and again whenever its
/// key (route parameter, session token) changes; [`ensure`](Resource::ensure)
/// skips the request while the key is unchanged.
#[derive(Debug, Clone)]
pub struct Resource<K, T> {
    key: Option<K>,
    state: ResourceState<T>,
}

impl<K, T> Default for Resource<K, T> {
    fn default() -> Self {
        Self {
            key: None,
            state: ResourceState::Loading,
        }
    }
}

impl<K: PartialEq, T> Resource<K, T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &ResourceState<T> {
        &self.state
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.state, ResourceState::Loading)
    }

    pub fn data(&self) -> Option<&T> {
        match &self.state {
            ResourceState::Ready(value) => Some(value),
            _ => None,
        }
    }

    /// Mutable access for patching after a confirmed mutation
    pub fn data_mut(&mut self) -> Option<&mut T> {
        match &mut self.state {
            ResourceState::Ready(value) => Some(value),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match &self.state {
            ResourceState::Failed(message) => Some(message),
            _ => None,
        }
    }

    pub fn key(&self) -> Option<&K> {
        self.key.as_ref()
    }

    pub fn is_stale(&self, key: &K) -> bool {
        self.key.as_ref() != Some(key)
    }

    /// Enter `Loading` for `key`, await `fetch`, and settle. The error is
    /// handed back so the screen can react (e.g. end the session on 401).
    pub async fn load<F>(&mut self, key: K, fetch: F) -> Result<(), ApiError>
    where
        F: Future<Output = Result<T, ApiError>>,
    {
        self.key = Some(key);
        self.state = ResourceState::Loading;

        match fetch.await {
            Ok(value) => {
                self.state = ResourceState::Ready(value);
                Ok(())
            }
            Err(err) => {
                self.state = ResourceState::Failed(err.to_string());
                Err(err)
            }
        }
    }

    pub async fn ensure<F>(&mut self, key: K, fetch: F) -> Result<(), ApiError>
    where
        F: Future<Output = Result<T, ApiError>>,
    {
        if !self.is_stale(&key) && !matches!(self.state, ResourceState::Failed(_)) {
            return Ok(());
        }
        self.load(key, fetch).await
    }

    /// Replace the current message, keeping the key. Used when the screen
    /// words a failure differently from the gateway.
    pub fn fail(&mut self, message: impl Into<String>) {
        self.state = ResourceState::Failed(message.into());
    }

    /// Settle as failed without fetching (a precondition such as a missing
    /// session or route parameter was not met).
    pub fn reject(&mut self, key: K, message: impl Into<String>) {
        self.key = Some(key);
        self.state = ResourceState::Failed(message.into());
    }
}
