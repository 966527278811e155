// src/core/toast.rs
//! Transient notifications for the talent portal

use serde::Serialize;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use uuid::Uuid;

use crate::app_log;

/// How long a toast stays up unless dismissed
pub const TOAST_TTL: Duration = Duration::from_millis(4000);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ToastKind {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Toast {
    pub id: String,
    pub message: String,
    pub kind: ToastKind,
}

/// Insertion-ordered toasts. Clones share the same queue, which is how the
/// expiry tasks reach it.
#[derive(Debug, Clone, Default)]
pub struct ToastQueue {
    toasts: Arc<Mutex<Vec<Toast>>>,
}

impl ToastQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a toast and schedule its removal after [`TOAST_TTL`].
    ///
    /// Outside a tokio runtime nothing can be scheduled; the toast then stays
    /// until [`hide`](Self::hide) is called.
    pub fn show(&self, message: impl Into<String>, kind: ToastKind) -> String {
        let toast = Toast {
            id: Uuid::new_v4().to_string(),
            message: message.into(),
            kind,
        };
        let id = toast.id.clone();
        self.lock().push(toast);

        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                let queue = self.clone();
                let expiring = id.clone();
                handle.spawn(async move {
                    tokio::time::sleep(TOAST_TTL).await;
                    queue.hide(&expiring);
                });
            }
            Err(_) => app_log!(warn, "No runtime to expire toast {}", id),
        }

        id
    }

    pub fn success(&self, message: impl Into<String>) -> String {
        self.show(message, ToastKind::Success)
    }

    pub fn error(&self, message: impl Into<String>) -> String {
        self.show(message, ToastKind::Error)
    }

    /// Remove by id. Returns whether the toast was still showing.
    pub fn hide(&self, id: &str) -> bool {
        let mut toasts = self.lock();
        let before = toasts.len();
        toasts.retain(|toast| toast.id != id);
        toasts.len() != before
    }

    /// Snapshot in insertion order
    pub fn toasts(&self) -> Vec<Toast> {
        self.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Toast>> {
        self.toasts.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
