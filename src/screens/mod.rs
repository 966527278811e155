// src/screens/mod.rs
//! Screen state for both portals.
//!
//! Screens own their loading/error state and receive the gateway, the session
//! store and (talent side) the toast queue as arguments on every call.

pub mod auth;
pub mod employer;
pub mod pdf_preview;
pub mod talent;

pub use auth::{AuthForm, AuthMode};
pub use pdf_preview::PdfPreview;

use crate::app_log;
use crate::core::SessionStore;
use crate::error::{ApiError, ValidationError};

pub const SESSION_EXPIRED: &str = "Session expired. Please log in again.";

/// Message to show for a failed call. A rejected token ends the session and
/// is reported as `expired` instead of the server's wording.
pub fn surface_error(err: &ApiError, session: &mut SessionStore, expired: &str) -> String {
    if err.is_unauthorized() {
        if let Err(e) = session.logout() {
            app_log!(warn, "Failed to clear rejected session: {:#}", e);
        }
        return expired.to_string();
    }
    err.to_string()
}

pub(crate) fn required(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::Required { field });
    }
    Ok(())
}

/// Token of the current session, or a validation error carrying `message`
pub(crate) fn bearer(session: &SessionStore, message: &str) -> Result<String, ApiError> {
    session
        .token()
        .map(str::to_string)
        .ok_or_else(|| ValidationError::Invalid(message.to_string()).into())
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::core::MemoryStorage;
    use crate::types::{Portal, User};
    use serde_json::json;
    use std::collections::BTreeMap;

    pub(crate) fn user(portal: Portal, name: &str) -> User {
        serde_json::from_value(json!({
            "id": 11,
            "name": name,
            "email": "user@example.test",
            "type": portal.account_type().as_str(),
            "created_at": "2024-03-01T09:00:00Z",
            "updated_at": "2024-03-01T09:00:00Z"
        }))
        .unwrap()
    }

    pub(crate) fn signed_in(portal: Portal) -> SessionStore {
        let mut session = SessionStore::new(portal, MemoryStorage::new());
        session.login(user(portal, "Sam"), "tok".into()).unwrap();
        session
    }

    #[test]
    fn unauthorized_ends_the_session() {
        let mut session = signed_in(Portal::Talent);
        let err = ApiError::Unauthorized {
            message: "Unauthenticated.".into(),
        };

        let message = surface_error(&err, &mut session, SESSION_EXPIRED);
        assert_eq!(message, SESSION_EXPIRED);
        assert!(!session.is_authenticated());
    }

    #[test]
    fn other_failures_keep_the_session() {
        let mut session = signed_in(Portal::Employer);
        let err = ApiError::Server {
            status: 500,
            message: "Failed to fetch job postings".into(),
            field_errors: BTreeMap::new(),
        };

        assert_eq!(
            surface_error(&err, &mut session, SESSION_EXPIRED),
            "Failed to fetch job postings"
        );
        assert!(session.is_authenticated());
    }
}
