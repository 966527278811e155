// src/screens/auth.rs
use anyhow::Result;

use super::required;
use crate::app_log;
use crate::core::{ApiClient, SessionStore};
use crate::error::{ApiError, ValidationError};
use crate::types::{LoginRequest, RegisterRequest};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMode {
    Login,
    Register,
}

/// Login or registration form. The account type sent on registration comes
/// from the session's portal.
#[derive(Debug, Clone)]
pub struct AuthForm {
    pub mode: AuthMode,
    pub name: String,
    pub email: String,
    pub password: String,
    pub password_confirmation: String,
    error: Option<String>,
}

impl AuthForm {
    pub fn login(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            mode: AuthMode::Login,
            name: String::new(),
            email: email.into(),
            password: password.into(),
            password_confirmation: String::new(),
            error: None,
        }
    }

    pub fn register(
        name: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
        password_confirmation: impl Into<String>,
    ) -> Self {
        Self {
            mode: AuthMode::Register,
            name: name.into(),
            email: email.into(),
            password: password.into(),
            password_confirmation: password_confirmation.into(),
            error: None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.mode == AuthMode::Register {
            required("Name", &self.name)?;
        }
        required("Email", &self.email)?;
        required("Password", &self.password)?;
        if self.mode == AuthMode::Register {
            required("Password confirmation", &self.password_confirmation)?;
        }
        Ok(())
    }

    /// Authenticate and, on success, replace the session wholesale.
    pub async fn submit(&mut self, api: &ApiClient, session: &mut SessionStore) -> Result<()> {
        self.error = None;

        let outcome = match self.validate() {
            Err(e) => Err(ApiError::from(e)),
            Ok(()) => match self.mode {
                AuthMode::Login => {
                    let request = LoginRequest {
                        email: self.email.trim().to_string(),
                        password: self.password.clone(),
                    };
                    api.login(&request).await
                }
                AuthMode::Register => {
                    let request = RegisterRequest {
                        name: self.name.trim().to_string(),
                        email: self.email.trim().to_string(),
                        password: self.password.clone(),
                        password_confirmation: self.password_confirmation.clone(),
                        account_type: session.portal().account_type(),
                    };
                    api.register(&request).await
                }
            },
        };

        match outcome {
            Ok(auth) => {
                app_log!(info, "{:?} succeeded for {}", self.mode, auth.user.email);
                session.login(auth.user, auth.token)?;
                Ok(())
            }
            Err(err) => {
                self.error = Some(err.to_string());
                Err(err.into())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::MemoryStorage;
    use crate::types::Portal;

    #[test]
    fn register_requires_name_and_confirmation() {
        let form = AuthForm::register("", "a@b.test", "secret", "secret");
        assert_eq!(form.validate(), Err(ValidationError::Required { field: "Name" }));

        let form = AuthForm::register("Acme", "a@b.test", "secret", " ");
        assert_eq!(
            form.validate(),
            Err(ValidationError::Required {
                field: "Password confirmation"
            })
        );

        assert!(AuthForm::login("a@b.test", "secret").validate().is_ok());
    }

    #[tokio::test]
    async fn invalid_form_never_reaches_the_network() {
        // Nothing listens here; a request would surface as a transport error.
        let api = ApiClient::new("http://127.0.0.1:9/api", None).unwrap();
        let mut session = SessionStore::new(Portal::Employer, MemoryStorage::new());
        let mut form = AuthForm::login("", "secret");

        let err = form.submit(&api, &mut session).await.unwrap_err();
        let api_err = err.downcast_ref::<ApiError>().unwrap();
        assert_eq!(api_err.kind(), crate::error::ErrorKind::Validation);
        assert_eq!(form.error(), Some("Email is required"));
        assert!(!session.is_authenticated());
    }
}
