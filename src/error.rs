// src/error.rs
//! Failure taxonomy for gateway calls and client-side form checks

use std::collections::BTreeMap;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The request never produced an HTTP response
    Transport,
    /// Non-success status; message from the server or the call's fallback
    Server,
    /// 401 on a bearer-authenticated call
    Unauthorized,
    /// Success status but the body did not match the expected shape
    Decode,
    /// Rejected before any request was made
    Validation,
}

/// Error returned by every gateway call. `Display` is the message a screen
/// shows to the user.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{message}")]
    Transport {
        message: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{message}")]
    Server {
        status: u16,
        message: String,
        field_errors: BTreeMap<String, Vec<String>>,
    },

    #[error("{message}")]
    Unauthorized { message: String },

    #[error("{message}")]
    Decode {
        message: String,
        #[source]
        source: serde_json::Error,
    },

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

impl ApiError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ApiError::Transport { .. } => ErrorKind::Transport,
            ApiError::Server { .. } => ErrorKind::Server,
            ApiError::Unauthorized { .. } => ErrorKind::Unauthorized,
            ApiError::Decode { .. } => ErrorKind::Decode,
            ApiError::Validation(_) => ErrorKind::Validation,
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Server { status, .. } => Some(*status),
            ApiError::Unauthorized { .. } => Some(401),
            _ => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Unauthorized { .. })
    }

    /// Per-field messages from a validation response (HTTP 422), if any
    pub fn field_errors(&self) -> Option<&BTreeMap<String, Vec<String>>> {
        match self {
            ApiError::Server { field_errors, .. } if !field_errors.is_empty() => Some(field_errors),
            _ => None,
        }
    }
}

/// Client-side form failure. Never reaches the network.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field} is required")]
    Required { field: &'static str },

    #[error("{field} must be a number")]
    NotANumber { field: &'static str },

    #[error("{0}")]
    Invalid(String),
}
