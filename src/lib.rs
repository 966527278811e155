//! Client library for the Good Job board: the employer and talent portals.
//!
//! Both portals share one shape: a [`SessionStore`] holding the bearer token and
//! identity, an [`ApiClient`] with one gateway method per backend endpoint, and
//! screens that drive those calls and keep their own loading/error state.

pub mod cli;
pub mod core;
pub mod environment;
pub mod error;
mod logging;
pub mod render;
pub mod resume_validator;
pub mod router;
pub mod screens;
pub mod types;
pub mod utils;

pub use crate::core::{ApiClient, ConfigManager, Resource, ResourceState, SessionStore, ToastQueue};
pub use error::{ApiError, ErrorKind, ValidationError};
pub use types::portal::Portal;
