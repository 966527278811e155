// src/core/mod.rs
//! Core services shared by both portals

pub mod api_client;
pub mod config_manager;
pub mod resource;
pub mod session;
pub mod storage;
pub mod toast;

pub use api_client::ApiClient;
pub use config_manager::ConfigManager;
pub use resource::{Resource, ResourceState};
pub use session::{Credentials, SessionStore};
pub use storage::{FileStorage, MemoryStorage, SessionStorage};
pub use toast::{Toast, ToastKind, ToastQueue};
