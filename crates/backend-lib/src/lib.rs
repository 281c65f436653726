// ============================
// userservice-lib/src/lib.rs
// ============================
//! Core of the user service: sign-in and registration over HTTP, backed by a
//! credential store of users and roles.

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod models;
pub mod router;
pub mod storage;
pub mod validation;

use std::sync::Arc;

use crate::auth::{AuthService, DefaultAuth, TokenIssuer};
use crate::config::Settings;
use crate::storage::CredentialStore;

pub use crate::router::create_router;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    /// Sign-in and registration workflows
    pub auth: Arc<dyn AuthService>,
    /// Settings the service was started with
    pub settings: Arc<Settings>,
}

impl AppState {
    /// Wire the workflows to a store
    pub fn new<S: CredentialStore + 'static>(storage: S, settings: Settings) -> Self {
        let tokens = Arc::new(TokenIssuer::new(&settings.jwt));
        let auth = Arc::new(DefaultAuth::new(
            storage,
            tokens,
            settings.password_hash,
            settings.max_concurrent_hashes,
        ));

        Self {
            auth,
            settings: Arc::new(settings),
        }
    }
}
