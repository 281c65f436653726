//! In-process credential store.
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;

use super::{CredentialStore, Tables};
use crate::error::AppError;
use crate::models::{NewUser, Role, RoleName, User};

/// Credential store kept entirely in memory. Contents vanish with the process.
#[derive(Clone, Default)]
pub struct MemoryStore {
    tables: Arc<RwLock<Tables>>,
}

impl MemoryStore {
    /// Create an empty store with no roles
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store holding the three standard roles
    pub fn with_seeded_roles() -> Self {
        let store = Self::new();
        store.seed_roles();
        store
    }

    /// Insert missing role rows; returns how many were added
    pub fn seed_roles(&self) -> usize {
        self.tables.write().seed_roles()
    }

    /// Number of stored users
    pub fn user_count(&self) -> usize {
        self.tables.read().user_count()
    }
}

#[async_trait]
impl CredentialStore for MemoryStore {
    async fn exists_by_username(&self, username: &str) -> Result<bool, AppError> {
        Ok(self.tables.read().exists_by_username(username))
    }

    async fn exists_by_email(&self, email: &str) -> Result<bool, AppError> {
        Ok(self.tables.read().exists_by_email(email))
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, AppError> {
        self.tables.read().find_by_username(username)
    }

    async fn save(&self, user: NewUser) -> Result<User, AppError> {
        self.tables.write().insert_user(user)
    }

    async fn find_role_by_name(&self, name: RoleName) -> Result<Option<Role>, AppError> {
        Ok(self.tables.read().find_role_by_name(name))
    }
}
