// ============================
// userservice-lib/src/storage/mod.rs
// ============================
//! Credential store abstraction with in-memory and flat-file implementations.
//!
//! Both backends keep the same two tables (roles and users, users referencing
//! roles by id) and funnel every insert through [`Tables::insert_user`], which
//! is the authoritative uniqueness check. Callers may pre-check with
//! `exists_by_*`, but a racing duplicate still fails inside `save`.
use std::collections::BTreeSet;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::models::{NewUser, Role, RoleName, User};

mod flat_file;
mod memory;

pub use flat_file::FlatFileStorage;
pub use memory::MemoryStore;

/// Trait for credential storage backends
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Whether any user has this username
    async fn exists_by_username(&self, username: &str) -> Result<bool, AppError>;

    /// Whether any user has this email
    async fn exists_by_email(&self, email: &str) -> Result<bool, AppError>;

    /// Look up a user with its password hash and roles
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, AppError>;

    /// Insert a new user.
    ///
    /// Fails with `DuplicateUsername` / `DuplicateEmail` when another user
    /// already holds either value, regardless of earlier existence checks.
    async fn save(&self, user: NewUser) -> Result<User, AppError>;

    /// Look up a role row by name
    async fn find_role_by_name(&self, name: RoleName) -> Result<Option<Role>, AppError>;
}

#[async_trait]
impl<T: CredentialStore + ?Sized> CredentialStore for Arc<T> {
    async fn exists_by_username(&self, username: &str) -> Result<bool, AppError> {
        (**self).exists_by_username(username).await
    }

    async fn exists_by_email(&self, email: &str) -> Result<bool, AppError> {
        (**self).exists_by_email(email).await
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, AppError> {
        (**self).find_by_username(username).await
    }

    async fn save(&self, user: NewUser) -> Result<User, AppError> {
        (**self).save(user).await
    }

    async fn find_role_by_name(&self, name: RoleName) -> Result<Option<Role>, AppError> {
        (**self).find_role_by_name(name).await
    }
}

/// Persisted user row; roles are referenced by id like a join table.
#[derive(Serialize, Deserialize, Debug, Clone)]
struct UserRow {
    id: i64,
    username: String,
    email: String,
    password_hash: String,
    role_ids: BTreeSet<i32>,
}

/// The role and user tables shared by both backends
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub(crate) struct Tables {
    #[serde(default)]
    roles: Vec<Role>,
    #[serde(default)]
    users: Vec<UserRow>,
}

impl Tables {
    fn exists_by_username(&self, username: &str) -> bool {
        self.users.iter().any(|row| row.username == username)
    }

    fn exists_by_email(&self, email: &str) -> bool {
        self.users.iter().any(|row| row.email == email)
    }

    fn find_role_by_name(&self, name: RoleName) -> Option<Role> {
        self.roles.iter().copied().find(|role| role.name == name)
    }

    fn find_by_username(&self, username: &str) -> Result<Option<User>, AppError> {
        let Some(row) = self.users.iter().find(|row| row.username == username) else {
            return Ok(None);
        };

        let roles = row
            .role_ids
            .iter()
            .map(|id| {
                self.roles
                    .iter()
                    .copied()
                    .find(|role| role.id == *id)
                    .ok_or_else(|| {
                        AppError::Internal(format!("user {} references unknown role id {id}", row.id))
                    })
            })
            .collect::<Result<BTreeSet<_>, _>>()?;

        Ok(Some(User {
            id: row.id,
            username: row.username.clone(),
            email: row.email.clone(),
            password_hash: row.password_hash.clone(),
            roles,
        }))
    }

    /// Insert a user after checking every table constraint
    fn insert_user(&mut self, user: NewUser) -> Result<User, AppError> {
        if self.exists_by_username(&user.username) {
            return Err(AppError::DuplicateUsername);
        }
        if self.exists_by_email(&user.email) {
            return Err(AppError::DuplicateEmail);
        }
        if user.roles.is_empty() {
            return Err(AppError::Internal(
                "a user must hold at least one role".to_string(),
            ));
        }
        for role in &user.roles {
            if !self.roles.contains(role) {
                return Err(AppError::RoleNotFound(role.name));
            }
        }

        let id = self.users.iter().map(|row| row.id).max().unwrap_or(0) + 1;
        self.users.push(UserRow {
            id,
            username: user.username.clone(),
            email: user.email.clone(),
            password_hash: user.password_hash.clone(),
            role_ids: user.roles.iter().map(|role| role.id).collect(),
        });

        Ok(User {
            id,
            username: user.username,
            email: user.email,
            password_hash: user.password_hash,
            roles: user.roles,
        })
    }

    /// Insert any missing role rows; returns how many were added
    fn seed_roles(&mut self) -> usize {
        let mut added = 0;
        for name in RoleName::ALL {
            if self.find_role_by_name(name).is_none() {
                let id = self.roles.iter().map(|role| role.id).max().unwrap_or(0) + 1;
                self.roles.push(Role { id, name });
                added += 1;
            }
        }
        added
    }

    fn user_count(&self) -> usize {
        self.users.len()
    }
}
