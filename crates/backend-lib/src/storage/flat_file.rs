//! Flat-file credential store.
//!
//! The whole store lives in one JSON document under the data directory. Every
//! write goes to a temporary file that is then renamed over the document, so a
//! crash mid-write leaves the previous version intact.
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::{fs as tokio_fs, sync::Mutex};

use super::{CredentialStore, Tables};
use crate::error::AppError;
use crate::models::{NewUser, Role, RoleName, User};

/// File name of the store document inside the data directory
pub const STORE_FILE: &str = "credentials.json";

/// Flat-file implementation of the `CredentialStore` trait
#[derive(Clone)]
pub struct FlatFileStorage {
    path: PathBuf,
    tables: Arc<Mutex<Tables>>,
}

impl FlatFileStorage {
    /// Open the store under `root`, creating the directory if needed
    pub async fn open<P: AsRef<Path>>(root: P) -> Result<Self, AppError> {
        let root = root.as_ref();
        tokio_fs::create_dir_all(root).await?;

        let path = root.join(STORE_FILE);
        let tables = if tokio_fs::try_exists(&path).await? {
            let content = tokio_fs::read_to_string(&path).await?;
            serde_json::from_str(&content)?
        } else {
            Tables::default()
        };

        tracing::debug!(path = %path.display(), "opened credential store");
        Ok(Self {
            path,
            tables: Arc::new(Mutex::new(tables)),
        })
    }

    /// Path of the backing document
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Insert missing role rows and persist; returns how many were added
    pub async fn seed_roles(&self) -> Result<usize, AppError> {
        let mut tables = self.tables.lock().await;
        let mut next = tables.clone();
        let added = next.seed_roles();
        if added > 0 {
            self.persist(&next).await?;
            *tables = next;
        }
        Ok(added)
    }

    /// Number of stored users
    pub async fn user_count(&self) -> usize {
        self.tables.lock().await.user_count()
    }

    async fn persist(&self, tables: &Tables) -> Result<(), AppError> {
        let json = serde_json::to_string_pretty(tables)?;
        let tmp = self.path.with_extension("json.tmp");
        tokio_fs::write(&tmp, json).await?;
        tokio_fs::rename(&tmp, &self.path).await?;
        Ok(())
    }
}

#[async_trait]
impl CredentialStore for FlatFileStorage {
    async fn exists_by_username(&self, username: &str) -> Result<bool, AppError> {
        Ok(self.tables.lock().await.exists_by_username(username))
    }

    async fn exists_by_email(&self, email: &str) -> Result<bool, AppError> {
        Ok(self.tables.lock().await.exists_by_email(email))
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, AppError> {
        self.tables.lock().await.find_by_username(username)
    }

    async fn save(&self, user: NewUser) -> Result<User, AppError> {
        // Held across the write so that inserts are serialized and the file
        // always matches memory.
        let mut tables = self.tables.lock().await;
        let mut next = tables.clone();
        let saved = next.insert_user(user)?;
        self.persist(&next).await?;
        *tables = next;
        Ok(saved)
    }

    async fn find_role_by_name(&self, name: RoleName) -> Result<Option<Role>, AppError> {
        Ok(self.tables.lock().await.find_role_by_name(name))
    }
}
