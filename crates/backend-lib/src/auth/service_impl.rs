use std::sync::Arc;

use async_trait::async_trait;
use metrics::counter;
use tokio::sync::Semaphore;
use tracing::{info, instrument, warn};
use userservice_common::{LoginRequest, SignupRequest};
use zeroize::Zeroizing;

use super::{
    hash_password, resolve_roles, verify_password, AuthService, Authenticated, Claims, Principal,
    TokenIssuer,
};
use crate::config::HashSettings;
use crate::error::AppError;
use crate::metrics::{REGISTRATION_REJECTED, REGISTRATION_SUCCESS, SIGNIN_FAILURE, SIGNIN_SUCCESS};
use crate::models::{NewUser, User};
use crate::storage::CredentialStore;

/// `AuthService` backed by a credential store
pub struct DefaultAuth<S> {
    store: S,
    tokens: Arc<TokenIssuer>,
    hashing: HashSettings,
    hash_permits: Arc<Semaphore>,
}

impl<S: CredentialStore> DefaultAuth<S> {
    /// `max_concurrent_hashes` bounds how many scrypt runs (and their memory)
    /// can be in flight at once; callers beyond it wait for a permit.
    pub fn new(
        store: S,
        tokens: Arc<TokenIssuer>,
        hashing: HashSettings,
        max_concurrent_hashes: usize,
    ) -> Self {
        Self {
            store,
            tokens,
            hashing,
            hash_permits: Arc::new(Semaphore::new(max_concurrent_hashes.max(1))),
        }
    }

    /// Run scrypt work on the blocking pool once a permit is free
    async fn run_hashing<T, F>(&self, work: F) -> Result<T, AppError>
    where
        T: Send + 'static,
        F: FnOnce() -> T + Send + 'static,
    {
        let permit = self
            .hash_permits
            .clone()
            .acquire_owned()
            .await
            .map_err(|e| AppError::Internal(format!("hashing limiter closed: {e}")))?;

        let result = tokio::task::spawn_blocking(move || {
            let _permit = permit;
            work()
        })
        .await?;
        Ok(result)
    }

    fn reject_sign_in() -> AppError {
        counter!(SIGNIN_FAILURE).increment(1);
        warn!("sign-in rejected");
        AppError::InvalidCredentials
    }

    fn reject_registration(err: AppError) -> AppError {
        counter!(REGISTRATION_REJECTED).increment(1);
        warn!(error = %err, "registration rejected");
        err
    }
}

#[async_trait]
impl<S: CredentialStore + 'static> AuthService for DefaultAuth<S> {
    #[instrument(skip_all, fields(username = %request.username))]
    async fn sign_in(&self, request: LoginRequest) -> Result<Authenticated, AppError> {
        let LoginRequest { username, password } = request;
        let password = Zeroizing::new(password);

        let Some(user) = self.store.find_by_username(&username).await? else {
            // An unknown username costs one scrypt run, like a wrong password.
            let hashing = self.hashing;
            let _ = self
                .run_hashing(move || hash_password(&password, &hashing))
                .await?;
            return Err(Self::reject_sign_in());
        };

        let hash = user.password_hash.clone();
        let matches = self
            .run_hashing(move || verify_password(&hash, &password))
            .await?;
        if !matches {
            return Err(Self::reject_sign_in());
        }

        let principal = Principal::from(&user);
        let token = self.tokens.issue(&principal)?;

        counter!(SIGNIN_SUCCESS).increment(1);
        info!(user_id = principal.id, "sign-in succeeded");
        Ok(Authenticated { token, principal })
    }

    #[instrument(skip_all, fields(username = %request.username))]
    async fn register(&self, request: SignupRequest) -> Result<User, AppError> {
        if self.store.exists_by_username(&request.username).await? {
            return Err(Self::reject_registration(AppError::DuplicateUsername));
        }
        if self.store.exists_by_email(&request.email).await? {
            return Err(Self::reject_registration(AppError::DuplicateEmail));
        }

        let SignupRequest {
            username,
            email,
            password,
            role,
        } = request;
        let password = Zeroizing::new(password);
        let hashing = self.hashing;
        let password_hash = self
            .run_hashing(move || hash_password(&password, &hashing))
            .await??;

        let roles = resolve_roles(&self.store, role.as_ref()).await?;

        // The store re-checks uniqueness; a concurrent registration that won
        // the race surfaces here as a duplicate.
        let user = self
            .store
            .save(NewUser {
                username,
                email,
                password_hash,
                roles,
            })
            .await
            .map_err(|err| match err {
                AppError::DuplicateUsername | AppError::DuplicateEmail => {
                    Self::reject_registration(err)
                },
                other => other,
            })?;

        counter!(REGISTRATION_SUCCESS).increment(1);
        info!(user_id = user.id, roles = ?user.role_names(), "user registered");
        Ok(user)
    }

    fn verify_token(&self, token: &str) -> Result<Claims, AppError> {
        self.tokens.verify(token)
    }
}
