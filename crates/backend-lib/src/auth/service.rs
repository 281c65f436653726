use async_trait::async_trait;
use userservice_common::{LoginRequest, SignupRequest};

use super::{Authenticated, Claims};
use crate::error::AppError;
use crate::models::User;

/// The sign-in and registration workflows.
///
/// Requests reach these methods already validated by the HTTP layer.
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Check credentials and issue a token.
    ///
    /// Unknown usernames and wrong passwords both fail with
    /// `AppError::InvalidCredentials`.
    async fn sign_in(&self, request: LoginRequest) -> Result<Authenticated, AppError>;

    /// Create a new account. Does not sign the user in.
    async fn register(&self, request: SignupRequest) -> Result<User, AppError>;

    /// Check a bearer token presented on a later request
    fn verify_token(&self, token: &str) -> Result<Claims, AppError>;
}
