// ================
// common/src/lib.rs
// ================
//! Request and response bodies exchanged between clients and the user service.
//! Field names follow the JSON wire format of the `/api/auth` endpoints.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Token type reported alongside every issued token
pub const BEARER: &str = "Bearer";

/// Body of `POST /api/auth/signin`
#[derive(Deserialize, Serialize, Clone)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Body of `POST /api/auth/register`
///
/// `role` is optional; when absent or empty the user gets the basic role.
#[derive(Deserialize, Serialize, Clone)]
pub struct SignupRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<BTreeSet<String>>,
}

/// Successful sign-in response
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct JwtResponse {
    pub token: String,
    #[serde(rename = "type")]
    pub token_type: String,
    pub id: i64,
    pub username: String,
    pub email: String,
    pub roles: Vec<String>,
}

/// Plain message body, used for registration results and errors
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Identity carried by a bearer token, as returned from `GET /api/auth/me`
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ProfileResponse {
    pub id: i64,
    pub username: String,
    pub roles: Vec<String>,
}

// Credentials must never end up in logs through a derived Debug.
impl std::fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginRequest")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

impl std::fmt::Debug for SignupRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignupRequest")
            .field("username", &self.username)
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .field("role", &self.role)
            .finish()
    }
}
