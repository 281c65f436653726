// ============================
// crates/backend-lib/src/auth/token.rs
// ============================
//! Signed, time-bound bearer tokens (HS256 JWT).
use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Principal;
use crate::config::JwtSettings;
use crate::error::AppError;
use crate::models::RoleName;

/// Claims carried by every issued token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// User id
    pub sub: String,
    pub username: String,
    pub roles: Vec<RoleName>,
    /// Issued at, seconds since the epoch
    pub iat: i64,
    /// Expiry, seconds since the epoch
    pub exp: i64,
    /// Unique token id
    pub jti: String,
}

/// Issues and checks tokens with a shared HMAC secret
pub struct TokenIssuer {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    ttl_secs: i64,
}

impl TokenIssuer {
    pub fn new(settings: &JwtSettings) -> Self {
        Self {
            encoding: EncodingKey::from_secret(settings.secret.as_bytes()),
            decoding: DecodingKey::from_secret(settings.secret.as_bytes()),
            validation: Validation::default(),
            ttl_secs: i64::try_from(settings.expiration_secs).unwrap_or(i64::MAX),
        }
    }

    /// Issue a token for an authenticated principal
    pub fn issue(&self, principal: &Principal) -> Result<String, AppError> {
        let iat = Utc::now().timestamp();
        let claims = Claims {
            sub: principal.id.to_string(),
            username: principal.username.clone(),
            roles: principal.roles.iter().copied().collect(),
            iat,
            exp: iat.saturating_add(self.ttl_secs),
            jti: Uuid::new_v4().to_string(),
        };
        self.encode(&claims)
    }

    /// Sign arbitrary claims
    pub fn encode(&self, claims: &Claims) -> Result<String, AppError> {
        Ok(encode(&Header::default(), claims, &self.encoding)?)
    }

    /// Check signature and expiry and return the claims
    pub fn verify(&self, token: &str) -> Result<Claims, AppError> {
        decode::<Claims>(token, &self.decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| AppError::InvalidToken(e.to_string()))
    }
}
