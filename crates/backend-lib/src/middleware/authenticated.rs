//! Bearer token extraction for routes that need a signed-in caller.
use std::collections::BTreeSet;
use std::sync::Arc;

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};

use crate::auth::Claims;
use crate::error::AppError;
use crate::models::RoleName;
use crate::AppState;

/// Caller identity taken from a valid `Authorization: Bearer` header.
///
/// Using this as a handler argument rejects the request with 401 when the
/// header is missing or the token is malformed, expired or badly signed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub id: i64,
    pub username: String,
    pub roles: BTreeSet<RoleName>,
}

impl AuthenticatedUser {
    pub fn has_role(&self, role: RoleName) -> bool {
        self.roles.contains(&role)
    }
}

impl TryFrom<Claims> for AuthenticatedUser {
    type Error = AppError;

    fn try_from(claims: Claims) -> Result<Self, Self::Error> {
        let id = claims
            .sub
            .parse()
            .map_err(|_| AppError::InvalidToken("subject is not a user id".to_string()))?;
        Ok(Self {
            id,
            username: claims.username,
            roles: claims.roles.into_iter().collect(),
        })
    }
}

/// Pull the token out of an `Authorization` header value
pub fn bearer_token(header: &str) -> Option<&str> {
    let (scheme, token) = header.split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}

impl FromRequestParts<Arc<AppState>> for AuthenticatedUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(bearer_token)
            .ok_or_else(|| AppError::InvalidToken("missing bearer token".to_string()))?;

        let claims = state.auth.verify_token(token)?;
        Self::try_from(claims)
    }
}
