// ============================
// crates/backend-lib/src/handlers/auth.rs
// ============================
//! HTTP handlers for `/api/auth`.
use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use userservice_common::{
    JwtResponse, LoginRequest, MessageResponse, ProfileResponse, SignupRequest, BEARER,
};

use crate::auth::Authenticated;
use crate::error::AppError;
use crate::middleware::AuthenticatedUser;
use crate::validation;
use crate::AppState;

/// Message returned after a successful registration
pub const REGISTRATION_SUCCESSFUL: &str = "Registration Successful";

/// Turn a body rejection into the uniform error body
fn body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, AppError> {
    payload
        .map(|Json(value)| value)
        .map_err(|rejection| AppError::InvalidInput(rejection.body_text()))
}

/// `POST /api/auth/signin`
pub async fn signin(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<JwtResponse>, AppError> {
    let request = body(payload)?;
    validation::validate_login(&request)?;

    let Authenticated { token, principal } = state.auth.sign_in(request).await?;
    let roles = principal.authorities();

    Ok(Json(JwtResponse {
        token,
        token_type: BEARER.to_string(),
        id: principal.id,
        username: principal.username,
        email: principal.email,
        roles,
    }))
}

/// `POST /api/auth/register`
pub async fn register(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<SignupRequest>, JsonRejection>,
) -> Result<Json<MessageResponse>, AppError> {
    let request = body(payload)?;
    validation::validate_signup(&request, &state.settings.password_requirements)?;

    state.auth.register(request).await?;
    Ok(Json(MessageResponse::new(REGISTRATION_SUCCESSFUL)))
}

/// `GET /api/auth/me`
pub async fn me(user: AuthenticatedUser) -> Json<ProfileResponse> {
    let roles = user.roles.iter().map(|role| role.as_str().to_string()).collect();
    Json(ProfileResponse {
        id: user.id,
        username: user.username,
        roles,
    })
}
