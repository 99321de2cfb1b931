use std::sync::Arc;

use anyhow::anyhow;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router, middleware};
use bellsync_api::models::{ChangePasswordRequest, LoginRequest, TokenResponse};

use crate::errors::{ApiError, AuthError};
use crate::middlewares::{TokenState, auth};
use crate::repositories::CredentialRepository;
use crate::services::{AuthService, TokenService};

#[derive(Clone)]
pub struct AuthState {
    pub auth_service: Arc<AuthService>,
    pub token_service: Arc<TokenService>,
    pub credential_repository: Arc<CredentialRepository>,
}

pub fn auth_router(auth_state: AuthState, token_state: TokenState) -> Router {
    Router::new()
        .route("/completeLogin", post(complete_login))
        .route(
            "/auth",
            get(verify_session)
                .route_layer(middleware::from_fn_with_state(token_state.clone(), auth)),
        )
        .route(
            "/logout",
            post(logout).route_layer(middleware::from_fn_with_state(token_state.clone(), auth)),
        )
        .route(
            "/finalizePassword",
            post(finalize_password)
                .route_layer(middleware::from_fn_with_state(token_state.clone(), auth)),
        )
        .with_state(auth_state)
}

#[utoipa::path(
    post,
    path = "/completeLogin",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful, return session token", body = TokenResponse),
        (status = 401, description = "Invalid password"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn complete_login(
    State(state): State<AuthState>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<TokenResponse>, ApiError> {
    let credential = state
        .credential_repository
        .get()
        .await?
        .ok_or_else(|| anyhow!("no device credential provisioned"))?;

    let valid = state
        .auth_service
        .verify(&credential.password_hash, &body.password)
        .map_err(|e| anyhow!("Failed to verify password: {}", e))?;

    if !valid {
        return Err(AuthError::InvalidPassword.into());
    }

    let issued = state.token_service.issue();

    Ok(Json(TokenResponse {
        token: issued.token,
    }))
}

#[utoipa::path(
    get,
    path = "/auth",
    tag = "auth",
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Session token is valid"),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn verify_session() -> &'static str {
    // the auth middleware already validated the token
    "Authorized"
}

#[utoipa::path(
    post,
    path = "/logout",
    tag = "auth",
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Session token revoked"),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn logout(State(state): State<AuthState>) -> StatusCode {
    state.token_service.revoke();

    StatusCode::OK
}

#[utoipa::path(
    post,
    path = "/finalizePassword",
    tag = "auth",
    security(
        ("bearer_auth" = [])
    ),
    request_body = ChangePasswordRequest,
    responses(
        (status = 200, description = "Password changed, all sessions revoked"),
        (status = 400, description = "New password fails the length policy"),
        (status = 401, description = "Old password does not verify"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn finalize_password(
    State(state): State<AuthState>,
    Json(body): Json<ChangePasswordRequest>,
) -> Result<&'static str, ApiError> {
    let credential = state
        .credential_repository
        .get()
        .await?
        .ok_or_else(|| anyhow!("no device credential provisioned"))?;

    let valid = state
        .auth_service
        .verify(&credential.password_hash, &body.old_password)
        .map_err(|e| anyhow!("Failed to verify password: {}", e))?;

    if !valid {
        return Err(AuthError::InvalidPassword.into());
    }

    if !state.auth_service.meets_policy(&body.new_password) {
        return Err(AuthError::WeakPassword.into());
    }

    let hash = state
        .auth_service
        .hash(&body.new_password)
        .map_err(|e| anyhow!("Failed to hash password: {}", e))?;

    state.credential_repository.upsert(&hash).await?;

    // force a fresh login with the new password
    state.token_service.revoke();

    Ok("Password changed successfully.")
}
