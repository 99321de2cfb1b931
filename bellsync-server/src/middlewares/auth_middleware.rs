use std::sync::Arc;

use axum::body::Body;
use axum::extract::State;
use axum::http::{Request, StatusCode, header};
use axum::middleware::Next;
use axum::response::IntoResponse;
use axum_extra::headers::authorization::Bearer;
use axum_extra::headers::{Authorization, Header};

use crate::services::TokenService;

#[derive(Clone)]
pub struct TokenState {
    pub token_service: Arc<TokenService>,
}

/// Gate for every owner-only route: a missing, malformed, stale or expired
/// bearer token is a plain 401.
pub async fn auth(
    State(state): State<TokenState>,
    req: Request<Body>,
    next: Next,
) -> Result<impl IntoResponse, StatusCode> {
    let mut headers = req.headers().get_all(header::AUTHORIZATION).iter();

    let header: Authorization<Bearer> =
        Authorization::decode(&mut headers).map_err(|_| StatusCode::UNAUTHORIZED)?;

    if !state.token_service.validate(header.token()) {
        return Err(StatusCode::UNAUTHORIZED);
    }

    Ok(next.run(req).await)
}
