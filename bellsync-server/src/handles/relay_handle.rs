use std::sync::Arc;

use axum::extract::State;
use axum::routing::get;
use axum::{Router, middleware};

use crate::errors::ApiError;
use crate::middlewares::{TokenState, auth};
use crate::services::{MessageService, RelayService, SettingsService};

#[derive(Clone)]
pub struct RelayState {
    pub relay_service: Arc<RelayService>,
    pub settings_service: Arc<SettingsService>,
    pub message_service: Arc<MessageService>,
}

pub fn relay_router(relay_state: RelayState, token_state: TokenState) -> Router {
    Router::new()
        .route(
            "/ToggleRelay",
            get(toggle_relay).route_layer(middleware::from_fn_with_state(token_state, auth)),
        )
        .with_state(relay_state)
}

#[utoipa::path(
    get,
    path = "/ToggleRelay",
    tag = "relay",
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Relay pulsed for the configured ring duration"),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Hardware fault")
    )
)]
pub async fn toggle_relay(State(state): State<RelayState>) -> Result<&'static str, ApiError> {
    let duration = state.settings_service.ring_duration();

    // waits behind a scheduled ring already in progress
    match state.relay_service.pulse(duration).await {
        Ok(()) => {
            state.message_service.push("Manual ring test completed");
            Ok("Relay toggle successful")
        }
        Err(e) => {
            state
                .message_service
                .push(format!("Manual ring test failed: {e}"));
            Err(e.into())
        }
    }
}
