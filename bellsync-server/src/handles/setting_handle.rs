use std::sync::Arc;

use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router, middleware};
use bellsync_api::models::{SaveSettingsResponse, SettingsBody};

use crate::errors::ApiError;
use crate::middlewares::{TokenState, auth};
use crate::services::{MessageService, SettingsService};

#[derive(Clone)]
pub struct SettingState {
    pub settings_service: Arc<SettingsService>,
    pub message_service: Arc<MessageService>,
    pub mac_address: String,
}

pub fn setting_router(setting_state: SettingState, token_state: TokenState) -> Router {
    Router::new()
        .route("/getSettings", get(get_settings))
        .route("/saveSettings", post(save_settings))
        .route("/getMacAddress", get(get_mac_address))
        .route_layer(middleware::from_fn_with_state(token_state, auth))
        .with_state(setting_state)
}

#[utoipa::path(
    get,
    path = "/getSettings",
    tag = "settings",
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Current device settings", body = SettingsBody),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn get_settings(State(state): State<SettingState>) -> Json<SettingsBody> {
    let settings = state.settings_service.get();

    Json(SettingsBody {
        device_name: settings.device_name,
        unique_url: settings.unique_url,
        ring_duration: settings.ring_duration_secs,
    })
}

#[utoipa::path(
    post,
    path = "/saveSettings",
    tag = "settings",
    security(
        ("bearer_auth" = [])
    ),
    request_body = SettingsBody,
    responses(
        (status = 200, description = "Settings saved", body = SaveSettingsResponse),
        (status = 400, description = "Invalid device name, network identifier or ring duration"),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn save_settings(
    State(state): State<SettingState>,
    Json(body): Json<SettingsBody>,
) -> Result<Json<SaveSettingsResponse>, ApiError> {
    let restart_required = state.settings_service.save(&body).await?;

    let message = if restart_required {
        state.message_service.push(format!(
            "Network identifier changed to {}; restart required to re-bind",
            body.unique_url
        ));
        String::from("Settings saved, device restart required to apply the new network identifier")
    } else {
        String::from("Settings saved successfully.")
    };

    Ok(Json(SaveSettingsResponse {
        message,
        restart_required,
    }))
}

#[utoipa::path(
    get,
    path = "/getMacAddress",
    tag = "settings",
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "MAC address of the device network interface", body = String),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn get_mac_address(State(state): State<SettingState>) -> String {
    state.mac_address.clone()
}
