use std::sync::Arc;

use axum::Json;
use axum::Router;
use axum::extract::State;
use axum::routing::get;

use crate::services::{Clock, MessageService, ScheduleService};

#[derive(Clone)]
pub struct StatusState {
    pub schedule_service: Arc<ScheduleService>,
    pub message_service: Arc<MessageService>,
    pub clock: Arc<dyn Clock>,
}

/// Unauthenticated dashboard conveniences.
pub fn status_router(status_state: StatusState) -> Router {
    Router::new()
        .route("/getTodayRemainingRingTimes", get(today_remaining_ring_times))
        .route("/getServerMessages", get(server_messages))
        .with_state(status_state)
}

#[utoipa::path(
    get,
    path = "/getTodayRemainingRingTimes",
    tag = "status",
    responses(
        (status = 200, description = "Comma-separated HH:MM times still ahead today", body = String)
    )
)]
pub async fn today_remaining_ring_times(State(state): State<StatusState>) -> String {
    let remaining = state.schedule_service.remaining_today(state.clock.now());

    if remaining.is_empty() {
        // the dashboard renders this string verbatim
        String::from("No more rings today")
    } else {
        remaining
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(",")
    }
}

#[utoipa::path(
    get,
    path = "/getServerMessages",
    tag = "status",
    responses(
        (status = 200, description = "Recent device status messages, oldest first", body = Vec<String>)
    )
)]
pub async fn server_messages(State(state): State<StatusState>) -> Json<Vec<String>> {
    Json(state.message_service.recent())
}
