use std::sync::Arc;

use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router, middleware};
use bellsync_api::models::{ScheduleEntries, WeeklySchedule};

use crate::errors::{ApiError, ScheduleError};
use crate::middlewares::{TokenState, auth};
use crate::services::ScheduleService;

#[derive(Clone)]
pub struct ScheduleState {
    pub schedule_service: Arc<ScheduleService>,
}

/// Both schedule routes require a token. Some dashboard revisions fetched
/// the schedule publicly; the template reveals occupancy patterns, so the
/// authenticated policy wins.
pub fn schedule_router(schedule_state: ScheduleState, token_state: TokenState) -> Router {
    Router::new()
        .route("/getSchedule", get(get_schedule))
        .route("/updateSchedule", post(update_schedule))
        .route_layer(middleware::from_fn_with_state(token_state, auth))
        .with_state(schedule_state)
}

#[utoipa::path(
    get,
    path = "/getSchedule",
    tag = "schedule",
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "The weekly template, times sorted and de-duplicated", body = ScheduleEntries),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn get_schedule(State(state): State<ScheduleState>) -> Json<ScheduleEntries> {
    Json(state.schedule_service.snapshot().to_entries())
}

#[utoipa::path(
    post,
    path = "/updateSchedule",
    tag = "schedule",
    security(
        ("bearer_auth" = [])
    ),
    request_body = ScheduleEntries,
    responses(
        (status = 200, description = "Template replaced and the engine re-armed"),
        (status = 400, description = "Unrecognized day key or malformed time; the stored template is untouched"),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn update_schedule(
    State(state): State<ScheduleState>,
    Json(entries): Json<ScheduleEntries>,
) -> Result<&'static str, ApiError> {
    let schedule = WeeklySchedule::from_entries(&entries).map_err(ScheduleError::from)?;

    state.schedule_service.replace(schedule).await?;

    Ok("Schedule saved successfully")
}
