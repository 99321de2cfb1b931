use axum::http::StatusCode;
use bellsync_api::models::ScheduleParseError;

#[derive(Debug, thiserror::Error)]
pub enum ScheduleError {
    #[error("Unrecognized day key: {0}")]
    UnknownDay(String),

    #[error("Invalid ring time: {0}")]
    InvalidTime(String),
}

impl ScheduleError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ScheduleError::UnknownDay(_) => StatusCode::BAD_REQUEST,
            ScheduleError::InvalidTime(_) => StatusCode::BAD_REQUEST,
        }
    }
}

impl From<ScheduleParseError> for ScheduleError {
    fn from(error: ScheduleParseError) -> Self {
        match error {
            ScheduleParseError::UnknownDay(day) => ScheduleError::UnknownDay(day),
            ScheduleParseError::InvalidTime(time) => ScheduleError::InvalidTime(time),
        }
    }
}
