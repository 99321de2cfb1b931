use super::{AuthError, RelayError, ScheduleError, SettingError};

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Authentication error: {0}")]
    AuthError(#[from] AuthError),

    #[error("Schedule error: {0}")]
    ScheduleError(#[from] ScheduleError),

    #[error("Setting error: {0}")]
    SettingError(#[from] SettingError),

    #[error("Relay error: {0}")]
    RelayError(#[from] RelayError),

    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),

    #[error("Internal error: {0}")]
    InternalError(#[from] anyhow::Error),
}
