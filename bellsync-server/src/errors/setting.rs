use axum::http::StatusCode;

#[derive(Debug, thiserror::Error)]
pub enum SettingError {
    #[error("Device name must be 1-64 characters")]
    InvalidDeviceName,

    #[error("Network identifier may only contain letters, digits, hyphens and underscores")]
    InvalidUniqueUrl,

    #[error("Ring duration must be between 1 and 60 seconds")]
    InvalidRingDuration,

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl SettingError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            SettingError::InvalidDeviceName => StatusCode::BAD_REQUEST,
            SettingError::InvalidUniqueUrl => StatusCode::BAD_REQUEST,
            SettingError::InvalidRingDuration => StatusCode::BAD_REQUEST,
            SettingError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}
