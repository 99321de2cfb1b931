use axum::http::StatusCode;

#[derive(Debug, thiserror::Error)]
pub enum RelayError {
    #[error("No serial port found for the relay line")]
    NoPort,

    #[error("Relay line is not connected")]
    NotConnected,

    #[error("Incomplete write to the relay line")]
    IncompleteWrite,

    #[error("Serial error: {0}")]
    Serial(#[from] serialport::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl RelayError {
    pub fn status_code(&self) -> StatusCode {
        StatusCode::INTERNAL_SERVER_ERROR
    }
}
