use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::domain::ProbeResult;

/// Everything that can end a `/check` request without a remote status.
#[derive(Debug, thiserror::Error)]
pub enum CheckError {
    #[error("{0}")]
    InvalidInput(String),

    #[error("Cannot check this server's status")]
    ForbiddenTarget,

    #[error("{0}")]
    TransportTimeout(String),

    #[error("{0}")]
    Transport(String),
}

impl CheckError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            CheckError::InvalidInput(_) | CheckError::ForbiddenTarget => StatusCode::BAD_REQUEST,
            CheckError::TransportTimeout(_) | CheckError::Transport(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for CheckError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ProbeResult::new(status.as_u16(), self.to_string());
        (status, Json(body)).into_response()
    }
}
