use axum::{
    Json,
    response::{IntoResponse, Response},
};
use serde::Serialize;

/// Outcome of one `/check` request, as sent to the browser.
///
/// `status` is either the remote server's status code or the 400/500
/// sentinel of a local failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProbeResult {
    pub status: u16,
    pub message: String,
}

impl ProbeResult {
    pub fn new(status: u16, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }
}

/// A completed probe is always a 200, even when the remote status is not.
impl IntoResponse for ProbeResult {
    fn into_response(self) -> Response {
        Json(self).into_response()
    }
}
