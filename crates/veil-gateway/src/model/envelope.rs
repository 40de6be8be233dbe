use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

/// The body shape shared by every JSON response.
#[derive(Debug, Serialize)]
pub struct Envelope<T> {
    pub success: bool,
    pub data: T,
}

#[derive(Debug, Serialize)]
pub struct MessageData {
    pub message: String,
}

impl<T: Serialize> Envelope<T> {
    /// Wraps `data` and answers with `status`; `success` follows the status.
    pub fn respond(status: StatusCode, data: T) -> Response {
        let success = matches!(status, StatusCode::OK | StatusCode::CREATED);
        (status, Json(Envelope { success, data })).into_response()
    }
}

impl Envelope<MessageData> {
    pub fn message(status: StatusCode, message: impl Into<String>) -> Response {
        Self::respond(
            status,
            MessageData {
                message: message.into(),
            },
        )
    }
}
