use crate::model::{Envelope, MessageData};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;
use tracing::error;
use veil_uploader::{CreateError, DeletionError};
use veil_viewer::ViewError;

pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("method not allowed")]
    MethodNotAllowed,
    /// The create endpoint only accepts multipart bodies.
    #[error("unsupported media type")]
    UnsupportedMediaType,
    #[error("invalid content type")]
    InvalidContentType,
    #[error("invalid form data: {0}")]
    InvalidFormData(String),
    #[error("payload too large")]
    PayloadTooLarge,
    #[error("invalid json body: {0}")]
    InvalidJson(String),
    #[error(transparent)]
    Create(#[from] CreateError),
    #[error(transparent)]
    Deletion(#[from] DeletionError),
    #[error(transparent)]
    View(#[from] ViewError),
}

impl AppError {
    fn status_and_message(&self) -> (StatusCode, &'static str) {
        match self {
            AppError::MethodNotAllowed => (StatusCode::METHOD_NOT_ALLOWED, "Invalid method"),
            AppError::UnsupportedMediaType => {
                (StatusCode::UNSUPPORTED_MEDIA_TYPE, "Invalid content type")
            }
            AppError::InvalidContentType => (StatusCode::BAD_REQUEST, "Invalid content type"),
            AppError::InvalidFormData(_) => (StatusCode::BAD_REQUEST, "Invalid form data"),
            AppError::PayloadTooLarge => (StatusCode::PAYLOAD_TOO_LARGE, "Payload too large"),
            AppError::InvalidJson(_) => (StatusCode::BAD_REQUEST, "Invalid JSON body"),
            AppError::Create(e) => match e {
                CreateError::MissingParameters => (StatusCode::FORBIDDEN, "Missing parameters"),
                CreateError::InvalidTtl(_) => (
                    StatusCode::FORBIDDEN,
                    "Invalid TTL (make sure it's greater than 60 seconds)",
                ),
                CreateError::InvalidUrl(_) => (StatusCode::BAD_REQUEST, "Invalid url"),
                CreateError::InvalidFile(_) => (StatusCode::BAD_REQUEST, "Invalid file"),
                CreateError::UnsupportedType(_) => (
                    StatusCode::UNSUPPORTED_MEDIA_TYPE,
                    "Invalid data type (must be url or file)",
                ),
                CreateError::InvalidDomains(_) => (StatusCode::BAD_REQUEST, "Invalid domains"),
                CreateError::MissingClientAddress => {
                    (StatusCode::BAD_REQUEST, "Invalid client address")
                }
                CreateError::Storage(_) => internal(),
            },
            AppError::Deletion(e) => match e {
                DeletionError::MalformedCodes => {
                    (StatusCode::FORBIDDEN, "Invalid deletion or data code")
                }
                DeletionError::Rejected => (StatusCode::FORBIDDEN, "Invalid deletion code"),
                DeletionError::Storage(_) => internal(),
            },
            AppError::View(e) => match e {
                ViewError::InvalidFileCode(_) => (StatusCode::BAD_REQUEST, "Invalid file code"),
                ViewError::InvalidDataCode(_) => (StatusCode::BAD_REQUEST, "Invalid data code"),
                ViewError::NotFound => (StatusCode::NOT_FOUND, "Data not found"),
                ViewError::Storage(_) => internal(),
            },
        }
    }
}

fn internal() -> (StatusCode, &'static str) {
    (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = self.status_and_message();
        if status.is_server_error() {
            error!(error = %self, "request failed");
        }
        Envelope::<MessageData>::message(status, message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use veil_core::StorageError;

    #[test]
    fn storage_failures_hide_details() {
        let err = AppError::from(ViewError::Storage(StorageError::Timeout(
            "redis at 10.0.0.3 timed out".to_string(),
        )));
        assert_eq!(
            err.status_and_message(),
            (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
        );
    }

    #[test]
    fn client_errors_map_to_their_status() {
        let cases = [
            (AppError::from(CreateError::MissingParameters), StatusCode::FORBIDDEN),
            (
                AppError::from(CreateError::InvalidTtl("5".to_string())),
                StatusCode::FORBIDDEN,
            ),
            (
                AppError::from(CreateError::UnsupportedType("img".to_string())),
                StatusCode::UNSUPPORTED_MEDIA_TYPE,
            ),
            (AppError::from(DeletionError::Rejected), StatusCode::FORBIDDEN),
            (AppError::from(ViewError::NotFound), StatusCode::NOT_FOUND),
            (AppError::MethodNotAllowed, StatusCode::METHOD_NOT_ALLOWED),
        ];
        for (err, status) in cases {
            assert_eq!(err.status_and_message().0, status, "{err}");
        }
    }
}
