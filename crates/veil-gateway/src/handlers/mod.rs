mod create;
mod delete;
mod health;
mod raw;
mod render;

pub use create::create_handler;
pub use delete::delete_handler;
pub use health::health_handler;
pub use raw::raw_handler;
pub use render::{home_handler, render_handler};

use crate::error::AppError;
use crate::model::{Envelope, MessageData};
use axum::http::header::LOCATION;
use axum::http::{HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use tracing::error;
use veil_viewer::ViewError;

pub async fn method_not_allowed() -> AppError {
    AppError::MethodNotAllowed
}

pub async fn not_found() -> AppError {
    AppError::View(ViewError::NotFound)
}

/// A 308 to a stored target. Targets that cannot be carried in a header are
/// reported as a server error instead of panicking.
fn permanent_redirect(target: &str) -> Response {
    match HeaderValue::try_from(target) {
        Ok(location) => (StatusCode::PERMANENT_REDIRECT, [(LOCATION, location)]).into_response(),
        Err(e) => {
            error!(error = %e, "redirect target is not a valid header value");
            Envelope::<MessageData>::message(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error",
            )
        }
    }
}
