use crate::error::{AppError, Result};
use crate::model::{Envelope, MessageData};
use crate::state::AppState;
use axum::extract::State;
use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderMap, StatusCode};
use axum::response::Response;
use bytes::Bytes;
use veil_uploader::DeletionRequest;

pub async fn delete_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response> {
    let is_json = headers
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.to_ascii_lowercase().starts_with("application/json"));
    if !is_json {
        return Err(AppError::InvalidContentType);
    }

    let request: DeletionRequest =
        serde_json::from_slice(&body).map_err(|e| AppError::InvalidJson(e.to_string()))?;
    state.deletion.delete(request).await?;

    Ok(Envelope::<MessageData>::message(StatusCode::OK, "Data deleted"))
}
