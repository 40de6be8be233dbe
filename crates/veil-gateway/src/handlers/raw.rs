use super::permanent_redirect;
use crate::error::Result;
use crate::extract::ClientAddr;
use crate::state::AppState;
use axum::extract::{Path, State};
use axum::http::header::{CACHE_CONTROL, CONTENT_TYPE};
use axum::response::{IntoResponse, Response};
use veil_viewer::RawContent;

const CACHE_FOREVER: &str = "max-age=31536000";

pub async fn raw_handler(
    State(state): State<AppState>,
    Path(code): Path<String>,
    ClientAddr(client_addr): ClientAddr,
) -> Result<Response> {
    let response = match state.raw.fetch(&code, client_addr).await? {
        RawContent::Redirect(target) => permanent_redirect(&target),
        RawContent::Bytes { content_type, body } => (
            [
                (CONTENT_TYPE, content_type),
                (CACHE_CONTROL, CACHE_FOREVER.to_string()),
            ],
            body,
        )
            .into_response(),
    };
    Ok(response)
}
