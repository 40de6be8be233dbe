use crate::error::{AppError, Result};
use crate::extract::{ClientAddr, TimezoneHint};
use crate::model::Envelope;
use crate::state::AppState;
use axum::extract::multipart::{Field, MultipartError, MultipartRejection};
use axum::extract::rejection::QueryRejection;
use axum::extract::{Multipart, Query, State};
use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderMap, StatusCode};
use axum::response::Response;
use serde::Deserialize;
use tracing::debug;
use veil_uploader::{CreateContext, FilePart, UploadForm};

#[derive(Debug, Default, Deserialize)]
pub struct CreateParams {
    #[serde(default)]
    transport: Option<String>,
}

pub async fn create_handler(
    State(state): State<AppState>,
    ClientAddr(client_addr): ClientAddr,
    TimezoneHint(timezone): TimezoneHint,
    params: std::result::Result<Query<CreateParams>, QueryRejection>,
    headers: HeaderMap,
    multipart: std::result::Result<Multipart, MultipartRejection>,
) -> Result<Response> {
    if !is_multipart(&headers) {
        return Err(AppError::UnsupportedMediaType);
    }
    let multipart = multipart.map_err(|e| AppError::InvalidFormData(e.body_text()))?;
    let form = read_form(multipart).await?;

    let params = params.map(|Query(p)| p).unwrap_or_default();
    let context = CreateContext {
        client_addr,
        timezone,
        transport: params.transport.as_deref() == Some("true"),
    };

    let outcome = state.create.create(form, context).await?;
    Ok(Envelope::respond(StatusCode::OK, outcome))
}

fn is_multipart(headers: &HeaderMap) -> bool {
    headers
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.to_ascii_lowercase().starts_with("multipart/form-data"))
}

/// Collects the multipart fields into an [`UploadForm`].
///
/// A `data` part that carries a filename is a file; every other part is read
/// as text.
async fn read_form(mut multipart: Multipart) -> Result<UploadForm> {
    let mut form = UploadForm::default();

    while let Some(field) = multipart.next_field().await.map_err(form_error)? {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };

        if name == "data" && field.file_name().is_some() {
            form.insert_file(read_file(field).await?);
        } else {
            let value = field.text().await.map_err(form_error)?;
            form.insert_text(&name, value);
        }
    }

    Ok(form)
}

async fn read_file(field: Field<'_>) -> Result<FilePart> {
    let file_name = field.file_name().map(str::to_string);
    let content_type = field.content_type().map(str::to_string);
    let bytes = field.bytes().await.map_err(form_error)?;
    debug!(file_name = ?file_name, size = bytes.len(), "received file part");

    Ok(FilePart {
        file_name,
        content_type,
        bytes,
    })
}

fn form_error(err: MultipartError) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge
    } else {
        AppError::InvalidFormData(err.body_text())
    }
}
