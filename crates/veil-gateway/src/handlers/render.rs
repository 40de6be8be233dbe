use super::permanent_redirect;
use crate::error::Result;
use crate::extract::ClientAddr;
use crate::state::AppState;
use axum::extract::rejection::QueryRejection;
use axum::extract::{Path, Query, State};
use axum::http::header::CONTENT_TYPE;
use axum::response::{Html, IntoResponse, Response};
use serde::Deserialize;
use veil_viewer::Rendered;

#[derive(Debug, Default, Deserialize)]
pub struct RenderParams {
    #[serde(default)]
    delete: Option<String>,
}

pub async fn render_handler(
    State(state): State<AppState>,
    Path(code): Path<String>,
    ClientAddr(client_addr): ClientAddr,
    params: std::result::Result<Query<RenderParams>, QueryRejection>,
) -> Result<Response> {
    let params = params.map(|Query(p)| p).unwrap_or_default();
    let rendered = state
        .render
        .render(&code, params.delete.as_deref(), client_addr)
        .await?;
    Ok(rendered_response(rendered))
}

pub async fn home_handler(State(state): State<AppState>) -> Result<Response> {
    let rendered = state.render.render("", None, None).await?;
    Ok(rendered_response(rendered))
}

fn rendered_response(rendered: Rendered) -> Response {
    match rendered {
        Rendered::Redirect(target) => permanent_redirect(&target),
        Rendered::Text(text) => {
            ([(CONTENT_TYPE, "text/plain; charset=utf-8")], text).into_response()
        }
        Rendered::Html(html) => Html(html).into_response(),
    }
}
