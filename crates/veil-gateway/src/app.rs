use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use veil_core::limits::MAX_PAYLOAD_SIZE;

use crate::handlers::{
    create_handler, delete_handler, health_handler, home_handler, method_not_allowed, not_found,
    raw_handler, render_handler,
};
use crate::state::AppState;

/// Room for multipart boundaries and the text fields next to the payload.
const MULTIPART_OVERHEAD: usize = 1024 * 1024;

pub struct App {}

impl App {
    pub fn router(state: AppState, cors: CorsLayer) -> Router {
        Router::new()
            .route(
                "/api/create",
                post(create_handler)
                    .layer(DefaultBodyLimit::max(MAX_PAYLOAD_SIZE + MULTIPART_OVERHEAD))
                    .fallback(method_not_allowed),
            )
            .route(
                "/api/delete",
                post(delete_handler).fallback(method_not_allowed),
            )
            .route(
                "/raw/{code}",
                get(raw_handler).fallback(method_not_allowed),
            )
            .route("/health", get(health_handler).fallback(method_not_allowed))
            .route("/", get(home_handler).fallback(method_not_allowed))
            .route(
                "/{code}",
                get(render_handler).fallback(method_not_allowed),
            )
            .fallback(not_found)
            .layer(
                ServiceBuilder::new()
                    .layer(TraceLayer::new_for_http())
                    .layer(cors),
            )
            .with_state(state)
    }
}
