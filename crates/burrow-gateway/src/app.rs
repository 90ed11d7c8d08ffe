use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::handlers::{
    create_url_handler, health_handler, redirect_handler, shorten_raw_handler, usage_handler,
};
use crate::state::AppState;
use crate::telemetry::RequestSpan;

pub struct App {}

impl App {
    pub fn router(state: AppState) -> Router {
        Router::new()
            .route("/", get(usage_handler).post(shorten_raw_handler))
            .route("/health", get(health_handler))
            .nest(
                "/api/v1",
                Router::new().route("/urls", post(create_url_handler)),
            )
            .route("/{code}", get(redirect_handler))
            .layer(TraceLayer::new_for_http().make_span_with(RequestSpan))
            .with_state(state)
    }
}
