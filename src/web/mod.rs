//! Public website: event list, calendar, event pages and the submission form.

pub mod handlers;
pub mod templates;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use rust_i18n::t;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};
use tracing::error;

use crate::config::Config;
use crate::cosmic::EventStore;
use crate::error::Error;
use handlers::{
    api_submit_handler, event_handler, fallback_handler, health_handler, index_handler,
    submit_form_handler, submit_handler,
};

/// Directory served under `/assets`
pub const ASSETS_DIR: &str = "assets";

#[derive(Clone)]
pub struct AppState {
    /// Site configuration
    pub config: Arc<Config>,
    /// Where events are read from and submissions written to
    pub store: Arc<dyn EventStore>,
}

impl AppState {
    pub fn new(config: Arc<Config>, store: Arc<dyn EventStore>) -> Self {
        Self { config, store }
    }
}

/// Build the router with all routes and middleware
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route("/events/{slug}", get(event_handler))
        .route("/submit", get(submit_form_handler).post(submit_handler))
        .route("/api/submit-event", post(api_submit_handler))
        .route("/health", get(health_handler))
        // Serve static files
        .nest_service("/assets", ServeDir::new(ASSETS_DIR))
        .fallback(fallback_handler)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = match &self {
            Error::Validation(_) => StatusCode::BAD_REQUEST,
            Error::Cosmic(_) | Error::CosmicStatus { .. } => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        error!("Request failed with {}: {}", status, self);

        (status, t!("error_page").to_string()).into_response()
    }
}
