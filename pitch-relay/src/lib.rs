//! pitch-relay library
//!
//! HTTP relay between browser clients and the Basic Pitch service.
//! Stateless: each request is parsed, forwarded and answered on its own.

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::Router;
use pitch_common::api::RELAY_PATH;
use tower_http::trace::TraceLayer;

pub mod api;
pub mod config;
pub mod error;
pub mod service;

pub use crate::config::RelayConfig;
pub use crate::error::{RelayError, RelayResult};
pub use crate::service::PitchService;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Resolved configuration (read-only)
    pub config: Arc<RelayConfig>,
    /// Pitch service client
    pub service: PitchService,
}

impl AppState {
    /// Create application state from resolved configuration
    pub fn new(config: RelayConfig) -> RelayResult<Self> {
        let service = PitchService::new(config.service_endpoint())?;
        Ok(Self {
            config: Arc::new(config),
            service,
        })
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    use axum::routing::any;

    let body_limit = state.config.max_upload_bytes;

    let router = Router::new()
        .route(RELAY_PATH, any(api::extract_pitch))
        .merge(api::health_routes())
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state);

    api::with_cors_headers(router).layer(TraceLayer::new_for_http())
}
