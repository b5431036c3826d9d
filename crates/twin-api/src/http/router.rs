//! Axum router configuration with middleware.
//!
//! Routes live at the root path. Middleware: CORS, tracing, panic catching.

use anyhow::Context;
use axum::Router;
use axum::http::HeaderValue;
use axum::routing::{get, post};
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::http::error::panic_response;
use crate::http::handlers;
use crate::state::AppState;

/// CORS policy for the configured origins, with credentials allowed.
///
/// A `*` entry mirrors the caller's origin, since a literal wildcard cannot
/// be combined with credentials.
pub fn cors_layer(origins: &[String]) -> anyhow::Result<CorsLayer> {
    let allow_origin = if origins.iter().any(|o| o == "*") {
        AllowOrigin::mirror_request()
    } else {
        let values = origins
            .iter()
            .map(|o| {
                HeaderValue::from_str(o).with_context(|| format!("invalid CORS origin '{o}'"))
            })
            .collect::<anyhow::Result<Vec<_>>>()?;
        AllowOrigin::list(values)
    };

    Ok(CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_credentials(true)
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request()))
}

/// Build the complete API router with all routes and middleware.
pub fn build_router(state: AppState, cors: CorsLayer) -> Router {
    Router::new()
        .route("/", get(handlers::root::root))
        .route("/health", get(handlers::root::health))
        .route("/chat", post(handlers::chat::chat))
        .route(
            "/conversation/{session_id}",
            get(handlers::conversation::get_conversation),
        )
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
