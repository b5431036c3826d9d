//! Service info and liveness handlers.
//!
//! Endpoints:
//! - GET /       - Service banner with the active storage backend
//! - GET /health - Liveness probe

use axum::Json;
use axum::extract::State;
use serde::Serialize;

use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct RootResponse {
    pub message: &'static str,
    pub memory_enabled: bool,
    pub storage: &'static str,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    /// True when conversations live in object storage.
    pub use_azure: bool,
}

/// GET /
pub async fn root(State(state): State<AppState>) -> Json<RootResponse> {
    Json(RootResponse {
        message: "AI Digital Twin API",
        memory_enabled: true,
        storage: if state.storage.is_object_storage() {
            "Blob"
        } else {
            "local"
        },
    })
}

/// GET /health
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        use_azure: state.storage.is_object_storage(),
    })
}
