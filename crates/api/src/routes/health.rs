//! Liveness endpoint for load balancers and container probes.

use axum::extract::State;
use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::state::AppState;

/// Body of `GET /health`.
///
/// The endpoint always answers 200; an unreachable database shows up as
/// `"degraded"` so the registry stays observable while Postgres is down.
#[derive(Serialize)]
pub struct HealthResponse {
    /// `"ok"` or `"degraded"`.
    pub status: &'static str,
    /// Version of the `registry-api` package.
    pub version: &'static str,
    /// Result of a `SELECT 1` round trip on the pool.
    pub db_healthy: bool,
}

impl HealthResponse {
    fn from_probe(db_healthy: bool) -> Self {
        Self {
            status: if db_healthy { "ok" } else { "degraded" },
            version: env!("CARGO_PKG_VERSION"),
            db_healthy,
        }
    }
}

async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let db_healthy = match registry_db::health_check(&state.pool).await {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!(error = %e, "Database unreachable from health check");
            false
        }
    };
    Json(HealthResponse::from_probe(db_healthy))
}

/// `GET /health`, mounted next to `/companies` at the root.
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health))
}
