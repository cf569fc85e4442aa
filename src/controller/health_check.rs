use axum::{Extension, Json, Router};
use axum::routing::get;
use serde::Serialize;

#[derive(Clone, Serialize, Debug)]
pub struct HealthStatus {
    pub status: &'static str,
    pub environment: String,
}

pub fn router(environment: String) -> Router {
    Router::new()
        .route("/health", get(get_health_check))
        .route_layer(Extension(environment))
}

/// Liveness probe, does not touch the database or Google
async fn get_health_check(
    Extension(environment): Extension<String>,
) -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "ok",
        environment,
    })
}
