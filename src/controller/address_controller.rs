use std::sync::Arc;
use axum::{Extension, Json, Router};
use axum::extract::Query;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use tracing::warn;
use crate::controller::AppState;
use crate::helpers::error_response::error_response;
use crate::models::coordinate::GeoBounds;
use crate::repositories::RestaurantStore;

pub fn router(app_state: AppState) -> Router {
    Router::new()
        .route("/bounds", get(addresses_within_bounds))
        .route_layer(Extension(app_state.store))
}

pub async fn addresses_within_bounds(
    Extension(store): Extension<Arc<dyn RestaurantStore>>,
    Query(bounds): Query<GeoBounds>,
) -> Response {
    if bounds.min_lat > bounds.max_lat || bounds.min_lon > bounds.max_lon {
        return error_response(StatusCode::BAD_REQUEST, "Minimum bounds must not exceed maximum bounds");
    }

    match store.addresses_within_bounds(bounds).await {
        Ok(addresses) => (StatusCode::OK, Json(addresses)).into_response(),
        Err(e) => {
            warn!("Something went wrong retrieving addresses within {:?} due to: {:#}", bounds, e);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to retrieve addresses, please try again")
        }
    }
}
