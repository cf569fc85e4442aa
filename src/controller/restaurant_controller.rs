use std::sync::Arc;
use axum::{Extension, Json, Router};
use axum::extract::Query;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use serde::{Deserialize, Serialize};
use tracing::warn;
use crate::controller::AppState;
use crate::helpers::error_response::error_response;
use crate::repositories::RestaurantStore;
use crate::services::search_service::RestaurantSearchService;

pub fn router(app_state: AppState) -> Router {
    Router::new()
        .route("/search", get(search_restaurants))
        .route("/city", get(restaurants_in_city))
        .route("/state", get(restaurants_in_state))
        .route("/rating", get(restaurants_by_rating))
        .route_layer(Extension(app_state.search_service))
        .route_layer(Extension(app_state.store))
}

#[derive(Clone, Serialize, Deserialize, Debug)]
pub struct SearchRestaurantParam {
    pub latitude: f64,
    pub longitude: f64,
}

pub async fn search_restaurants(
    Extension(search_service): Extension<Arc<RestaurantSearchService>>,
    Query(query): Query<SearchRestaurantParam>,
) -> Response {
    match search_service.search(query.latitude, query.longitude).await {
        Ok(restaurants) => (StatusCode::OK, Json(restaurants)).into_response(),
        Err(e) => e.into_response(),
    }
}

#[derive(Clone, Serialize, Deserialize, Debug)]
pub struct CityParam {
    pub city: String,
}

pub async fn restaurants_in_city(
    Extension(store): Extension<Arc<dyn RestaurantStore>>,
    Query(query): Query<CityParam>,
) -> Response {
    match store.restaurants_by_city(&query.city).await {
        Ok(restaurants) => (StatusCode::OK, Json(restaurants)).into_response(),
        Err(e) => {
            warn!("Something went wrong retrieving restaurants in city {} due to: {:#}", query.city, e);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to retrieve restaurants, please try again")
        }
    }
}

#[derive(Clone, Serialize, Deserialize, Debug)]
pub struct StateParam {
    pub state: String,
}

pub async fn restaurants_in_state(
    Extension(store): Extension<Arc<dyn RestaurantStore>>,
    Query(query): Query<StateParam>,
) -> Response {
    match store.restaurants_by_state(&query.state).await {
        Ok(restaurants) => (StatusCode::OK, Json(restaurants)).into_response(),
        Err(e) => {
            warn!("Something went wrong retrieving restaurants in state {} due to: {:#}", query.state, e);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to retrieve restaurants, please try again")
        }
    }
}

#[derive(Clone, Serialize, Deserialize, Debug)]
pub struct RatingRangeParam {
    pub min_rating: f64,
    pub max_rating: f64,
}

pub async fn restaurants_by_rating(
    Extension(store): Extension<Arc<dyn RestaurantStore>>,
    Query(query): Query<RatingRangeParam>,
) -> Response {
    if query.min_rating > query.max_rating {
        return error_response(StatusCode::BAD_REQUEST, "min_rating must not exceed max_rating");
    }

    match store.restaurants_by_rating_range(query.min_rating, query.max_rating).await {
        Ok(restaurants) => (StatusCode::OK, Json(restaurants)).into_response(),
        Err(e) => {
            warn!("Something went wrong retrieving restaurants rated {:?} due to: {:#}", query, e);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to retrieve restaurants, please try again")
        }
    }
}
