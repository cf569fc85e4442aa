use std::net::SocketAddr;
use std::sync::Arc;
use anyhow::Context;
use axum::http::{HeaderValue, Method};
use axum::Router;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tracing::info;
use crate::config::Config;
use crate::helpers::handler_404::page_not_found_handler;
use crate::repositories::RestaurantStore;
use crate::services::search_service::RestaurantSearchService;

pub mod address_controller;
pub mod health_check;
pub mod restaurant_controller;

#[derive(Clone)]
pub struct AppState {
    pub environment: String,
    pub store: Arc<dyn RestaurantStore>,
    pub search_service: Arc<RestaurantSearchService>,
}

pub async fn serve(
    app_state: AppState,
    config: &Config,
) -> anyhow::Result<()> {
    let origins = parse_origins(&config.origin_urls)?;
    let application = build_application(app_state, origins);

    let port = SocketAddr::from(([0, 0, 0, 0], config.port));
    info!("API server listening on port: {}", port);
    axum::Server::bind(&port)
        .serve(application.into_make_service())
        .await
        .context("Error spinning up the API server")
}

pub fn parse_origins(origin_urls: &str) -> anyhow::Result<Vec<HeaderValue>> {
    origin_urls
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| s.parse::<HeaderValue>().with_context(|| format!("Invalid origin url: {}", s)))
        .collect()
}

pub fn build_application(
    app_state: AppState,
    origins: Vec<HeaderValue>,
) -> Router {
    router_endpoints(app_state)
        .layer(
            ServiceBuilder::new()
                .layer(
                    CorsLayer::new()
                        .allow_methods([
                            Method::GET,
                            Method::OPTIONS
                        ])
                        .allow_origin(origins)
                        .allow_headers([AUTHORIZATION, CONTENT_TYPE])
                )
        )
        .fallback(page_not_found_handler)
}

pub fn router_endpoints(app_state: AppState) -> Router {
    health_check::router(app_state.environment.clone())
        .nest("/api/restaurants", restaurant_controller::router(app_state.clone()))
        .nest("/api/addresses", address_controller::router(app_state))
}
