use std::sync::Arc;
use anyhow::Context;
use bb8_postgres::bb8::Pool;
use bb8_postgres::PostgresConnectionManager;
use bb8_postgres::tokio_postgres::NoTls;
use clap::Parser;
use dotenv::dotenv;
use tracing::info;
use tracing_subscriber::EnvFilter;
use crate::clients::geocoding::GeocodingClient;
use crate::clients::places::PlacesClient;
use crate::config::Config;
use crate::controller::AppState;
use crate::repositories::postgres_repo::PostgresConnectionRepo;
use crate::services::search_service::RestaurantSearchService;

pub mod clients;
pub mod config;
pub mod controller;
pub mod helpers;
pub mod models;
pub mod repositories;
pub mod services;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
        )
        .init();

    let config = Config::parse();
    info!("Starting restaurant finder in {} environment", config.environment);

    let manager = PostgresConnectionManager::new_from_stringlike(&config.database_url, NoTls)
        .context("Invalid DATABASE_URL")?;
    let postgres_connection = Pool::builder()
        .max_size(config.pool_size())
        .build(manager)
        .await
        .context("Failed to build postgres connection pool")?;

    let postgres_repo = Arc::new(PostgresConnectionRepo::new(postgres_connection));
    postgres_repo.bootstrap_schema().await?;

    let http = reqwest::Client::new();
    let geocoding_client = Arc::new(GeocodingClient::new(
        http.clone(),
        config.geocoding_url.clone(),
        config.api_key.clone(),
    ));
    let places_client = Arc::new(PlacesClient::new(
        http,
        config.places_url.clone(),
        config.api_key.clone(),
    ));

    let search_service = Arc::new(RestaurantSearchService::new(
        geocoding_client,
        places_client,
        postgres_repo.clone(),
    ));

    let app_state = AppState {
        environment: config.environment.clone(),
        store: postgres_repo,
        search_service,
    };

    controller::serve(app_state, &config).await
}
