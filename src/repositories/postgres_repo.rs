use anyhow::{anyhow, Context};
use async_trait::async_trait;
use bb8_postgres::bb8::{Pool, PooledConnection};
use bb8_postgres::PostgresConnectionManager;
use bb8_postgres::tokio_postgres::{NoTls, Row};
use time::OffsetDateTime;
use tracing::{debug, info, warn};
use crate::models::address::Address;
use crate::models::coordinate::GeoBounds;
use crate::models::restaurant::Restaurant;
use crate::models::user_query::UserQuery;
use crate::repositories::{stored_address_id, RestaurantStore};

pub const RETRY_LIMIT: usize = 5;

const SCHEMA: &str = include_str!("../../migrations/schema.sql");

const ADDRESS_COLUMNS: &str =
    "id, street, neighborhood, city, state, postal_code, country, latitude, longitude";

const RESTAURANT_WITH_ADDRESS: &str = "SELECT r.id AS restaurant_id, r.name, r.rating, \
    a.id, a.street, a.neighborhood, a.city, a.state, a.postal_code, a.country, a.latitude, a.longitude \
    FROM restaurants r JOIN addresses a ON a.id = r.address_id";

pub struct PostgresConnectionRepo {
    postgres_connection: Pool<PostgresConnectionManager<NoTls>>,
}

impl PostgresConnectionRepo {
    pub fn new(
        postgres_connection: Pool<PostgresConnectionManager<NoTls>>,
    ) -> Self {
        Self {
            postgres_connection
        }
    }

    async fn get_postgres_connection(
        &self,
    ) -> anyhow::Result<PooledConnection<'_, PostgresConnectionManager<NoTls>>> {
        for _ in 0..RETRY_LIMIT {
            match self.postgres_connection.get().await {
                Ok(conn) => return Ok(conn),
                Err(e) => {
                    warn!("Failed to retrieve postgres connection due to: {}, retrying in 3s", e);
                    tokio::time::sleep(tokio::time::Duration::from_secs(3)).await;
                    continue;
                }
            }
        }

        Err(anyhow!("Failed to retrieve a valid connection from postgres pool, BAILING"))
    }

    /// Creates the tables and natural-key constraints if they are missing.
    pub async fn bootstrap_schema(&self) -> anyhow::Result<()> {
        let conn = self.get_postgres_connection().await?;
        conn.batch_execute(SCHEMA)
            .await
            .context("Failed to bootstrap database schema")?;
        info!("Database schema is up to date");
        Ok(())
    }

    async fn query_restaurants(
        &self,
        filter: &str,
        params: &[&(dyn bb8_postgres::tokio_postgres::types::ToSql + Sync)],
    ) -> anyhow::Result<Vec<Restaurant>> {
        let conn = self.get_postgres_connection().await?;
        let stmt = format!("{} WHERE {} ORDER BY r.name, r.id;", RESTAURANT_WITH_ADDRESS, filter);

        let rows = conn
            .query(&stmt, params)
            .await
            .with_context(|| format!("Failed to query restaurants where {}", filter))?;

        Ok(rows.iter().map(parse_row_into_restaurant).collect())
    }
}

#[async_trait]
impl RestaurantStore for PostgresConnectionRepo {
    async fn find_or_insert_address(&self, address: &Address) -> anyhow::Result<Address> {
        let conn = self.get_postgres_connection().await?;
        // The no-op update makes RETURNING yield the existing row on conflict.
        let stmt = format!(
            "INSERT INTO addresses \
            (street, neighborhood, city, state, postal_code, country, latitude, longitude) \
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
            ON CONFLICT ON CONSTRAINT addresses_natural_key DO UPDATE SET street = EXCLUDED.street \
            RETURNING {};",
            ADDRESS_COLUMNS
        );

        let row = conn
            .query_one(
                &stmt,
                &[
                    &address.street,
                    &address.neighborhood,
                    &address.city,
                    &address.state,
                    &address.postal_code,
                    &address.country,
                    &address.latitude,
                    &address.longitude,
                ],
            )
            .await
            .with_context(|| format!("Failed to store address {:?}", address.natural_key()))?;

        Ok(parse_row_into_address(&row))
    }

    async fn find_or_insert_restaurant(
        &self,
        name: &str,
        rating: f64,
        address: &Address,
    ) -> anyhow::Result<Restaurant> {
        let address_id = stored_address_id(address)?;
        let conn = self.get_postgres_connection().await?;

        let row = conn
            .query_one(
                "INSERT INTO restaurants (name, rating, address_id) VALUES ($1, $2, $3) \
                ON CONFLICT ON CONSTRAINT restaurants_natural_key DO UPDATE SET name = EXCLUDED.name \
                RETURNING id, name, rating, (xmax = 0) AS inserted;",
                &[&name, &rating, &address_id],
            )
            .await
            .with_context(|| format!("Failed to store restaurant {} at address {}", name, address_id))?;

        if row.get::<&str, bool>("inserted") {
            debug!("Saved new restaurant: name={}, address_id={}", name, address_id);
        } else {
            debug!("Restaurant already exists: name={}, address_id={}", name, address_id);
        }

        Ok(Restaurant {
            id: Some(row.get("id")),
            name: row.get("name"),
            rating: row.get::<&str, f64>("rating"),
            address: address.clone(),
        })
    }

    async fn record_user_query(&self, address: &Address) -> anyhow::Result<UserQuery> {
        let address_id = stored_address_id(address)?;
        let conn = self.get_postgres_connection().await?;

        let row = conn
            .query_one(
                "INSERT INTO user_queries (address_id, created_at) VALUES ($1, $2) \
                RETURNING id, address_id, created_at;",
                &[&address_id, &OffsetDateTime::now_utc()],
            )
            .await
            .with_context(|| format!("Failed to record user query for address {}", address_id))?;

        Ok(UserQuery {
            id: row.get("id"),
            address_id: row.get("address_id"),
            created_at: row.get("created_at"),
        })
    }

    async fn restaurants_by_city(&self, city: &str) -> anyhow::Result<Vec<Restaurant>> {
        self.query_restaurants("a.city = $1", &[&city]).await
    }

    async fn restaurants_by_state(&self, state: &str) -> anyhow::Result<Vec<Restaurant>> {
        self.query_restaurants("a.state = $1", &[&state]).await
    }

    async fn restaurants_by_rating_range(
        &self,
        min_rating: f64,
        max_rating: f64,
    ) -> anyhow::Result<Vec<Restaurant>> {
        self.query_restaurants("r.rating BETWEEN $1 AND $2", &[&min_rating, &max_rating]).await
    }

    async fn addresses_within_bounds(&self, bounds: GeoBounds) -> anyhow::Result<Vec<Address>> {
        let conn = self.get_postgres_connection().await?;
        let stmt = format!(
            "SELECT {} FROM addresses \
            WHERE latitude BETWEEN $1 AND $2 AND longitude BETWEEN $3 AND $4 \
            ORDER BY id;",
            ADDRESS_COLUMNS
        );

        let rows = conn
            .query(
                &stmt,
                &[&bounds.min_lat, &bounds.max_lat, &bounds.min_lon, &bounds.max_lon],
            )
            .await
            .with_context(|| format!("Failed to query addresses within {:?}", bounds))?;

        Ok(rows.iter().map(parse_row_into_address).collect())
    }
}

fn parse_row_into_address(
    row: &Row,
) -> Address {
    Address {
        id: Some(row.get("id")),
        street: row.get("street"),
        neighborhood: row.get("neighborhood"),
        city: row.get("city"),
        state: row.get("state"),
        postal_code: row.get("postal_code"),
        country: row.get("country"),
        latitude: row.get::<&str, f64>("latitude"),
        longitude: row.get::<&str, f64>("longitude"),
    }
}

fn parse_row_into_restaurant(
    row: &Row,
) -> Restaurant {
    Restaurant {
        id: Some(row.get("restaurant_id")),
        name: row.get("name"),
        rating: row.get::<&str, f64>("rating"),
        address: parse_row_into_address(row),
    }
}
