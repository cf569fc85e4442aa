use async_trait::async_trait;
use crate::models::address::Address;
use crate::models::coordinate::GeoBounds;
use crate::models::restaurant::Restaurant;
use crate::models::user_query::UserQuery;

pub mod postgres_repo;
#[cfg(test)]
pub mod memory_repo;

/// Storage seam shared by the search orchestrator and the read endpoints.
///
/// Addresses are unique on (street, city, postal code) and restaurants on
/// (name, address). The `find_or_insert_*` operations return the stored row,
/// which is the pre-existing one when the natural key is already taken.
#[async_trait]
pub trait RestaurantStore: Send + Sync {
    async fn find_or_insert_address(&self, address: &Address) -> anyhow::Result<Address>;

    /// `address` must be a stored address (its `id` set).
    async fn find_or_insert_restaurant(
        &self,
        name: &str,
        rating: f64,
        address: &Address,
    ) -> anyhow::Result<Restaurant>;

    async fn record_user_query(&self, address: &Address) -> anyhow::Result<UserQuery>;

    async fn restaurants_by_city(&self, city: &str) -> anyhow::Result<Vec<Restaurant>>;

    async fn restaurants_by_state(&self, state: &str) -> anyhow::Result<Vec<Restaurant>>;

    async fn restaurants_by_rating_range(
        &self,
        min_rating: f64,
        max_rating: f64,
    ) -> anyhow::Result<Vec<Restaurant>>;

    async fn addresses_within_bounds(&self, bounds: GeoBounds) -> anyhow::Result<Vec<Address>>;
}

pub(crate) fn stored_address_id(address: &Address) -> anyhow::Result<i64> {
    address.id.ok_or_else(|| anyhow::anyhow!(
        "Address {:?} has not been stored yet",
        address.natural_key()
    ))
}
