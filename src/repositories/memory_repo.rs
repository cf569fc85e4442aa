use std::sync::Mutex;
use async_trait::async_trait;
use time::OffsetDateTime;
use crate::models::address::Address;
use crate::models::coordinate::GeoBounds;
use crate::models::restaurant::Restaurant;
use crate::models::user_query::UserQuery;
use crate::repositories::{stored_address_id, RestaurantStore};

#[derive(Default)]
struct Tables {
    addresses: Vec<Address>,
    restaurants: Vec<(i64, String, f64, i64)>,
    user_queries: Vec<UserQuery>,
}

/// In-process store enforcing the same natural keys as the Postgres schema.
#[derive(Default)]
pub struct MemoryRepo {
    tables: Mutex<Tables>,
}

impl MemoryRepo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn address_count(&self) -> usize {
        self.tables.lock().unwrap().addresses.len()
    }

    pub fn restaurant_count(&self) -> usize {
        self.tables.lock().unwrap().restaurants.len()
    }

    pub fn user_queries(&self) -> Vec<UserQuery> {
        self.tables.lock().unwrap().user_queries.clone()
    }

    fn restaurants_where(&self, predicate: impl Fn(&Restaurant) -> bool) -> Vec<Restaurant> {
        let tables = self.tables.lock().unwrap();
        let mut restaurants: Vec<Restaurant> = tables.restaurants
            .iter()
            .filter_map(|(id, name, rating, address_id)| {
                let address = tables.addresses.iter().find(|a| a.id == Some(*address_id))?;
                Some(Restaurant {
                    id: Some(*id),
                    name: name.clone(),
                    rating: *rating,
                    address: address.clone(),
                })
            })
            .filter(|restaurant| predicate(restaurant))
            .collect();
        restaurants.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        restaurants
    }
}

#[async_trait]
impl RestaurantStore for MemoryRepo {
    async fn find_or_insert_address(&self, address: &Address) -> anyhow::Result<Address> {
        let mut tables = self.tables.lock().unwrap();
        let existing = tables.addresses
            .iter()
            .find(|stored| stored.natural_key() == address.natural_key())
            .cloned();
        if let Some(existing) = existing {
            return Ok(existing);
        }

        let stored = Address {
            id: Some(tables.addresses.len() as i64 + 1),
            ..address.clone()
        };
        tables.addresses.push(stored.clone());
        Ok(stored)
    }

    async fn find_or_insert_restaurant(
        &self,
        name: &str,
        rating: f64,
        address: &Address,
    ) -> anyhow::Result<Restaurant> {
        let address_id = stored_address_id(address)?;
        let mut tables = self.tables.lock().unwrap();

        let existing = tables.restaurants
            .iter()
            .find(|(_, stored_name, _, stored_address)| stored_name == name && *stored_address == address_id)
            .cloned();

        let row = match existing {
            Some(existing) => existing,
            None => {
                let row = (tables.restaurants.len() as i64 + 1, name.to_string(), rating, address_id);
                tables.restaurants.push(row.clone());
                row
            }
        };

        Ok(Restaurant {
            id: Some(row.0),
            name: row.1,
            rating: row.2,
            address: address.clone(),
        })
    }

    async fn record_user_query(&self, address: &Address) -> anyhow::Result<UserQuery> {
        let address_id = stored_address_id(address)?;
        let mut tables = self.tables.lock().unwrap();
        let user_query = UserQuery {
            id: tables.user_queries.len() as i64 + 1,
            address_id,
            created_at: OffsetDateTime::now_utc(),
        };
        tables.user_queries.push(user_query.clone());
        Ok(user_query)
    }

    async fn restaurants_by_city(&self, city: &str) -> anyhow::Result<Vec<Restaurant>> {
        Ok(self.restaurants_where(|r| r.address.city == city))
    }

    async fn restaurants_by_state(&self, state: &str) -> anyhow::Result<Vec<Restaurant>> {
        Ok(self.restaurants_where(|r| r.address.state == state))
    }

    async fn restaurants_by_rating_range(
        &self,
        min_rating: f64,
        max_rating: f64,
    ) -> anyhow::Result<Vec<Restaurant>> {
        Ok(self.restaurants_where(|r| r.rating >= min_rating && r.rating <= max_rating))
    }

    async fn addresses_within_bounds(&self, bounds: GeoBounds) -> anyhow::Result<Vec<Address>> {
        let tables = self.tables.lock().unwrap();
        Ok(tables.addresses
            .iter()
            .filter(|a| bounds.contains(a.latitude, a.longitude))
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn address(street: &str, city: &str, postal_code: &str) -> Address {
        Address {
            street: street.to_string(),
            city: city.to_string(),
            postal_code: postal_code.to_string(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn address_natural_key_is_street_city_postal_code() {
        let repo = MemoryRepo::new();

        let first = repo.find_or_insert_address(&address("Broadway", "New York", "10007")).await.unwrap();
        let mut same_key = address("Broadway", "New York", "10007");
        same_key.neighborhood = "Different".to_string();
        let second = repo.find_or_insert_address(&same_key).await.unwrap();
        let other = repo.find_or_insert_address(&address("Broadway", "New York", "10012")).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(second.neighborhood, "");
        assert_ne!(first.id, other.id);
        assert_eq!(repo.address_count(), 2);
    }

    #[tokio::test]
    async fn existing_restaurant_keeps_its_rating() {
        let repo = MemoryRepo::new();
        let stored = repo.find_or_insert_address(&address("Carmine St", "New York", "10014")).await.unwrap();

        let first = repo.find_or_insert_restaurant("Joe's Pizza", 4.5, &stored).await.unwrap();
        let again = repo.find_or_insert_restaurant("Joe's Pizza", 3.0, &stored).await.unwrap();

        assert_eq!(first.id, again.id);
        assert_eq!(again.rating, 4.5);
        assert_eq!(repo.restaurant_count(), 1);
    }

    #[tokio::test]
    async fn unstored_address_is_rejected() {
        let repo = MemoryRepo::new();

        assert!(repo.record_user_query(&address("Broadway", "New York", "10007")).await.is_err());
        assert!(repo.find_or_insert_restaurant("Joe's Pizza", 4.5, &Address::default()).await.is_err());
    }
}
