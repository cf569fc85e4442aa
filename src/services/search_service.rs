use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, error, info, warn};
use crate::clients::{AddressResolver, PlacesSearch};
use crate::models::coordinate::Coordinate;
use crate::models::place::NearbyPlace;
use crate::models::restaurant::Restaurant;
use crate::repositories::RestaurantStore;

#[derive(Debug, Error)]
pub enum SearchError {
    #[error("Address not found for coordinates ({latitude}, {longitude})")]
    AddressNotFound { latitude: f64, longitude: f64 },
    #[error("Geocoding failed: {0:#}")]
    Geocoding(anyhow::Error),
    #[error("Places search failed: {0:#}")]
    Places(anyhow::Error),
    #[error("Storage failed: {0:#}")]
    Storage(anyhow::Error),
}

/// Resolves a coordinate to restaurants around it, storing every address,
/// restaurant and query it sees along the way.
pub struct RestaurantSearchService {
    resolver: Arc<dyn AddressResolver>,
    places: Arc<dyn PlacesSearch>,
    store: Arc<dyn RestaurantStore>,
}

impl RestaurantSearchService {
    pub fn new(
        resolver: Arc<dyn AddressResolver>,
        places: Arc<dyn PlacesSearch>,
        store: Arc<dyn RestaurantStore>,
    ) -> Self {
        Self {
            resolver,
            places,
            store,
        }
    }

    /// Fails outright when the query coordinate itself cannot be resolved or
    /// the places search fails. Candidates that cannot be resolved or stored
    /// are skipped, so the result may be shorter than the places response.
    pub async fn search(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<Vec<Restaurant>, SearchError> {
        let coordinate = Coordinate::new(latitude, longitude);
        info!("Initiating restaurant search for location: latitude={}, longitude={}", latitude, longitude);

        let query_address = self.resolver
            .resolve(coordinate)
            .await
            .map_err(|e| {
                error!("Failed to geocode query location {}: {:#}", coordinate, e);
                SearchError::Geocoding(e)
            })?
            .ok_or_else(|| {
                error!("No address found for the provided coordinates: latitude={}, longitude={}", latitude, longitude);
                SearchError::AddressNotFound { latitude, longitude }
            })?;

        let query_address = self.store
            .find_or_insert_address(&query_address)
            .await
            .map_err(|e| {
                error!("Failed to store address for query location {}: {:#}", coordinate, e);
                SearchError::Storage(e)
            })?;
        let user_query = self.store
            .record_user_query(&query_address)
            .await
            .map_err(|e| {
                error!("Failed to record user query for location {}: {:#}", coordinate, e);
                SearchError::Storage(e)
            })?;
        debug!(
            "Recorded user query {} for address {} at {}",
            user_query.id, user_query.address_id, user_query.created_at
        );

        let candidates = self.places
            .nearby_restaurants(coordinate)
            .await
            .map_err(|e| {
                error!("Error occurred while fetching restaurants for location {}: {:#}", coordinate, e);
                SearchError::Places(e)
            })?;

        let mut restaurants = Vec::with_capacity(candidates.len());
        for candidate in candidates {
            match self.store_candidate(&candidate).await {
                Ok(Some(restaurant)) => restaurants.push(restaurant),
                Ok(None) => {
                    warn!("No address found for restaurant: name={}", candidate.name);
                }
                Err(e) => {
                    error!("Error occurred while processing restaurant {}, skipping: {:#}", candidate.name, e);
                }
            }
        }

        info!("Found {} restaurants around {}", restaurants.len(), coordinate);
        Ok(restaurants)
    }

    async fn store_candidate(
        &self,
        candidate: &NearbyPlace,
    ) -> anyhow::Result<Option<Restaurant>> {
        let Some(address) = self.resolver.resolve(candidate.location).await? else {
            return Ok(None);
        };

        let address = self.store.find_or_insert_address(&address).await?;
        let restaurant = self.store
            .find_or_insert_restaurant(&candidate.name, candidate.rating, &address)
            .await?;

        Ok(Some(restaurant))
    }
}
