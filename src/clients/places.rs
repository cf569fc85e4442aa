use anyhow::Context;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info, warn};
use crate::clients::{ApiStatus, PlacesSearch};
use crate::models::coordinate::Coordinate;
use crate::models::place::NearbyPlace;

/// Search radius in meters.
pub const RADIUS: u32 = 1000;
pub const PLACE_TYPE: &str = "restaurant";

#[derive(Deserialize, Debug)]
pub struct NearbySearchResponse {
    /// Kept raw so one malformed result cannot fail the whole response.
    #[serde(default)]
    pub results: Vec<Value>,
    #[serde(flatten)]
    pub status: ApiStatus,
}

#[derive(Deserialize, Debug)]
pub struct PlaceResult {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub rating: f64,
    pub geometry: Geometry,
}

#[derive(Deserialize, Debug)]
pub struct Geometry {
    pub location: Location,
}

#[derive(Deserialize, Debug)]
pub struct Location {
    pub lat: f64,
    pub lng: f64,
}

pub struct PlacesClient {
    http: Client,
    base_url: String,
    api_key: String,
}

impl PlacesClient {
    pub fn new(
        http: Client,
        base_url: String,
        api_key: String,
    ) -> Self {
        Self {
            http,
            base_url,
            api_key,
        }
    }
}

#[async_trait]
impl PlacesSearch for PlacesClient {
    async fn nearby_restaurants(&self, coordinate: Coordinate) -> anyhow::Result<Vec<NearbyPlace>> {
        let location = coordinate.to_string();
        let radius = RADIUS.to_string();
        debug!("Requesting nearby {} places around {} within {}m", PLACE_TYPE, location, RADIUS);

        let response = self.http
            .get(&self.base_url)
            .query(&[
                ("location", location.as_str()),
                ("radius", radius.as_str()),
                ("type", PLACE_TYPE),
                ("key", self.api_key.as_str()),
            ])
            .send()
            .await
            .and_then(|res| res.error_for_status())
            .with_context(|| format!("Error while fetching restaurants from places API for {}", location))?
            .json::<NearbySearchResponse>()
            .await
            .with_context(|| format!("Failed to parse places API response for {}", location))?;

        let places = parse_nearby_response(response)?;
        if places.is_empty() {
            warn!("No restaurants found around {}", location);
        } else {
            info!("Places API returned {} restaurants around {}", places.len(), location);
        }
        Ok(places)
    }
}

pub fn parse_nearby_response(
    response: NearbySearchResponse,
) -> anyhow::Result<Vec<NearbyPlace>> {
    response.status.check()?;

    let places = response.results
        .into_iter()
        .filter_map(|raw| {
            let name = raw.get("name").and_then(Value::as_str).unwrap_or_default().to_string();
            match serde_json::from_value::<PlaceResult>(raw) {
                Ok(result) => Some(NearbyPlace {
                    name: result.name,
                    rating: result.rating,
                    location: Coordinate::new(
                        result.geometry.location.lat,
                        result.geometry.location.lng,
                    ),
                }),
                Err(e) => {
                    warn!(name = %name, "Skipping malformed places result: {}", e);
                    None
                }
            }
        })
        .collect();

    Ok(places)
}
