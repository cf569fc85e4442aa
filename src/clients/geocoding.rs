use anyhow::Context;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, info, warn};
use crate::clients::{AddressResolver, ApiStatus};
use crate::models::address::Address;
use crate::models::coordinate::Coordinate;

const ROUTE: &str = "route";
const SUBLOCALITY: &str = "sublocality";
const ADMIN_AREA_LEVEL_2: &str = "administrative_area_level_2";
const ADMIN_AREA_LEVEL_1: &str = "administrative_area_level_1";
const POSTAL_CODE: &str = "postal_code";
const COUNTRY: &str = "country";

#[derive(Deserialize, Debug)]
pub struct GeocodeResponse {
    #[serde(default)]
    pub results: Vec<GeocodeResult>,
    #[serde(flatten)]
    pub status: ApiStatus,
}

#[derive(Deserialize, Debug)]
pub struct GeocodeResult {
    #[serde(default)]
    pub address_components: Vec<AddressComponent>,
}

#[derive(Deserialize, Debug)]
pub struct AddressComponent {
    pub long_name: String,
    #[serde(default)]
    pub types: Vec<String>,
}

pub struct GeocodingClient {
    http: Client,
    base_url: String,
    api_key: String,
}

impl GeocodingClient {
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
impl AddressResolver for GeocodingClient {
    async fn resolve(&self, coordinate: Coordinate) -> anyhow::Result<Option<Address>> {
        info!("Fetching address for coordinates: lat={}, lon={}", coordinate.latitude, coordinate.longitude);

        let location = coordinate.to_string();
        let response = self.http
            .get(&self.base_url)
            .query(&[("latlng", location.as_str()), ("key", self.api_key.as_str())])
            .send()
            .await
            .and_then(|res| res.error_for_status())
            .with_context(|| format!("Error while fetching address from geocoding API for {}", location))?
            .json::<GeocodeResponse>()
            .await
            .with_context(|| format!("Failed to parse geocoding API response for {}", location))?;

        let address = parse_geocode_response(response, coordinate)?;
        match &address {
            Some(address) => debug!("Address successfully retrieved: {:?}", address),
            None => warn!(
                "No address found for the given coordinates: lat={}, lon={}",
                coordinate.latitude, coordinate.longitude
            ),
        }
        Ok(address)
    }
}

/// Builds an [`Address`] out of the first geocoding result.
pub fn parse_geocode_response(
    response: GeocodeResponse,
    coordinate: Coordinate,
) -> anyhow::Result<Option<Address>> {
    response.status.check()?;

    let Some(first) = response.results.into_iter().next() else {
        return Ok(None);
    };

    let mut address = Address::at(coordinate);
    for component in first.address_components {
        for component_type in &component.types {
            let field = match component_type.as_str() {
                ROUTE => &mut address.street,
                SUBLOCALITY => &mut address.neighborhood,
                ADMIN_AREA_LEVEL_2 => &mut address.city,
                ADMIN_AREA_LEVEL_1 => &mut address.state,
                POSTAL_CODE => &mut address.postal_code,
                COUNTRY => &mut address.country,
                _ => continue,
            };
            *field = component.long_name.clone();
        }
    }

    Ok(Some(address))
}
