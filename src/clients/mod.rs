use async_trait::async_trait;
use serde::Deserialize;
use crate::models::address::Address;
use crate::models::coordinate::Coordinate;
use crate::models::place::NearbyPlace;

pub mod geocoding;
pub mod places;
#[cfg(test)]
pub mod stub;

#[async_trait]
pub trait AddressResolver: Send + Sync {
    /// Reverse geocodes `coordinate`. `Ok(None)` means the service knows no address there.
    async fn resolve(&self, coordinate: Coordinate) -> anyhow::Result<Option<Address>>;
}

#[async_trait]
pub trait PlacesSearch: Send + Sync {
    async fn nearby_restaurants(&self, coordinate: Coordinate) -> anyhow::Result<Vec<NearbyPlace>>;
}

/// Google answers every request with a `status` field, errors included.
#[derive(Deserialize, Debug)]
pub struct ApiStatus {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub error_message: Option<String>,
}

impl ApiStatus {
    pub fn check(&self) -> anyhow::Result<()> {
        match self.status.as_deref() {
            None | Some("OK") | Some("ZERO_RESULTS") => Ok(()),
            Some(status) => Err(anyhow::anyhow!(
                "Google API responded with status {}: {}",
                status,
                self.error_message.as_deref().unwrap_or("no error message")
            )),
        }
    }
}
