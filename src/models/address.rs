use serde::{Deserialize, Serialize};
use crate::models::coordinate::Coordinate;

#[derive(Clone, Serialize, Deserialize, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub street: String,
    pub neighborhood: String,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    pub country: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl Address {
    /// An empty address pinned to `coordinate`, ready to be filled in from geocoding components.
    pub fn at(coordinate: Coordinate) -> Self {
        Self {
            latitude: coordinate.latitude,
            longitude: coordinate.longitude,
            ..Default::default()
        }
    }

    /// Natural key used to deduplicate stored addresses.
    pub fn natural_key(&self) -> (&str, &str, &str) {
        (&self.street, &self.city, &self.postal_code)
    }
}
