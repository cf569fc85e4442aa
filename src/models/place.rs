use serde::{Deserialize, Serialize};
use crate::models::coordinate::Coordinate;

/// A raw nearby-search result before it has been geocoded and stored.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct NearbyPlace {
    pub name: String,
    pub rating: f64,
    pub location: Coordinate,
}
