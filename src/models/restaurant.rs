use serde::{Deserialize, Serialize};
use crate::models::address::Address;

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct Restaurant {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub name: String,
    pub rating: f64,
    pub address: Address,
}
