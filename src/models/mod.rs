pub mod address;
pub mod coordinate;
pub mod place;
pub mod restaurant;
pub mod user_query;
