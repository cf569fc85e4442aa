use time::OffsetDateTime;

/// One row per search request, pointing at the address the query coordinate resolved to.
#[derive(Clone, Debug)]
pub struct UserQuery {
    pub id: i64,
    pub address_id: i64,
    pub created_at: OffsetDateTime,
}
