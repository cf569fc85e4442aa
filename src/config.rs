use clap::Parser;

pub const GOOGLE_GEOCODING_URL: &str = "https://maps.googleapis.com/maps/api/geocode/json";
pub const GOOGLE_PLACES_URL: &str = "https://maps.googleapis.com/maps/api/place/nearbysearch/json";

#[derive(Parser, Clone)]
pub struct Config {
    #[clap(env, long)]
    pub environment: String,

    #[clap(env, long)]
    pub database_url: String,

    /// Google Maps Platform key used by both the geocoding and places clients
    #[clap(env = "API_KEY", long)]
    pub api_key: String,

    /// Comma separated list of allowed CORS origins
    #[clap(env, long, default_value = "http://localhost:3000")]
    pub origin_urls: String,

    #[clap(env, long, default_value_t = 3000)]
    pub port: u16,

    #[clap(env, long, default_value = GOOGLE_GEOCODING_URL)]
    pub geocoding_url: String,

    #[clap(env, long, default_value = GOOGLE_PLACES_URL)]
    pub places_url: String,

    #[clap(env, long)]
    pub pool_max_size: Option<u32>,
}

impl Config {
    pub fn pool_size(&self) -> u32 {
        self.pool_max_size
            .unwrap_or_else(|| (num_cpus::get() * 2) as u32)
    }
}
