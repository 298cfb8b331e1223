use std::env;
use std::path::PathBuf;

use crate::error::{PlaceMapError, Result};
use crate::types::Neighborhood;

const DEFAULT_BASE_URL: &str = "https://api.foursquare.com/v2";
const DEFAULT_API_VERSION: &str = "20140806";

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    // Venue provider
    pub client_id: String,
    pub client_secret: String,
    pub api_version: String,
    pub base_url: String,

    // Category cache; disabled when unset
    pub cache_dir: Option<PathBuf>,

    // Neighborhood shown at startup
    pub neighborhood: Neighborhood,
}

impl Config {
    /// Load configuration from the environment, reading `.env` first if present.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let lat = parse_env("NEIGHBORHOOD_LAT", 37.399864)?;
        let lng = parse_env("NEIGHBORHOOD_LNG", -122.10840000000002)?;
        let name = env::var("NEIGHBORHOOD_NAME").unwrap_or_else(|_| "Udacity".to_string());

        Ok(Self {
            client_id: required_env("FOURSQUARE_CLIENT_ID")?,
            client_secret: required_env("FOURSQUARE_CLIENT_SECRET")?,
            api_version: env::var("FOURSQUARE_API_VERSION")
                .unwrap_or_else(|_| DEFAULT_API_VERSION.to_string()),
            base_url: env::var("FOURSQUARE_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_BASE_URL.to_string()),
            cache_dir: env::var("PLACEMAP_CACHE_DIR").ok().map(PathBuf::from),
            neighborhood: Neighborhood::new(name, lat, lng),
        })
    }

    pub fn log_redacted(&self) {
        fn preview(val: &str) -> String {
            let head: String = val.chars().take(5).collect();
            format!("{}...({} chars)", head, val.len())
        }

        tracing::info!("Config loaded:");
        tracing::info!("  FOURSQUARE_CLIENT_ID: {}", preview(&self.client_id));
        tracing::info!("  FOURSQUARE_CLIENT_SECRET: {}", preview(&self.client_secret));
        tracing::info!("  FOURSQUARE_BASE_URL: {}", self.base_url);
        tracing::info!(
            "  PLACEMAP_CACHE_DIR: {}",
            self.cache_dir
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "<not set>".to_string())
        );
        tracing::info!(
            name = self.neighborhood.name.as_str(),
            lat = self.neighborhood.center.lat,
            lng = self.neighborhood.center.lng,
            "  Default neighborhood"
        );
    }
}

fn required_env(key: &str) -> Result<String> {
    env::var(key).map_err(|_| PlaceMapError::Config(format!("{key} environment variable is required")))
}

fn parse_env(key: &str, default: f64) -> Result<f64> {
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|_| PlaceMapError::Config(format!("{key} must be a number, got {raw:?}"))),
        Err(_) => Ok(default),
    }
}
