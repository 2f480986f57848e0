use crate::constants::*;
use std::env;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    /// Postgres marker store. When absent markers live in memory.
    pub database_url: Option<String>,
    pub osrm_base_url: String,
    pub overpass_url: String,
    pub nominatim_url: String,
    pub user_agent: String,
    pub routing_timeout_secs: u64,
    pub poi_fetch_timeout_secs: u64,
    pub geocode_cache_ttl: u64,
    /// Add walking and cycling estimates to every route plan.
    pub include_active_modes: bool,
    /// Load restaurants, banks, fuel, hotels and places of worship at high zoom.
    pub include_amenity_pois: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            database_url: None,
            osrm_base_url: DEFAULT_OSRM_BASE_URL.to_string(),
            overpass_url: DEFAULT_OVERPASS_URL.to_string(),
            nominatim_url: DEFAULT_NOMINATIM_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            routing_timeout_secs: DEFAULT_ROUTING_TIMEOUT_SECONDS,
            poi_fetch_timeout_secs: DEFAULT_POI_FETCH_TIMEOUT_SECONDS,
            geocode_cache_ttl: DEFAULT_GEOCODE_CACHE_TTL_SECONDS,
            include_active_modes: false,
            include_amenity_pois: true,
        }
    }
}

fn parse_bool(name: &str, default: bool) -> Result<bool, String> {
    match env::var(name) {
        Err(_) => Ok(default),
        Ok(raw) => match raw.trim().to_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" => Ok(false),
            _ => Err(format!("Invalid {}: {}", name, raw)),
        },
    }
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        dotenv::dotenv().ok();
        let defaults = Self::default();

        let poi_fetch_timeout_secs: u64 = env::var("POI_FETCH_TIMEOUT_SECS")
            .unwrap_or_else(|_| defaults.poi_fetch_timeout_secs.to_string())
            .parse()
            .map_err(|_| "Invalid POI_FETCH_TIMEOUT_SECS")?;

        if poi_fetch_timeout_secs == 0 {
            return Err("POI_FETCH_TIMEOUT_SECS must be greater than 0".to_string());
        }

        Ok(Config {
            host: env::var("HOST").unwrap_or(defaults.host),
            port: env::var("PORT")
                .unwrap_or_else(|_| defaults.port.to_string())
                .parse()
                .map_err(|_| "Invalid PORT")?,
            database_url: env::var("DATABASE_URL").ok().filter(|url| !url.is_empty()),
            osrm_base_url: env::var("OSRM_BASE_URL").unwrap_or(defaults.osrm_base_url),
            overpass_url: env::var("OVERPASS_URL").unwrap_or(defaults.overpass_url),
            nominatim_url: env::var("NOMINATIM_URL").unwrap_or(defaults.nominatim_url),
            user_agent: env::var("HTTP_USER_AGENT").unwrap_or(defaults.user_agent),
            routing_timeout_secs: env::var("ROUTING_TIMEOUT_SECS")
                .unwrap_or_else(|_| defaults.routing_timeout_secs.to_string())
                .parse()
                .map_err(|_| "Invalid ROUTING_TIMEOUT_SECS")?,
            poi_fetch_timeout_secs,
            geocode_cache_ttl: env::var("GEOCODE_CACHE_TTL")
                .unwrap_or_else(|_| defaults.geocode_cache_ttl.to_string())
                .parse()
                .map_err(|_| "Invalid GEOCODE_CACHE_TTL")?,
            include_active_modes: parse_bool(
                "INCLUDE_ACTIVE_MODES",
                defaults.include_active_modes,
            )?,
            include_amenity_pois: parse_bool(
                "INCLUDE_AMENITY_POIS",
                defaults.include_amenity_pois,
            )?,
        })
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn routing_timeout(&self) -> Duration {
        Duration::from_secs(self.routing_timeout_secs)
    }

    pub fn poi_fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.poi_fetch_timeout_secs)
    }
}
