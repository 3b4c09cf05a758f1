use crate::domain::city::{default_cities, City};
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub upstream: UpstreamSettings,
    #[serde(default)]
    pub cache: CacheSettings,
    #[serde(default)]
    pub auth: AuthSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerSettings {
    #[serde(default = "default_bind")]
    pub bind: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct UpstreamSettings {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct CacheSettings {
    /// How long a fetched record is reused before hitting the upstream again
    #[serde(default = "default_record_ttl_secs")]
    pub record_ttl_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AuthSettings {
    #[serde(default = "default_credential")]
    pub username: String,
    #[serde(default = "default_credential")]
    pub password: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct CityCatalog {
    #[serde(default = "default_cities")]
    pub cities: Vec<City>,
}

fn default_bind() -> String {
    "0.0.0.0:8080".to_string()
}

fn default_base_url() -> String {
    "https://air-quality-api.open-meteo.com/v1/air-quality".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_record_ttl_secs() -> u64 {
    300
}

fn default_credential() -> String {
    "demo".to_string()
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self { bind: default_bind() }
    }
}

impl Default for UpstreamSettings {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            record_ttl_secs: default_record_ttl_secs(),
        }
    }
}

impl Default for AuthSettings {
    fn default() -> Self {
        Self {
            username: default_credential(),
            password: default_credential(),
        }
    }
}

/// Load `<path>.toml` (optional) with `AIRQ__SECTION__KEY` environment overrides
pub fn load_app_config(path: &str) -> anyhow::Result<AppConfig> {
    let settings = config::Config::builder()
        .add_source(config::File::with_name(path).required(false))
        .add_source(
            config::Environment::with_prefix("AIRQ")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    Ok(settings.try_deserialize()?)
}

/// Load the city list; a missing file falls back to the built-in catalog
pub fn load_city_catalog(path: &str) -> anyhow::Result<CityCatalog> {
    let settings = config::Config::builder()
        .add_source(config::File::with_name(path).required(false))
        .build()?;

    let catalog: CityCatalog = settings.try_deserialize()?;
    if catalog.cities.is_empty() {
        anyhow::bail!("city catalog {} lists no cities", path);
    }
    Ok(catalog)
}
