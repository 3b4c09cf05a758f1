// City catalog entries
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct City {
    pub name: String,
    pub lat: f64,
    pub lon: f64,
}

impl City {
    pub fn new(name: impl Into<String>, lat: f64, lon: f64) -> Self {
        Self {
            name: name.into(),
            lat,
            lon,
        }
    }

    /// Match a path segment such as "london" or "Rome" against this city
    pub fn matches(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name.trim())
    }
}

/// The catalog shipped with the dashboard when no config file overrides it
pub fn default_cities() -> Vec<City> {
    vec![
        City::new("London", 51.5074, -0.1278),
        City::new("Paris", 48.8566, 2.3522),
        City::new("Berlin", 52.5200, 13.4050),
        City::new("Madrid", 40.4168, -3.7038),
        City::new("Rome", 41.9028, 12.4964),
    ]
}
