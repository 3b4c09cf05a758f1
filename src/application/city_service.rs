// City service - Use case for the city selector
use crate::domain::city::City;
use crate::domain::error::DashboardError;
use std::sync::Arc;

#[derive(Clone)]
pub struct CityService {
    cities: Arc<Vec<City>>,
}

impl CityService {
    pub fn new(cities: Vec<City>) -> Self {
        Self {
            cities: Arc::new(cities),
        }
    }

    pub fn list_cities(&self) -> &[City] {
        &self.cities
    }

    pub fn find(&self, name: &str) -> Result<&City, DashboardError> {
        self.cities
            .iter()
            .find(|c| c.matches(name))
            .ok_or_else(|| DashboardError::UnknownCity(name.to_string()))
    }
}
