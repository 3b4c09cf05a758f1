// Caching decorator around an air-quality repository
use crate::application::air_quality_repository::AirQualityRepository;
use crate::domain::city::City;
use crate::domain::telemetry::RawRecord;
use anyhow::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

/// Reuses a fetched record per city until it is older than `ttl`.
///
/// Handing out the same `Arc` is what lets the view cache recognise an
/// unchanged record. Failed fetches are not cached.
pub struct CachingRepository {
    inner: Arc<dyn AirQualityRepository>,
    ttl: Duration,
    entries: Mutex<HashMap<String, (Instant, Arc<RawRecord>)>>,
}

impl CachingRepository {
    pub fn new(inner: Arc<dyn AirQualityRepository>, ttl: Duration) -> Self {
        Self {
            inner,
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    fn cached(&self, city: &str) -> Option<Arc<RawRecord>> {
        let entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries
            .get(city)
            .filter(|(fetched_at, _)| fetched_at.elapsed() < self.ttl)
            .map(|(_, record)| record.clone())
    }
}

#[async_trait]
impl AirQualityRepository for CachingRepository {
    async fn fetch_hourly(&self, city: &City) -> Result<Arc<RawRecord>> {
        if let Some(record) = self.cached(&city.name) {
            tracing::debug!("Record cache hit for {}", city.name);
            return Ok(record);
        }

        let record = self.inner.fetch_hourly(city).await?;
        self.entries
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(city.name.clone(), (Instant::now(), record.clone()));
        Ok(record)
    }
}
