// Repository trait for air-quality telemetry access
use crate::domain::city::City;
use crate::domain::telemetry::RawRecord;
use async_trait::async_trait;
use std::sync::Arc;

#[async_trait]
pub trait AirQualityRepository: Send + Sync {
    /// Fetch the hourly record for a city.
    ///
    /// Failures are errors, never a partially filled record. The returned
    /// `Arc` doubles as the record identity for view caching.
    async fn fetch_hourly(&self, city: &City) -> anyhow::Result<Arc<RawRecord>>;
}
