// Open-Meteo air-quality repository implementation
use crate::application::air_quality_repository::AirQualityRepository;
use crate::domain::city::City;
use crate::domain::telemetry::RawRecord;
use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;

const HOURLY_FIELDS: &str =
    "pm10,pm2_5,carbon_monoxide,nitrogen_dioxide,sulphur_dioxide,ozone,european_aqi";

#[derive(Debug, Clone)]
pub struct OpenMeteoRepository {
    base_url: String,
    client: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct AirQualityResponse {
    hourly: HourlyPayload,
}

/// Upstream arrays; any entry may be `null` for hours without a reading
#[derive(Debug, Deserialize)]
struct HourlyPayload {
    time: Vec<String>,
    #[serde(default)]
    pm10: Vec<Option<f64>>,
    #[serde(default)]
    pm2_5: Vec<Option<f64>>,
    #[serde(default)]
    carbon_monoxide: Vec<Option<f64>>,
    #[serde(default)]
    nitrogen_dioxide: Vec<Option<f64>>,
    #[serde(default)]
    sulphur_dioxide: Vec<Option<f64>>,
    #[serde(default)]
    ozone: Vec<Option<f64>>,
    #[serde(default)]
    european_aqi: Vec<Option<f64>>,
}

impl OpenMeteoRepository {
    pub fn new(base_url: String, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    fn build_query_url(&self, city: &City) -> String {
        format!(
            "{}?latitude={}&longitude={}&hourly={}",
            self.base_url,
            city.lat,
            city.lon,
            urlencoding::encode(HOURLY_FIELDS)
        )
    }
}

#[async_trait]
impl AirQualityRepository for OpenMeteoRepository {
    async fn fetch_hourly(&self, city: &City) -> Result<Arc<RawRecord>> {
        let url = self.build_query_url(city);
        tracing::debug!("Fetching air quality for {}: {}", city.name, url);

        let response = self
            .client
            .get(&url)
            .header("Accept", "application/json")
            .send()
            .await
            .context("Failed to send request to air quality API")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Air quality API failed with status {}: {}", status, body);
        }

        let data = response
            .json::<AirQualityResponse>()
            .await
            .context("Failed to parse air quality response")?;

        let record = data.hourly.into_record()?;
        if record.is_empty() {
            tracing::warn!("Air quality API returned no complete hours for {}", city.name);
        } else {
            tracing::debug!("Fetched {} hours for {}", record.len(), city.name);
        }
        Ok(Arc::new(record))
    }
}

impl HourlyPayload {
    /// Convert to a record, dropping every hour where any series lacks a reading.
    ///
    /// Series of different lengths are rejected outright.
    fn into_record(self) -> Result<RawRecord> {
        let expected = self.time.len();
        let series = [
            ("pm10", &self.pm10),
            ("pm2_5", &self.pm2_5),
            ("carbon_monoxide", &self.carbon_monoxide),
            ("nitrogen_dioxide", &self.nitrogen_dioxide),
            ("sulphur_dioxide", &self.sulphur_dioxide),
            ("ozone", &self.ozone),
            ("european_aqi", &self.european_aqi),
        ];
        for (name, values) in series {
            if values.len() != expected {
                anyhow::bail!(
                    "Malformed air quality payload: {} has {} entries, time has {}",
                    name,
                    values.len(),
                    expected
                );
            }
        }

        let mut record = RawRecord::default();
        let mut dropped = 0;
        for (i, time) in self.time.into_iter().enumerate() {
            let hour = (
                self.pm2_5[i],
                self.pm10[i],
                self.carbon_monoxide[i],
                self.nitrogen_dioxide[i],
                self.sulphur_dioxide[i],
                self.ozone[i],
                self.european_aqi[i],
            );
            let (Some(pm2_5), Some(pm10), Some(co), Some(no2), Some(so2), Some(o3), Some(aqi)) = hour
            else {
                dropped += 1;
                continue;
            };

            record.time.push(time);
            record.pm2_5.push(pm2_5);
            record.pm10.push(pm10);
            record.carbon_monoxide.push(co);
            record.nitrogen_dioxide.push(no2);
            record.sulphur_dioxide.push(so2);
            record.ozone.push(o3);
            record.european_aqi.push(aqi.round().max(0.0) as u32);
        }

        if dropped > 0 {
            tracing::debug!("Dropped {} hours with missing readings", dropped);
        }
        Ok(record)
    }
}
