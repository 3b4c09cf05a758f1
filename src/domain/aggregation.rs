// Window averages and highlight trends
use super::error::DashboardError;
use super::telemetry::{Pollutant, RawRecord};
use serde::Serialize;

/// Arithmetic mean of each pollutant over a slice, kept at full precision.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Averages {
    pub pm2_5: f64,
    pub pm10: f64,
    pub co: f64,
    pub no2: f64,
    pub so2: f64,
    pub o3: f64,
}

impl Averages {
    /// Average every pollutant series. Accepts a `Slice` through deref.
    ///
    /// An empty series has no mean and yields `EmptySlice` rather than zero.
    pub fn compute(record: &RawRecord) -> Result<Self, DashboardError> {
        Ok(Self {
            pm2_5: mean(record.series(Pollutant::Pm2_5))?,
            pm10: mean(record.series(Pollutant::Pm10))?,
            co: mean(record.series(Pollutant::CarbonMonoxide))?,
            no2: mean(record.series(Pollutant::NitrogenDioxide))?,
            so2: mean(record.series(Pollutant::SulphurDioxide))?,
            o3: mean(record.series(Pollutant::Ozone))?,
        })
    }

    pub fn get(&self, pollutant: Pollutant) -> f64 {
        match pollutant {
            Pollutant::Pm2_5 => self.pm2_5,
            Pollutant::Pm10 => self.pm10,
            Pollutant::CarbonMonoxide => self.co,
            Pollutant::NitrogenDioxide => self.no2,
            Pollutant::SulphurDioxide => self.so2,
            Pollutant::Ozone => self.o3,
        }
    }
}

pub fn mean(values: &[f64]) -> Result<f64, DashboardError> {
    if values.is_empty() {
        return Err(DashboardError::EmptySlice);
    }
    Ok(values.iter().sum::<f64>() / values.len() as f64)
}

/// Percent change of `current` against `baseline`, rounded to a whole percent.
///
/// `None` when the baseline is zero or not finite.
pub fn trend_percent(current: f64, baseline: f64) -> Option<f64> {
    if baseline == 0.0 || !baseline.is_finite() || !current.is_finite() {
        return None;
    }
    Some(((current - baseline) / baseline * 100.0).round())
}
