// Hourly air-quality telemetry and time-window slicing
use super::error::DashboardError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Deref;

/// One upstream payload: parallel hourly series, index `i` is the same hour everywhere.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawRecord {
    pub time: Vec<String>,
    pub pm2_5: Vec<f64>,
    pub pm10: Vec<f64>,
    pub carbon_monoxide: Vec<f64>,
    pub nitrogen_dioxide: Vec<f64>,
    pub sulphur_dioxide: Vec<f64>,
    pub ozone: Vec<f64>,
    pub european_aqi: Vec<u32>,
}

impl RawRecord {
    /// Number of hours, as given by the `time` axis
    pub fn len(&self) -> usize {
        self.time.len()
    }

    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }

    pub fn series(&self, pollutant: Pollutant) -> &[f64] {
        match pollutant {
            Pollutant::Pm2_5 => &self.pm2_5,
            Pollutant::Pm10 => &self.pm10,
            Pollutant::CarbonMonoxide => &self.carbon_monoxide,
            Pollutant::NitrogenDioxide => &self.nitrogen_dioxide,
            Pollutant::SulphurDioxide => &self.sulphur_dioxide,
            Pollutant::Ozone => &self.ozone,
        }
    }

    /// Check that every series has as many entries as the `time` axis.
    pub fn validate(&self) -> Result<(), DashboardError> {
        let expected = self.len();
        let lengths = Pollutant::ALL
            .iter()
            .map(|p| (p.key(), self.series(*p).len()))
            .chain(std::iter::once(("european_aqi", self.european_aqi.len())));

        for (series, actual) in lengths {
            if actual != expected {
                return Err(DashboardError::MalformedRecord {
                    series,
                    expected,
                    actual,
                });
            }
        }
        Ok(())
    }

    /// Keep the first `window` hours of every series.
    ///
    /// Windows longer than the record clamp to its length.
    pub fn slice(&self, window: TimeWindow) -> Slice {
        Slice {
            window,
            record: self.first_hours(window.hours()),
        }
    }

    /// Truncate every series to at most `hours` entries.
    ///
    /// Each series is clamped on its own, so a record that skipped `validate`
    /// still truncates without panicking.
    pub fn first_hours(&self, hours: usize) -> RawRecord {
        let n = hours.min(self.len());
        RawRecord {
            time: self.time.iter().take(n).cloned().collect(),
            pm2_5: head(&self.pm2_5, n),
            pm10: head(&self.pm10, n),
            carbon_monoxide: head(&self.carbon_monoxide, n),
            nitrogen_dioxide: head(&self.nitrogen_dioxide, n),
            sulphur_dioxide: head(&self.sulphur_dioxide, n),
            ozone: head(&self.ozone, n),
            european_aqi: head(&self.european_aqi, n),
        }
    }
}

fn head<T: Copy>(values: &[T], n: usize) -> Vec<T> {
    values[..n.min(values.len())].to_vec()
}

/// A record truncated to a time window.
#[derive(Debug, Clone, PartialEq)]
pub struct Slice {
    window: TimeWindow,
    record: RawRecord,
}

impl Slice {
    pub fn window(&self) -> TimeWindow {
        self.window
    }
}

impl Deref for Slice {
    type Target = RawRecord;

    fn deref(&self) -> &RawRecord {
        &self.record
    }
}

/// Hour window selectable on the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum TimeWindow {
    #[default]
    Day,
    TwoDays,
    ThreeDays,
}

impl TimeWindow {
    pub const ALL: [TimeWindow; 3] = [TimeWindow::Day, TimeWindow::TwoDays, TimeWindow::ThreeDays];

    pub fn hours(self) -> usize {
        match self {
            TimeWindow::Day => 24,
            TimeWindow::TwoDays => 48,
            TimeWindow::ThreeDays => 72,
        }
    }
}

impl TryFrom<u32> for TimeWindow {
    type Error = DashboardError;

    fn try_from(hours: u32) -> Result<Self, Self::Error> {
        TimeWindow::ALL
            .into_iter()
            .find(|w| w.hours() == hours as usize)
            .ok_or_else(|| DashboardError::InvalidWindow(hours.to_string()))
    }
}

impl TryFrom<&str> for TimeWindow {
    type Error = DashboardError;

    /// Accepts `24` as well as `24h`. Signs and repeated suffixes are rejected.
    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let trimmed = value.trim();
        let digits = trimmed.strip_suffix('h').unwrap_or(trimmed);
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(DashboardError::InvalidWindow(value.to_string()));
        }
        digits
            .parse::<u32>()
            .map_err(|_| DashboardError::InvalidWindow(value.to_string()))
            .and_then(TimeWindow::try_from)
    }
}

impl TryFrom<String> for TimeWindow {
    type Error = DashboardError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        TimeWindow::try_from(value.as_str())
    }
}

impl From<TimeWindow> for String {
    fn from(window: TimeWindow) -> Self {
        window.to_string()
    }
}

impl fmt::Display for TimeWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}h", self.hours())
    }
}

/// The six averaged pollutants, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Pollutant {
    Pm2_5,
    Pm10,
    CarbonMonoxide,
    NitrogenDioxide,
    SulphurDioxide,
    Ozone,
}

impl Pollutant {
    pub const ALL: [Pollutant; 6] = [
        Pollutant::Pm2_5,
        Pollutant::Pm10,
        Pollutant::CarbonMonoxide,
        Pollutant::NitrogenDioxide,
        Pollutant::SulphurDioxide,
        Pollutant::Ozone,
    ];

    /// Upstream field name
    pub fn key(self) -> &'static str {
        match self {
            Pollutant::Pm2_5 => "pm2_5",
            Pollutant::Pm10 => "pm10",
            Pollutant::CarbonMonoxide => "carbon_monoxide",
            Pollutant::NitrogenDioxide => "nitrogen_dioxide",
            Pollutant::SulphurDioxide => "sulphur_dioxide",
            Pollutant::Ozone => "ozone",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Pollutant::Pm2_5 => "PM2.5",
            Pollutant::Pm10 => "PM10",
            Pollutant::CarbonMonoxide => "CO",
            Pollutant::NitrogenDioxide => "NO2",
            Pollutant::SulphurDioxide => "SO2",
            Pollutant::Ozone => "O3",
        }
    }
}

#[cfg(test)]
pub(crate) fn sample_record(hours: usize) -> RawRecord {
    let values = |base: f64| (0..hours).map(|i| base + i as f64).collect::<Vec<_>>();
    RawRecord {
        time: (0..hours)
            .map(|i| format!("2024-01-{:02}T{:02}:00", 1 + i / 24, i % 24))
            .collect(),
        pm2_5: values(10.0),
        pm10: values(20.0),
        carbon_monoxide: values(200.0),
        nitrogen_dioxide: values(30.0),
        sulphur_dioxide: values(5.0),
        ozone: values(60.0),
        european_aqi: (0..hours).map(|i| 40 + i as u32).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slice_length_is_clamped_window() {
        let record = sample_record(60);
        for window in TimeWindow::ALL {
            let slice = record.slice(window);
            let expected = window.hours().min(60);
            assert_eq!(slice.time.len(), expected);
            for pollutant in Pollutant::ALL {
                assert_eq!(slice.series(pollutant).len(), expected);
            }
            assert_eq!(slice.european_aqi.len(), expected);
        }
    }

    #[test]
    fn test_slice_longer_than_record_returns_record() {
        let record = sample_record(10);
        let slice = record.slice(TimeWindow::ThreeDays);
        assert_eq!(*slice, record);
    }

    #[test]
    fn test_slice_is_idempotent() {
        let record = sample_record(100);
        let once = record.slice(TimeWindow::TwoDays);
        let twice = once.slice(TimeWindow::TwoDays);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_first_hours_keeps_leading_values() {
        let record = RawRecord {
            pm2_5: vec![10.0, 20.0, 30.0],
            european_aqi: vec![1, 2, 3],
            ..sample_record(3)
        };
        let cut = record.first_hours(2);
        assert_eq!(cut.pm2_5, vec![10.0, 20.0]);
        assert_eq!(cut.european_aqi, vec![1, 2]);
        assert_eq!(cut.time, record.time[..2].to_vec());
    }

    #[test]
    fn test_misaligned_record_still_truncates() {
        let mut record = sample_record(30);
        record.ozone.truncate(10);
        let slice = record.slice(TimeWindow::Day);
        assert_eq!(slice.len(), 24);
        assert_eq!(slice.ozone.len(), 10);
    }

    #[test]
    fn test_validate_reports_mismatched_series() {
        let mut record = sample_record(5);
        record.ozone.pop();
        match record.validate() {
            Err(DashboardError::MalformedRecord {
                series,
                expected,
                actual,
            }) => {
                assert_eq!(series, "ozone");
                assert_eq!(expected, 5);
                assert_eq!(actual, 4);
            }
            other => panic!("unexpected result: {:?}", other),
        }
        assert!(sample_record(5).validate().is_ok());
    }

    #[test]
    fn test_window_parsing() {
        assert_eq!(TimeWindow::try_from("24h").unwrap(), TimeWindow::Day);
        assert_eq!(TimeWindow::try_from("48").unwrap(), TimeWindow::TwoDays);
        assert_eq!(TimeWindow::try_from(72u32).unwrap(), TimeWindow::ThreeDays);
        assert!(TimeWindow::try_from("12h").is_err());
        assert!(TimeWindow::try_from("soon").is_err());
        assert!(TimeWindow::try_from("24hhh").is_err());
        assert!(TimeWindow::try_from("+48").is_err());
        assert!(TimeWindow::try_from("h").is_err());
        assert_eq!(TimeWindow::ThreeDays.to_string(), "72h");
    }
}
