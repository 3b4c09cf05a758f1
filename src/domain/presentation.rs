// View models handed to the chart and table renderers
use super::aggregation::{mean, trend_percent, Averages};
use super::error::DashboardError;
use super::telemetry::{Pollutant, Slice, TimeWindow};
use chrono::{DateTime, Local, NaiveDateTime};
use serde::Serialize;

const MICROGRAMS: &str = "µg/m³";

/// A single highlighted value shown above the charts
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TileData {
    pub id: String,
    pub title: String,
    pub unit: Option<String>,
    pub value: f64,
    pub display: String,
    /// Change of the current hour against the window mean, in percent
    pub trend: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimelinePoint {
    pub label: String,
    pub aqi: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LabeledValue {
    pub label: String,
    pub value: f64,
}

/// Six pollutant values in the fixed label order
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    pub title: String,
    pub values: Vec<LabeledValue>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesData {
    pub id: String,
    pub name: String,
    pub values: Vec<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ChartKind {
    Line,
    Bar,
}

/// Several series sharing one label axis
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartData {
    pub id: String,
    pub title: String,
    pub kind: ChartKind,
    pub labels: Vec<String>,
    pub series: Vec<SeriesData>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableRow {
    pub time: String,
    pub pm2_5: String,
    pub pm10: String,
    pub co: String,
    pub no2: String,
    pub so2: String,
    pub o3: String,
    pub aqi: u32,
}

/// Render an hourly timestamp as `HH:mm`.
///
/// Offset-less timestamps are already wall-clock local time. Timestamps with
/// an offset or `Z`, with or without seconds, are converted to local time.
/// Anything that does not parse is returned unchanged.
pub fn format_hour_label(timestamp: &str) -> String {
    for pattern in ["%Y-%m-%dT%H:%M", "%Y-%m-%dT%H:%M:%S"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(timestamp, pattern) {
            return naive.format("%H:%M").to_string();
        }
    }

    // %#z takes `Z`, `+01`, `+0100` and `+01:00`
    let with_offset = DateTime::parse_from_str(timestamp, "%Y-%m-%dT%H:%M%#z")
        .or_else(|_| DateTime::parse_from_rfc3339(timestamp));
    match with_offset {
        Ok(time) => time.with_timezone(&Local).format("%H:%M").to_string(),
        Err(e) => {
            tracing::warn!("Unparseable timestamp {:?}: {}", timestamp, e);
            timestamp.to_string()
        }
    }
}

pub fn format_one_decimal(value: f64) -> String {
    format!("{:.1}", value)
}

pub fn time_labels(slice: &Slice) -> Vec<String> {
    slice.time.iter().map(|t| format_hour_label(t)).collect()
}

pub fn timeline(slice: &Slice, labels: &[String]) -> Vec<TimelinePoint> {
    labels
        .iter()
        .zip(&slice.european_aqi)
        .map(|(label, aqi)| TimelinePoint {
            label: label.clone(),
            aqi: *aqi,
        })
        .collect()
}

pub fn distribution(averages: &Averages, window: TimeWindow) -> Snapshot {
    Snapshot {
        title: format!("{} Average", window),
        values: labeled(|p| averages.get(p)),
    }
}

/// Pollutant values at the first hour of the slice
pub fn comparison(slice: &Slice) -> Result<Snapshot, DashboardError> {
    let first = first_hour(slice)?;
    Ok(Snapshot {
        title: format!("Current ({})", first),
        values: labeled(|p| slice.series(p)[0]),
    })
}

pub fn particulates(slice: &Slice, labels: &[String]) -> ChartData {
    ChartData {
        id: "particulates".to_string(),
        title: "PM2.5 vs PM10".to_string(),
        kind: ChartKind::Bar,
        labels: labels.to_vec(),
        series: series_for(slice, &[Pollutant::Pm2_5, Pollutant::Pm10]),
    }
}

pub fn gases(slice: &Slice, labels: &[String]) -> ChartData {
    ChartData {
        id: "gases".to_string(),
        title: "Gas Pollutants".to_string(),
        kind: ChartKind::Line,
        labels: labels.to_vec(),
        series: series_for(
            slice,
            &[
                Pollutant::NitrogenDioxide,
                Pollutant::SulphurDioxide,
                Pollutant::Ozone,
            ],
        ),
    }
}

pub fn table_rows(slice: &Slice, labels: &[String]) -> Vec<TableRow> {
    labels
        .iter()
        .enumerate()
        .map(|(i, label)| TableRow {
            time: label.clone(),
            pm2_5: format_one_decimal(slice.pm2_5[i]),
            pm10: format_one_decimal(slice.pm10[i]),
            co: format_one_decimal(slice.carbon_monoxide[i]),
            no2: format_one_decimal(slice.nitrogen_dioxide[i]),
            so2: format_one_decimal(slice.sulphur_dioxide[i]),
            o3: format_one_decimal(slice.ozone[i]),
            aqi: slice.european_aqi[i],
        })
        .collect()
}

/// Current AQI, PM2.5, PM10 and ozone with their trend against the window mean
pub fn stat_highlights(slice: &Slice, averages: &Averages) -> Result<Vec<TileData>, DashboardError> {
    if slice.is_empty() {
        return Err(DashboardError::EmptySlice);
    }

    let aqi = slice.european_aqi[0] as f64;
    let aqi_values: Vec<f64> = slice.european_aqi.iter().map(|v| *v as f64).collect();
    let aqi_mean = mean(&aqi_values)?;

    let mut tiles = vec![TileData {
        id: "aqi".to_string(),
        title: "Current AQI".to_string(),
        unit: None,
        value: aqi,
        display: slice.european_aqi[0].to_string(),
        trend: trend_percent(aqi, aqi_mean),
    }];

    for (pollutant, title) in [
        (Pollutant::Pm2_5, "PM2.5"),
        (Pollutant::Pm10, "PM10"),
        (Pollutant::Ozone, "Ozone"),
    ] {
        let value = slice.series(pollutant)[0];
        tiles.push(TileData {
            id: pollutant.key().to_string(),
            title: title.to_string(),
            unit: Some(MICROGRAMS.to_string()),
            value,
            display: format_one_decimal(value),
            trend: trend_percent(value, averages.get(pollutant)),
        });
    }

    Ok(tiles)
}

fn first_hour(slice: &Slice) -> Result<String, DashboardError> {
    slice
        .time
        .first()
        .map(|t| format_hour_label(t))
        .ok_or(DashboardError::EmptySlice)
}

fn labeled(value_of: impl Fn(Pollutant) -> f64) -> Vec<LabeledValue> {
    Pollutant::ALL
        .iter()
        .map(|p| LabeledValue {
            label: p.label().to_string(),
            value: value_of(*p),
        })
        .collect()
}

fn series_for(slice: &Slice, pollutants: &[Pollutant]) -> Vec<SeriesData> {
    pollutants
        .iter()
        .map(|p| SeriesData {
            id: p.key().to_string(),
            name: p.label().to_string(),
            values: slice.series(*p).to_vec(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::telemetry::{sample_record, RawRecord};
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_format_hour_label() {
        assert_eq!(format_hour_label("2024-01-01T05:00"), "05:00");
        assert_eq!(format_hour_label("2024-01-01T23:00:00"), "23:00");
        assert_eq!(format_hour_label("not a time"), "not a time");
    }

    #[test]
    fn test_format_hour_label_with_offset() {
        let four_utc = Utc
            .with_ymd_and_hms(2024, 1, 1, 4, 0, 0)
            .unwrap()
            .with_timezone(&Local)
            .format("%H:%M")
            .to_string();
        let five_utc = Utc
            .with_ymd_and_hms(2024, 1, 1, 5, 0, 0)
            .unwrap()
            .with_timezone(&Local)
            .format("%H:%M")
            .to_string();

        assert_eq!(format_hour_label("2024-01-01T05:00+01:00"), four_utc);
        assert_eq!(format_hour_label("2024-01-01T05:00+0100"), four_utc);
        assert_eq!(format_hour_label("2024-01-01T05:00Z"), five_utc);
        assert_eq!(format_hour_label("2024-01-01T05:00:00+01:00"), four_utc);
        assert_eq!(format_hour_label("2024-01-01T05:00:00Z"), five_utc);
    }

    #[test]
    fn test_stat_highlights_on_empty_slice() {
        let slice = RawRecord::default().slice(TimeWindow::Day);
        let averages = Averages {
            pm2_5: 0.0,
            pm10: 0.0,
            co: 0.0,
            no2: 0.0,
            so2: 0.0,
            o3: 0.0,
        };
        assert_eq!(stat_highlights(&slice, &averages), Err(DashboardError::EmptySlice));
    }

    #[test]
    fn test_single_hour_table() {
        let record = RawRecord {
            time: vec!["2024-01-01T05:00".to_string()],
            pm2_5: vec![12.34],
            pm10: vec![20.0],
            carbon_monoxide: vec![201.46],
            nitrogen_dioxide: vec![7.0],
            sulphur_dioxide: vec![1.26],
            ozone: vec![55.55],
            european_aqi: vec![42],
        };
        let slice = record.slice(TimeWindow::Day);
        let rows = table_rows(&slice, &time_labels(&slice));

        assert_eq!(rows.len(), 1);
        let row = &rows[0];
        assert_eq!(row.time, "05:00");
        assert_eq!(row.pm2_5, "12.3");
        assert_eq!(row.pm10, "20.0");
        assert_eq!(row.co, "201.5");
        assert_eq!(row.no2, "7.0");
        assert_eq!(row.so2, "1.3");
        assert_eq!(row.aqi, 42);
    }

    #[test]
    fn test_snapshots_use_fixed_label_order() {
        let slice = sample_record(30).slice(TimeWindow::Day);
        let averages = Averages::compute(&slice).unwrap();

        let dist = distribution(&averages, slice.window());
        let labels: Vec<_> = dist.values.iter().map(|v| v.label.as_str()).collect();
        assert_eq!(labels, ["PM2.5", "PM10", "CO", "NO2", "SO2", "O3"]);
        assert_eq!(dist.title, "24h Average");
        assert_eq!(dist.values[0].value, averages.pm2_5);

        let cmp = comparison(&slice).unwrap();
        let values: Vec<_> = cmp.values.iter().map(|v| v.value).collect();
        assert_eq!(values, [10.0, 20.0, 200.0, 30.0, 5.0, 60.0]);
    }

    #[test]
    fn test_charts_align_with_timeline() {
        let slice = sample_record(30).slice(TimeWindow::Day);
        let labels = time_labels(&slice);
        let line = timeline(&slice, &labels);
        let bars = particulates(&slice, &labels);
        let gas = gases(&slice, &labels);

        assert_eq!(line.len(), 24);
        assert_eq!(line[3].label, "03:00");
        assert_eq!(line[3].aqi, 43);
        assert_eq!(bars.labels, labels);
        assert_eq!(bars.series.len(), 2);
        assert_eq!(bars.series[1].values, slice.pm10);
        let ids: Vec<_> = gas.series.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, ["nitrogen_dioxide", "sulphur_dioxide", "ozone"]);
        assert!(gas.series.iter().all(|s| s.values.len() == labels.len()));
    }

    #[test]
    fn test_stat_highlights_take_first_hour() {
        let slice = sample_record(3).slice(TimeWindow::Day);
        let averages = Averages::compute(&slice).unwrap();
        let tiles = stat_highlights(&slice, &averages).unwrap();

        let ids: Vec<_> = tiles.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, ["aqi", "pm2_5", "pm10", "ozone"]);
        assert_eq!(tiles[0].display, "40");
        assert_eq!(tiles[0].unit, None);
        // aqi 40 against a mean of 41
        assert_eq!(tiles[0].trend, Some(-2.0));
        assert_eq!(tiles[1].display, "10.0");
        assert_eq!(tiles[1].trend, Some(-9.0));
        assert_eq!(tiles[3].unit.as_deref(), Some("µg/m³"));
    }

    #[test]
    fn test_empty_slice_has_no_highlights() {
        let slice = RawRecord::default().slice(TimeWindow::Day);
        assert!(comparison(&slice).is_err());
    }
}
