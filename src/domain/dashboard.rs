// Dashboard domain model
use super::aggregation::Averages;
use super::city::City;
use super::error::DashboardError;
use super::presentation::{self, ChartData, Snapshot, TableRow, TileData, TimelinePoint};
use super::telemetry::{RawRecord, TimeWindow};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    pub city: City,
    pub window: TimeWindow,
    pub hours: usize,
    pub stats: Vec<TileData>,
    pub averages: Averages,
    pub timeline: Vec<TimelinePoint>,
    pub distribution: Snapshot,
    pub comparison: Snapshot,
    pub particulates: ChartData,
    pub gases: ChartData,
    pub table: Vec<TableRow>,
}

impl Dashboard {
    /// Run slice, aggregation and mapping for one (city, window) selection.
    ///
    /// An absent record means the fetch has not produced data.
    pub fn build(
        city: &City,
        window: TimeWindow,
        record: Option<&RawRecord>,
    ) -> Result<Self, DashboardError> {
        let record = record.ok_or(DashboardError::MissingData)?;
        record.validate()?;

        let slice = record.slice(window);
        let averages = Averages::compute(&slice)?;
        let labels = presentation::time_labels(&slice);

        Ok(Self {
            city: city.clone(),
            window,
            hours: slice.len(),
            stats: presentation::stat_highlights(&slice, &averages)?,
            averages,
            timeline: presentation::timeline(&slice, &labels),
            distribution: presentation::distribution(&averages, slice.window()),
            comparison: presentation::comparison(&slice)?,
            particulates: presentation::particulates(&slice, &labels),
            gases: presentation::gases(&slice, &labels),
            table: presentation::table_rows(&slice, &labels),
        })
    }

    /// Identifiers of the views, in the order a client lays them out
    pub fn view_ids() -> [&'static str; 6] {
        ["timeline", "distribution", "comparison", "particulates", "gases", "table"]
    }
}
