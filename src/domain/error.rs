// Failure modes of the dashboard pipeline
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum DashboardError {
    /// No record is available for the selection (fetch failed or still pending)
    #[error("no air quality data available")]
    MissingData,

    #[error("series {series} has {actual} entries, expected {expected}")]
    MalformedRecord {
        series: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("time window contains no hours")]
    EmptySlice,

    #[error("unknown city: {0}")]
    UnknownCity(String),

    #[error("unsupported time window: {0} (expected 24h, 48h or 72h)")]
    InvalidWindow(String),
}

impl DashboardError {
    /// Errors that the UI collapses into a single "failed to load" message
    pub fn is_no_data(&self) -> bool {
        matches!(
            self,
            DashboardError::MissingData
                | DashboardError::MalformedRecord { .. }
                | DashboardError::EmptySlice
        )
    }
}
