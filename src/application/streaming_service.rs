// Streaming dashboard service - Progressive loading over a chunked response
use crate::application::city_service::CityService;
use crate::application::dashboard_service::DashboardService;
use crate::domain::dashboard::Dashboard;
use crate::domain::error::DashboardError;
use crate::domain::presentation::{ChartData, Snapshot, TableRow, TileData, TimelinePoint};
use crate::domain::telemetry::TimeWindow;
use serde::Serialize;
use std::time::Instant;
use tokio::sync::mpsc;

pub const LOAD_FAILED_MESSAGE: &str = "Failed to load air quality data";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StreamMessage {
    Skeleton {
        city: String,
        window: TimeWindow,
        views: Vec<String>,
    },
    Stats {
        tiles: Vec<TileData>,
    },
    View {
        id: String,
        data: ViewData,
    },
    Complete {
        views: usize,
        duration_ms: i64,
    },
    Error {
        message: String,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ViewData {
    Timeline(Vec<TimelinePoint>),
    Snapshot(Snapshot),
    Chart(ChartData),
    Table(Vec<TableRow>),
}

#[derive(Clone)]
pub struct StreamingDashboardService {
    cities: CityService,
    dashboards: DashboardService,
}

impl StreamingDashboardService {
    pub fn new(cities: CityService, dashboards: DashboardService) -> Self {
        Self { cities, dashboards }
    }

    /// Start streaming a dashboard.
    ///
    /// The skeleton is sent before the upstream fetch resolves; views follow
    /// once the record is available, or a single error message if it is not.
    pub fn stream_dashboard(
        &self,
        city_name: &str,
        window: TimeWindow,
    ) -> Result<mpsc::Receiver<StreamMessage>, DashboardError> {
        let city = self.cities.find(city_name)?.clone();
        let (tx, rx) = mpsc::channel(16);
        let dashboards = self.dashboards.clone();
        let start_time = Instant::now();

        tokio::spawn(async move {
            let skeleton = StreamMessage::Skeleton {
                city: city.name.clone(),
                window,
                views: Dashboard::view_ids().iter().map(|v| v.to_string()).collect(),
            };
            if tx.send(skeleton).await.is_err() {
                tracing::debug!("Stream for {} closed before skeleton", city.name);
                return;
            }

            let dashboard = match dashboards.get_dashboard(&city.name, window).await {
                Ok(dashboard) => dashboard,
                Err(e) => {
                    tracing::debug!("Streaming {} ({}) failed: {}", city.name, window, e);
                    let _ = tx
                        .send(StreamMessage::Error {
                            message: LOAD_FAILED_MESSAGE.to_string(),
                        })
                        .await;
                    return;
                }
            };

            let mut messages = vec![StreamMessage::Stats {
                tiles: dashboard.stats.clone(),
            }];
            messages.extend(view_messages(&dashboard));
            let views = messages.len() - 1;

            for msg in messages {
                if tx.send(msg).await.is_err() {
                    tracing::debug!("Client went away while streaming {}", city.name);
                    return;
                }
            }

            let duration_ms = start_time.elapsed().as_millis() as i64;
            let _ = tx.send(StreamMessage::Complete { views, duration_ms }).await;
        });

        Ok(rx)
    }
}

fn view_messages(dashboard: &Dashboard) -> Vec<StreamMessage> {
    let [timeline, distribution, comparison, particulates, gases, table] = Dashboard::view_ids();
    [
        (timeline, ViewData::Timeline(dashboard.timeline.clone())),
        (distribution, ViewData::Snapshot(dashboard.distribution.clone())),
        (comparison, ViewData::Snapshot(dashboard.comparison.clone())),
        (particulates, ViewData::Chart(dashboard.particulates.clone())),
        (gases, ViewData::Chart(dashboard.gases.clone())),
        (table, ViewData::Table(dashboard.table.clone())),
    ]
    .into_iter()
    .map(|(id, data)| StreamMessage::View {
        id: id.to_string(),
        data,
    })
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::dashboard_service::tests::FakeRepository;
    use crate::domain::city::default_cities;
    use crate::domain::telemetry::sample_record;
    use std::sync::Arc;

    fn service(repository: FakeRepository) -> StreamingDashboardService {
        let cities = CityService::new(default_cities());
        let dashboards = DashboardService::new(Arc::new(repository), cities.clone());
        StreamingDashboardService::new(cities, dashboards)
    }

    async fn collect(mut rx: mpsc::Receiver<StreamMessage>) -> Vec<StreamMessage> {
        let mut messages = Vec::new();
        while let Some(msg) = rx.recv().await {
            messages.push(msg);
        }
        messages
    }

    #[tokio::test]
    async fn test_stream_order() {
        let service = service(FakeRepository::serving(sample_record(48)));
        let rx = service.stream_dashboard("Berlin", TimeWindow::Day).unwrap();
        let messages = collect(rx).await;

        assert_eq!(messages.len(), 9);
        assert!(matches!(&messages[0], StreamMessage::Skeleton { city, views, .. }
            if city == "Berlin" && views.len() == 6));
        assert!(matches!(&messages[1], StreamMessage::Stats { tiles } if tiles.len() == 4));
        assert!(matches!(&messages[2], StreamMessage::View { id, data: ViewData::Timeline(points) }
            if id == "timeline" && points.len() == 24));
        assert!(matches!(&messages[7], StreamMessage::View { id, data: ViewData::Table(_) }
            if id == "table"));
        assert!(matches!(&messages[8], StreamMessage::Complete { views: 6, .. }));
    }

    #[tokio::test]
    async fn test_stream_reports_generic_error() {
        let service = service(FakeRepository::failing());
        let rx = service.stream_dashboard("Berlin", TimeWindow::Day).unwrap();
        let messages = collect(rx).await;

        assert_eq!(messages.len(), 2);
        assert_eq!(
            messages[1],
            StreamMessage::Error {
                message: LOAD_FAILED_MESSAGE.to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_unknown_city_fails_before_streaming() {
        let service = service(FakeRepository::serving(sample_record(24)));
        assert!(service.stream_dashboard("Gotham", TimeWindow::Day).is_err());
    }

    #[test]
    fn test_message_json_shape() {
        let msg = StreamMessage::Complete {
            views: 6,
            duration_ms: 12,
        };
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["type"], "complete");
        assert_eq!(json["views"], 6);
    }
}
