// Dashboard service - Use case for building dashboards
use crate::application::air_quality_repository::AirQualityRepository;
use crate::application::city_service::CityService;
use crate::application::view_cache::ViewCache;
use crate::domain::dashboard::Dashboard;
use crate::domain::error::DashboardError;
use crate::domain::telemetry::TimeWindow;
use std::sync::Arc;

#[derive(Clone)]
pub struct DashboardService {
    repository: Arc<dyn AirQualityRepository>,
    cities: CityService,
    views: Arc<ViewCache>,
}

impl DashboardService {
    pub fn new(repository: Arc<dyn AirQualityRepository>, cities: CityService) -> Self {
        Self {
            repository,
            cities,
            views: Arc::new(ViewCache::new()),
        }
    }

    pub async fn get_dashboard(
        &self,
        city_name: &str,
        window: TimeWindow,
    ) -> Result<Arc<Dashboard>, DashboardError> {
        let city = self.cities.find(city_name)?;

        // A failed fetch is indistinguishable from "no data yet" downstream
        let record = match self.repository.fetch_hourly(city).await {
            Ok(record) => record,
            Err(e) => {
                tracing::error!("Error fetching air quality for {}: {:#}", city.name, e);
                return Err(DashboardError::MissingData);
            }
        };

        if let Some(dashboard) = self.views.get(&city.name, window, &record) {
            tracing::debug!("View cache hit for {} ({})", city.name, window);
            return Ok(dashboard);
        }

        let dashboard = match Dashboard::build(city, window, Some(record.as_ref())) {
            Ok(dashboard) => Arc::new(dashboard),
            Err(e) => {
                tracing::warn!("Cannot build dashboard for {} ({}): {}", city.name, window, e);
                return Err(e);
            }
        };

        self.views.store(&city.name, window, record, dashboard.clone());
        tracing::debug!(
            "Built dashboard for {} ({}), {} cached views",
            city.name,
            window,
            self.views.len()
        );

        Ok(dashboard)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::domain::city::{default_cities, City};
    use crate::domain::telemetry::{sample_record, RawRecord};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// Serves a fixed record per call, optionally failing
    pub(crate) struct FakeRepository {
        pub record: Mutex<Option<Arc<RawRecord>>>,
        pub calls: AtomicUsize,
    }

    impl FakeRepository {
        pub fn serving(record: RawRecord) -> Self {
            Self {
                record: Mutex::new(Some(Arc::new(record))),
                calls: AtomicUsize::new(0),
            }
        }

        pub fn failing() -> Self {
            Self {
                record: Mutex::new(None),
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl AirQualityRepository for FakeRepository {
        async fn fetch_hourly(&self, _city: &City) -> anyhow::Result<Arc<RawRecord>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.record
                .lock()
                .unwrap()
                .clone()
                .ok_or_else(|| anyhow::anyhow!("upstream unavailable"))
        }
    }

    fn service(repository: FakeRepository) -> DashboardService {
        DashboardService::new(Arc::new(repository), CityService::new(default_cities()))
    }

    #[tokio::test]
    async fn test_get_dashboard() {
        let service = service(FakeRepository::serving(sample_record(72)));
        let dashboard = service.get_dashboard("paris", TimeWindow::Day).await.unwrap();
        assert_eq!(dashboard.city.name, "Paris");
        assert_eq!(dashboard.hours, 24);
    }

    #[tokio::test]
    async fn test_fetch_failure_is_missing_data() {
        let service = service(FakeRepository::failing());
        let result = service.get_dashboard("Paris", TimeWindow::Day).await;
        assert_eq!(result.unwrap_err(), DashboardError::MissingData);
    }

    #[tokio::test]
    async fn test_unknown_city() {
        let service = service(FakeRepository::serving(sample_record(24)));
        let result = service.get_dashboard("Atlantis", TimeWindow::Day).await;
        assert_eq!(result.unwrap_err(), DashboardError::UnknownCity("Atlantis".to_string()));
    }

    #[tokio::test]
    async fn test_same_record_reuses_view() {
        let service = service(FakeRepository::serving(sample_record(72)));
        let first = service.get_dashboard("Rome", TimeWindow::TwoDays).await.unwrap();
        let second = service.get_dashboard("Rome", TimeWindow::TwoDays).await.unwrap();
        assert!(Arc::ptr_eq(&first, &second));

        let other = service.get_dashboard("Rome", TimeWindow::Day).await.unwrap();
        assert!(!Arc::ptr_eq(&first, &other));
    }

    #[tokio::test]
    async fn test_new_record_rebuilds_view() {
        let repository = Arc::new(FakeRepository::serving(sample_record(72)));
        let service = DashboardService::new(repository.clone(), CityService::new(default_cities()));

        let first = service.get_dashboard("Rome", TimeWindow::Day).await.unwrap();
        *repository.record.lock().unwrap() = Some(Arc::new(sample_record(72)));
        let second = service.get_dashboard("Rome", TimeWindow::Day).await.unwrap();

        assert!(!Arc::ptr_eq(&first, &second));
        assert_eq!(first, second);
        assert_eq!(repository.calls.load(Ordering::SeqCst), 2);
    }
}
