// Application state for HTTP handlers
use crate::application::auth_service::AuthService;
use crate::application::city_service::CityService;
use crate::application::dashboard_service::DashboardService;
use crate::application::streaming_service::StreamingDashboardService;

#[derive(Clone)]
pub struct AppState {
    pub auth_service: AuthService,
    pub city_service: CityService,
    pub dashboard_service: DashboardService,
    pub streaming_service: StreamingDashboardService,
}
