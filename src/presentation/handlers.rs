// HTTP request handlers
use crate::domain::telemetry::TimeWindow;
use crate::infrastructure::chunked_stream::stream_from_receiver;
use crate::infrastructure::http_response::{accepts_brotli, json_response};
use crate::presentation::api_error::ApiError;
use crate::presentation::app_state::AppState;
use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Deserialize)]
pub struct RangeQuery {
    pub hours: Option<String>,
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Serialize)]
pub struct LoginResponse {
    pub token: String,
}

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let token = state
        .auth_service
        .login(&request.username, &request.password)?;
    Ok(Json(LoginResponse { token }))
}

pub async fn logout(
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> Result<StatusCode, ApiError> {
    state.auth_service.logout(bearer_token(&headers))?;
    Ok(StatusCode::NO_CONTENT)
}

/// List the selectable cities
pub async fn list_cities(
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> Result<Response, ApiError> {
    state.auth_service.authorize(bearer_token(&headers))?;

    let cities = state.city_service.list_cities();
    Ok(into_response(json_response(StatusCode::OK, &cities, accepts_brotli(&headers)).await))
}

/// Full dashboard for a city and time window
pub async fn get_dashboard(
    Path(city): Path<String>,
    Query(query): Query<RangeQuery>,
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> Result<Response, ApiError> {
    state.auth_service.authorize(bearer_token(&headers))?;
    let window = parse_window(&query)?;

    let dashboard = state.dashboard_service.get_dashboard(&city, window).await?;
    Ok(into_response(
        json_response(StatusCode::OK, dashboard.as_ref(), accepts_brotli(&headers)).await,
    ))
}

/// Stream dashboard for a city (progressive loading)
pub async fn stream_dashboard(
    Path(city): Path<String>,
    Query(query): Query<RangeQuery>,
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> Result<Response, ApiError> {
    state.auth_service.authorize(bearer_token(&headers))?;
    let window = parse_window(&query)?;

    let rx = state.streaming_service.stream_dashboard(&city, window)?;
    Ok(stream_from_receiver(rx, accepts_brotli(&headers)))
}

fn parse_window(query: &RangeQuery) -> Result<TimeWindow, ApiError> {
    match query.hours.as_deref() {
        Some(hours) => Ok(TimeWindow::try_from(hours)?),
        None => Ok(TimeWindow::default()),
    }
}

/// Token from `Authorization: Bearer <token>`; empty when absent
fn bearer_token(headers: &HeaderMap) -> &str {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .unwrap_or_default()
}

fn into_response(result: Result<Response, StatusCode>) -> Response {
    match result {
        Ok(response) => response,
        Err(status) => status.into_response(),
    }
}
