// Application layer - Use cases over the repository seam
pub mod air_quality_repository;
pub mod auth_service;
pub mod city_service;
pub mod dashboard_service;
pub mod streaming_service;
pub mod view_cache;
