// Domain layer - Telemetry model and the slice/aggregate/map pipeline
pub mod aggregation;
pub mod city;
pub mod dashboard;
pub mod error;
pub mod presentation;
pub mod telemetry;
