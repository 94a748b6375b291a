// Common library shared by the report query service and the report console

pub mod config;
pub mod db;
pub mod errors;
pub mod export;
pub mod models;
pub mod telemetry;
