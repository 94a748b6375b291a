// Repository layer for read-only report queries

pub mod queries;
pub mod report;

pub use report::{ReportRepository, ReportStore};
