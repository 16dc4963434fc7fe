use crate::types::category::Category;
use crate::types::metric::Metric;
use crate::weather_data::error::DataSourceError;
use chrono::NaiveDate;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DashboardError {
    #[error(transparent)]
    DataSource(#[from] DataSourceError),

    #[error("No weather station named '{name}'")]
    StationNotFound { name: String },

    #[error("Start date {start} is after end date {end}")]
    InvalidDateRange { start: NaiveDate, end: NaiveDate },

    #[error("Invalid region code '{0}'")]
    InvalidRegion(String),

    #[error("Cannot render {category}: missing columns {missing:?}")]
    MissingColumns {
        category: Category,
        missing: Vec<Metric>,
    },

    #[error("Failed to create cache directory '{0}'")]
    CacheDirCreation(PathBuf, #[source] anyhow::Error),

    #[error("Failed to determine cache directory")]
    CacheDirResolution(#[source] anyhow::Error),
}
