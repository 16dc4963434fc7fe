mod cache;
mod dashboard;
mod error;
mod panels;
mod stations;
mod types;
mod utils;
mod weather_data;

#[cfg(test)]
mod test_support;

pub use dashboard::*;
pub use error::DashboardError;

pub use cache::{CacheEntry, ObservationCache, ObservationKey, TtlCache, DEFAULT_TTL};

pub use types::category::{Category, CategoryFilter, ChartKind, UnknownCategory, ALL_LABEL};
pub use types::date_range::{DateRange, DISPLAY_DATE_FORMAT};
pub use types::location::LatLon;
pub use types::metric::Metric;
pub use types::observation_table::ObservationTable;
pub use types::region::RegionCode;
pub use types::station::*;

pub use panels::panel::*;
pub use panels::registry::{PanelRegistry, PanelSpec};
pub use panels::sink::*;

pub use stations::catalog::{station_names, StationCatalog};
pub use stations::locate_station::StationLocator;
pub use stations::meteostat_provider::MeteostatStations;
pub use stations::provider::StationProvider;

pub use weather_data::data_loader::{filter_range, WeatherDataLoader, DAILY_SCHEMA};
pub use weather_data::error::DataSourceError;
pub use weather_data::fetcher::ObservationFetcher;
pub use weather_data::meteostat_provider::{
    MeteostatObservations, DEFAULT_MAX_DISTANCE_KM, DEFAULT_STATION_LIMIT,
};
pub use weather_data::provider::ObservationProvider;
