//! Daily observations from the Meteostat bulk data service.
//!
//! A point is resolved to the nearest stations with daily inventory for the requested
//! range. Their rows in range are combined closest first: a value missing at the nearest
//! station, or a metric it does not measure, is taken from the next one that has it.

use crate::cache::TtlCache;
use crate::stations::locate_station::StationLocator;
use crate::stations::meteostat_provider::MeteostatStations;
use crate::types::date_range::DateRange;
use crate::types::location::LatLon;
use crate::types::observation_table::ObservationTable;
use crate::weather_data::data_loader::WeatherDataLoader;
use crate::weather_data::error::DataSourceError;
use crate::weather_data::provider::ObservationProvider;
use bon::bon;
use log::{debug, info, warn};
use reqwest::StatusCode;
use std::sync::Arc;
use std::time::Duration;

/// Default search radius around a point, in km.
pub const DEFAULT_MAX_DISTANCE_KM: f64 = 35.0;
/// Default number of nearby stations to try.
pub const DEFAULT_STATION_LIMIT: usize = 4;

pub struct MeteostatObservations {
    stations: Arc<MeteostatStations>,
    loader: WeatherDataLoader,
    locator: TtlCache<(), Arc<StationLocator>>,
    max_distance_km: f64,
    station_limit: usize,
}

#[bon]
impl MeteostatObservations {
    /// Creates the provider on top of a station list.
    ///
    /// Data files are cached in the station provider's cache folder (if any) and share
    /// its `max_age` unless one is given.
    ///
    /// # Example
    ///
    /// ```no_run
    /// # use std::sync::Arc;
    /// # use swiss_weather_tracker::{MeteostatObservations, MeteostatStations};
    /// # async fn run() -> Result<(), swiss_weather_tracker::DashboardError> {
    /// let stations = Arc::new(MeteostatStations::new().await?);
    /// let observations = MeteostatObservations::builder()
    ///     .stations(stations)
    ///     .max_distance_km(20.0)
    ///     .build();
    /// # Ok(())
    /// # }
    /// ```
    #[builder]
    pub fn new(
        stations: Arc<MeteostatStations>,
        max_distance_km: Option<f64>,
        station_limit: Option<usize>,
        max_age: Option<Duration>,
    ) -> Self {
        let max_age = max_age.unwrap_or_else(|| stations.max_age());
        Self {
            loader: WeatherDataLoader::new(stations.cache_folder(), max_age),
            locator: TtlCache::new(stations.max_age()),
            stations,
            max_distance_km: max_distance_km.unwrap_or(DEFAULT_MAX_DISTANCE_KM),
            station_limit: station_limit.unwrap_or(DEFAULT_STATION_LIMIT),
        }
    }

    async fn locator(&self) -> Result<Arc<StationLocator>, DataSourceError> {
        self.locator
            .get_or_load((), || async {
                let records = self.stations.all_records().await?;
                Ok(Arc::new(StationLocator::new(records.as_ref().clone())))
            })
            .await
    }
}

impl ObservationProvider for MeteostatObservations {
    async fn fetch_daily(
        &self,
        location: LatLon,
        range: &DateRange,
    ) -> Result<ObservationTable, DataSourceError> {
        let locator = self.locator().await?;
        let candidates =
            locator.nearest_with_daily(location, range, self.station_limit, self.max_distance_km);
        if candidates.is_empty() {
            info!(
                "No station with daily data within {} km of {:?}",
                self.max_distance_km, location
            );
            return Ok(ObservationTable::empty());
        }

        let mut tables = Vec::new();
        for (station, distance_km) in candidates {
            debug!("Loading station {} at {:.1} km", station.id, distance_km);
            let frame = match self.loader.get_range(&station.id, range).await {
                Ok(frame) => frame,
                Err(DataSourceError::HttpStatus { status, .. }) if status == StatusCode::NOT_FOUND => {
                    warn!("No daily data file for station {}", station.id);
                    continue;
                }
                Err(e) => return Err(e),
            };
            let table = ObservationTable::from_frame(&frame)?;
            debug!(
                "Station {} has {} daily rows for {}",
                station.id,
                table.len(),
                range
            );
            if !table.is_empty() {
                tables.push(table);
            }
        }

        let stations_used = tables.len();
        let table = ObservationTable::fill_gaps(tables)?;
        info!(
            "Loaded {} daily rows from {} station(s) for {}",
            table.len(),
            stations_used,
            range
        );
        Ok(table)
    }
}
