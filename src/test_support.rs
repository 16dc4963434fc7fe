//! In-memory providers for unit tests.

use crate::stations::provider::StationProvider;
use crate::types::date_range::DateRange;
use crate::types::location::LatLon;
use crate::types::metric::Metric;
use crate::types::observation_table::ObservationTable;
use crate::types::region::RegionCode;
use crate::types::station::StationRecord;
use crate::weather_data::error::DataSourceError;
use crate::weather_data::provider::ObservationProvider;
use chrono::NaiveDate;
use std::io;
use std::sync::atomic::{AtomicUsize, Ordering};

fn offline() -> DataSourceError {
    DataSourceError::DownloadIo(io::Error::new(io::ErrorKind::ConnectionRefused, "offline"))
}

/// Returns a fixed list of records for every region, or fails.
pub struct FakeStations {
    records: Option<Vec<StationRecord>>,
    calls: AtomicUsize,
}

impl FakeStations {
    pub fn new(records: Vec<StationRecord>) -> Self {
        Self {
            records: Some(records),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing() -> Self {
        Self {
            records: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl StationProvider for FakeStations {
    async fn fetch_stations(
        &self,
        _region: &RegionCode,
    ) -> Result<Vec<StationRecord>, DataSourceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.records.clone().ok_or_else(offline)
    }
}

/// Returns a fixed table for every request, or fails, counting calls.
pub struct FakeObservations {
    table: Option<ObservationTable>,
    calls: AtomicUsize,
}

impl FakeObservations {
    pub fn new(table: ObservationTable) -> Self {
        Self {
            table: Some(table),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing() -> Self {
        Self {
            table: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl ObservationProvider for FakeObservations {
    async fn fetch_daily(
        &self,
        _location: LatLon,
        _range: &DateRange,
    ) -> Result<ObservationTable, DataSourceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.table.clone().ok_or_else(offline)
    }
}

/// A table with the given dates and metrics; values are `day index + metric index`.
pub fn table(dates: &[&str], metrics: &[Metric]) -> ObservationTable {
    let dates: Vec<NaiveDate> = dates
        .iter()
        .map(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap())
        .collect();
    let columns = metrics.iter().enumerate().map(|(m, metric)| {
        let values = (0..dates.len()).map(|i| Some((i + m) as f64)).collect();
        (*metric, values)
    });
    ObservationTable::from_columns(dates.clone(), columns).unwrap()
}
