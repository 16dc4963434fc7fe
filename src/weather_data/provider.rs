use crate::types::date_range::DateRange;
use crate::types::location::LatLon;
use crate::types::observation_table::ObservationTable;
use crate::weather_data::error::DataSourceError;
use std::future::Future;
use std::sync::Arc;

/// Source of daily observations for a point.
///
/// Returns the rows for the closed interval `[range.start, range.end]`. No data for the
/// location or range is an empty table, not an error.
pub trait ObservationProvider: Send + Sync {
    fn fetch_daily(
        &self,
        location: LatLon,
        range: &DateRange,
    ) -> impl Future<Output = Result<ObservationTable, DataSourceError>> + Send;
}

impl<P: ObservationProvider> ObservationProvider for Arc<P> {
    fn fetch_daily(
        &self,
        location: LatLon,
        range: &DateRange,
    ) -> impl Future<Output = Result<ObservationTable, DataSourceError>> + Send {
        (**self).fetch_daily(location, range)
    }
}
