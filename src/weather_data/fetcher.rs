use crate::types::date_range::DateRange;
use crate::types::location::LatLon;
use crate::types::observation_table::ObservationTable;
use crate::weather_data::error::DataSourceError;
use crate::weather_data::provider::ObservationProvider;
use log::debug;

/// Wraps an [`ObservationProvider`] and guarantees the rows it hands back lie within
/// the requested range.
pub struct ObservationFetcher<O> {
    provider: O,
}

impl<O: ObservationProvider> ObservationFetcher<O> {
    pub fn new(provider: O) -> Self {
        Self { provider }
    }

    pub fn provider(&self) -> &O {
        &self.provider
    }

    /// Daily observations at `location` for `[range.start, range.end]`.
    ///
    /// An empty table means no data; provider failures are returned as-is.
    pub async fn fetch_daily(
        &self,
        location: LatLon,
        range: &DateRange,
    ) -> Result<ObservationTable, DataSourceError> {
        let table = self.provider.fetch_daily(location, range).await?;
        let fetched = table.len();
        let table = table.retain_range(range);
        if table.len() != fetched {
            debug!(
                "Dropped {} rows outside {} returned by the provider",
                fetched - table.len(),
                range
            );
        }
        Ok(table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{table, FakeObservations};
    use crate::types::metric::Metric;
    use chrono::NaiveDate;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[tokio::test]
    async fn trims_rows_outside_range() {
        let fetcher = ObservationFetcher::new(FakeObservations::new(table(
            &["2023-12-31", "2024-01-01", "2024-01-02"],
            &[Metric::Precipitation],
        )));
        let range = DateRange::new(d("2024-01-01"), d("2024-01-02")).unwrap();
        let result = fetcher.fetch_daily(LatLon(47.0, 8.0), &range).await.unwrap();
        assert_eq!(result.dates(), &[d("2024-01-01"), d("2024-01-02")]);
    }

    #[tokio::test]
    async fn empty_result_is_not_an_error() {
        let fetcher = ObservationFetcher::new(FakeObservations::new(ObservationTable::empty()));
        let range = DateRange::new(d("2024-01-01"), d("2024-01-02")).unwrap();
        let result = fetcher.fetch_daily(LatLon(47.0, 8.0), &range).await.unwrap();
        assert!(result.is_empty());
    }

    #[tokio::test]
    async fn provider_failure_propagates() {
        let fetcher = ObservationFetcher::new(FakeObservations::failing());
        let range = DateRange::new(d("2024-01-01"), d("2024-01-02")).unwrap();
        let result = fetcher.fetch_daily(LatLon(47.0, 8.0), &range).await;
        assert!(matches!(result, Err(DataSourceError::DownloadIo(_))));
        assert_eq!(fetcher.provider().calls(), 1);
    }
}
