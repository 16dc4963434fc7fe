//! The list of selectable stations for a region, and name → station resolution.

use crate::cache::{TtlCache, DEFAULT_TTL};
use crate::error::DashboardError;
use crate::stations::provider::StationProvider;
use crate::types::region::RegionCode;
use crate::types::station::Station;
use log::{debug, info};
use std::sync::Arc;
use std::time::Duration;

/// Wraps a [`StationProvider`] and memoises each region's usable stations.
pub struct StationCatalog<P> {
    provider: P,
    stations: TtlCache<RegionCode, Arc<Vec<Station>>>,
}

impl<P: StationProvider> StationCatalog<P> {
    pub fn new(provider: P) -> Self {
        Self::with_ttl(provider, DEFAULT_TTL)
    }

    pub fn with_ttl(provider: P, ttl: Duration) -> Self {
        Self {
            provider,
            stations: TtlCache::new(ttl),
        }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// All stations of `region` that have a name, in provider order.
    ///
    /// Results are cached per region for the catalog's TTL.
    pub async fn list_stations(
        &self,
        region: &RegionCode,
    ) -> Result<Arc<Vec<Station>>, DashboardError> {
        let stations = self
            .stations
            .get_or_load(region.clone(), || async {
                let records = self.provider.fetch_stations(region).await?;
                let total = records.len();
                let stations: Vec<Station> =
                    records.iter().filter_map(|r| r.to_station()).collect();
                info!(
                    "Loaded {} stations for region {} ({} without a name dropped)",
                    stations.len(),
                    region,
                    total - stations.len()
                );
                Ok::<_, DashboardError>(Arc::new(stations))
            })
            .await?;
        debug!("{} stations available in {}", stations.len(), region);
        Ok(stations)
    }

    /// The first station named exactly `name`.
    pub fn resolve<'a>(
        &self,
        stations: &'a [Station],
        name: &str,
    ) -> Result<&'a Station, DashboardError> {
        stations
            .iter()
            .find(|s| s.name == name)
            .ok_or_else(|| DashboardError::StationNotFound {
                name: name.to_string(),
            })
    }
}

/// Station names in list order, as offered for selection.
pub fn station_names(stations: &[Station]) -> Vec<&str> {
    stations.iter().map(|s| s.name.as_str()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::FakeStations;
    use crate::types::station::tests::record;

    fn catalog() -> StationCatalog<FakeStations> {
        StationCatalog::new(FakeStations::new(vec![
            record("06650", &[("en", "Basel / Binningen")], 47.5417, 7.5833),
            record("X0001", &[], 46.5, 7.5),
            record("06660", &[("en", "Zurich / Fluntern")], 47.3833, 8.5667),
            record("X0002", &[("en", "")], 46.6, 7.6),
            record("06700", &[("en", "Geneva")], 46.25, 6.1333),
            record("06701", &[("en", "Geneva")], 46.2, 6.15),
        ]))
    }

    #[tokio::test]
    async fn drops_unnamed_stations_and_keeps_order() {
        let catalog = catalog();
        let stations = catalog.list_stations(&RegionCode::default()).await.unwrap();
        assert!(stations.iter().all(|s| !s.name.is_empty()));
        assert_eq!(
            station_names(&stations),
            vec![
                "Basel / Binningen",
                "Zurich / Fluntern",
                "Geneva",
                "Geneva"
            ]
        );
    }

    #[tokio::test]
    async fn caches_station_list_per_region() {
        let catalog = catalog();
        let region = RegionCode::default();
        catalog.list_stations(&region).await.unwrap();
        catalog.list_stations(&region).await.unwrap();
        assert_eq!(catalog.provider().calls(), 1);
    }

    #[tokio::test]
    async fn resolve_returns_first_match_deterministically() {
        let catalog = catalog();
        let stations = catalog.list_stations(&RegionCode::default()).await.unwrap();
        let first = catalog.resolve(&stations, "Geneva").unwrap();
        let again = catalog.resolve(&stations, "Geneva").unwrap();
        assert_eq!(first.id, "06700");
        assert_eq!(first, again);
    }

    #[tokio::test]
    async fn resolve_unknown_name_fails_cleanly() {
        let catalog = catalog();
        let stations = catalog.list_stations(&RegionCode::default()).await.unwrap();
        let err = catalog.resolve(&stations, "Atlantis").unwrap_err();
        assert!(matches!(err, DashboardError::StationNotFound { name } if name == "Atlantis"));
        assert!(catalog.resolve(&[], "Geneva").is_err());
    }

    #[tokio::test]
    async fn provider_failure_is_propagated() {
        let catalog = StationCatalog::new(FakeStations::failing());
        let err = catalog
            .list_stations(&RegionCode::default())
            .await
            .unwrap_err();
        assert!(matches!(err, DashboardError::DataSource(_)));
    }
}
