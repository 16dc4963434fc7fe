//! The dashboard controller: one pass from a user's selection to rendered panels.
//!
//! A run resolves the selected station in its region's station list, loads the station's
//! daily observations for the selected range (through a 24 h cache), and renders every
//! available category the filter allows, in the fixed category order. Nothing survives a
//! run except the station and observation caches.

use crate::cache::{ObservationCache, ObservationKey, DEFAULT_TTL};
use crate::error::DashboardError;
use crate::panels::panel::{Notice, PanelContext};
use crate::panels::registry::PanelRegistry;
use crate::panels::sink::PanelSink;
use crate::stations::catalog::StationCatalog;
use crate::stations::provider::StationProvider;
use crate::types::category::{Category, CategoryFilter};
use crate::types::date_range::DateRange;
use crate::types::region::RegionCode;
use crate::types::station::Station;
use crate::weather_data::error::DataSourceError;
use crate::weather_data::fetcher::ObservationFetcher;
use crate::weather_data::provider::ObservationProvider;
use bon::Builder;
use chrono::NaiveDate;
use log::{debug, warn};
use std::sync::Arc;
use std::time::Duration;

/// Settings of a [`Dashboard`].
///
/// ```
/// use std::time::Duration;
/// use swiss_weather_tracker::DashboardConfig;
///
/// let config = DashboardConfig::builder()
///     .observation_ttl(Duration::from_secs(3600))
///     .build();
/// assert_eq!(config.region.to_string(), "CH");
/// ```
#[derive(Debug, Clone, Builder)]
pub struct DashboardConfig {
    /// Region whose stations are offered when a selection doesn't name one.
    #[builder(default)]
    pub region: RegionCode,
    /// How long a fetched observation table is reused.
    #[builder(default = DEFAULT_TTL)]
    pub observation_ttl: Duration,
    /// How long a region's station list is reused.
    #[builder(default = DEFAULT_TTL)]
    pub station_ttl: Duration,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// Everything the user picked for one run.
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    pub region: RegionCode,
    pub station_name: String,
    pub range: DateRange,
    pub filter: CategoryFilter,
}

impl Selection {
    /// A selection of every category for `station_name` in the default region.
    ///
    /// Fails with [`DashboardError::InvalidDateRange`] if `start > end`.
    pub fn new(
        station_name: impl Into<String>,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Self, DashboardError> {
        Ok(Self {
            region: RegionCode::default(),
            station_name: station_name.into(),
            range: DateRange::new(start, end)?,
            filter: CategoryFilter::All,
        })
    }

    pub fn with_region(mut self, region: RegionCode) -> Self {
        self.region = region;
        self
    }

    pub fn with_filter(mut self, filter: CategoryFilter) -> Self {
        self.filter = filter;
        self
    }
}

/// Where a run is; logged on every transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    StationsLoaded,
    RangeSelected,
    DataReady,
    Empty,
    Rendered,
}

/// How a run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// The station had no rows for the range; a "no data" notice was emitted.
    Empty,
    /// These categories were rendered, in order. May be empty when nothing
    /// available matched the filter.
    Rendered { categories: Vec<Category> },
    /// The run failed and a failure notice was emitted.
    Failed,
}

pub struct Dashboard<S, O> {
    catalog: StationCatalog<S>,
    fetcher: ObservationFetcher<O>,
    registry: PanelRegistry,
    observations: ObservationCache,
    config: DashboardConfig,
}

impl<S, O> Dashboard<S, O>
where
    S: StationProvider,
    O: ObservationProvider,
{
    pub fn new(station_provider: S, observation_provider: O, config: DashboardConfig) -> Self {
        Self {
            catalog: StationCatalog::with_ttl(station_provider, config.station_ttl),
            fetcher: ObservationFetcher::new(observation_provider),
            registry: PanelRegistry::standard(),
            observations: ObservationCache::new(config.observation_ttl),
            config,
        }
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    pub fn catalog(&self) -> &StationCatalog<S> {
        &self.catalog
    }

    pub fn fetcher(&self) -> &ObservationFetcher<O> {
        &self.fetcher
    }

    pub fn registry(&self) -> &PanelRegistry {
        &self.registry
    }

    /// The stations offered for selection in `region` (or the configured region).
    pub async fn stations(
        &self,
        region: Option<&RegionCode>,
    ) -> Result<Arc<Vec<Station>>, DashboardError> {
        let region = region.unwrap_or(&self.config.region);
        self.catalog.list_stations(region).await
    }

    /// Runs the pipeline for `selection`, emitting panels and notices to `sink`.
    ///
    /// An unknown station or a provider failure is returned as an error; nothing is
    /// emitted in that case.
    pub async fn run(
        &self,
        selection: &Selection,
        sink: &mut impl PanelSink,
    ) -> Result<RunOutcome, DashboardError> {
        debug!("{:?}: region {}", Phase::Idle, selection.region);
        let stations = self.catalog.list_stations(&selection.region).await?;

        debug!("{:?}: {} stations", Phase::StationsLoaded, stations.len());
        let station = self.catalog.resolve(&stations, &selection.station_name)?;

        debug!(
            "{:?}: {} ({}) {}",
            Phase::RangeSelected,
            station.name,
            station.id,
            selection.range
        );
        let key = ObservationKey::new(station.location, &selection.range);
        let table = self
            .observations
            .get_or_load(key, || async {
                self.fetcher
                    .fetch_daily(station.location, &selection.range)
                    .await
                    .map(Arc::new)
            })
            .await
            .map_err(DashboardError::from)?;

        debug!("{:?}: {} rows", Phase::DataReady, table.len());
        if table.is_empty() {
            sink.notice(Notice::NoData {
                station: station.name.clone(),
            });
            debug!("{:?}", Phase::Empty);
            return Ok(RunOutcome::Empty);
        }

        let available = self.registry.available_categories(&table);
        let categories = selection.filter.apply(&available);
        let context = PanelContext::new(station.name.clone(), selection.range);
        for category in &categories {
            self.registry.render(*category, &table, &context, sink)?;
        }

        debug!("{:?}: {:?}", Phase::Rendered, categories);
        Ok(RunOutcome::Rendered { categories })
    }

    /// Like [`Dashboard::run`], but reports errors to `sink` as a failure notice
    /// instead of returning them.
    pub async fn show(&self, selection: &Selection, sink: &mut impl PanelSink) -> RunOutcome {
        match self.run(selection, &mut *sink).await {
            Ok(outcome) => outcome,
            Err(e) => {
                warn!("Dashboard run failed: {}", e);
                sink.notice(Notice::Failure {
                    message: failure_message(&e),
                });
                RunOutcome::Failed
            }
        }
    }
}

fn failure_message(error: &DashboardError) -> String {
    match error {
        DashboardError::DataSource(DataSourceError::HttpStatus { status, .. }) => {
            format!("the weather service answered {}", status)
        }
        DashboardError::DataSource(DataSourceError::NetworkRequest(url, _)) => {
            format!("could not reach {}", url)
        }
        other => other.to_string(),
    }
}
