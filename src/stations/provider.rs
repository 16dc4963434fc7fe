use crate::types::region::RegionCode;
use crate::types::station::StationRecord;
use crate::weather_data::error::DataSourceError;
use std::future::Future;
use std::sync::Arc;

/// Source of station metadata for a region.
///
/// Implementations return every record they know for the region, in their own order.
/// Records may lack a usable name; [`crate::StationCatalog`] filters those out.
pub trait StationProvider: Send + Sync {
    fn fetch_stations(
        &self,
        region: &RegionCode,
    ) -> impl Future<Output = Result<Vec<StationRecord>, DataSourceError>> + Send;
}

impl<P: StationProvider> StationProvider for Arc<P> {
    fn fetch_stations(
        &self,
        region: &RegionCode,
    ) -> impl Future<Output = Result<Vec<StationRecord>, DataSourceError>> + Send {
        (**self).fetch_stations(region)
    }
}
