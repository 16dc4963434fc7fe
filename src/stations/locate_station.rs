use crate::types::date_range::DateRange;
use crate::types::location::LatLon;
use crate::types::station::StationRecord;
use haversine::{distance, Location as HaversineLocation, Units};
use ordered_float::OrderedFloat;
use rstar::RTree;

/// Kilometres per degree of latitude.
const KM_PER_DEGREE: f64 = 111.32;

/// Spatial index over station records, used to resolve a point to nearby stations.
#[derive(Debug, Clone)]
pub struct StationLocator {
    rtree: RTree<StationRecord>,
}

impl StationLocator {
    pub fn new(records: Vec<StationRecord>) -> Self {
        Self {
            rtree: RTree::bulk_load(records),
        }
    }

    pub fn len(&self) -> usize {
        self.rtree.size()
    }

    pub fn is_empty(&self) -> bool {
        self.rtree.size() == 0
    }

    /// Up to `n_results` stations within `max_distance_km` of `point` whose daily
    /// inventory overlaps `range`, closest first, with their distance in km.
    pub fn nearest_with_daily(
        &self,
        point: LatLon,
        range: &DateRange,
        n_results: usize,
        max_distance_km: f64,
    ) -> Vec<(StationRecord, f64)> {
        if n_results == 0 {
            return vec![];
        }

        // The R-tree works in degrees. A longitude degree shrinks with latitude, so the
        // search radius is widened by 1/cos(lat) to cover every point within range.
        let cos_lat = point.latitude().to_radians().cos().abs().max(0.01);
        let radius_deg = max_distance_km / (KM_PER_DEGREE * cos_lat);
        let query_point = [point.latitude(), point.longitude()];

        let mut candidates: Vec<(StationRecord, f64)> = self
            .rtree
            .locate_within_distance(query_point, radius_deg * radius_deg)
            .filter(|station| station.has_daily_data_between(range.start(), range.end()))
            .filter_map(|station| {
                let dist_km = haversine_km(point, station.lat_lon());
                (dist_km <= max_distance_km).then(|| (station.clone(), dist_km))
            })
            .collect();

        candidates.sort_by_key(|(station, dist)| (OrderedFloat(*dist), station.id.clone()));
        candidates.truncate(n_results);
        candidates
    }
}

fn haversine_km(a: LatLon, b: LatLon) -> f64 {
    distance(
        HaversineLocation {
            latitude: a.latitude(),
            longitude: a.longitude(),
        },
        HaversineLocation {
            latitude: b.latitude(),
            longitude: b.longitude(),
        },
        Units::Kilometers,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::station::tests::record;
    use crate::types::station::InventoryRange;
    use chrono::NaiveDate;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn with_daily(mut r: StationRecord, start: &str, end: &str) -> StationRecord {
        r.inventory.daily = InventoryRange {
            start: Some(d(start)),
            end: Some(d(end)),
        };
        r
    }

    fn locator() -> StationLocator {
        StationLocator::new(vec![
            with_daily(
                record("06660", &[("en", "Zurich / Fluntern")], 47.3833, 8.5667),
                "1931-01-01",
                "2025-06-30",
            ),
            with_daily(
                record("06670", &[("en", "Zurich Airport")], 47.4833, 8.5333),
                "1949-01-01",
                "2025-06-30",
            ),
            // Closed station: no daily data after 2000.
            with_daily(
                record("06664", &[("en", "Zurich / Affoltern")], 47.4333, 8.5167),
                "1980-01-01",
                "1999-12-31",
            ),
            with_daily(
                record("06700", &[("en", "Geneva")], 46.25, 6.1333),
                "1931-01-01",
                "2025-06-30",
            ),
        ])
    }

    #[test]
    fn finds_closest_stations_with_daily_inventory() {
        let range = DateRange::new(d("2024-01-01"), d("2024-12-31")).unwrap();
        let results = locator().nearest_with_daily(LatLon(47.3833, 8.5667), &range, 4, 35.0);
        let ids: Vec<&str> = results.iter().map(|(s, _)| s.id.as_str()).collect();
        assert_eq!(ids, vec!["06660", "06670"]);
        assert!(results[0].1 < 1e-6);
        assert!(results[1].1 > 10.0 && results[1].1 < 15.0);
    }

    #[test]
    fn respects_limit_and_radius() {
        let range = DateRange::new(d("1990-01-01"), d("1990-12-31")).unwrap();
        let locator = locator();
        assert_eq!(
            locator
                .nearest_with_daily(LatLon(47.3833, 8.5667), &range, 1, 35.0)
                .len(),
            1
        );
        assert!(locator
            .nearest_with_daily(LatLon(45.0, 10.0), &range, 4, 35.0)
            .is_empty());
        assert!(locator
            .nearest_with_daily(LatLon(47.3833, 8.5667), &range, 0, 35.0)
            .is_empty());
    }
}
