//! Station types: the raw records delivered by a station metadata provider, and the
//! trimmed-down [`Station`] the dashboard works with once a record is known to be usable.
//! Also includes the implementations needed to index records with `rstar`.

use crate::types::location::LatLon;
use chrono::NaiveDate;
use rstar::{PointDistance, RTreeObject, AABB};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Language key preferred when picking a display name for a station.
const PREFERRED_NAME_LANGUAGE: &str = "en";

/// A weather station as shown to the user: a non-empty name and a position.
///
/// Stations are produced by [`crate::StationCatalog`] and never mutated afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct Station {
    /// The provider's station identifier (e.g. "06660" for Zürich / Fluntern).
    pub id: String,
    /// Display name, unique enough within a region to be used for lookup.
    pub name: String,
    /// Where the station is.
    pub location: LatLon,
}

/// A single station as delivered by the station metadata provider.
///
/// Mirrors the Meteostat `stations/lite.json` schema. Any of the optional
/// fields may be missing, including every entry of `name`; such records are
/// filtered out by the catalog.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StationRecord {
    /// The unique station identifier (e.g., "06660").
    pub id: String,
    /// The country code where the station is located (e.g., "CH").
    pub country: String,
    /// The region code (canton, state, province, etc.), if available.
    pub region: Option<String>,
    /// The IANA timezone name for the station's location, if available.
    pub timezone: Option<String>,
    /// Station names keyed by language (e.g. {"en": "Zurich / Fluntern"}).
    #[serde(default)]
    pub name: BTreeMap<String, String>,
    #[serde(default)]
    pub identifiers: Identifiers,
    pub location: Location,
    #[serde(default)]
    pub inventory: Inventory,
}

/// Data availability ranges for the different data frequencies of a station.
///
/// These are the provider's claims; gaps may exist within a range.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct Inventory {
    pub daily: InventoryRange,
    pub hourly: InventoryRange,
    pub model: InventoryRange,
    pub monthly: YearRange,
    pub normals: YearRange,
}

/// A date range with optional bounds, as reported in a station's inventory.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct InventoryRange {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

/// A year range with optional bounds.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct YearRange {
    pub start: Option<i32>,
    pub end: Option<i32>,
}

/// Alternative identifiers associated with a weather station.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct Identifiers {
    pub national: Option<String>,
    pub wmo: Option<String>,
    pub icao: Option<String>,
}

/// Geographical location of a weather station.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Location {
    /// Latitude in decimal degrees (positive for North, negative for South).
    pub latitude: f64,
    /// Longitude in decimal degrees (positive for East, negative for West).
    pub longitude: f64,
    /// Elevation above sea level in meters, if available.
    pub elevation: Option<i32>,
}

impl StationRecord {
    /// Picks the name to display for this record.
    ///
    /// The English name wins when it is non-blank; otherwise the first
    /// non-blank name in language-key order is used. Returns `None` when the
    /// record has no usable name at all.
    pub fn display_name(&self) -> Option<&str> {
        self.name
            .get(PREFERRED_NAME_LANGUAGE)
            .map(|n| n.trim())
            .filter(|n| !n.is_empty())
            .or_else(|| {
                self.name
                    .values()
                    .map(|n| n.trim())
                    .find(|n| !n.is_empty())
            })
    }

    pub fn lat_lon(&self) -> LatLon {
        LatLon(self.location.latitude, self.location.longitude)
    }

    /// Converts the record into a [`Station`], or `None` if it has no usable name.
    pub fn to_station(&self) -> Option<Station> {
        let name = self.display_name()?;
        Some(Station {
            id: self.id.clone(),
            name: name.to_string(),
            location: self.lat_lon(),
        })
    }

    /// Whether the record's daily inventory overlaps `[start, end]`.
    ///
    /// Records without daily inventory bounds never match.
    pub fn has_daily_data_between(&self, start: NaiveDate, end: NaiveDate) -> bool {
        let (Some(inv_start), Some(inv_end)) =
            (self.inventory.daily.start, self.inventory.daily.end)
        else {
            return false;
        };
        inv_start <= end && start <= inv_end
    }
}

// --- R-Tree Implementations ---

impl RTreeObject for StationRecord {
    type Envelope = AABB<[f64; 2]>;

    /// A station is a point, so its envelope is a degenerate AABB at (latitude, longitude).
    fn envelope(&self) -> Self::Envelope {
        AABB::from_point([self.location.latitude, self.location.longitude])
    }
}

impl PointDistance for StationRecord {
    /// Squared Euclidean distance in degree space.
    ///
    /// Only used to order R-tree candidates; real distances are computed with Haversine.
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let dx = self.location.latitude - point[0];
        let dy = self.location.longitude - point[1];
        dx * dx + dy * dy
    }
}
