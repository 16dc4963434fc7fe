//! The daily metrics an observation table can carry.

use std::fmt;

/// One daily observation column.
///
/// Declaration order is the canonical column order of the daily data files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Metric {
    /// Average air temperature in °C.
    AverageTemperature,
    /// Minimum air temperature in °C.
    MinimumTemperature,
    /// Maximum air temperature in °C.
    MaximumTemperature,
    /// Daily precipitation total in mm.
    Precipitation,
    /// Snow depth in mm.
    Snow,
    /// Average wind speed in km/h.
    WindSpeed,
    /// Peak wind gust in km/h.
    PeakGust,
    /// Average sea-level air pressure in hPa.
    Pressure,
    /// Daily sunshine total in minutes.
    Sunshine,
}

impl Metric {
    pub const ALL: [Metric; 9] = [
        Metric::AverageTemperature,
        Metric::MinimumTemperature,
        Metric::MaximumTemperature,
        Metric::Precipitation,
        Metric::Snow,
        Metric::WindSpeed,
        Metric::PeakGust,
        Metric::Pressure,
        Metric::Sunshine,
    ];

    /// Column name used by the provider.
    pub fn column_name(&self) -> &'static str {
        match self {
            Metric::AverageTemperature => "tavg",
            Metric::MinimumTemperature => "tmin",
            Metric::MaximumTemperature => "tmax",
            Metric::Precipitation => "prcp",
            Metric::Snow => "snow",
            Metric::WindSpeed => "wspd",
            Metric::PeakGust => "wpgt",
            Metric::Pressure => "pres",
            Metric::Sunshine => "tsun",
        }
    }

    pub fn from_column_name(name: &str) -> Option<Metric> {
        Metric::ALL.into_iter().find(|m| m.column_name() == name)
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn column_names_round_trip() {
        for metric in Metric::ALL {
            assert_eq!(Metric::from_column_name(metric.column_name()), Some(metric));
        }
        assert_eq!(Metric::from_column_name("wdir"), None);
    }
}
