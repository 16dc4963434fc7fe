pub mod catalog;
pub mod locate_station;
pub mod meteostat_provider;
pub mod provider;
