pub mod category;
pub mod date_range;
pub mod location;
pub mod metric;
pub mod observation_table;
pub mod region;
pub mod station;
