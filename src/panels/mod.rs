pub mod panel;
pub mod registry;
pub mod sink;
