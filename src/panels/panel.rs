//! What crosses into the presentation layer: chart panels and notices.

use crate::types::category::{Category, ChartKind};
use crate::types::date_range::DateRange;
use crate::types::metric::Metric;
use chrono::NaiveDate;
use std::fmt;

/// Station and range a panel is rendered for; used in titles.
#[derive(Debug, Clone, PartialEq)]
pub struct PanelContext {
    pub station_name: String,
    pub range: DateRange,
}

impl PanelContext {
    pub fn new(station_name: impl Into<String>, range: DateRange) -> Self {
        Self {
            station_name: station_name.into(),
            range,
        }
    }
}

/// One relabelled series of a panel.
#[derive(Debug, Clone, PartialEq)]
pub struct PanelSeries {
    pub metric: Metric,
    pub label: &'static str,
    /// Hex colour such as `#1d4ed8`, when the category pins one.
    pub color: Option<&'static str>,
    pub values: Vec<Option<f64>>,
}

/// A chart for one category, ready to be drawn.
#[derive(Debug, Clone, PartialEq)]
pub struct Panel {
    pub category: Category,
    pub title: String,
    pub chart: ChartKind,
    pub x_label: &'static str,
    pub y_label: &'static str,
    /// Preferred height in pixels.
    pub height: u32,
    pub dates: Vec<NaiveDate>,
    /// In the category's canonical order.
    pub series: Vec<PanelSeries>,
}

/// A message shown instead of, or next to, panels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// The station returned no rows for the range.
    NoData { station: String },
    /// The run could not complete.
    Failure { message: String },
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notice::NoData { station } => {
                write!(f, "No weather data available for {}", station)
            }
            Notice::Failure { message } => write!(f, "Failed to load weather data: {}", message),
        }
    }
}
