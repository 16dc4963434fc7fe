//! demos/dashboard.rs
//!
//! Renders every available category for a station as interactive plots in the browser.
//!
//! To run this example:
//! cargo run --example dashboard --features plotting -- "Zurich / Fluntern"

use chrono::NaiveDate;
use plotlars::{Plot, Rgb, Text, TimeSeriesPlot};
use polars::prelude::*;
use std::env;
use std::error::Error;
use std::sync::Arc;
use swiss_weather_tracker::{
    Dashboard, DashboardConfig, MeteostatObservations, MeteostatStations, Notice, Panel,
    PanelSink, Selection,
};

const FALLBACK_COLORS: [Rgb; 3] = [Rgb(69, 157, 230), Rgb(235, 117, 0), Rgb(46, 160, 67)];

/// Draws each panel with plotlars as soon as it arrives.
struct PlotSink;

impl PanelSink for PlotSink {
    fn render_panel(&mut self, panel: Panel) {
        if let Err(e) = plot_panel(&panel) {
            eprintln!("Could not plot '{}': {}", panel.title, e);
        }
    }

    fn notice(&mut self, notice: Notice) {
        println!("{}", notice);
    }
}

fn plot_panel(panel: &Panel) -> PolarsResult<()> {
    let dates: Vec<String> = panel
        .dates
        .iter()
        .map(|d| d.format("%Y-%m-%d").to_string())
        .collect();
    let mut columns = vec![Column::new("date".into(), dates)];
    for series in &panel.series {
        columns.push(Column::new(series.label.into(), series.values.clone()));
    }
    let frame = DataFrame::new(columns)?;

    let labels: Vec<&str> = panel.series.iter().map(|s| s.label).collect();
    let Some((first, rest)) = labels.split_first() else {
        return Ok(());
    };
    let colors: Vec<Rgb> = panel
        .series
        .iter()
        .zip(FALLBACK_COLORS.iter().cycle())
        .map(|(s, fallback)| s.color.and_then(hex_to_rgb).unwrap_or_else(|| fallback.clone()))
        .collect();

    TimeSeriesPlot::builder()
        .data(&frame)
        .x("date")
        .y(first)
        .additional_series(rest.to_vec())
        .colors(colors)
        .plot_title(Text::from(panel.title.as_str()).size(18))
        .x_title(panel.x_label)
        .y_title(panel.y_label)
        .build()
        .plot();
    Ok(())
}

fn hex_to_rgb(hex: &str) -> Option<Rgb> {
    let hex = hex.strip_prefix('#')?;
    let channel = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();
    Some(Rgb(channel(0)?, channel(2)?, channel(4)?))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let station_name = env::args()
        .nth(1)
        .unwrap_or_else(|| "Zurich / Fluntern".to_string());

    let stations = Arc::new(MeteostatStations::new().await?);
    let observations = MeteostatObservations::builder()
        .stations(Arc::clone(&stations))
        .build();
    let dashboard = Dashboard::new(stations, observations, DashboardConfig::default());

    let start = NaiveDate::from_ymd_opt(2024, 1, 1).ok_or("invalid start date")?;
    let end = NaiveDate::from_ymd_opt(2024, 12, 31).ok_or("invalid end date")?;
    let selection = Selection::new(station_name, start, end)?;

    println!("Rendering panels in the browser...");
    let outcome = dashboard.show(&selection, &mut PlotSink).await;
    println!("{:?}", outcome);
    Ok(())
}
