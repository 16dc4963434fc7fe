//! demos/text_dashboard.rs
//!
//! Runs the dashboard once against Meteostat and prints a text summary of each panel.
//!
//! To run this example:
//! cargo run --example text_dashboard -- "Basel / Binningen" 2024-01-01 2024-12-31 Temperature Wind

use chrono::{Local, NaiveDate};
use std::env;
use std::error::Error;
use std::io;
use std::sync::Arc;
use swiss_weather_tracker::{
    station_names, CategoryFilter, Dashboard, DashboardConfig, DateRange, MeteostatObservations,
    MeteostatStations, RunOutcome, Selection, TextSink,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let mut args = env::args().skip(1);
    let station_name = args.next().unwrap_or_else(|| "Basel / Binningen".to_string());
    let today = Local::now().date_naive();
    let default_range = DateRange::last_days(today, 365);
    let start = match args.next() {
        Some(s) => NaiveDate::parse_from_str(&s, "%Y-%m-%d")?,
        None => default_range.start(),
    };
    let end = match args.next() {
        Some(s) => NaiveDate::parse_from_str(&s, "%Y-%m-%d")?,
        None => default_range.end(),
    };
    let filter = CategoryFilter::from_labels(args);

    println!("Loading the station list...");
    let stations = Arc::new(MeteostatStations::new().await?);
    let observations = MeteostatObservations::builder()
        .stations(Arc::clone(&stations))
        .build();
    let dashboard = Dashboard::new(stations, observations, DashboardConfig::default());

    let available = dashboard.stations(None).await?;
    println!("{} stations in {}", available.len(), dashboard.config().region);
    if !station_names(&available).contains(&station_name.as_str()) {
        println!("Some stations you could pick:");
        for name in station_names(&available).iter().take(10) {
            println!("  {}", name);
        }
    }

    let selection = Selection::new(station_name, start, end)?.with_filter(filter);
    let mut sink = TextSink::new(io::stdout());
    match dashboard.show(&selection, &mut sink).await {
        RunOutcome::Rendered { categories } => println!("Rendered {:?}", categories),
        RunOutcome::Empty => println!("Nothing to show."),
        RunOutcome::Failed => println!("The run failed."),
    }

    Ok(())
}
