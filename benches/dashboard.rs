use chrono::{Days, NaiveDate};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use std::sync::Arc;
use swiss_weather_tracker::{
    Category, DateRange, LatLon, Metric, ObservationCache, ObservationKey, ObservationTable,
    PanelContext, PanelRegistry, RecordingSink, DEFAULT_TTL,
};

fn year_table() -> ObservationTable {
    let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    let dates: Vec<NaiveDate> = (0..366)
        .map(|i| start.checked_add_days(Days::new(i)).unwrap())
        .collect();
    let columns = Metric::ALL.into_iter().enumerate().map(|(m, metric)| {
        let values = (0..dates.len())
            .map(|i| Some(((i * 7 + m * 13) % 40) as f64))
            .collect();
        (metric, values)
    });
    ObservationTable::from_columns(dates, columns).unwrap()
}

fn bench_panels(c: &mut Criterion) {
    let registry = PanelRegistry::standard();
    let table = year_table();
    let range = DateRange::new(table.dates()[0], table.dates()[table.len() - 1]).unwrap();
    let context = PanelContext::new("Basel / Binningen", range);

    c.bench_function("available_categories", |b| {
        b.iter(|| registry.available_categories(black_box(&table)))
    });
    c.bench_function("render_all_panels", |b| {
        b.iter(|| {
            let mut sink = RecordingSink::new();
            for category in Category::ALL {
                registry
                    .render(category, black_box(&table), &context, &mut sink)
                    .unwrap();
            }
            sink
        })
    });
}

fn bench_cache(c: &mut Criterion) {
    let runtime = tokio::runtime::Runtime::new().unwrap();
    let cache = ObservationCache::new(DEFAULT_TTL);
    let table = Arc::new(year_table());
    let range = DateRange::new(table.dates()[0], table.dates()[table.len() - 1]).unwrap();
    let key = ObservationKey::new(LatLon(47.5417, 7.5833), &range);

    c.bench_function("observation_cache_hit", |b| {
        b.to_async(&runtime).iter(|| async {
            cache
                .get_or_load(black_box(key), || async {
                    Ok::<_, ()>(Arc::clone(&table))
                })
                .await
                .unwrap()
        })
    });
}

criterion_group!(benches, bench_panels, bench_cache);
criterion_main!(benches);
