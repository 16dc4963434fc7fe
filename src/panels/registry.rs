//! Static description of each category's panel, and rendering of a category from a table.

use crate::error::DashboardError;
use crate::panels::panel::{Panel, PanelContext, PanelSeries};
use crate::panels::sink::PanelSink;
use crate::types::category::{Category, ChartKind};
use crate::types::metric::Metric;
use crate::types::observation_table::ObservationTable;
use std::collections::BTreeSet;

const X_LABEL: &str = "Time";
const PANEL_HEIGHT: u32 = 500;

/// How one category is drawn: its columns (in legend order) with their labels,
/// the chart kind and axis label.
#[derive(Debug, Clone, PartialEq)]
pub struct PanelSpec {
    pub category: Category,
    pub series: &'static [(Metric, &'static str)],
    pub chart: ChartKind,
    pub y_label: &'static str,
    /// One colour per series, if the category pins them.
    pub colors: Option<&'static [&'static str]>,
}

impl PanelSpec {
    pub fn required_columns(&self) -> impl Iterator<Item = Metric> + '_ {
        self.series.iter().map(|(metric, _)| *metric)
    }

    pub fn is_available_in(&self, table: &ObservationTable) -> bool {
        self.required_columns().all(|m| table.has_column(m))
    }
}

static SPECS: [PanelSpec; 6] = [
    PanelSpec {
        category: Category::Temperature,
        series: &[
            (Metric::AverageTemperature, "Average Temperature"),
            (Metric::MinimumTemperature, "Minimum Temperature"),
            (Metric::MaximumTemperature, "Maximum Temperature"),
        ],
        chart: ChartKind::Line,
        y_label: "Temperature (°C)",
        colors: Some(&["#1d4ed8", "#e63946", "#0ea5e9"]),
    },
    PanelSpec {
        category: Category::Precipitation,
        series: &[(Metric::Precipitation, "Precipitation")],
        chart: ChartKind::Bar,
        y_label: "Precipitation (mm)",
        colors: None,
    },
    PanelSpec {
        category: Category::Snow,
        series: &[(Metric::Snow, "Snow Depth")],
        chart: ChartKind::Bar,
        y_label: "Depth (mm)",
        colors: None,
    },
    PanelSpec {
        category: Category::Wind,
        series: &[
            (Metric::WindSpeed, "Wind Speed"),
            (Metric::PeakGust, "Wind Gusts"),
        ],
        chart: ChartKind::Area,
        y_label: "Kilometers per hour (km/h)",
        colors: None,
    },
    PanelSpec {
        category: Category::Pressure,
        series: &[(Metric::Pressure, "Air Pressure")],
        chart: ChartKind::Line,
        y_label: "Sea-level air pressure (hPa)",
        colors: None,
    },
    PanelSpec {
        category: Category::Sunshine,
        series: &[(Metric::Sunshine, "Sunshine")],
        chart: ChartKind::Line,
        y_label: "Total sunshine (minutes)",
        colors: None,
    },
];

/// The panel specs of all categories, in enumeration order.
#[derive(Debug, Clone)]
pub struct PanelRegistry {
    specs: &'static [PanelSpec],
}

impl Default for PanelRegistry {
    fn default() -> Self {
        Self::standard()
    }
}

impl PanelRegistry {
    pub fn standard() -> Self {
        Self { specs: &SPECS }
    }

    pub fn specs(&self) -> &[PanelSpec] {
        self.specs
    }

    pub fn spec(&self, category: Category) -> &PanelSpec {
        // SPECS is indexed by declaration order of `Category`.
        &self.specs[category as usize]
    }

    /// Categories whose columns are all present in `table`.
    pub fn available_categories(&self, table: &ObservationTable) -> BTreeSet<Category> {
        self.specs
            .iter()
            .filter(|spec| spec.is_available_in(table))
            .map(|spec| spec.category)
            .collect()
    }

    /// Builds the panel of `category` from `table`.
    pub fn build_panel(
        &self,
        category: Category,
        table: &ObservationTable,
        context: &PanelContext,
    ) -> Result<Panel, DashboardError> {
        let spec = self.spec(category);
        let missing: Vec<Metric> = spec
            .required_columns()
            .filter(|m| !table.has_column(*m))
            .collect();
        if !missing.is_empty() {
            return Err(DashboardError::MissingColumns { category, missing });
        }

        let series = spec
            .series
            .iter()
            .enumerate()
            .map(|(i, (metric, label))| PanelSeries {
                metric: *metric,
                label: *label,
                color: spec.colors.and_then(|colors| colors.get(i).copied()),
                values: table.column(*metric).unwrap_or_default().to_vec(),
            })
            .collect();

        Ok(Panel {
            category,
            title: format!(
                "{} in {} ({})",
                category, context.station_name, context.range
            ),
            chart: spec.chart,
            x_label: X_LABEL,
            y_label: spec.y_label,
            height: PANEL_HEIGHT,
            dates: table.dates().to_vec(),
            series,
        })
    }

    /// Builds the panel of `category` and hands it to `sink`.
    pub fn render(
        &self,
        category: Category,
        table: &ObservationTable,
        context: &PanelContext,
        sink: &mut impl PanelSink,
    ) -> Result<(), DashboardError> {
        let panel = self.build_panel(category, table, context)?;
        sink.render_panel(panel);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::panels::sink::RecordingSink;
    use crate::test_support::table;
    use crate::types::date_range::DateRange;
    use chrono::NaiveDate;

    const DATES: [&str; 3] = ["2024-01-01", "2024-01-02", "2024-01-03"];

    fn context() -> PanelContext {
        let d = |s: &str| NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap();
        PanelContext::new("Basel / Binningen", DateRange::new(d(DATES[0]), d(DATES[2])).unwrap())
    }

    #[test]
    fn specs_follow_category_order() {
        let registry = PanelRegistry::standard();
        for category in Category::ALL {
            assert_eq!(registry.spec(category).category, category);
        }
    }

    #[test]
    fn category_needs_all_of_its_columns() {
        let registry = PanelRegistry::standard();
        // Only the last temperature column present must not make Temperature available.
        let partial = table(&DATES, &[Metric::MaximumTemperature, Metric::PeakGust]);
        assert!(registry.available_categories(&partial).is_empty());

        let full = table(
            &DATES,
            &[
                Metric::AverageTemperature,
                Metric::MinimumTemperature,
                Metric::MaximumTemperature,
                Metric::Precipitation,
            ],
        );
        assert_eq!(
            registry.available_categories(&full),
            [Category::Temperature, Category::Precipitation]
                .into_iter()
                .collect::<BTreeSet<_>>()
        );
    }

    #[test]
    fn empty_table_has_no_categories() {
        let registry = PanelRegistry::standard();
        assert!(registry
            .available_categories(&ObservationTable::empty())
            .is_empty());
    }

    #[test]
    fn availability_is_monotonic_in_columns() {
        let registry = PanelRegistry::standard();
        let mut present: Vec<Metric> = Vec::new();
        let mut previous = BTreeSet::new();
        for metric in Metric::ALL {
            present.push(metric);
            let current = registry.available_categories(&table(&DATES, &present));
            assert!(previous.is_subset(&current));
            previous = current;
        }
        assert_eq!(previous.len(), Category::ALL.len());
    }

    #[test]
    fn renders_relabelled_series_in_canonical_order() {
        let registry = PanelRegistry::standard();
        // Columns given in a different order than the legend order.
        let t = table(
            &DATES,
            &[
                Metric::MaximumTemperature,
                Metric::AverageTemperature,
                Metric::MinimumTemperature,
            ],
        );
        let mut sink = RecordingSink::new();
        registry
            .render(Category::Temperature, &t, &context(), &mut sink)
            .unwrap();

        let panels = sink.panels();
        let panel = panels[0];
        assert_eq!(
            panel.title,
            "Temperature in Basel / Binningen (01.01.2024-03.01.2024)"
        );
        assert_eq!(panel.chart, ChartKind::Line);
        assert_eq!(panel.x_label, "Time");
        assert_eq!(panel.y_label, "Temperature (°C)");
        let labels: Vec<&str> = panel.series.iter().map(|s| s.label).collect();
        assert_eq!(
            labels,
            vec![
                "Average Temperature",
                "Minimum Temperature",
                "Maximum Temperature"
            ]
        );
        assert_eq!(panel.series[0].color, Some("#1d4ed8"));
        assert_eq!(
            panel.series[0].values,
            t.column(Metric::AverageTemperature).unwrap().to_vec()
        );
        assert_eq!(panel.dates.len(), 3);
    }

    #[test]
    fn rendering_unavailable_category_is_an_error() {
        let registry = PanelRegistry::standard();
        let t = table(&DATES, &[Metric::WindSpeed]);
        let mut sink = RecordingSink::new();
        let err = registry
            .render(Category::Wind, &t, &context(), &mut sink)
            .unwrap_err();
        assert!(matches!(
            err,
            DashboardError::MissingColumns { category: Category::Wind, ref missing }
                if missing == &vec![Metric::PeakGust]
        ));
        assert!(sink.emitted.is_empty());
    }

    #[test]
    fn panels_do_not_depend_on_other_categories() {
        let registry = PanelRegistry::standard();
        let t = table(&DATES, &Metric::ALL);
        let alone = registry
            .build_panel(Category::Pressure, &t, &context())
            .unwrap();

        let mut sink = RecordingSink::new();
        for category in [Category::Wind, Category::Pressure, Category::Sunshine] {
            registry.render(category, &t, &context(), &mut sink).unwrap();
        }
        assert_eq!(sink.panels()[1], &alone);
    }
}
