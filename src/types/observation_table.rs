//! The time-indexed table of daily observations for one station and date range.

use crate::types::date_range::DateRange;
use crate::types::metric::Metric;
use crate::weather_data::error::DataSourceError;
use chrono::NaiveDate;
use polars::prelude::{DataFrame, DataType};
use std::collections::{BTreeMap, BTreeSet, HashMap};

const DATE_COLUMN: &str = "date";
const DATE_FORMAT: &str = "%Y-%m-%d";

/// Dated rows of daily weather metrics.
///
/// Rows are strictly increasing by date. Each present column holds exactly one
/// (possibly missing) value per row; a column whose every value is missing is not
/// kept, so `has_column` answers "did the station measure this at all".
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ObservationTable {
    dates: Vec<NaiveDate>,
    columns: BTreeMap<Metric, Vec<Option<f64>>>,
}

impl ObservationTable {
    /// A table with zero rows and no columns.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Builds a table from a date index and metric columns.
    ///
    /// Rows are sorted by date. Fails if a date repeats or a column's length
    /// differs from the number of dates.
    pub fn from_columns<I>(dates: Vec<NaiveDate>, columns: I) -> Result<Self, DataSourceError>
    where
        I: IntoIterator<Item = (Metric, Vec<Option<f64>>)>,
    {
        let mut order: Vec<usize> = (0..dates.len()).collect();
        order.sort_by_key(|&i| dates[i]);
        if let Some(pair) = order.windows(2).find(|w| dates[w[0]] == dates[w[1]]) {
            return Err(DataSourceError::DuplicateDate(dates[pair[0]]));
        }

        let mut table_columns = BTreeMap::new();
        for (metric, values) in columns {
            if values.len() != dates.len() {
                return Err(DataSourceError::ColumnLength {
                    column: metric.column_name().to_string(),
                    expected: dates.len(),
                    found: values.len(),
                });
            }
            if values.iter().all(Option::is_none) {
                continue;
            }
            let sorted: Vec<Option<f64>> = order.iter().map(|&i| values[i]).collect();
            table_columns.insert(metric, sorted);
        }

        Ok(Self {
            dates: order.iter().map(|&i| dates[i]).collect(),
            columns: table_columns,
        })
    }

    /// Converts a Polars frame with a `date` column and any subset of the metric columns.
    ///
    /// The date column may be a `YYYY-MM-DD` string or a Polars date. Columns that
    /// are not metrics (e.g. `wdir`) are ignored.
    pub fn from_frame(frame: &DataFrame) -> Result<Self, DataSourceError> {
        if frame.height() == 0 {
            return Ok(Self::empty());
        }

        let date_column = frame.column(DATE_COLUMN)?.cast(&DataType::String)?;
        let dates = date_column
            .str()?
            .into_iter()
            .map(|value| {
                let value = value.unwrap_or_default();
                NaiveDate::parse_from_str(value, DATE_FORMAT)
                    .map_err(|_| DataSourceError::MalformedDate(value.to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let mut columns = Vec::new();
        for metric in Metric::ALL {
            let Ok(column) = frame.column(metric.column_name()) else {
                continue;
            };
            let values: Vec<Option<f64>> = column
                .cast(&DataType::Float64)?
                .f64()?
                .into_iter()
                .collect();
            columns.push((metric, values));
        }

        Self::from_columns(dates, columns)
    }

    /// Combines tables of several stations, ordered by preference (nearest first).
    ///
    /// The result has a row for every date any table has. Each value is taken from the
    /// first table that has one for that date and metric, so gaps in the preferred
    /// station, including metrics it never measures, are filled from the next ones.
    pub fn fill_gaps<I>(tables: I) -> Result<Self, DataSourceError>
    where
        I: IntoIterator<Item = ObservationTable>,
    {
        let tables: Vec<ObservationTable> = tables.into_iter().collect();
        let dates: Vec<NaiveDate> = tables
            .iter()
            .flat_map(|t| t.dates.iter().copied())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let row_of: HashMap<NaiveDate, usize> =
            dates.iter().enumerate().map(|(i, d)| (*d, i)).collect();

        let mut columns: BTreeMap<Metric, Vec<Option<f64>>> = BTreeMap::new();
        for table in &tables {
            for (metric, values) in &table.columns {
                let merged = columns
                    .entry(*metric)
                    .or_insert_with(|| vec![None; dates.len()]);
                for (date, value) in table.dates.iter().zip(values) {
                    let slot = &mut merged[row_of[date]];
                    if slot.is_none() {
                        *slot = *value;
                    }
                }
            }
        }

        Self::from_columns(dates, columns)
    }

    /// Drops the rows outside `range`, and any column left without values.
    pub fn retain_range(self, range: &DateRange) -> Self {
        if self.dates.iter().all(|d| range.contains(*d)) {
            return self;
        }
        let keep: Vec<usize> = (0..self.dates.len())
            .filter(|&i| range.contains(self.dates[i]))
            .collect();
        let columns = self
            .columns
            .into_iter()
            .map(|(metric, values)| (metric, keep.iter().map(|&i| values[i]).collect::<Vec<_>>()))
            .filter(|(_, values)| values.iter().any(Option::is_some))
            .collect();
        Self {
            dates: keep.iter().map(|&i| self.dates[i]).collect(),
            columns,
        }
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn has_column(&self, metric: Metric) -> bool {
        self.columns.contains_key(&metric)
    }

    /// Whether every one of `metrics` is present.
    pub fn has_columns(&self, metrics: &[Metric]) -> bool {
        metrics.iter().all(|m| self.has_column(*m))
    }

    /// Present metrics, in canonical order.
    pub fn columns(&self) -> impl Iterator<Item = Metric> + '_ {
        self.columns.keys().copied()
    }

    pub fn column(&self, metric: Metric) -> Option<&[Option<f64>]> {
        self.columns.get(&metric).map(Vec::as_slice)
    }
}
