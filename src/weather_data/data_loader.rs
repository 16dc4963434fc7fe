use crate::types::date_range::DateRange;
use crate::utils::{download_gzipped, is_cache_file_fresh};
use crate::weather_data::error::DataSourceError;
use log::{info, warn};
use polars::prelude::*;
use reqwest::Client;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tempfile::NamedTempFile;
use tokio::{fs, task};

const BASE_URL: &str = "https://bulk.meteostat.net/v2/daily";
const CACHE_FILE_PREFIX: &str = "daily-";

/// Column names of the headerless daily CSV files, in file order.
pub const DAILY_SCHEMA: [&str; 11] = [
    "date", "tavg", "tmin", "tmax", "prcp", "snow", "wdir", "wspd", "wpgt", "pres", "tsun",
];

/// Downloads per-station daily data files and keeps a Parquet copy of each.
pub struct WeatherDataLoader {
    cache_dir: Option<PathBuf>,
    max_age: Duration,
    download_client: Client,
}

impl WeatherDataLoader {
    pub fn new(cache_dir: Option<&Path>, max_age: Duration) -> WeatherDataLoader {
        WeatherDataLoader {
            cache_dir: cache_dir.map(Path::to_path_buf),
            max_age,
            download_client: Client::new(),
        }
    }

    /// Lazily loads the full daily history of `station`.
    ///
    /// With a cache folder, a Parquet copy younger than `max_age` is scanned instead of
    /// downloading again.
    pub async fn get_frame(&self, station: &str) -> Result<LazyFrame, DataSourceError> {
        let Some(cache_dir) = &self.cache_dir else {
            let raw_bytes = self.download(station).await?;
            let df = Self::csv_to_dataframe(raw_bytes, station).await?;
            return Ok(df.lazy());
        };

        let parquet_path = cache_dir.join(format!("{}{}.parquet", CACHE_FILE_PREFIX, station));

        if is_cache_file_fresh(&parquet_path, self.max_age).await? {
            info!("Cache hit for daily data of station {} at {:?}", station, parquet_path);
        } else {
            warn!(
                "Cache miss for daily data of station {}. Downloading and processing.",
                station
            );
            let raw_bytes = self.download(station).await?;
            let df = Self::csv_to_dataframe(raw_bytes, station).await?;

            fs::create_dir_all(cache_dir)
                .await
                .map_err(|e| DataSourceError::CacheDirCreation(cache_dir.clone(), e))?;
            Self::cache_dataframe(df, &parquet_path).await?;
            info!("Cached daily data for station {} to {:?}", station, parquet_path);
        }

        LazyFrame::scan_parquet(&parquet_path, Default::default())
            .map_err(|e| DataSourceError::ParquetScan(parquet_path.clone(), e))
    }

    /// Loads the rows of `station` within `range`.
    pub async fn get_range(
        &self,
        station: &str,
        range: &DateRange,
    ) -> Result<DataFrame, DataSourceError> {
        let frame = self.get_frame(station).await?;
        let filtered = filter_range(frame, range);
        task::spawn_blocking(move || filtered.collect().map_err(DataSourceError::from)).await?
    }

    async fn download(&self, station: &str) -> Result<Vec<u8>, DataSourceError> {
        let url = format!("{}/{}.csv.gz", BASE_URL, station);
        download_gzipped(&self.download_client, &url).await
    }

    /// Parses raw CSV bytes (without header) into a DataFrame on a blocking task and
    /// names the columns after [`DAILY_SCHEMA`].
    pub(crate) async fn csv_to_dataframe(
        bytes: Vec<u8>,
        station: &str,
    ) -> Result<DataFrame, DataSourceError> {
        let station_owned = station.to_string();

        task::spawn_blocking(move || {
            let csv_io_error = |e| DataSourceError::CsvReadIo {
                station: station_owned.clone(),
                source: e,
            };
            let mut temp_file = NamedTempFile::new().map_err(csv_io_error)?;
            temp_file.write_all(&bytes).map_err(csv_io_error)?;
            temp_file.flush().map_err(csv_io_error)?;

            let mut df = CsvReadOptions::default()
                .with_has_header(false)
                .try_into_reader_with_file_path(Some(temp_file.path().to_path_buf()))
                .and_then(|reader| reader.finish())
                .map_err(|e| DataSourceError::CsvReadPolars {
                    station: station_owned.clone(),
                    source: e,
                })?;

            if df.width() != DAILY_SCHEMA.len() {
                warn!(
                    "CSV column count ({}) does not match schema length ({}) for station {}",
                    df.width(),
                    DAILY_SCHEMA.len(),
                    station_owned
                );
                return Err(DataSourceError::SchemaMismatch {
                    station: station_owned,
                    expected: DAILY_SCHEMA.len(),
                    found: df.width(),
                });
            }

            df.set_column_names(DAILY_SCHEMA.iter().copied())
                .map_err(|e| DataSourceError::ColumnRename {
                    station: station_owned,
                    source: e,
                })?;

            Ok(df)
        })
        .await?
    }

    /// Writes `df` next to `path` and renames it into place, so concurrent scans of
    /// `path` see either the old or the new file, never a partial one.
    async fn cache_dataframe(mut df: DataFrame, path: &Path) -> Result<(), DataSourceError> {
        let path_buf = path.to_path_buf();
        task::spawn_blocking(move || {
            let write_io_error = |e| DataSourceError::ParquetWriteIo(path_buf.clone(), e);
            let dir = path_buf.parent().unwrap_or_else(|| Path::new("."));
            let mut temp_file = NamedTempFile::new_in(dir).map_err(write_io_error)?;
            ParquetWriter::new(temp_file.as_file_mut())
                .with_compression(ParquetCompression::Snappy)
                .finish(&mut df)
                .map_err(|e| DataSourceError::ParquetWritePolars(path_buf.clone(), e))?;
            temp_file
                .persist(&path_buf)
                .map_err(|e| write_io_error(e.error))?;
            Ok::<(), DataSourceError>(())
        })
        .await??;
        Ok(())
    }
}

/// Keeps the rows whose ISO `date` falls within `range` (inclusive).
///
/// ISO dates order lexicographically, so the string column is compared directly.
pub fn filter_range(frame: LazyFrame, range: &DateRange) -> LazyFrame {
    let start = range.start().format("%Y-%m-%d").to_string();
    let end = range.end().format("%Y-%m-%d").to_string();
    frame.filter(
        col("date")
            .cast(DataType::String)
            .gt_eq(lit(start))
            .and(col("date").cast(DataType::String).lt_eq(lit(end))),
    )
}
