//! Station metadata from the Meteostat bulk data service.
//!
//! The full station list (`stations/lite.json.gz`, roughly 17k records) is downloaded
//! once, kept in memory for `max_age`, and mirrored to a bincode file in the cache
//! folder so a restart within `max_age` does not download it again.

use crate::cache::{TtlCache, DEFAULT_TTL};
use crate::error::DashboardError;
use crate::stations::provider::StationProvider;
use crate::types::region::RegionCode;
use crate::types::station::StationRecord;
use crate::utils::{download_gzipped, ensure_cache_dir_exists, get_cache_dir, is_cache_file_fresh};
use crate::weather_data::error::DataSourceError;
use bincode::config::{Configuration, Fixint, LittleEndian};
use log::info;
use reqwest::Client;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tempfile::NamedTempFile;

const DATA_URL: &str = "https://bulk.meteostat.net/v2/stations/lite.json.gz";
const BINCODE_CACHE_FILE_NAME: &str = "stations_lite.bin";
const BINCODE_CONFIG: Configuration<LittleEndian, Fixint> =
    bincode::config::standard().with_fixed_int_encoding();

pub struct MeteostatStations {
    cache_folder: Option<PathBuf>,
    max_age: Duration,
    client: Client,
    records: TtlCache<(), Arc<Vec<StationRecord>>>,
}

impl MeteostatStations {
    /// Uses the default cache folder (under the system cache directory).
    pub async fn new() -> Result<Self, DashboardError> {
        let cache_folder = get_cache_dir().map_err(DashboardError::CacheDirResolution)?;
        Self::with_cache_folder(cache_folder).await
    }

    /// Uses `cache_folder` for the station list file, creating it if needed.
    pub async fn with_cache_folder(cache_folder: PathBuf) -> Result<Self, DashboardError> {
        ensure_cache_dir_exists(&cache_folder)
            .await
            .map_err(|e| DashboardError::CacheDirCreation(cache_folder.clone(), e))?;
        Ok(Self::build(Some(cache_folder), DEFAULT_TTL))
    }

    /// Keeps the station list in memory only.
    pub fn in_memory() -> Self {
        Self::build(None, DEFAULT_TTL)
    }

    /// Sets how long a downloaded station list is trusted, in memory and on disk.
    pub fn with_max_age(self, max_age: Duration) -> Self {
        Self::build(self.cache_folder, max_age)
    }

    fn build(cache_folder: Option<PathBuf>, max_age: Duration) -> Self {
        Self {
            cache_folder,
            max_age,
            client: Client::new(),
            records: TtlCache::new(max_age),
        }
    }

    pub fn cache_folder(&self) -> Option<&Path> {
        self.cache_folder.as_deref()
    }

    pub fn max_age(&self) -> Duration {
        self.max_age
    }

    /// Every known station, in file order.
    pub async fn all_records(&self) -> Result<Arc<Vec<StationRecord>>, DataSourceError> {
        self.records
            .get_or_load((), || async { self.load_records().await.map(Arc::new) })
            .await
    }

    async fn load_records(&self) -> Result<Vec<StationRecord>, DataSourceError> {
        let Some(cache_folder) = &self.cache_folder else {
            return Self::fetch_records(&self.client).await;
        };
        let cache_file = cache_folder.join(BINCODE_CACHE_FILE_NAME);

        if is_cache_file_fresh(&cache_file, self.max_age).await? {
            let path = cache_file.clone();
            let records =
                tokio::task::spawn_blocking(move || Self::read_cached_records(&path)).await??;
            info!(
                "Loaded {} stations from cache file {}",
                records.len(),
                cache_file.display()
            );
            return Ok(records);
        }

        info!("Station cache missing or stale, fetching {}", DATA_URL);
        let records = Self::fetch_records(&self.client).await?;
        Self::cache_records(records.clone(), &cache_file).await?;
        Ok(records)
    }

    fn read_cached_records(cache_path: &Path) -> Result<Vec<StationRecord>, DataSourceError> {
        let bytes = std::fs::read(cache_path)
            .map_err(|e| DataSourceError::CacheRead(cache_path.to_path_buf(), e))?;
        let (decoded, _) =
            bincode::serde::decode_from_slice::<Vec<StationRecord>, _>(&bytes, BINCODE_CONFIG)
                .map_err(|e| DataSourceError::CacheDecode(cache_path.to_path_buf(), Box::new(e)))?;
        Ok(decoded)
    }

    async fn fetch_records(client: &Client) -> Result<Vec<StationRecord>, DataSourceError> {
        let decompressed_json = download_gzipped(client, DATA_URL).await?;
        let parse_start = std::time::Instant::now();
        let records = tokio::task::spawn_blocking(move || {
            serde_json::from_slice::<Vec<StationRecord>>(&decompressed_json)
                .map_err(DataSourceError::from)
        })
        .await??;
        info!(
            "Parsed {} stations from JSON in {:?}",
            records.len(),
            parse_start.elapsed()
        );
        Ok(records)
    }

    async fn cache_records(
        records: Vec<StationRecord>,
        cache_path: &Path,
    ) -> Result<(), DataSourceError> {
        let path = cache_path.to_path_buf();
        let written = tokio::task::spawn_blocking(move || {
            let bincode_data = bincode::serde::encode_to_vec(records, BINCODE_CONFIG)
                .map_err(|e| DataSourceError::CacheEncode(Box::new(e)))?;
            // Replaced by rename so readers never see a truncated file.
            let write_error = |e| DataSourceError::CacheWrite(path.clone(), e);
            let dir = path.parent().unwrap_or_else(|| Path::new("."));
            let mut temp_file = NamedTempFile::new_in(dir).map_err(write_error)?;
            temp_file.write_all(&bincode_data).map_err(write_error)?;
            temp_file.persist(&path).map_err(|e| write_error(e.error))?;
            Ok::<usize, DataSourceError>(bincode_data.len())
        })
        .await??;
        info!(
            "Wrote station cache ({} bytes) to {}",
            written,
            cache_path.display()
        );
        Ok(())
    }
}

impl StationProvider for MeteostatStations {
    async fn fetch_stations(
        &self,
        region: &RegionCode,
    ) -> Result<Vec<StationRecord>, DataSourceError> {
        let records = self.all_records().await?;
        Ok(records
            .iter()
            .filter(|record| region.contains(record))
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::station::tests::record;

    #[tokio::test]
    async fn reads_fresh_bincode_cache_without_downloading() {
        let dir = tempfile::tempdir().unwrap();
        let mut zurich = record("06660", &[("en", "Zurich / Fluntern")], 47.3833, 8.5667);
        zurich.region = Some("ZH".to_string());
        let mut vienna = record("11035", &[("en", "Vienna")], 48.25, 16.3667);
        vienna.country = "AT".to_string();

        MeteostatStations::cache_records(
            vec![zurich.clone(), vienna],
            &dir.path().join(BINCODE_CACHE_FILE_NAME),
        )
        .await
        .unwrap();

        let provider = MeteostatStations::with_cache_folder(dir.path().to_path_buf())
            .await
            .unwrap();
        let swiss = provider
            .fetch_stations(&RegionCode::country("CH"))
            .await
            .unwrap();
        assert_eq!(swiss, vec![zurich]);
        assert_eq!(provider.all_records().await.unwrap().len(), 2);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn rewriting_cache_does_not_disturb_readers() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(BINCODE_CACHE_FILE_NAME);
        let records: Vec<StationRecord> = (0..2000)
            .map(|i| {
                let name = format!("Station {}", i);
                record(&format!("{:05}", i), &[("en", name.as_str())], 46.0, 7.0)
            })
            .collect();
        MeteostatStations::cache_records(records.clone(), &path)
            .await
            .unwrap();

        let writer_path = path.clone();
        let writer_records = records.clone();
        let writer = tokio::spawn(async move {
            for _ in 0..50 {
                MeteostatStations::cache_records(writer_records.clone(), &writer_path)
                    .await
                    .unwrap();
            }
        });

        for _ in 0..50 {
            let read_path = path.clone();
            let read = tokio::task::spawn_blocking(move || {
                MeteostatStations::read_cached_records(&read_path)
            })
            .await
            .unwrap()
            .unwrap();
            assert_eq!(read.len(), records.len());
        }
        writer.await.unwrap();
    }

    #[tokio::test]
    async fn corrupt_cache_is_a_decode_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(BINCODE_CACHE_FILE_NAME), b"\x01\x02").unwrap();
        let provider = MeteostatStations::with_cache_folder(dir.path().to_path_buf())
            .await
            .unwrap();
        let result = provider.fetch_stations(&RegionCode::default()).await;
        assert!(matches!(result, Err(DataSourceError::CacheDecode(..))));
    }
}
