use crate::weather_data::error::DataSourceError;
use anyhow::Context;
use async_compression::tokio::bufread::GzipDecoder;
use futures_util::TryStreamExt;
use log::{info, warn};
use reqwest::Client;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::io::{AsyncReadExt, BufReader};
use tokio_util::io::StreamReader;

const CACHE_DIR_NAME: &str = "swiss_weather_tracker_cache";

pub fn get_cache_dir() -> anyhow::Result<PathBuf> {
    dirs::cache_dir()
        .ok_or_else(|| anyhow::anyhow!("Could not determine system cache directory"))
        .map(|p| p.join(CACHE_DIR_NAME))
}

pub async fn ensure_cache_dir_exists(path: &Path) -> anyhow::Result<()> {
    match tokio::fs::metadata(path).await {
        Ok(metadata) => {
            if !metadata.is_dir() {
                return Err(anyhow::anyhow!(
                    "Cache path exists but is not a directory: {}",
                    path.display()
                ));
            }
            Ok(())
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            info!("Creating cache directory: {}", path.display());
            tokio::fs::create_dir_all(path).await.with_context(|| {
                format!("Failed to create cache directory: {}", path.display())
            })?;
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}

/// Whether the file at `path` exists and was modified less than `max_age` ago.
pub async fn is_cache_file_fresh(path: &Path, max_age: Duration) -> Result<bool, DataSourceError> {
    let metadata = match tokio::fs::metadata(path).await {
        Ok(metadata) => metadata,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(false),
        Err(e) => return Err(DataSourceError::CacheMetadataRead(path.to_path_buf(), e)),
    };
    let modified = metadata
        .modified()
        .map_err(|e| DataSourceError::CacheMetadataRead(path.to_path_buf(), e))?;
    match modified.elapsed() {
        Ok(age) => Ok(age < max_age),
        Err(e) => {
            // Modified in the future: clock skew or a copied cache. Refresh it.
            warn!(
                "Cache file {} is dated {:?} ahead, treating it as stale",
                path.display(),
                e.duration()
            );
            Ok(false)
        }
    }
}

/// Downloads a gzip-compressed resource and returns the decompressed bytes.
pub async fn download_gzipped(client: &Client, url: &str) -> Result<Vec<u8>, DataSourceError> {
    info!("Downloading data from {}", url);
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| DataSourceError::NetworkRequest(url.to_string(), e))?;

    let response = match response.error_for_status() {
        Ok(resp) => resp,
        Err(e) => {
            warn!("HTTP error for {}: {:?}", url, e);
            return Err(match e.status() {
                Some(status) => DataSourceError::HttpStatus {
                    url: url.to_string(),
                    status,
                    source: e,
                },
                None => DataSourceError::NetworkRequest(url.to_string(), e),
            });
        }
    };

    let stream = response.bytes_stream().map_err(io::Error::other);
    let stream_reader = StreamReader::new(stream);
    let mut decoder = GzipDecoder::new(BufReader::new(stream_reader));
    let mut decompressed = Vec::new();
    decoder
        .read_to_end(&mut decompressed)
        .await
        .map_err(DataSourceError::DownloadIo)?;
    info!(
        "Downloaded and decompressed {} bytes from {}",
        decompressed.len(),
        url
    );
    Ok(decompressed)
}
