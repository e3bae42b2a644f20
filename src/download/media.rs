//! Media file downloading.
//!
//! A media file is written to `<dir>/<media id>.<subtype>` through a `.tmp`
//! sibling that is renamed into place once the body is fully on disk. The
//! canonical path is the only resumability marker: if it exists, the media
//! counts as downloaded.

use std::ffi::OsString;
use std::fs::{FileTimes, OpenOptions};
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use chrono::{DateTime, Utc};
use futures::StreamExt;
use reqwest::Response;
use tokio::fs::File;
use tokio::io::AsyncWriteExt;

use crate::api::PatreonApi;
use crate::download::report::{ReportEvent, ALREADY_DOWNLOADED, NO_MIME_TYPE};
use crate::error::{Error, Result};
use crate::fs::sanitize_filename;
use crate::media::Media;

/// File extension for a `type/subtype` MIME string.
pub fn file_extension(mime_type: &str) -> Result<&str> {
    let mut parts = mime_type.split('/');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(_), Some(subtype), None) => Ok(subtype),
        _ => Err(Error::InvalidMimeType(mime_type.to_string())),
    }
}

/// Canonical path of a media file inside `directory`.
///
/// The file name is sanitized, so it always stays a single component of
/// `directory`.
pub fn media_file(directory: &Path, media: &Media) -> Result<PathBuf> {
    let extension = file_extension(&media.mime_type)?;
    let name = sanitize_filename(&format!("{}.{}", media.id, extension));
    Ok(directory.join(name))
}

/// Temporary sibling a media file is streamed into.
pub fn temp_file(path: &Path) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(".tmp");
    PathBuf::from(name)
}

/// Download one media item into `directory`.
///
/// Never fails: every outcome, including errors, is returned as a
/// [`ReportEvent`]. The file's access and modification times are set to
/// `published_at` for new and already present files alike.
pub async fn download_media(
    api: &PatreonApi,
    media: &Media,
    published_at: DateTime<Utc>,
    directory: &Path,
) -> ReportEvent {
    match write_media(api, media, published_at, directory).await {
        Ok(event) => event,
        Err(e) => {
            tracing::debug!("Failed to download media {}: {}", media.id, e);
            ReportEvent::error(&media.id, e)
        }
    }
}

async fn write_media(
    api: &PatreonApi,
    media: &Media,
    published_at: DateTime<Utc>,
    directory: &Path,
) -> Result<ReportEvent> {
    if media.mime_type.is_empty() {
        return Ok(ReportEvent::skipped(&media.id, NO_MIME_TYPE));
    }

    let path = media_file(directory, media)?;

    if path.exists() {
        tracing::debug!("Skipping existing file: {}", path.display());
        adjust_file_time_logged(&path, published_at).await;
        return Ok(ReportEvent::skipped(&media.id, ALREADY_DOWNLOADED));
    }

    tokio::fs::create_dir_all(directory).await.map_err(|e| {
        Error::FileSystem(format!(
            "failed to create download directory {}: {}",
            directory.display(),
            e
        ))
    })?;

    let response = api.download_file(&media.download_url).await?;

    let tmp = temp_file(&path);
    if let Err(e) = stream_to_file(response, &tmp).await {
        remove_temp(&tmp).await;
        return Err(e);
    }

    if let Err(e) = tokio::fs::rename(&tmp, &path).await {
        remove_temp(&tmp).await;
        return Err(Error::FileSystem(format!(
            "failed to rename file {}: {}",
            tmp.display(),
            e
        )));
    }

    tracing::debug!("Downloaded: {}", path.display());
    adjust_file_time_logged(&path, published_at).await;

    Ok(ReportEvent::success(&media.id))
}

async fn stream_to_file(response: Response, path: &Path) -> Result<()> {
    let mut file = File::create(path).await.map_err(|e| {
        Error::FileSystem(format!("failed to create file {}: {}", path.display(), e))
    })?;

    let write_error =
        |e: std::io::Error| Error::FileSystem(format!("failed to write file {}: {}", path.display(), e));

    let mut stream = response.bytes_stream();
    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(|e| Error::Transport(format!("failed to read media body: {}", e)))?;
        file.write_all(&chunk).await.map_err(write_error)?;
    }

    file.flush().await.map_err(write_error)?;
    file.sync_all().await.map_err(write_error)?;

    Ok(())
}

async fn remove_temp(path: &Path) {
    if let Err(e) = tokio::fs::remove_file(path).await {
        if e.kind() != std::io::ErrorKind::NotFound {
            tracing::debug!("Could not remove {}: {}", path.display(), e);
        }
    }
}

/// Set a file's access and modification time.
///
/// Only read access is needed, so read-only files are adjusted too.
pub fn adjust_file_time(path: &Path, time: DateTime<Utc>) -> std::io::Result<()> {
    let time = SystemTime::from(time);
    let file = OpenOptions::new().read(true).open(path)?;
    file.set_times(FileTimes::new().set_accessed(time).set_modified(time))
}

async fn adjust_file_time_logged(path: &Path, time: DateTime<Utc>) {
    let owned = path.to_path_buf();
    let result = tokio::task::spawn_blocking(move || adjust_file_time(&owned, time))
        .await
        .map_err(std::io::Error::other)
        .and_then(|result| result);

    if let Err(e) = result {
        tracing::warn!("Failed to set file time on {}: {}", path.display(), e);
    }
}
