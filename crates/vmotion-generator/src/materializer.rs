//! Result materializer: turns a completed job into a local video file.

use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};
use url::Url;
use uuid::Uuid;

use vmotion_models::{ApiKey, JobHandle};
use vmotion_veo::VideoJobService;

use crate::cancel::CancelSignal;
use crate::error::{GenerationError, GenerationResult};

/// Locally addressable video produced by a generation.
///
/// The file belongs to the caller; nothing here tracks or deletes it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoResource {
    pub path: PathBuf,
    /// `file://` URL of `path`, for players that take URLs
    pub url: String,
    pub size_bytes: u64,
}

/// Directory where downloaded videos are written.
#[derive(Debug, Clone)]
pub struct MediaStore {
    dir: PathBuf,
}

impl MediaStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Write video bytes to a fresh file.
    pub async fn save(&self, bytes: &[u8]) -> GenerationResult<VideoResource> {
        tokio::fs::create_dir_all(&self.dir).await?;
        let dir = tokio::fs::canonicalize(&self.dir).await?;
        let path = dir.join(format!("{}.mp4", Uuid::new_v4()));

        tokio::fs::write(&path, bytes).await?;
        debug!(path = %path.display(), size_bytes = bytes.len(), "Wrote video file");

        let url = Url::from_file_path(&path)
            .map(|u| u.to_string())
            .unwrap_or_else(|_| format!("file://{}", path.display()));

        Ok(VideoResource {
            path,
            url,
            size_bytes: bytes.len() as u64,
        })
    }

    /// Delete the video behind a `file://` URL produced by [`save`](Self::save).
    ///
    /// Only files directly inside this store's directory are touched; any
    /// other URL is left alone. Returns whether a file was removed.
    pub async fn remove(&self, url: &str) -> GenerationResult<bool> {
        let Some(path) = Url::parse(url).ok().and_then(|u| u.to_file_path().ok()) else {
            return Ok(false);
        };

        let dir = match tokio::fs::canonicalize(&self.dir).await {
            Ok(dir) => dir,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(false),
            Err(e) => return Err(e.into()),
        };
        if path.parent() != Some(dir.as_path()) {
            debug!(path = %path.display(), "Video is outside the media directory, keeping it");
            return Ok(false);
        }

        match tokio::fs::remove_file(&path).await {
            Ok(()) => {
                info!(path = %path.display(), "Removed video file");
                Ok(true)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}

/// Fetch the artifact behind a completed job and store it locally.
///
/// A done job with no locator fails with [`GenerationError::MissingResult`]
/// before any download is attempted; an attached error payload is logged and
/// kept on the error.
pub async fn materialize<S>(
    service: &S,
    media: &MediaStore,
    credential: &ApiKey,
    job: &JobHandle,
    cancel: &mut CancelSignal,
) -> GenerationResult<VideoResource>
where
    S: VideoJobService + ?Sized,
{
    let Some(locator) = job.result_uri.as_deref() else {
        let provider_error = job.error.as_ref().map(|e| e.to_string());
        warn!(
            job = %job.name,
            provider_error = provider_error.as_deref().unwrap_or("none"),
            "Job finished without a video locator"
        );
        return Err(GenerationError::MissingResult { provider_error });
    };

    let bytes = cancel
        .guard(service.fetch_artifact(credential, locator))
        .await?
        .map_err(GenerationError::Fetch)?;

    let resource = media.save(&bytes).await?;
    info!(
        job = %job.name,
        path = %resource.path.display(),
        size_bytes = resource.size_bytes,
        "Video materialized"
    );

    Ok(resource)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_save_writes_file_and_file_url() {
        let dir = tempfile::tempdir().unwrap();
        let media = MediaStore::new(dir.path().join("videos"));

        let resource = media.save(b"mp4-bytes").await.unwrap();

        assert_eq!(resource.size_bytes, 9);
        assert!(resource.url.starts_with("file://"));
        assert_eq!(resource.path.extension().unwrap(), "mp4");
        assert_eq!(tokio::fs::read(&resource.path).await.unwrap(), b"mp4-bytes");
    }

    #[tokio::test]
    async fn test_each_save_gets_its_own_file() {
        let dir = tempfile::tempdir().unwrap();
        let media = MediaStore::new(dir.path());

        let a = media.save(b"a").await.unwrap();
        let b = media.save(b"b").await.unwrap();
        assert_ne!(a.path, b.path);
    }

    #[tokio::test]
    async fn test_remove_deletes_saved_video() {
        let dir = tempfile::tempdir().unwrap();
        let media = MediaStore::new(dir.path().join("videos"));
        let resource = media.save(b"mp4").await.unwrap();

        assert!(media.remove(&resource.url).await.unwrap());
        assert!(!resource.path.exists());
        assert!(!media.remove(&resource.url).await.unwrap());
    }

    #[tokio::test]
    async fn test_remove_keeps_files_outside_media_dir() {
        let dir = tempfile::tempdir().unwrap();
        let outside = dir.path().join("keep.mp4");
        tokio::fs::write(&outside, b"x").await.unwrap();
        let outside_url = Url::from_file_path(outside.canonicalize().unwrap())
            .unwrap()
            .to_string();

        let media = MediaStore::new(dir.path().join("videos"));
        media.save(b"mp4").await.unwrap();

        assert!(!media.remove(&outside_url).await.unwrap());
        assert!(!media.remove("https://example.com/video.mp4").await.unwrap());
        assert!(outside.exists());
    }
}
