//! Uploader that stages publication packages in a local directory.
//!
//! Each package lands in `<outbox>/<video id>/` with the video, the
//! subtitle document and a `manifest.json` describing the upload.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;

use super::{UploadRequest, VideoUploader};
use crate::error::HubError;

/// File name of the package manifest.
pub const MANIFEST_FILE: &str = "manifest.json";

/// Stages uploads under a local outbox directory.
#[derive(Debug, Clone)]
pub struct OutboxUploader {
    root: PathBuf,
}

impl OutboxUploader {
    /// Creates an uploader staging into `root`.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Outbox root directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }
}

fn upload_error(context: &str, path: &Path, err: &std::io::Error) -> HubError {
    HubError::UploadFailed(format!("{context} {}: {err}", path.display()))
}

async fn copy_into(source: &Path, package: &Path) -> Result<(), HubError> {
    let Some(name) = source.file_name() else {
        return Err(HubError::UploadFailed(format!(
            "{} has no file name",
            source.display()
        )));
    };
    fs::copy(source, package.join(name))
        .await
        .map_err(|e| upload_error("cannot stage", source, &e))?;
    Ok(())
}

async fn stage(request: &UploadRequest, package: &Path) -> Result<(), HubError> {
    copy_into(&request.video_path, package).await?;
    copy_into(&request.subtitle_path, package).await?;

    let manifest = serde_json::to_vec_pretty(request)
        .map_err(|e| HubError::UploadFailed(format!("cannot encode manifest: {e}")))?;
    let manifest_path = package.join(MANIFEST_FILE);
    fs::write(&manifest_path, manifest)
        .await
        .map_err(|e| upload_error("cannot write", &manifest_path, &e))
}

#[async_trait]
impl VideoUploader for OutboxUploader {
    async fn upload(&self, request: &UploadRequest) -> Result<String, HubError> {
        for path in [&request.video_path, &request.subtitle_path] {
            fs::metadata(path)
                .await
                .map_err(|e| upload_error("cannot read", path, &e))?;
        }

        let video_id = uuid::Uuid::new_v4().to_string();
        let package = self.root.join(&video_id);
        fs::create_dir_all(&package)
            .await
            .map_err(|e| upload_error("cannot create", &package, &e))?;

        if let Err(err) = stage(request, &package).await {
            if let Err(cleanup) = fs::remove_dir_all(&package).await {
                tracing::warn!(package = %package.display(), error = %cleanup, "cannot remove partial package");
            }
            return Err(err);
        }

        tracing::info!(%video_id, package = %package.display(), "publication package staged");
        Ok(video_id)
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    fn request(dir: &Path) -> UploadRequest {
        UploadRequest {
            video_path: dir.join("rec.mkv"),
            subtitle_path: dir.join("rec.srt"),
            title: "Morning coding".to_string(),
            description: "Categories:\n".to_string(),
            tags: vec!["rust".to_string()],
            recording_time: "2024-03-01T18:00:00Z".to_string(),
            category_id: "28".to_string(),
        }
    }

    #[tokio::test]
    async fn stages_files_and_manifest() {
        let Ok(source) = tempfile::tempdir() else {
            panic!("tempdir");
        };
        let Ok(outbox) = tempfile::tempdir() else {
            panic!("tempdir");
        };
        let _ = std::fs::write(source.path().join("rec.mkv"), b"video");
        let _ = std::fs::write(source.path().join("rec.srt"), b"1\n");

        let uploader = OutboxUploader::new(outbox.path());
        let Ok(video_id) = uploader.upload(&request(source.path())).await else {
            panic!("upload failed");
        };

        let package = outbox.path().join(&video_id);
        assert!(package.join("rec.mkv").exists());
        assert!(package.join("rec.srt").exists());
        let manifest = std::fs::read_to_string(package.join(MANIFEST_FILE)).unwrap_or_default();
        let value: serde_json::Value = serde_json::from_str(&manifest).unwrap_or_default();
        assert_eq!(
            value.get("category_id").and_then(|v| v.as_str()),
            Some("28")
        );
        assert_eq!(
            value.get("title").and_then(|v| v.as_str()),
            Some("Morning coding")
        );
    }

    #[tokio::test]
    async fn missing_video_fails_upload() {
        let Ok(source) = tempfile::tempdir() else {
            panic!("tempdir");
        };
        let _ = std::fs::write(source.path().join("rec.srt"), b"1\n");

        let uploader = OutboxUploader::new(source.path().join("outbox"));
        let result = uploader.upload(&request(source.path())).await;
        assert!(matches!(result, Err(HubError::UploadFailed(_))));
        assert!(!source.path().join("outbox").exists());
    }

    #[tokio::test]
    async fn failed_staging_removes_partial_package() {
        let Ok(source) = tempfile::tempdir() else {
            panic!("tempdir");
        };
        let _ = std::fs::write(source.path().join("rec.mkv"), b"video");
        // A directory passes the existence check but cannot be copied.
        let _ = std::fs::create_dir(source.path().join("rec.srt"));
        let outbox = source.path().join("outbox");

        let uploader = OutboxUploader::new(&outbox);
        let result = uploader.upload(&request(source.path())).await;
        assert!(matches!(result, Err(HubError::UploadFailed(_))));

        let Ok(mut entries) = std::fs::read_dir(&outbox) else {
            panic!("outbox root should exist");
        };
        assert!(entries.next().is_none());
    }
}
