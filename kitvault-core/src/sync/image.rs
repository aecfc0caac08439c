//! Image uploads to the repository's assets directory.

use std::fs;
use std::path::{Path, PathBuf};

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use chrono::Utc;
use serde::Serialize;
use thiserror::Error;

use super::{SyncAdapter, SyncError, IMAGE_DIR};
use crate::remote::{RemoteError, RemoteStore, WriteReceipt};

pub const MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;

/// Path reported when a configured upload failed and the image was inlined.
pub const LOCAL_IMAGE_PATH: &str = "local";

const ACCEPTED_TYPES: [(&str, &[&str]); 4] = [
    ("image/jpeg", &["jpg", "jpeg"]),
    ("image/png", &["png"]),
    ("image/webp", &["webp"]),
    ("image/svg+xml", &["svg"]),
];

#[derive(Debug, Error)]
pub enum ImageError {
    #[error("Unsupported image type '{0}' (expected JPEG, PNG, WebP or SVG)")]
    UnsupportedType(String),

    #[error("Image is {size} bytes; the limit is {max} bytes")]
    TooLarge { size: usize, max: usize },

    #[error("Failed to read {}: {}", .0.display(), .1)]
    Io(PathBuf, #[source] std::io::Error),
}

/// An image ready to upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageFile {
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl ImageFile {
    /// Builds a validated image.
    pub fn new(
        file_name: impl Into<String>,
        mime_type: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Result<Self, ImageError> {
        let image = Self {
            file_name: file_name.into(),
            mime_type: mime_type.into(),
            bytes,
        };
        image.validate()?;
        Ok(image)
    }

    /// Reads an image from disk, inferring its type from the extension.
    pub fn from_path(path: &Path) -> Result<Self, ImageError> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();
        let mime_type = mime_for_extension(&extension)
            .ok_or_else(|| ImageError::UnsupportedType(format!(".{}", extension)))?;

        let bytes = fs::read(path).map_err(|e| ImageError::Io(path.to_path_buf(), e))?;
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("image")
            .to_string();

        Self::new(file_name, mime_type, bytes)
    }

    pub fn validate(&self) -> Result<(), ImageError> {
        if !ACCEPTED_TYPES.iter().any(|(mime, _)| *mime == self.mime_type) {
            return Err(ImageError::UnsupportedType(self.mime_type.clone()));
        }
        if self.bytes.len() > MAX_IMAGE_BYTES {
            return Err(ImageError::TooLarge {
                size: self.bytes.len(),
                max: MAX_IMAGE_BYTES,
            });
        }
        Ok(())
    }

    /// The image inlined as a `data:` URL.
    pub fn to_data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, STANDARD.encode(&self.bytes))
    }
}

/// Where an uploaded image can be found.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UploadedImage {
    pub url: String,
    /// Repository path. Inlined images carry a `data:` marker when sync is
    /// not configured and [`LOCAL_IMAGE_PATH`] when the upload failed.
    pub path: String,
    /// False when the upload fell back to an inline data URL.
    pub stored_remotely: bool,
}

impl UploadedImage {
    fn inline(image: &ImageFile) -> Self {
        Self {
            url: image.to_data_url(),
            path: format!("data:{};base64", image.mime_type),
            stored_remotely: false,
        }
    }

    fn local(image: &ImageFile) -> Self {
        Self {
            path: LOCAL_IMAGE_PATH.to_string(),
            ..Self::inline(image)
        }
    }
}

impl<R: RemoteStore> SyncAdapter<R> {
    /// Uploads an image under the assets directory.
    ///
    /// Never fails: without a configured remote, or when the upload errors,
    /// the image comes back inlined as a data URL.
    pub async fn upload_image(&self, image: &ImageFile, name: Option<&str>) -> UploadedImage {
        let Some(remote) = self.remote() else {
            return UploadedImage::inline(image);
        };

        let name = match name.map(str::trim).filter(|n| !n.is_empty()) {
            Some(name) => sanitize_file_name(name),
            None => format!(
                "{}-{}",
                Utc::now().timestamp_millis(),
                sanitize_file_name(&image.file_name)
            ),
        };
        let path = format!("{}/{}", IMAGE_DIR, name);
        let message = format!("Upload image: {}", name);

        match put_file(remote, &path, &image.bytes, &message).await {
            Ok(_) => {
                tracing::info!("Uploaded image to {}", path);
                UploadedImage {
                    url: remote.public_url(&path),
                    path,
                    stored_remotely: true,
                }
            }
            Err(e) => {
                tracing::warn!("Failed to upload image, using data URL: {}", e);
                UploadedImage::local(image)
            }
        }
    }

    /// Deletes a previously uploaded image. Returns false when no file
    /// exists at `path`.
    pub async fn delete_image(&self, path: &str) -> Result<bool, SyncError> {
        let remote = self.remote().ok_or(SyncError::NotConfigured)?;
        let path = if path.starts_with(IMAGE_DIR) {
            path.to_string()
        } else {
            format!("{}/{}", IMAGE_DIR, path.trim_start_matches('/'))
        };

        let Some(existing) = remote.read(&path).await? else {
            return Ok(false);
        };
        let message = format!("Delete image: {}", path);
        remote.delete(&path, &existing.sha, &message).await?;
        tracing::info!("Deleted image {}", path);
        Ok(true)
    }
}

/// Creates or overwrites `path`, conditioned on its current hash.
async fn put_file<R: RemoteStore>(
    remote: &R,
    path: &str,
    content: &[u8],
    message: &str,
) -> Result<WriteReceipt, RemoteError> {
    let existing = remote.read(path).await?;
    let expected_sha = existing.as_ref().map(|f| f.sha.as_str());
    remote.write(path, content, message, expected_sha).await
}

fn mime_for_extension(extension: &str) -> Option<&'static str> {
    ACCEPTED_TYPES
        .iter()
        .find(|(_, extensions)| extensions.contains(&extension))
        .map(|(mime, _)| *mime)
}

/// Replaces anything outside `[A-Za-z0-9.-]` with `_`.
fn sanitize_file_name(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::remote::memory::MemoryRemote;
    use crate::storage::LocalStorage;
    use tempfile::TempDir;

    const PNG_BYTES: &[u8] = &[0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a];

    fn png() -> ImageFile {
        ImageFile::new("Home Shirt (2024).png", "image/png", PNG_BYTES.to_vec()).unwrap()
    }

    fn adapter(remote: Option<MemoryRemote>) -> (SyncAdapter<MemoryRemote>, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let storage = LocalStorage::new(temp_dir.path().to_path_buf());
        (SyncAdapter::new(remote, storage), temp_dir)
    }

    #[test]
    fn test_sanitize_file_name() {
        assert_eq!(sanitize_file_name("Home Shirt (2024).png"), "Home_Shirt__2024_.png");
        assert_eq!(sanitize_file_name("kit-01.webp"), "kit-01.webp");
        assert_eq!(sanitize_file_name("../etc/passwd"), ".._etc_passwd");
    }

    #[test]
    fn test_validation() {
        assert!(matches!(
            ImageFile::new("a.gif", "image/gif", vec![1]),
            Err(ImageError::UnsupportedType(_))
        ));
        assert!(matches!(
            ImageFile::new("big.jpg", "image/jpeg", vec![0; MAX_IMAGE_BYTES + 1]),
            Err(ImageError::TooLarge { .. })
        ));
        assert!(ImageFile::new("ok.svg", "image/svg+xml", b"<svg/>".to_vec()).is_ok());
    }

    #[test]
    fn test_from_path_infers_type() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("crest.JPG");
        std::fs::write(&path, [0xff, 0xd8, 0xff]).unwrap();

        let image = ImageFile::from_path(&path).unwrap();
        assert_eq!(image.mime_type, "image/jpeg");
        assert_eq!(image.file_name, "crest.JPG");

        let bmp = temp_dir.path().join("crest.bmp");
        std::fs::write(&bmp, [0]).unwrap();
        assert!(matches!(
            ImageFile::from_path(&bmp),
            Err(ImageError::UnsupportedType(_))
        ));
    }

    #[test]
    fn test_data_url() {
        let image = ImageFile::new("x.png", "image/png", b"abc".to_vec()).unwrap();
        assert_eq!(image.to_data_url(), "data:image/png;base64,YWJj");
    }

    #[tokio::test]
    async fn test_upload_without_remote_inlines() {
        let (adapter, _temp) = adapter(None);
        let uploaded = adapter.upload_image(&png(), None).await;

        assert!(!uploaded.stored_remotely);
        assert!(uploaded.url.starts_with("data:image/png;base64,"));
        assert_eq!(uploaded.path, "data:image/png;base64");
    }

    #[tokio::test]
    async fn test_upload_prefixes_timestamp_and_sanitizes() {
        let (adapter, _temp) = adapter(Some(MemoryRemote::new()));
        let uploaded = adapter.upload_image(&png(), None).await;

        assert!(uploaded.stored_remotely);
        assert!(uploaded.path.starts_with("assets/images/"));
        assert!(uploaded.path.ends_with("-Home_Shirt__2024_.png"));
        assert_eq!(uploaded.url, adapter.remote().unwrap().public_url(&uploaded.path));

        let stored = adapter.remote().unwrap().file(&uploaded.path).unwrap();
        assert_eq!(stored.content, PNG_BYTES);
    }

    #[tokio::test]
    async fn test_upload_with_explicit_name_overwrites() {
        let remote = MemoryRemote::new().with_file("assets/images/arsenal.png", b"old");
        let (adapter, _temp) = adapter(Some(remote));

        let uploaded = adapter.upload_image(&png(), Some("arsenal.png")).await;

        assert_eq!(uploaded.path, "assets/images/arsenal.png");
        let stored = adapter.remote().unwrap().file(&uploaded.path).unwrap();
        assert_eq!(stored.content, PNG_BYTES);
    }

    #[tokio::test]
    async fn test_failed_upload_falls_back_to_data_url() {
        let remote = MemoryRemote::new();
        remote.fail_with_status(500);
        let (adapter, _temp) = adapter(Some(remote));

        let uploaded = adapter.upload_image(&png(), None).await;
        assert!(!uploaded.stored_remotely);
        assert_eq!(uploaded.url, png().to_data_url());
        assert_eq!(uploaded.path, LOCAL_IMAGE_PATH);
    }

    #[tokio::test]
    async fn test_rejected_write_falls_back_to_local_marker() {
        let remote = MemoryRemote::new();
        remote.set_can_write(false);
        let (adapter, _temp) = adapter(Some(remote));

        let uploaded = adapter.upload_image(&png(), Some("arsenal.png")).await;
        assert!(!uploaded.stored_remotely);
        assert_eq!(uploaded.path, "local");
        assert!(adapter.remote().unwrap().file("assets/images/arsenal.png").is_none());
    }

    #[tokio::test]
    async fn test_delete_image() {
        let remote = MemoryRemote::new().with_file("assets/images/old.png", b"x");
        let (adapter, _temp) = adapter(Some(remote));

        assert!(adapter.delete_image("old.png").await.unwrap());
        assert!(adapter.remote().unwrap().file("assets/images/old.png").is_none());
        assert!(!adapter.delete_image("assets/images/old.png").await.unwrap());
    }

    #[tokio::test]
    async fn test_delete_image_requires_remote() {
        let (adapter, _temp) = adapter(None);
        assert!(matches!(
            adapter.delete_image("x.png").await,
            Err(SyncError::NotConfigured)
        ));
    }
}
