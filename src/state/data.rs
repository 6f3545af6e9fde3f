/// Shared data structures for the application state
///
/// These structs represent the files the user picked or dropped,
/// before they are handed to the upload API.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::error::IntakeError;

/// Fallback MIME type when the file name gives no hint
const UNKNOWN_MIME: &str = "application/octet-stream";

/// Where the bytes of a media file live
#[derive(Debug, Clone, PartialEq)]
pub enum MediaSource {
    /// File on disk, read lazily when a preview or upload needs it
    Path(PathBuf),
    /// Bytes already in memory
    Memory(Arc<[u8]>),
}

/// A file selected for upload but not yet submitted
#[derive(Debug, Clone, PartialEq)]
pub struct MediaFile {
    /// File name only (e.g., "portrait.jpg"), used as the queue key
    pub name: String,
    /// Size in bytes
    pub size: u64,
    /// MIME type guessed from the file name (e.g., "image/jpeg")
    pub mime_type: String,
    source: MediaSource,
}

impl MediaFile {
    /// Build a media file from bytes already in memory
    pub fn from_bytes(name: impl Into<String>, mime_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            size: bytes.len() as u64,
            mime_type: mime_type.into(),
            source: MediaSource::Memory(bytes.into()),
        }
    }

    /// Build a media file from a path on disk.
    ///
    /// Only the metadata is read here; the contents are loaded on demand.
    pub async fn from_path(path: PathBuf) -> Result<Self, IntakeError> {
        let name = file_name(&path);

        let metadata = tokio::fs::metadata(&path)
            .await
            .map_err(|e| IntakeError::Unreadable {
                name: name.clone(),
                reason: e.to_string(),
            })?;

        if !metadata.is_file() {
            return Err(IntakeError::Unreadable {
                name,
                reason: "not a regular file".to_string(),
            });
        }

        Ok(Self {
            mime_type: guess_mime(&path),
            size: metadata.len(),
            name,
            source: MediaSource::Path(path),
        })
    }

    /// True when the MIME type's top-level type is `image`
    pub fn is_image(&self) -> bool {
        self.mime_type.split('/').next() == Some("image")
    }

    /// Read the full contents of the file
    pub async fn read_bytes(&self) -> std::io::Result<Vec<u8>> {
        match &self.source {
            MediaSource::Path(path) => tokio::fs::read(path).await,
            MediaSource::Memory(bytes) => Ok(bytes.to_vec()),
        }
    }

}

/// Load a batch of paths into media files, failing on the first unreadable one
pub async fn load_batch(paths: Vec<PathBuf>) -> Result<Vec<MediaFile>, IntakeError> {
    let mut files = Vec::with_capacity(paths.len());
    for path in paths {
        files.push(MediaFile::from_path(path).await?);
    }
    Ok(files)
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .unwrap_or_default()
        .to_string_lossy()
        .to_string()
}

fn guess_mime(path: &Path) -> String {
    mime_guess::from_path(path)
        .first_raw()
        .unwrap_or(UNKNOWN_MIME)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_is_image() {
        assert!(MediaFile::from_bytes("a.png", "image/png", vec![]).is_image());
        assert!(MediaFile::from_bytes("a.svg", "image/svg+xml", vec![]).is_image());
        assert!(!MediaFile::from_bytes("a.txt", "text/plain", vec![]).is_image());
        assert!(!MediaFile::from_bytes("a", "", vec![]).is_image());
        assert!(!MediaFile::from_bytes("a", "imagery/x", vec![]).is_image());
    }

    #[tokio::test]
    async fn test_from_path_reads_metadata() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("portrait.JPG");
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(&[0u8; 1234]).unwrap();

        let media = MediaFile::from_path(path.clone()).await.unwrap();
        assert_eq!(media.name, "portrait.JPG");
        assert_eq!(media.size, 1234);
        assert_eq!(media.mime_type, "image/jpeg");
        assert!(media.is_image());
        assert_eq!(media.read_bytes().await.unwrap().len(), 1234);
    }

    #[tokio::test]
    async fn test_unknown_extension_is_not_an_image() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("blob.zzz");
        std::fs::write(&path, b"data").unwrap();

        let media = MediaFile::from_path(path).await.unwrap();
        assert_eq!(media.mime_type, UNKNOWN_MIME);
        assert!(!media.is_image());
    }

    #[tokio::test]
    async fn test_missing_file_is_unreadable() {
        let result = MediaFile::from_path(PathBuf::from("/nonexistent/face.png")).await;
        assert!(matches!(
            result,
            Err(IntakeError::Unreadable { ref name, .. }) if name == "face.png"
        ));
    }

    #[tokio::test]
    async fn test_load_batch_stops_on_error() {
        let dir = tempfile::tempdir().unwrap();
        let good = dir.path().join("a.png");
        std::fs::write(&good, b"png").unwrap();

        let ok = load_batch(vec![good.clone()]).await.unwrap();
        assert_eq!(ok.len(), 1);

        let err = load_batch(vec![good, dir.path().join("missing.png")]).await;
        assert!(err.is_err());
    }
}
