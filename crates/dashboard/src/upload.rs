//! Image files picked for upload.

use std::path::Path;

use thiserror::Error;

/// Errors reading a local image.
#[derive(Debug, Error)]
pub enum UploadError {
    #[error("unsupported image type: {0} (expected png, jpg, jpeg or webp)")]
    UnsupportedType(String),

    #[error("image file is empty: {0}")]
    Empty(String),

    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// An image held in memory, ready to be sent as a multipart part.
#[derive(Clone, PartialEq, Eq)]
pub struct ImageUpload {
    pub file_name: String,
    pub content_type: &'static str,
    pub bytes: Vec<u8>,
}

impl std::fmt::Debug for ImageUpload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageUpload")
            .field("file_name", &self.file_name)
            .field("content_type", &self.content_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

impl ImageUpload {
    /// Wrap bytes that are already in memory.
    ///
    /// # Errors
    ///
    /// Returns `UploadError` if the extension is not an accepted image type
    /// or there are no bytes.
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Result<Self, UploadError> {
        let file_name = file_name.into();
        let content_type = content_type_for(&file_name)?;
        if bytes.is_empty() {
            return Err(UploadError::Empty(file_name));
        }
        Ok(Self {
            file_name,
            content_type,
            bytes,
        })
    }

    /// Read an image from disk.
    ///
    /// # Errors
    ///
    /// Returns `UploadError` if the file cannot be read, is empty, or is not
    /// an accepted image type.
    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self, UploadError> {
        let path = path.as_ref();
        let display = path.display().to_string();

        let file_name = path
            .file_name()
            .and_then(|name| name.to_str())
            .map_or_else(|| display.clone(), str::to_string);
        // Fail fast on the extension before touching the disk.
        content_type_for(&file_name)?;

        let bytes = tokio::fs::read(path)
            .await
            .map_err(|source| UploadError::Io {
                path: display,
                source,
            })?;

        Self::new(file_name, bytes)
    }
}

fn content_type_for(file_name: &str) -> Result<&'static str, UploadError> {
    let extension = Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    match extension.as_str() {
        "png" => Ok("image/png"),
        "jpg" | "jpeg" => Ok("image/jpeg"),
        "webp" => Ok("image/webp"),
        _ => Err(UploadError::UnsupportedType(file_name.to_string())),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_content_type_by_extension() {
        assert_eq!(content_type_for("a.PNG").unwrap(), "image/png");
        assert_eq!(content_type_for("photo.jpeg").unwrap(), "image/jpeg");
        assert_eq!(content_type_for("photo.jpg").unwrap(), "image/jpeg");
        assert_eq!(content_type_for("x.webp").unwrap(), "image/webp");
        assert!(matches!(
            content_type_for("notes.txt"),
            Err(UploadError::UnsupportedType(_))
        ));
        assert!(content_type_for("noextension").is_err());
    }

    #[test]
    fn test_new_rejects_empty() {
        assert!(matches!(
            ImageUpload::new("a.png", Vec::new()),
            Err(UploadError::Empty(_))
        ));
    }

    #[tokio::test]
    async fn test_from_path_reads_file() {
        let path = std::env::temp_dir().join(format!("seller-panel-{}.png", uuid::Uuid::new_v4()));
        tokio::fs::write(&path, [0x89, b'P', b'N', b'G']).await.unwrap();

        let upload = ImageUpload::from_path(&path).await.unwrap();
        assert_eq!(upload.content_type, "image/png");
        assert_eq!(upload.bytes.len(), 4);
        assert!(upload.file_name.ends_with(".png"));

        tokio::fs::remove_file(&path).await.unwrap();
    }

    #[tokio::test]
    async fn test_from_path_missing_file() {
        let err = ImageUpload::from_path("/definitely/not/here.png").await.unwrap_err();
        assert!(matches!(err, UploadError::Io { .. }));
    }
}
