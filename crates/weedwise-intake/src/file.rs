//! File handles accepted at the intake boundary

use async_trait::async_trait;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// An opaque user-supplied file
///
/// Metadata is available synchronously; content is read asynchronously
/// because it may involve I/O.
#[async_trait]
pub trait ImageFile: Send + Sync {
    /// Display name (usually the file name)
    fn name(&self) -> &str;

    /// Declared MIME type, possibly empty
    fn media_type(&self) -> &str;

    /// Declared size in bytes
    fn byte_size(&self) -> u64;

    /// Read the full content
    async fn read_bytes(&self) -> io::Result<Vec<u8>>;
}

#[async_trait]
impl<T: ImageFile + ?Sized> ImageFile for Arc<T> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn media_type(&self) -> &str {
        (**self).media_type()
    }

    fn byte_size(&self) -> u64 {
        (**self).byte_size()
    }

    async fn read_bytes(&self) -> io::Result<Vec<u8>> {
        (**self).read_bytes().await
    }
}

/// File whose content is already in memory (picker or drop payload)
#[derive(Debug, Clone)]
pub struct MemoryFile {
    name: String,
    media_type: String,
    bytes: Arc<[u8]>,
    declared_size: u64,
}

impl MemoryFile {
    /// Create new in-memory file
    #[must_use]
    pub fn new(name: impl Into<String>, media_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        let declared_size = bytes.len() as u64;
        Self {
            name: name.into(),
            media_type: media_type.into(),
            bytes: bytes.into(),
            declared_size,
        }
    }

    /// Override the size reported by [`ImageFile::byte_size`]
    ///
    /// Browsers report size from file metadata, which need not match the
    /// bytes eventually read.
    #[inline]
    #[must_use]
    pub fn with_declared_size(mut self, size: u64) -> Self {
        self.declared_size = size;
        self
    }

    /// Content
    #[inline]
    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }
}

#[async_trait]
impl ImageFile for MemoryFile {
    fn name(&self) -> &str {
        &self.name
    }

    fn media_type(&self) -> &str {
        &self.media_type
    }

    fn byte_size(&self) -> u64 {
        self.declared_size
    }

    async fn read_bytes(&self) -> io::Result<Vec<u8>> {
        Ok(self.bytes.to_vec())
    }
}

/// File on the local filesystem
#[derive(Debug, Clone)]
pub struct DiskFile {
    path: PathBuf,
    name: String,
    media_type: String,
    size: u64,
}

impl DiskFile {
    /// Stat a file and infer its MIME type from the extension
    ///
    /// # Errors
    /// Returns an I/O error if the path cannot be stat'ed or is not a
    /// regular file.
    pub async fn open(path: impl AsRef<Path>) -> io::Result<Self> {
        let path = path.as_ref().to_path_buf();
        let metadata = tokio::fs::metadata(&path).await?;
        if !metadata.is_file() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("{} is not a regular file", path.display()),
            ));
        }

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        Ok(Self {
            media_type: media_type_for_path(&path).to_string(),
            name,
            size: metadata.len(),
            path,
        })
    }

    /// Path on disk
    #[inline]
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl ImageFile for DiskFile {
    fn name(&self) -> &str {
        &self.name
    }

    fn media_type(&self) -> &str {
        &self.media_type
    }

    fn byte_size(&self) -> u64 {
        self.size
    }

    async fn read_bytes(&self) -> io::Result<Vec<u8>> {
        tokio::fs::read(&self.path).await
    }
}

/// MIME type for a path, from its extension
#[must_use]
pub fn media_type_for_path(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    match ext.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "bmp" => "image/bmp",
        "tif" | "tiff" => "image/tiff",
        "svg" => "image/svg+xml",
        "heic" => "image/heic",
        "avif" => "image/avif",
        "txt" => "text/plain",
        "json" => "application/json",
        "pdf" => "application/pdf",
        _ => "application/octet-stream",
    }
}
