//! Input handling: read one image into an [`ImageFile`] and expand a folder
//! into the list of images it contains.
//!
//! Path decomposition happens once, here, so later stages never re-derive the
//! stem or extension and always rebuild target names from the same parts.

use crate::error::{FileError, RenameError};
use image::ImageFormat;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

/// Image formats picked up by [`scan_folder`].
const SUPPORTED_FORMATS: [ImageFormat; 3] = [ImageFormat::Png, ImageFormat::Jpeg, ImageFormat::Bmp];

/// One image read from disk. Immutable once constructed.
#[derive(Debug, Clone)]
pub struct ImageFile {
    pub path: PathBuf,
    pub directory: PathBuf,
    /// File name without extension.
    pub stem: String,
    /// Extension without the leading dot, case preserved.
    pub extension: Option<String>,
    /// Shared so the decoder can run on the blocking pool without a copy.
    pub bytes: Arc<[u8]>,
}

impl ImageFile {
    /// Read `path` and split it into directory, stem and extension.
    pub async fn read(path: &Path) -> Result<Self, FileError> {
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| FileError::ReadFailed {
                path: path.to_path_buf(),
                detail: e.to_string(),
            })?;
        debug!("Read {} bytes from {}", bytes.len(), path.display());
        Ok(Self::from_parts(path, bytes))
    }

    /// Build an `ImageFile` from bytes already in memory.
    pub fn from_parts(path: &Path, bytes: Vec<u8>) -> Self {
        let directory = path.parent().map(Path::to_path_buf).unwrap_or_default();
        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let extension = path
            .extension()
            .map(|e| e.to_string_lossy().into_owned());
        Self {
            path: path.to_path_buf(),
            directory,
            stem,
            extension,
            bytes: bytes.into(),
        }
    }

    /// File name for display in the log.
    pub fn file_name(&self) -> String {
        display_name(&self.path)
    }

    /// Path of a sibling file with base name `stem` and this file's extension.
    pub fn sibling(&self, stem: &str) -> PathBuf {
        let name = match &self.extension {
            Some(ext) => format!("{stem}.{ext}"),
            None => stem.to_string(),
        };
        self.directory.join(name)
    }
}

/// Last path component, or the whole path when there is none.
pub fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// `true` for `.png`, `.jpg`, `.jpeg` and `.bmp`, in any letter case.
pub fn is_supported_image(path: &Path) -> bool {
    ImageFormat::from_path(path)
        .map(|f| SUPPORTED_FORMATS.contains(&f))
        .unwrap_or(false)
}

/// List the supported images directly inside `dir`, sorted by path.
///
/// Sub-directories are not descended into.
pub async fn scan_folder(dir: &Path) -> Result<Vec<PathBuf>, RenameError> {
    let folder_err = |source: std::io::Error| RenameError::FolderReadFailed {
        path: dir.to_path_buf(),
        source,
    };

    let mut entries = tokio::fs::read_dir(dir).await.map_err(folder_err)?;
    let mut files = Vec::new();
    while let Some(entry) = entries.next_entry().await.map_err(folder_err)? {
        let path = entry.path();
        let is_file = entry
            .file_type()
            .await
            .map(|t| t.is_file())
            .unwrap_or(false);
        if is_file && is_supported_image(&path) {
            files.push(path);
        }
    }
    files.sort();
    debug!("Found {} images in {}", files.len(), dir.display());
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_path_into_parts() {
        let f = ImageFile::from_parts(Path::new("/scans/photo.JPG"), vec![1, 2]);
        assert_eq!(f.directory, PathBuf::from("/scans"));
        assert_eq!(f.stem, "photo");
        assert_eq!(f.extension.as_deref(), Some("JPG"));
        assert_eq!(f.file_name(), "photo.JPG");
    }

    #[test]
    fn sibling_keeps_extension() {
        let f = ImageFile::from_parts(Path::new("/scans/photo.jpg"), Vec::new());
        assert_eq!(f.sibling("123"), PathBuf::from("/scans/123.jpg"));
    }

    #[test]
    fn sibling_without_extension() {
        let f = ImageFile::from_parts(Path::new("/scans/photo"), Vec::new());
        assert_eq!(f.extension, None);
        assert_eq!(f.sibling("123"), PathBuf::from("/scans/123"));
    }

    #[test]
    fn supported_extensions() {
        assert!(is_supported_image(Path::new("a.png")));
        assert!(is_supported_image(Path::new("a.JPEG")));
        assert!(is_supported_image(Path::new("a.jpg")));
        assert!(is_supported_image(Path::new("a.Bmp")));
        assert!(!is_supported_image(Path::new("a.gif")));
        assert!(!is_supported_image(Path::new("a.txt")));
        assert!(!is_supported_image(Path::new("noext")));
    }

    #[tokio::test]
    async fn read_missing_file_is_read_failed() {
        let err = ImageFile::read(Path::new("/definitely/not/here.jpg"))
            .await
            .unwrap_err();
        assert!(matches!(err, FileError::ReadFailed { .. }));
    }

    #[tokio::test]
    async fn scan_folder_filters_and_sorts() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["b.jpg", "a.PNG", "notes.txt", "c.bmp"] {
            std::fs::write(dir.path().join(name), b"x").unwrap();
        }
        std::fs::create_dir(dir.path().join("nested.png")).unwrap();

        let files = scan_folder(dir.path()).await.unwrap();
        let names: Vec<String> = files.iter().map(|p| display_name(p)).collect();
        assert_eq!(names, vec!["a.PNG", "b.jpg", "c.bmp"]);
    }

    #[tokio::test]
    async fn scan_missing_folder_is_fatal() {
        let err = scan_folder(Path::new("/definitely/not/a/folder"))
            .await
            .unwrap_err();
        assert!(matches!(err, RenameError::FolderReadFailed { .. }));
    }
}
