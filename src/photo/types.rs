use std::path::PathBuf;

/// Handle to a single source photograph on disk
///
/// The handle is read-only: pixel data and metadata are decoded on demand
/// and every derived buffer is a fresh allocation. Nothing in the pipeline
/// writes back to the source file.
#[derive(Debug, Clone)]
pub struct Photo {
    /// Path to the photo file
    pub path: PathBuf,

    /// Display name (file name, used in logs)
    pub name: String,
}

impl Photo {
    /// Create a new photo handle
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        let path = path.into();
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("photo")
            .to_string();

        Self { path, name }
    }

    /// Get the file extension
    pub fn extension(&self) -> Option<&str> {
        self.path.extension()?.to_str()
    }

    /// Check if this is a supported raster format
    ///
    /// The boundary filter: anything else never reaches the pipeline.
    pub fn is_supported(&self) -> bool {
        match self.extension().map(|ext| ext.to_ascii_lowercase()) {
            Some(ext) => matches!(ext.as_str(), "jpg" | "jpeg" | "png"),
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_supported_extensions() {
        assert!(Photo::new("a/b/photo.jpg").is_supported());
        assert!(Photo::new("photo.JPEG").is_supported());
        assert!(Photo::new("photo.png").is_supported());

        assert!(!Photo::new("clip.mp4").is_supported());
        assert!(!Photo::new("notes.txt").is_supported());
        assert!(!Photo::new("no_extension").is_supported());
    }

    #[test]
    fn test_name_from_path() {
        let photo = Photo::new("/some/dir/IMG_0042.jpg");
        assert_eq!(photo.name, "IMG_0042.jpg");
    }
}
