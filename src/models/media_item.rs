use std::path::PathBuf;

/// A file-backed gallery item.
///
/// `width`/`height` are zero until known; the image resolver probes the
/// file header instead of trusting them.
#[derive(Debug, Clone, PartialEq)]
pub struct MediaItem {
    pub path: PathBuf,
    pub mtime: i64,
    pub size: i64,
    pub width: u32,
    pub height: u32,
}

impl MediaItem {
    /// Create a new MediaItem with known pixel dimensions
    pub fn new(path: PathBuf, width: u32, height: u32) -> Self {
        Self {
            path,
            mtime: 0,
            size: 0,
            width,
            height,
        }
    }

    /// Create an item whose dimensions are not known yet
    pub fn unprobed(path: PathBuf, mtime: i64, size: i64) -> Self {
        Self {
            path,
            mtime,
            size,
            width: 0,
            height: 0,
        }
    }

    /// Whether files with this extension can be laid out.
    pub fn is_image_extension(ext: &str) -> bool {
        matches!(
            ext.to_lowercase().as_str(),
            "jpg" | "jpeg" | "png" | "webp" | "gif" | "bmp" | "tiff" | "tif"
        )
    }

    pub fn has_dimensions(&self) -> bool {
        self.width > 0 && self.height > 0
    }

    /// File name for display, falling back to the full path.
    pub fn display_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_extensions() {
        assert!(MediaItem::is_image_extension("JPG"));
        assert!(MediaItem::is_image_extension("webp"));
        assert!(!MediaItem::is_image_extension("txt"));
        assert!(!MediaItem::is_image_extension("mp4"));
    }

    #[test]
    fn test_dimensions_known() {
        assert!(MediaItem::new(PathBuf::from("a.jpg"), 1920, 1080).has_dimensions());
        assert!(!MediaItem::unprobed(PathBuf::from("a.jpg"), 1, 2).has_dimensions());
    }

    #[test]
    fn test_display_name() {
        let item = MediaItem::new(PathBuf::from("/photos/trip/beach.png"), 4, 3);
        assert_eq!(item.display_name(), "beach.png");
    }
}
